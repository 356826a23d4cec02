use std::path::Path;

use tracing::warn;

use crate::cli::OutputMode;
use crate::config::Settings;
use crate::errors::AppResult;
use crate::faces::{self, ComparisonOutcome, FaceComparisonBackend};
use crate::output::{render_comparison, render_upload, render_upload_failure};
use crate::storage::{self, ObjectStore};

/// Runs the whole flow once: upload the source photo, upload the target
/// photo, then compare the two uploaded objects.
///
/// Upload failures are reported and skipped past; the object names passed to
/// the comparison are the same either way, so a failed upload surfaces as a
/// remote missing-object error. A comparison failure is returned to the
/// caller.
pub async fn run_pipeline<S, B>(
    settings: &Settings,
    store: &S,
    backend: &B,
    images_dir: &Path,
    mode: OutputMode,
) -> AppResult<ComparisonOutcome>
where
    S: ObjectStore + ?Sized,
    B: FaceComparisonBackend + ?Sized,
{
    for photo in [&settings.source_photo, &settings.target_photo] {
        let local_path = images_dir.join(photo);
        match storage::upload_image(store, &local_path, &settings.bucket, photo).await {
            Ok(outcome) => render_upload(&outcome, mode)?,
            Err(err) => {
                warn!(path = %local_path.display(), error = %err, "upload failed");
                render_upload_failure(&err, mode);
            }
        }
    }

    let outcome = faces::run_face_comparison(
        backend,
        &settings.bucket,
        &settings.source_photo,
        &settings.target_photo,
    )
    .await?;
    render_comparison(&outcome, mode)?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faces::tests::{match_at, StubBackend};
    use crate::storage::tests::StubStore;
    use std::fs;
    use tempfile::TempDir;

    fn settings(bucket: &str) -> Settings {
        Settings {
            access_key_id: "AKIA123".into(),
            secret_access_key: "secret".into(),
            region: "us-east-1".into(),
            bucket: bucket.into(),
            source_photo: "source.jpg".into(),
            target_photo: "target.jpg".into(),
        }
    }

    #[tokio::test]
    async fn uploads_both_photos_then_compares_once() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("source.jpg"), b"source bytes").unwrap();
        fs::write(tmp.path().join("target.jpg"), b"target bytes").unwrap();

        let store = StubStore::default();
        let backend = StubBackend {
            matches: vec![match_at(0.1, 0.2, 97.5)],
            ..StubBackend::default()
        };
        let settings = settings("photos");

        let outcome = run_pipeline(&settings, &store, &backend, tmp.path(), OutputMode::Human)
            .await
            .unwrap();

        let objects = store.objects.lock().unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].0, "photos");
        assert_eq!(objects[0].1, "source.jpg");
        assert_eq!(objects[1].0, "photos");
        assert_eq!(objects[1].1, "target.jpg");

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "photos");
        assert_eq!(calls[0].1, "source.jpg");
        assert_eq!(calls[0].2, "target.jpg");

        assert_eq!(
            outcome.logs,
            vec!["The face at 0.1 0.2 matches with 97.5% similarity"]
        );
    }

    #[tokio::test]
    async fn missing_local_file_does_not_halt_the_flow() {
        let tmp = TempDir::new().unwrap();
        // only the target exists
        fs::write(tmp.path().join("target.jpg"), b"target bytes").unwrap();

        let store = StubStore::default();
        let backend = StubBackend::default();
        let settings = settings("photos");

        let outcome = run_pipeline(&settings, &store, &backend, tmp.path(), OutputMode::Human)
            .await
            .unwrap();

        let objects = store.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].1, "target.jpg");

        assert_eq!(backend.calls.lock().unwrap().len(), 1);
        assert_eq!(outcome.logs, vec!["No faces matched"]);
    }

    #[tokio::test]
    async fn comparison_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("source.jpg"), b"source bytes").unwrap();
        fs::write(tmp.path().join("target.jpg"), b"target bytes").unwrap();

        let store = StubStore::default();
        let backend = StubBackend {
            fail_with: Some("invalid credentials".into()),
            ..StubBackend::default()
        };
        let settings = settings("photos");

        let err = run_pipeline(&settings, &store, &backend, tmp.path(), OutputMode::Human)
            .await
            .unwrap_err();

        match err {
            crate::errors::AppError::Compare { message, .. } => {
                assert_eq!(message, "invalid credentials")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn upload_failure_still_reaches_comparison() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("source.jpg"), b"source bytes").unwrap();
        fs::write(tmp.path().join("target.jpg"), b"target bytes").unwrap();

        let store = StubStore {
            fail_with: Some("access denied".into()),
            ..StubStore::default()
        };
        let backend = StubBackend::default();
        let settings = settings("photos");

        run_pipeline(&settings, &store, &backend, tmp.path(), OutputMode::Human)
            .await
            .unwrap();

        assert!(store.objects.lock().unwrap().is_empty());
        assert_eq!(backend.calls.lock().unwrap().len(), 1);
    }
}
