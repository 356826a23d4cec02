use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{Image, S3Object};
use aws_sdk_rekognition::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Minimum similarity percentage for a face pair to be reported. Fixed, not
/// configurable.
pub const SIMILARITY_THRESHOLD: f32 = 90.0;

/// Normalized rectangle locating a detected face within an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceMatch {
    pub bounding_box: BoundingBox,
    pub similarity: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub success: bool,
    pub bucket: String,
    pub source_key: String,
    pub target_key: String,
    pub similarity_threshold: f32,
    pub num_matches: usize,
    pub matches: Vec<FaceMatch>,
}

#[derive(Debug)]
pub struct ComparisonOutcome {
    pub summary: ComparisonSummary,
    pub logs: Vec<String>,
}

/// Seam over the remote face-comparison service.
#[async_trait]
pub trait FaceComparisonBackend {
    async fn compare(
        &self,
        bucket: &str,
        source_key: &str,
        target_key: &str,
        threshold: f32,
    ) -> AppResult<Vec<FaceMatch>>;
}

pub struct RekognitionBackend {
    client: Client,
}

impl RekognitionBackend {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    fn s3_image(bucket: &str, key: &str) -> Image {
        Image::builder()
            .s3_object(S3Object::builder().bucket(bucket).name(key).build())
            .build()
    }
}

#[async_trait]
impl FaceComparisonBackend for RekognitionBackend {
    async fn compare(
        &self,
        bucket: &str,
        source_key: &str,
        target_key: &str,
        threshold: f32,
    ) -> AppResult<Vec<FaceMatch>> {
        let response = self
            .client
            .compare_faces()
            .source_image(Self::s3_image(bucket, source_key))
            .target_image(Self::s3_image(bucket, target_key))
            .similarity_threshold(threshold)
            .send()
            .await
            .map_err(|err| AppError::Compare {
                bucket: bucket.to_string(),
                source_key: source_key.to_string(),
                target_key: target_key.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        let matches = response
            .face_matches()
            .iter()
            .map(|face_match| {
                let bounding_box = face_match
                    .face()
                    .and_then(|face| face.bounding_box())
                    .map(|bb| BoundingBox {
                        left: bb.left().unwrap_or_default(),
                        top: bb.top().unwrap_or_default(),
                        width: bb.width().unwrap_or_default(),
                        height: bb.height().unwrap_or_default(),
                    })
                    .unwrap_or(BoundingBox {
                        left: 0.0,
                        top: 0.0,
                        width: 0.0,
                        height: 0.0,
                    });
                FaceMatch {
                    bounding_box,
                    similarity: face_match.similarity().unwrap_or_default(),
                }
            })
            .collect();

        Ok(matches)
    }
}

/// Asks the backend to compare the two uploaded objects and formats one line
/// per match, or a single notice when nothing matched.
pub async fn run_face_comparison<B: FaceComparisonBackend + ?Sized>(
    backend: &B,
    bucket: &str,
    source_key: &str,
    target_key: &str,
) -> AppResult<ComparisonOutcome> {
    debug!(bucket, source_key, target_key, "requesting face comparison");
    let matches = backend
        .compare(bucket, source_key, target_key, SIMILARITY_THRESHOLD)
        .await?;

    let mut logs = Vec::with_capacity(matches.len().max(1));
    for face_match in &matches {
        logs.push(format!(
            "The face at {} {} matches with {}% similarity",
            face_match.bounding_box.left, face_match.bounding_box.top, face_match.similarity
        ));
    }
    if matches.is_empty() {
        logs.push("No faces matched".to_string());
    }

    let summary = ComparisonSummary {
        success: true,
        bucket: bucket.to_string(),
        source_key: source_key.to_string(),
        target_key: target_key.to_string(),
        similarity_threshold: SIMILARITY_THRESHOLD,
        num_matches: matches.len(),
        matches,
    };

    Ok(ComparisonOutcome { summary, logs })
}
