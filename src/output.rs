use std::error::Error;
use std::io::{self, Write};

use serde_json::json;

use crate::cli::OutputMode;
use crate::errors::{AppError, AppResult};
use crate::faces::ComparisonOutcome;
use crate::storage::UploadOutcome;

pub fn render_upload(outcome: &UploadOutcome, mode: OutputMode) -> AppResult<()> {
    match mode {
        OutputMode::Human => {
            for line in &outcome.logs {
                println!("{}", line);
            }
        }
        OutputMode::Json => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let payload = serde_json::to_string(&outcome.summary)?;
            handle.write_all(payload.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Upload failures are reported but do not halt the flow; the comparison is
/// attempted regardless.
pub fn render_upload_failure(err: &AppError, mode: OutputMode) {
    match mode {
        OutputMode::Human => {
            eprintln!("Error uploading file: {}", err.human_message());
        }
        OutputMode::Json => {
            let payload = json!({
                "success": false,
                "error": err.human_message(),
            });
            if let Ok(json) = serde_json::to_string(&payload) {
                println!("{}", json);
            }
        }
    }
}

pub fn render_comparison(outcome: &ComparisonOutcome, mode: OutputMode) -> AppResult<()> {
    match mode {
        OutputMode::Human => {
            for line in &outcome.logs {
                println!("{}", line);
            }
        }
        OutputMode::Json => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let payload = serde_json::to_string(&outcome.summary)?;
            handle.write_all(payload.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn render_error(err: &AppError, mode: OutputMode) {
    match mode {
        OutputMode::Human => {
            eprintln!("error: {}", err.human_message());
            if let Some(source) = err.source() {
                eprintln!("cause: {}", source);
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "success": false,
                "error": err.human_message(),
            });
            if let Ok(json) = serde_json::to_string(&payload) {
                println!("{}", json);
            }
            if let Some(source) = err.source() {
                eprintln!("cause: {}", source);
            }
        }
    }
}
