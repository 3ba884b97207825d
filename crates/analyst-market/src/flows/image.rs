//! Image generation through Freepik

use crate::api::FreepikClient;
use crate::error::AnalystError;
use crate::report::ReportSink;
use std::path::PathBuf;
use tracing::{error, info};

/// Result of an image request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Base64 payload written to `path`; `None` when the write failed
    Saved { path: Option<PathBuf> },
    /// The request failed; `message` was appended to the error log
    Failed { message: String },
}

/// Message logged when Freepik answers without an image
pub const MISSING_BASE64: &str = "The API response does not contain the expected base64 value.";

/// Request an image for `prompt` and persist the outcome
///
/// Every failure, transport or API, is written to the image error log and
/// returned as [`ImageOutcome::Failed`].
pub async fn run(client: &FreepikClient, sink: &ReportSink, prompt: &str) -> ImageOutcome {
    info!("Generating image for prompt: {}", prompt);

    let message = match client.generate(prompt).await {
        Ok(Some(base64)) => {
            return ImageOutcome::Saved {
                path: sink.save_image_response(prompt, &base64),
            };
        }
        Ok(None) => MISSING_BASE64.to_string(),
        Err(AnalystError::ApiError(message)) => message,
        Err(e) => e.to_string(),
    };

    error!("Image generation failed: {}", message);
    sink.append_error_log(&message);
    ImageOutcome::Failed { message }
}
