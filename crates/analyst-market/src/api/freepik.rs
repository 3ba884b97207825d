//! Freepik text-to-image client

use crate::error::{AnalystError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const FREEPIK_BASE_URL: &str = "https://api.freepik.com/v1";

/// Aspect ratio requested for every image
pub const ASPECT_RATIO: &str = "widescreen_16_9";

#[derive(Debug, Serialize)]
struct TextToImageRequest<'a> {
    prompt: &'a str,
    aspect_ratio: &'a str,
}

#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    base64: Option<String>,
}

/// Freepik AI image generation client
pub struct FreepikClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FreepikClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: FREEPIK_BASE_URL.to_string(),
        }
    }

    /// Use a preconfigured HTTP client (timeout, user agent)
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Point the client at another server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Generate an image for `prompt`
    ///
    /// Returns the base64 payload of the first generated image, or `None`
    /// when the response carries none. A non-200 status is an error
    /// formatted as `Error {status}: {body}`.
    #[instrument(skip(self))]
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!("{}/ai/text-to-image", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-freepik-api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&TextToImageRequest {
                prompt,
                aspect_ratio: ASPECT_RATIO,
            })
            .send()
            .await
            .map_err(|e| AnalystError::ApiError(format!("Request exception: {e}")))?;

        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalystError::ApiError(format!(
                "Error {}: {}",
                status.as_u16(),
                body
            )));
        }

        let data: TextToImageResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::ApiError(format!("Failed to parse Freepik response: {e}")))?;

        debug!("Freepik returned {} images", data.data.len());
        Ok(data.data.into_iter().next().and_then(|image| image.base64))
    }
}
