//! REST client for a chat-completions image provider.
//!
//! Wraps `POST {api_url}/chat/completions` using [`reqwest`], authenticating
//! with a bearer token.

use async_trait::async_trait;

use crate::config::ImageGenConfig;
use crate::messages::{extract_image, ChatRequest, ChatResponse};
use crate::provider::{ImageProvider, ImageRequest};

/// Longest upstream error body kept for logs and error messages.
const MAX_ERROR_BODY_LEN: usize = 500;

/// HTTP client for the image provider.
pub struct ImageGenApi {
    client: reqwest::Client,
    config: ImageGenConfig,
}

/// Errors from the image provider layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    /// No API key was configured.
    #[error("Image generation API key is not configured")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code or an error body.
    #[error("Image provider error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated) for debugging.
        body: String,
    },

    /// The response parsed but contained no image.
    #[error("Image provider returned no image")]
    NoImage,

    /// The response body was not the expected JSON shape.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ImageGenError {
    /// A short message that is safe to show to end users.
    pub fn user_message(&self) -> String {
        match self {
            ImageGenError::MissingApiKey => "Image generation is not configured".to_string(),
            ImageGenError::Request(e) if e.is_timeout() => {
                "The image provider timed out".to_string()
            }
            ImageGenError::Request(_) => "Could not reach the image provider".to_string(),
            ImageGenError::ApiError { status, .. } => {
                format!("The image provider rejected the request (status {status})")
            }
            ImageGenError::NoImage => "The image provider did not return an image".to_string(),
            ImageGenError::MalformedResponse(_) => {
                "The image provider returned an unreadable response".to_string()
            }
        }
    }
}

impl ImageGenApi {
    /// Create a client for the configured provider.
    pub fn new(config: ImageGenConfig) -> Result<Self, ImageGenError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Send one chat-completions request and extract its image.
    pub async fn create_image(&self, request: &ImageRequest) -> Result<String, ImageGenError> {
        if self.config.api_key.is_empty() {
            return Err(ImageGenError::MissingApiKey);
        }

        let body = ChatRequest::for_image(
            &self.config.model,
            &request.prompt,
            &request.reference_images,
            request.size.aspect_ratio(),
        );

        tracing::debug!(
            model = %self.config.model,
            size = %request.size,
            reference_images = request.reference_images.len(),
            "Sending image generation request",
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ImageGenError::MalformedResponse(e.to_string()))?;

        if let Some(err) = parsed.error.as_ref() {
            let status = err
                .code
                .as_ref()
                .and_then(|c| c.as_u64())
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(502);
            return Err(ImageGenError::ApiError {
                status,
                body: truncate(&err.message),
            });
        }

        extract_image(&parsed).ok_or(ImageGenError::NoImage)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ImageGenError::ApiError`]
    /// containing the status and (truncated) body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ImageGenError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ImageGenError::ApiError {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageProvider for ImageGenApi {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, ImageGenError> {
        self.create_image(request).await
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
