//! The seam between the generator and a concrete image provider.

use std::sync::Arc;

use async_trait::async_trait;
use festoon_core::generation::ImageSize;

use crate::api::ImageGenError;

/// A single-image request handed to a provider.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: ImageSize,
    /// Shared across every slot of a run.
    pub reference_images: Arc<[String]>,
}

/// Anything that can turn a prompt into one image URL.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate one image, returning it as a URL (typically a `data:` URL).
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, ImageGenError>;
}
