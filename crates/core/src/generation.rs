//! Request and result types for decoration image generation.
//!
//! [`GenerateRequest`] is the raw wire shape accepted by the generation
//! endpoint. Validation (see [`crate::validation`]) turns it into a
//! [`GenerationPlan`]: one [`PlannedImage`] per requested decoration type,
//! each with its slot index and fully rendered prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decoration::DecorationType;

// ---------------------------------------------------------------------------
// Image size
// ---------------------------------------------------------------------------

/// Output dimensions offered to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1024x1024")]
    Square,
    #[serde(rename = "1024x1536")]
    Portrait,
    #[serde(rename = "1536x1024")]
    Landscape,
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [ImageSize::Square, ImageSize::Portrait, ImageSize::Landscape];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::Portrait => "1024x1536",
            ImageSize::Landscape => "1536x1024",
        }
    }

    /// Aspect ratio hint understood by chat-completions image models.
    pub fn aspect_ratio(self) -> &'static str {
        match self {
            ImageSize::Square => "1:1",
            ImageSize::Portrait => "2:3",
            ImageSize::Landscape => "3:2",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub decoration_types: Vec<String>,
    #[serde(default)]
    pub size: Option<String>,
    /// `data:image/...;base64,` URLs attached as visual references.
    #[serde(default)]
    pub reference_images: Vec<String>,
    /// When set, results are delivered as an SSE stream.
    #[serde(default)]
    pub stream: bool,
}

/// A validated request, ready to fan out to the image provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub theme: String,
    pub details: Option<String>,
    pub size: ImageSize,
    pub reference_images: Vec<String>,
    pub images: Vec<PlannedImage>,
}

/// One slot of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedImage {
    /// Position of this decoration type in the original request.
    pub index: usize,
    pub decoration_type: DecorationType,
    pub prompt: String,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A successfully generated image for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    /// Image as a URL, usually a `data:` URL.
    pub image: String,
    pub decoration_type: DecorationType,
    pub index: usize,
    pub prompt: String,
}

/// A failed slot. Other slots of the same run are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFailure {
    pub error: String,
    pub decoration_type: DecorationType,
    pub index: usize,
}

/// Non-streaming response body of `POST /api/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub images: Vec<GeneratedImage>,
    #[serde(default)]
    pub errors: Vec<ImageFailure>,
}

impl GenerateResponse {
    /// Sort both lists by slot index.
    pub fn sorted(mut self) -> Self {
        self.images.sort_by_key(|i| i.index);
        self.errors.sort_by_key(|e| e.index);
        self
    }
}
