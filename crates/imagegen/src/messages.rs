//! Chat-completions wire types and image extraction.
//!
//! Requests carry the prompt as a text part plus any reference images as
//! `image_url` parts. Image-capable models answer in one of two shapes:
//!
//! - an `images` array on the assistant message, each entry holding an
//!   `image_url.url` (usually a `data:` URL), or
//! - image links embedded in `content`, either as bare `data:` URLs or as
//!   markdown images.
//!
//! [`extract_image`] checks them in that order.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches a base64 `data:` image URL anywhere in a string.
static DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data:image/[a-zA-Z0-9.+-]+;base64,[A-Za-z0-9+/=]+").expect("valid regex")
});

/// Matches a markdown image `![alt](https://...)` and captures the URL.
static MARKDOWN_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*\]\((https?://[^)\s]+)\)").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Output modalities requested from the model.
    pub modalities: Vec<&'static str>,
    pub image_config: ImageConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

/// One part of a multimodal user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Output shape hint.
#[derive(Debug, Clone, Serialize)]
pub struct ImageConfig {
    pub aspect_ratio: &'static str,
}

impl ChatRequest {
    /// Build a single-turn request for one image.
    pub fn for_image(
        model: &str,
        prompt: &str,
        reference_images: &[String],
        aspect_ratio: &'static str,
    ) -> Self {
        let mut content = Vec::with_capacity(1 + reference_images.len());
        content.push(ContentPart::Text {
            text: prompt.to_string(),
        });
        content.extend(reference_images.iter().map(|url| ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.clone() },
        }));

        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            modalities: vec!["image", "text"],
            image_config: ImageConfig { aspect_ratio },
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Body returned by `POST /chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Some providers report failures in a 200 body.
    pub error: Option<ProviderError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<AssistantMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    /// Either a string or an array of content parts.
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub images: Vec<ResponseImage>,
}

/// An image attached to an assistant message.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseImage {
    pub image_url: ImageUrl,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub message: String,
    pub code: Option<serde_json::Value>,
}

/// Pull the first image URL out of a chat-completions response.
pub fn extract_image(response: &ChatResponse) -> Option<String> {
    let messages = || response.choices.iter().filter_map(|c| c.message.as_ref());

    let attached = messages()
        .flat_map(|m| m.images.iter())
        .map(|image| &image.image_url.url)
        .find(|url| !url.is_empty())
        .cloned();
    if attached.is_some() {
        return attached;
    }

    messages().find_map(|m| find_image_in_content(&m.content))
}

/// Search a `content` value (string or part array) for an image link.
fn find_image_in_content(content: &serde_json::Value) -> Option<String> {
    match content {
        serde_json::Value::String(text) => find_image_in_text(text),
        serde_json::Value::Array(parts) => parts.iter().find_map(|part| {
            if let Some(url) = part.pointer("/image_url/url").and_then(|u| u.as_str()) {
                return Some(url.to_string());
            }
            part.get("text")
                .and_then(|t| t.as_str())
                .and_then(find_image_in_text)
        }),
        _ => None,
    }
}

fn find_image_in_text(text: &str) -> Option<String> {
    if let Some(m) = DATA_URL_RE.find(text) {
        return Some(m.as_str().to_string());
    }
    MARKDOWN_IMAGE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
