//! Input validation for projects, iterations, and generation requests.
//!
//! Every check returns [`CoreError::Validation`] with a message suitable for
//! showing to the user; the API layer maps it to `400 Bad Request`.

use std::collections::HashSet;

use crate::decoration::{build_prompt, DecorationType};
use crate::error::CoreError;
use crate::generation::{GenerateRequest, GenerationPlan, ImageSize, PlannedImage};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a project name in characters.
pub const MAX_PROJECT_NAME_LENGTH: usize = 100;

/// Maximum length of a project description in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;

/// Maximum length of a party theme in characters.
pub const MAX_THEME_LENGTH: usize = 500;

/// Maximum length of the free-form details field in characters.
pub const MAX_DETAILS_LENGTH: usize = 2_000;

/// Maximum number of decoration types in one request.
pub const MAX_DECORATION_TYPES: usize = DecorationType::ALL.len();

/// Maximum number of reference images in one request.
pub const MAX_REFERENCE_IMAGES: usize = 4;

/// Maximum decoded size of a single reference image.
pub const MAX_REFERENCE_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for reference images.
pub const ALLOWED_REFERENCE_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

/// Validate a project name: required, at most [`MAX_PROJECT_NAME_LENGTH`] characters.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Project name is required".to_string()));
    }
    let len = trimmed.chars().count();
    if len > MAX_PROJECT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project name exceeds maximum length of {MAX_PROJECT_NAME_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate an optional project description.
pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    validate_optional_length("Description", description, MAX_DESCRIPTION_LENGTH)
}

/// Validate a party theme: required, at most [`MAX_THEME_LENGTH`] characters.
pub fn validate_theme(theme: &str) -> Result<(), CoreError> {
    let trimmed = theme.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Theme is required".to_string()));
    }
    let len = trimmed.chars().count();
    if len > MAX_THEME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Theme exceeds maximum length of {MAX_THEME_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate the optional details field.
pub fn validate_details(details: Option<&str>) -> Result<(), CoreError> {
    validate_optional_length("Details", details, MAX_DETAILS_LENGTH)
}

/// Parse and validate the requested decoration types.
///
/// The list must be non-empty, contain only whitelisted labels, and name each
/// type at most once. Request order is preserved.
pub fn validate_decoration_types(labels: &[String]) -> Result<Vec<DecorationType>, CoreError> {
    if labels.is_empty() {
        return Err(CoreError::Validation(
            "At least one decoration type must be selected".to_string(),
        ));
    }
    if labels.len() > MAX_DECORATION_TYPES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_DECORATION_TYPES} decoration types may be requested (got {})",
            labels.len()
        )));
    }

    let mut seen = HashSet::with_capacity(labels.len());
    let mut types = Vec::with_capacity(labels.len());
    for label in labels {
        let t = DecorationType::parse(label)?;
        if !seen.insert(t) {
            return Err(CoreError::Validation(format!(
                "Decoration type '{t}' was requested more than once"
            )));
        }
        types.push(t);
    }
    Ok(types)
}

/// Parse the requested size, defaulting to square when absent or blank.
pub fn validate_size(size: Option<&str>) -> Result<ImageSize, CoreError> {
    let Some(size) = size.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(ImageSize::default());
    };
    ImageSize::ALL
        .into_iter()
        .find(|s| s.as_str() == size)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid size '{size}'. Must be one of: {}",
                ImageSize::ALL.map(ImageSize::as_str).join(", ")
            ))
        })
}

/// Validate reference images attached to a generation request.
///
/// Each entry must be a base64 `data:` URL with an allowed image MIME type.
/// The decoded size is estimated from the payload length; the bytes
/// themselves are not inspected.
pub fn validate_reference_images(images: &[String]) -> Result<(), CoreError> {
    if images.len() > MAX_REFERENCE_IMAGES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_REFERENCE_IMAGES} reference images may be attached (got {})",
            images.len()
        )));
    }

    for (i, url) in images.iter().enumerate() {
        let n = i + 1;
        let (mime, payload) = split_data_url(url).ok_or_else(|| {
            CoreError::Validation(format!(
                "Reference image {n} must be a base64 data URL"
            ))
        })?;

        if !ALLOWED_REFERENCE_MIME_TYPES.contains(&mime) {
            return Err(CoreError::Validation(format!(
                "Reference image {n} has unsupported type '{mime}'. Must be one of: {}",
                ALLOWED_REFERENCE_MIME_TYPES.join(", ")
            )));
        }

        if payload.is_empty() {
            return Err(CoreError::Validation(format!("Reference image {n} is empty")));
        }

        let bytes = estimated_decoded_len(payload);
        if bytes > MAX_REFERENCE_IMAGE_BYTES {
            return Err(CoreError::Validation(format!(
                "Reference image {n} exceeds the {} MB limit",
                MAX_REFERENCE_IMAGE_BYTES / (1024 * 1024)
            )));
        }
    }
    Ok(())
}

/// Validate the URL of an image being saved to an iteration.
///
/// Accepts `data:image/...` URLs as returned by the provider, or plain
/// `http(s)` links.
pub fn validate_image_url(url: &str) -> Result<(), CoreError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(CoreError::Validation("Image URL is required".to_string()));
    }
    let accepted = url.starts_with("data:image/")
        || url.starts_with("https://")
        || url.starts_with("http://");
    if !accepted {
        return Err(CoreError::Validation(
            "Image URL must be a data:image URL or an http(s) link".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Whole-request validation
// ---------------------------------------------------------------------------

/// Validate a generation request and expand it into a [`GenerationPlan`].
///
/// Slot indices follow the order of `decoration_types` in the request.
pub fn validate_generate_request(req: &GenerateRequest) -> Result<GenerationPlan, CoreError> {
    validate_theme(&req.theme)?;
    validate_details(req.details.as_deref())?;
    let types = validate_decoration_types(&req.decoration_types)?;
    let size = validate_size(req.size.as_deref())?;
    validate_reference_images(&req.reference_images)?;

    let theme = req.theme.trim().to_string();
    let details = req
        .details
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let images = types
        .into_iter()
        .enumerate()
        .map(|(index, decoration_type)| PlannedImage {
            index,
            decoration_type,
            prompt: build_prompt(decoration_type, &theme, details.as_deref()),
        })
        .collect();

    Ok(GenerationPlan {
        theme,
        details,
        size,
        reference_images: req.reference_images.clone(),
        images,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_optional_length(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), CoreError> {
    if let Some(value) = value {
        let len = value.chars().count();
        if len > max {
            return Err(CoreError::Validation(format!(
                "{field} exceeds maximum length of {max} characters (got {len})"
            )));
        }
    }
    Ok(())
}

/// Split `data:<mime>;base64,<payload>` into `(mime, payload)`.
fn split_data_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, payload))
}

/// Decoded byte length of a base64 payload, without decoding it.
fn estimated_decoded_len(payload: &str) -> usize {
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    ((payload.len() / 4) * 3 + (payload.len() % 4) * 3 / 4).saturating_sub(padding.min(2))
}
