//! Image entity model and DTOs.

use festoon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An image row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: DbId,
    pub iteration_id: DbId,
    pub decoration_type: String,
    pub image_url: String,
    pub prompt: String,
    pub position: i64,
    pub created_at: Timestamp,
}

/// DTO for attaching an image to a new iteration.
///
/// Also accepts the shape of a generated image event (`image`, `index`) so
/// streamed results can be saved as they are.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImage {
    pub decoration_type: String,
    #[serde(alias = "image")]
    pub image_url: String,
    #[serde(default)]
    pub prompt: String,
    /// Defaults to the image's position in the submitted list.
    #[serde(alias = "index")]
    pub position: Option<i64>,
}
