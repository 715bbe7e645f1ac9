//! Iteration entity model and DTOs.
//!
//! An iteration is one generation run within a project: the theme and
//! decoration types that were requested, plus the images that came back.

use festoon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::image::{CreateImage, Image};

/// An iteration row from the `iterations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    pub id: DbId,
    pub project_id: DbId,
    pub theme: String,
    pub details: Option<String>,
    /// Decoration type labels in request order.
    pub decoration_types: Json<Vec<String>>,
    pub size: String,
    pub created_at: Timestamp,
}

/// An iteration together with its images, ordered by position.
#[derive(Debug, Clone, Serialize)]
pub struct IterationWithImages {
    #[serde(flatten)]
    pub iteration: Iteration,
    pub images: Vec<Image>,
}

/// DTO for creating an iteration and its images in one call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIteration {
    pub theme: String,
    pub details: Option<String>,
    pub decoration_types: Vec<String>,
    /// Defaults to `1024x1024` if omitted.
    pub size: Option<String>,
    #[serde(default)]
    pub images: Vec<CreateImage>,
}
