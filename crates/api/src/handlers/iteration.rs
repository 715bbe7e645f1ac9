//! Handlers for iterations nested under `/projects/{project_id}/iterations`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use festoon_core::decoration::DecorationType;
use festoon_core::error::CoreError;
use festoon_core::types::DbId;
use festoon_core::validation::{
    validate_decoration_types, validate_details, validate_image_url, validate_size,
    validate_theme,
};
use festoon_db::models::image::CreateImage;
use festoon_db::models::iteration::{CreateIteration, IterationWithImages};
use festoon_db::repositories::{IterationRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// GET /api/projects/{project_id}/iterations
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<IterationWithImages>>> {
    ensure_project_exists(&state, project_id).await?;
    let iterations = IterationRepo::list_with_images_by_project(&state.pool, project_id).await?;
    Ok(Json(iterations))
}

/// POST /api/projects/{project_id}/iterations
///
/// Stores the iteration and all of its images in one transaction.
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateIteration>,
) -> AppResult<(StatusCode, Json<IterationWithImages>)> {
    let input = normalize_iteration(input)?;
    ensure_project_exists(&state, project_id).await?;

    let iteration = IterationRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(
        project_id,
        iteration_id = iteration.iteration.id,
        images = iteration.images.len(),
        "Iteration saved",
    );
    Ok((StatusCode::CREATED, Json(iteration)))
}

/// GET /api/projects/{project_id}/iterations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<IterationWithImages>> {
    let iteration = IterationRepo::find_by_id_with_images(&state.pool, project_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Iteration",
            id,
        }))?;
    Ok(Json(iteration))
}

/// DELETE /api/projects/{project_id}/iterations/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let deleted = IterationRepo::delete(&state.pool, project_id, id).await?;
    if deleted {
        tracing::info!(project_id, iteration_id = id, "Iteration deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Iteration",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_project_exists(state: &AppState, project_id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(())
}

/// Validate an iteration and rewrite labels and size into canonical form.
///
/// Every image must belong to one of the iteration's decoration types.
fn normalize_iteration(input: CreateIteration) -> Result<CreateIteration, CoreError> {
    validate_theme(&input.theme)?;
    validate_details(input.details.as_deref())?;
    let types = validate_decoration_types(&input.decoration_types)?;
    let size = validate_size(input.size.as_deref())?;

    let images = input
        .images
        .into_iter()
        .enumerate()
        .map(|(i, image)| {
            let decoration_type = DecorationType::parse(&image.decoration_type)?;
            if !types.contains(&decoration_type) {
                return Err(CoreError::Validation(format!(
                    "Image {} has decoration type '{decoration_type}' which is not part of this iteration",
                    i + 1
                )));
            }
            validate_image_url(&image.image_url)?;
            Ok(CreateImage {
                decoration_type: decoration_type.label().to_string(),
                image_url: image.image_url.trim().to_string(),
                ..image
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(CreateIteration {
        theme: input.theme.trim().to_string(),
        details: input
            .details
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        decoration_types: types.iter().map(|t| t.label().to_string()).collect(),
        size: Some(size.as_str().to_string()),
        images,
    })
}
