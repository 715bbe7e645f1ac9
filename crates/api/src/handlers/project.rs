//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use festoon_core::error::CoreError;
use festoon_core::types::DbId;
use festoon_core::validation::{validate_description, validate_project_name};
use festoon_db::models::project::{CreateProject, Project, ProjectWithIterations, UpdateProject};
use festoon_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_project_name(&input.name)?;
    validate_description(input.description.as_deref())?;
    input.name = input.name.trim().to_string();

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, name = %project.name, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
///
/// Includes every iteration of the project with its images.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithIterations>> {
    let project = ProjectRepo::find_by_id_with_iterations(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<UpdateProject>,
) -> AppResult<Json<Project>> {
    if let Some(name) = input.name.as_deref() {
        validate_project_name(name)?;
    }
    validate_description(input.description.as_deref())?;
    input.name = input.name.map(|n| n.trim().to_string());

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
///
/// Removes the project's iterations and images with it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
