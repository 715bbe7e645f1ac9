//! Route definitions for the `/projects` resource.
//!
//! Also nests iteration routes under `/projects/{project_id}/iterations`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{iteration, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
///
/// GET    /{project_id}/iterations           -> list_by_project
/// POST   /{project_id}/iterations           -> create
/// GET    /{project_id}/iterations/{id}      -> get_by_id
/// DELETE /{project_id}/iterations/{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    let iteration_routes = Router::new()
        .route(
            "/",
            get(iteration::list_by_project).post(iteration::create),
        )
        .route(
            "/{id}",
            get(iteration::get_by_id).delete(iteration::delete),
        );

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .nest("/{project_id}/iterations", iteration_routes)
}
