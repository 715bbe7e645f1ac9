pub mod generate;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate                                        generate images (POST)
///
/// /projects                                        list, create
/// /projects/{id}                                   get (with iterations), update, delete
/// /projects/{project_id}/iterations                list, create
/// /projects/{project_id}/iterations/{id}           get, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generate::router())
        .nest("/projects", project::router())
}
