use std::sync::Arc;

use festoon_imagegen::generator::Generator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: festoon_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fans generation plans out to the image provider.
    pub generator: Generator,
}
