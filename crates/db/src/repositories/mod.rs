//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` (or any SQLite executor) as the first argument.

pub mod image_repo;
pub mod iteration_repo;
pub mod project_repo;

pub use image_repo::ImageRepo;
pub use iteration_repo::IterationRepo;
pub use project_repo::ProjectRepo;

/// Current UTC time in the RFC 3339 text form used by every timestamp column.
pub(crate) const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";
