//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where the entity is editable, a `Deserialize` update DTO (all `Option` fields)
//!
//! JSON field names are camelCase to match the generation API.

pub mod image;
pub mod iteration;
pub mod project;
