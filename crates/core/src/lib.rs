//! Domain layer for Festoon.
//!
//! Holds everything that does not touch the network or the database:
//! the decoration catalogue and its prompt templates, request validation,
//! and the SSE event model with the incremental stream assembler used by
//! clients of the generation endpoint.

pub mod decoration;
pub mod error;
pub mod generation;
pub mod stream;
pub mod types;
pub mod validation;
