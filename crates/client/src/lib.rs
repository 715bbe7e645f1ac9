//! Client for a Festoon server.
//!
//! Posts streaming generation requests, reassembles the server-sent events
//! into per-slot results as they arrive, and saves finished runs to a
//! project.

pub mod client;
pub mod output;
