//! Client library for chat-completions-shaped image generation APIs.
//!
//! Provides the wire types and response extraction, an HTTP client for
//! the provider, the [`ImageProvider`](provider::ImageProvider) seam that
//! lets the provider be swapped out, and the [`Generator`](generator::Generator)
//! that fans a generation plan out into one request per decoration type.

pub mod api;
pub mod config;
pub mod generator;
pub mod messages;
pub mod provider;
