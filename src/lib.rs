//! Shortfront - web front end for a URL shortening service
//!
//! This library implements the user-facing half of a URL shortener:
//! accepting and normalizing destination URLs, calling the external
//! shortening backend, and keeping a small local history of created
//! links. Shortening, redirection and persistence themselves live in
//! the backend service and are reached over HTTP.
//!
//! # Architecture
//! - `validate`: hostname classifier and URL normalizer (shared by the
//!   preview endpoint and the authoritative submit gate)
//! - `history`: bounded, versioned local history cache and the
//!   create-count counter, over an injected key-value store
//! - `client`: HTTP clients for the shortening backend and its admin API
//! - `services`: orchestration of the shorten flow
//! - `api`: actix-web handlers and the embedded entry page
//! - `config`: configuration management
//! - `system`: logging and process-level utilities

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod history;
pub mod services;
pub mod system;
pub mod utils;
pub mod validate;
