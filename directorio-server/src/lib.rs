//! directorio-server: HTTP API for areas and the persons assigned to them
//!
//! Layers, from the outside in:
//! - [`http`]: axum router, extractors and JSON error mapping
//! - [`service`]: domain rules (unique emails, live areas, areas in use)
//! - [`db`]: repository traits with PostgreSQL and in-memory stores

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use config::DatabaseConfig;
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
