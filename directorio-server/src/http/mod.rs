//! HTTP server layer
//!
//! Axum server with:
//! - CORS open to any origin
//! - Request tracing and timeout
//! - Graceful shutdown
//! - JSON error responses (`{"error", "details"}`)

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use error::ApiError;
