//! Docsearch - API reference aggregation and relevance search
//!
//! This library exposes the core components for the documentation service,
//! enabling integration tests and potential embedding in other applications.

pub mod config;
pub mod document;
pub mod error;
pub mod handlers;
pub mod persistence;
pub mod search;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

// Re-export key types for convenience
pub use config::Config;
pub use document::{Document, Endpoint, Parameter};
pub use error::{AppError, Result};
pub use handlers::{docs_handler, health_handler, mcp_handler, ready_handler, upload_handler};
pub use persistence::{DocumentStore, FileStore};
pub use search::{SearchEngine, SearchOptions, ServiceResult};
pub use state::AppState;

/// API routes over shared state, without middleware or metrics.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/docs", get(docs_handler))
        .route("/api/docs/:service", put(upload_handler))
        .route("/api/mcp", post(mcp_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .with_state(state)
}
