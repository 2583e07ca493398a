//! HTTP route handlers for the side-by-side merge server.
//!
//! `/` renders the upload form (Askama), `/api/merge-pdfs` returns the
//! merged PDF or a JSON error.

mod merge;
mod pages;

pub use merge::merge_pdfs;
pub use pages::{health, index};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the two files.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_mul(2)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        // Pages
        .route("/", get(index))
        .route("/health", get(health))
        // API endpoints
        .route("/api/merge-pdfs", post(merge_pdfs))
        // Middleware
        // Merged documents are one-off downloads; nothing should be cached
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
