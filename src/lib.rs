//! HTTP service around the Opera receipt renderer.
//!
//! Two endpoints share one render pipeline: `POST /orders/pdf` streams the
//! finished document, `POST /orders/pdf/save` persists it under the uploads
//! directory and returns a public URL. Persisted receipts are served back
//! under `/uploads`.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Builds the service router. Kept out of `main` so integration tests can
/// drive the exact production routes in-process.
pub fn build_router(state: AppState) -> Router {
    let uploads_dir = state.config.storage.uploads_dir.clone();

    Router::new()
        .route("/health", get(api::health_check))
        .route("/orders/pdf", post(api::stream_receipt_pdf))
        .route("/orders/pdf/save", post(api::save_receipt_pdf))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
