use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures that reach the caller. Per-asset fallbacks never end up here —
/// only a broken render or a failed write does.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("PDF generation failed: {0}")]
    Render(#[from] opera_render::RenderError),

    #[error("could not persist receipt: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Wire-facing error label, kept in the storefront's language.
    fn label(&self) -> &'static str {
        match self {
            Self::Render(_) => "Error al generar PDF",
            Self::Persistence(_) => "Error al generar/guardar PDF",
            Self::Internal(_) => "Error interno",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        let body = Json(json!({
            "success": false,
            "error": self.label(),
            "message": self.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
