//! The two receipt endpoints.
//!
//! Both run the same render pipeline — resolve background, plan layout,
//! resolve subject image, compose, write PDF — and differ only in panel
//! placement and delivery: `/orders/pdf` streams the bytes back as an
//! attachment, `/orders/pdf/save` persists them and answers with a public
//! URL once the file is fully on disk.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{Result, ServiceError};
use crate::state::AppState;
use crate::storage::ORDERS_SUBDIR;
use opera_render::{
    compose_receipt, format_receipt_date, receipt_base_name, render_pdf, LayoutEngine,
    ReceiptRequest, RenderMode,
};

/// Panel top used by the save endpoint. The two endpoints deliberately
/// place the panel differently; see DESIGN.md.
const SAVE_PANEL_TOP: f32 = 110.0;

/// POST /orders/pdf — stream the receipt as a download.
pub async fn stream_receipt_pdf(
    State(state): State<AppState>,
    Json(request): Json<ReceiptRequest>,
) -> Result<Response> {
    let pdf = render_receipt(&state, &request, RenderMode::Centered).await?;
    let filename = format!("{}.pdf", receipt_base_name(&request));

    tracing::info!("streaming receipt {} ({} bytes)", filename, pdf.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(pdf))
        .map_err(|e| ServiceError::Internal(format!("failed to build response: {}", e)))
}

/// POST /orders/pdf/save — persist the receipt and answer with its URL.
pub async fn save_receipt_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ReceiptRequest>,
) -> Result<impl IntoResponse> {
    let pdf = render_receipt(&state, &request, RenderMode::FixedOffset(SAVE_PANEL_TOP)).await?;

    let stored = state
        .store
        .persist(&receipt_base_name(&request), &pdf)
        .await?;

    let url = format!(
        "{}://{}/uploads/{}/{}",
        request_scheme(&headers),
        request_host(&headers, &state),
        ORDERS_SUBDIR,
        stored.filename
    );

    tracing::info!("persisted receipt {} ({} bytes)", stored.filename, pdf.len());

    Ok(Json(json!({
        "success": true,
        "url": url,
        "filename": stored.filename,
    })))
}

/// Shared render pipeline. Assets resolve strictly in document order:
/// background first, then layout, then the subject image, then drawing.
async fn render_receipt(
    state: &AppState,
    request: &ReceiptRequest,
    mode: RenderMode,
) -> Result<Vec<u8>> {
    let background = state
        .resolver
        .resolve_background(request.template_ref.as_deref())
        .await;

    let date_label = format_receipt_date(request.date_time.as_deref());
    let plan = LayoutEngine::new(state.measurer.as_ref()).plan(request, &date_label, mode);

    let subject = state
        .resolver
        .resolve_subject(request.selected_image_ref.as_deref())
        .await;

    let ops = compose_receipt(
        request,
        &date_label,
        &plan,
        background.map(|asset| asset.bytes),
        subject.map(|asset| asset.bytes),
        state.measurer.as_ref(),
    );

    Ok(render_pdf(&ops)?)
}

/// Scheme for the public URL: first token of X-Forwarded-Proto when a proxy
/// set it, otherwise plain http.
fn request_scheme(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "http".to_string())
}

/// Host for the public URL: the request's Host header, falling back to the
/// configured bind address.
fn request_host(headers: &HeaderMap, state: &AppState) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| {
            format!(
                "{}:{}",
                state.config.server.host, state.config.server.port
            )
        })
}
