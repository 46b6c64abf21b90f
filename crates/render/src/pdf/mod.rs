//! Single-page PDF backend over `lopdf`.

mod image;
mod writer;

pub use writer::render_pdf;

/// Fatal drawing/serialization failures. Per-asset problems never reach
/// this type — an undrawable image is skipped, not raised.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to encode page content: {0}")]
    Content(#[from] lopdf::Error),

    #[error("failed to serialize document: {0}")]
    Io(#[from] std::io::Error),
}
