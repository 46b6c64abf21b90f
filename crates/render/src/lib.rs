//! Order receipt rendering for the Opera storefront.
//!
//! This crate owns everything between a parsed order payload and finished
//! PDF bytes:
//!
//! - [`sanitize`]: filesystem-safe tokens for attachment names
//! - [`text`]: the [`TextMeasurer`] capability and word wrapping
//! - [`layout`]: panel geometry from measured text, behind [`RenderMode`]
//! - [`document`]: draw-op composition in fixed z-order
//! - [`pdf`]: the single-page lopdf backend
//!
//! Asset resolution and delivery live elsewhere; this crate only ever sees
//! already-resolved bytes and returns finished bytes.

pub mod color;
pub mod datefmt;
pub mod document;
pub mod geometry;
pub mod layout;
pub mod pdf;
pub mod receipt;
pub mod sanitize;
pub mod text;

pub use datefmt::format_receipt_date;
pub use document::{compose_receipt, DrawOp, ImageFit, TextSpan};
pub use geometry::{Rect, Size};
pub use layout::{LayoutEngine, LayoutPlan, RenderMode};
pub use pdf::{render_pdf, RenderError};
pub use receipt::{receipt_base_name, ReceiptRequest};
pub use sanitize::sanitize;
pub use text::{HelveticaMetrics, TextMeasurer};
