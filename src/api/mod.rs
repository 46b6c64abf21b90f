pub mod health;
pub mod receipt;

pub use health::health_check;
pub use receipt::{save_receipt_pdf, stream_receipt_pdf};
