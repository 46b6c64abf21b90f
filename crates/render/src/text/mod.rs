pub mod metrics;
pub mod wrap;

pub use metrics::{HelveticaMetrics, TextMeasurer};
