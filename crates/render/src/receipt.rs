//! The order receipt wire model and its display rules.
//!
//! Everything here is transient per render call. Empty strings count as
//! absent, matching how the storefront frontend submits half-filled forms.

use serde::Deserialize;
use std::fmt;

use crate::sanitize::sanitize;

/// Free-form order payload accepted by both receipt endpoints.
///
/// `selected_image_ref` / `template_ref` also accept the storefront's
/// original field names as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReceiptRequest {
    pub cake_title: Option<String>,
    pub centimeters: Option<NumberOrText>,
    pub cake_quantity: Option<NumberOrText>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_full_name: Option<String>,
    pub order_for_name: Option<String>,
    pub pickup_ack: bool,
    pub date_time: Option<String>,
    pub notes: Option<String>,
    pub minimal: bool,
    #[serde(alias = "selectedImageUrl")]
    pub selected_image_ref: Option<String>,
    #[serde(alias = "plantillaUrl")]
    pub template_ref: Option<String>,
}

/// JSON value that may arrive as either a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrText::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            NumberOrText::Number(n) => write!(f, "{}", n),
            NumberOrText::Text(s) => f.write_str(s),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl ReceiptRequest {
    /// Customer display name: full name, then plain name, then "-".
    pub fn display_name(&self) -> &str {
        non_empty(&self.customer_full_name)
            .or_else(|| non_empty(&self.customer_name))
            .unwrap_or("-")
    }

    pub fn title_line(&self) -> Option<String> {
        non_empty(&self.cake_title).map(|t| format!("Torta: {}", t))
    }

    pub fn centimeters_line(&self) -> String {
        let value = self
            .centimeters
            .as_ref()
            .map(|v| v.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "-".to_string());
        format!("Centímetros de torta: {} cm", value)
    }

    pub fn quantity_line(&self) -> String {
        let value = self
            .cake_quantity
            .as_ref()
            .map(|v| v.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "1".to_string());
        format!("Cantidad de torta: {}", value)
    }

    /// The label/value rows drawn inside the panel. `minimal` collapses the
    /// set to exactly the customer name row.
    pub fn field_rows(&self) -> Vec<(&'static str, String)> {
        let name_row = ("Nombre completo", self.display_name().to_string());
        if self.minimal {
            return vec![name_row];
        }
        vec![
            name_row,
            (
                "Teléfono",
                non_empty(&self.customer_phone).unwrap_or("-").to_string(),
            ),
            (
                "A nombre de",
                non_empty(&self.order_for_name).unwrap_or("-").to_string(),
            ),
            (
                "Confirmación retiro en local",
                if self.pickup_ack { "Sí" } else { "No" }.to_string(),
            ),
            ("Notas", non_empty(&self.notes).unwrap_or("-").to_string()),
        ]
    }
}

/// Attachment/file base name: `pedido-opera_{title}_{customer}` with both
/// parts sanitized and defaulted.
pub fn receipt_base_name(request: &ReceiptRequest) -> String {
    let title = sanitize(non_empty(&request.cake_title).unwrap_or(""));
    let title = if title.is_empty() { "torta".to_string() } else { title };

    let customer = non_empty(&request.customer_full_name)
        .or_else(|| non_empty(&request.customer_name))
        .unwrap_or("");
    let customer = sanitize(customer);
    let customer = if customer.is_empty() {
        "cliente".to_string()
    } else {
        customer
    };

    format!("pedido-opera_{}_{}", title, customer)
}
