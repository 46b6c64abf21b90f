//! Panel geometry computed from measured text.
//!
//! All units are PDF points. The panel is always 80% of the page width and
//! horizontally centered; its height grows with the measured date label,
//! title and field rows, floored by the image box. Vertical placement is the
//! one thing the two endpoints do differently, so it stays an explicit
//! [`RenderMode`] chosen per call site.

use crate::geometry::Rect;
use crate::receipt::ReceiptRequest;
use crate::text::TextMeasurer;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

pub const PANEL_PADDING: f32 = 24.0;
pub const PANEL_RADIUS: f32 = 16.0;
pub const PANEL_OPACITY: f32 = 0.94;

pub const DATE_BOX_WIDTH: f32 = 220.0;
pub const IMAGE_BOX_WIDTH: f32 = 180.0;
pub const IMAGE_BOX_HEIGHT: f32 = 140.0;

/// Fixed vertical advance per field row, independent of wrapped height.
pub const ROW_ADVANCE: f32 = 20.0;
/// Advance after the title line.
pub const TITLE_ADVANCE: f32 = 22.0;
/// Advance per subtitle line.
pub const SUBTITLE_ADVANCE: f32 = 20.0;

pub const TITLE_SIZE: f32 = 16.0;
pub const SUBTITLE_SIZE: f32 = 14.0;
pub const FIELD_SIZE: f32 = 12.0;
pub const DATE_SIZE: f32 = 12.0;

/// Reserved right-hand column (image box plus breathing room).
const RIGHT_COLUMN: f32 = 260.0;
const DATE_GAP: f32 = 12.0;
const TITLE_GAP: f32 = 6.0;
const SUBTITLE_GAP: f32 = 6.0;
const TRAILING_GAP: f32 = 10.0;
const IMAGE_BOTTOM_SLACK: f32 = 8.0;

/// Vertical placement of the panel on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode {
    /// Centered between the page edges.
    Centered,
    /// Fixed distance from the top of the page.
    FixedOffset(f32),
}

/// Resolved geometry for one receipt, consumed by the draw pass and
/// discarded afterwards.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub panel: Rect,
    pub date_box: Rect,
    pub image_box: Rect,
    /// Left edge of the text column.
    pub content_x: f32,
    /// Wrap width of the text column.
    pub content_width: f32,
    /// Top of the first content line, below the date label.
    pub content_start: f32,
    /// Measured wrapped heights of the field rows, in draw order.
    pub row_heights: Vec<f32>,
}

pub struct LayoutEngine<'a> {
    measurer: &'a dyn TextMeasurer,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer) -> Self {
        Self { measurer }
    }

    pub fn plan(
        &self,
        request: &ReceiptRequest,
        date_label: &str,
        mode: RenderMode,
    ) -> LayoutPlan {
        let panel_width = (PAGE_WIDTH * 0.8).round();
        let content_width = panel_width - RIGHT_COLUMN;

        let date_height = self
            .measurer
            .height_of(date_label, DATE_SIZE, DATE_BOX_WIDTH);

        let title_height = request
            .title_line()
            .map(|title| self.measurer.height_of(&title, TITLE_SIZE, content_width))
            .unwrap_or(0.0);

        let subtitle_block = if request.minimal {
            0.0
        } else {
            self.measurer
                .height_of(&request.centimeters_line(), SUBTITLE_SIZE, content_width)
                + SUBTITLE_GAP
        };

        let row_heights: Vec<f32> = request
            .field_rows()
            .iter()
            .map(|(label, value)| {
                let line = format!("{}: {}", label, value);
                self.measurer.height_of(&line, FIELD_SIZE, content_width)
            })
            .collect();
        let rows_height: f32 = row_heights.iter().sum();

        let title_block = if title_height > 0.0 {
            title_height + TITLE_GAP
        } else {
            0.0
        };
        let content_block = title_block + subtitle_block + rows_height + TRAILING_GAP;

        let top_offset = PANEL_PADDING + date_height + DATE_GAP;
        let panel_height = (top_offset
            + content_block.max(IMAGE_BOX_HEIGHT + IMAGE_BOTTOM_SLACK)
            + PANEL_PADDING)
            .ceil();

        let panel_x = ((PAGE_WIDTH - panel_width) / 2.0).round();
        let panel_y = match mode {
            RenderMode::Centered => ((PAGE_HEIGHT - panel_height) / 2.0).round(),
            RenderMode::FixedOffset(y) => y,
        };

        let panel = Rect::new(panel_x, panel_y, panel_width, panel_height);
        let date_box = Rect::new(
            panel.right() - PANEL_PADDING - DATE_BOX_WIDTH,
            panel.y + PANEL_PADDING,
            DATE_BOX_WIDTH,
            date_height,
        );
        let content_start = panel.y + top_offset;
        let image_box = Rect::new(
            panel.right() - PANEL_PADDING - IMAGE_BOX_WIDTH,
            content_start,
            IMAGE_BOX_WIDTH,
            IMAGE_BOX_HEIGHT,
        );

        LayoutPlan {
            panel,
            date_box,
            image_box,
            content_x: panel.x + PANEL_PADDING,
            content_width,
            content_start,
            row_heights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::HelveticaMetrics;

    fn sample_request(minimal: bool) -> ReceiptRequest {
        serde_json::from_value(serde_json::json!({
            "cake_title": "Torta de Chocolate",
            "centimeters": 25,
            "cake_quantity": 2,
            "customer_full_name": "Juan Pérez",
            "customer_phone": "+56 9 1234 5678",
            "order_for_name": "Juan",
            "pickup_ack": true,
            "notes": "Sin nueces",
            "minimal": minimal
        }))
        .unwrap()
    }

    fn plan_for(minimal: bool, mode: RenderMode) -> LayoutPlan {
        let metrics = HelveticaMetrics::new();
        LayoutEngine::new(&metrics).plan(&sample_request(minimal), "9 mar 2025, 16:45", mode)
    }

    #[test]
    fn panel_width_is_eighty_percent_rounded() {
        let plan = plan_for(false, RenderMode::Centered);
        assert_eq!(plan.panel.width, (PAGE_WIDTH * 0.8).round());
    }

    #[test]
    fn panel_is_horizontally_centered() {
        let plan = plan_for(true, RenderMode::Centered);
        let expected_x = ((PAGE_WIDTH - plan.panel.width) / 2.0).round();
        assert_eq!(plan.panel.x, expected_x);
    }

    #[test]
    fn minimal_panel_is_never_taller() {
        let minimal = plan_for(true, RenderMode::Centered);
        let full = plan_for(false, RenderMode::Centered);
        assert!(minimal.panel.height <= full.panel.height);
    }

    #[test]
    fn fixed_offset_pins_panel_top() {
        let plan = plan_for(false, RenderMode::FixedOffset(110.0));
        assert_eq!(plan.panel.y, 110.0);

        let centered = plan_for(false, RenderMode::Centered);
        assert_eq!(
            centered.panel.y,
            ((PAGE_HEIGHT - centered.panel.height) / 2.0).round()
        );
        // Same request, same height: only the placement differs.
        assert_eq!(plan.panel.height, centered.panel.height);
    }

    #[test]
    fn image_box_is_anchored_top_right() {
        let plan = plan_for(false, RenderMode::Centered);
        assert_eq!(
            plan.image_box.right(),
            plan.panel.right() - PANEL_PADDING
        );
        assert_eq!(plan.image_box.y, plan.content_start);
        assert_eq!(plan.image_box.width, IMAGE_BOX_WIDTH);
        assert_eq!(plan.image_box.height, IMAGE_BOX_HEIGHT);
    }

    #[test]
    fn panel_height_floors_at_image_box() {
        // Minimal request with one short row: the image box, not the text,
        // dictates the content height.
        let plan = plan_for(true, RenderMode::Centered);
        let metrics = HelveticaMetrics::new();
        let date_h = metrics.height_of("9 mar 2025, 16:45", DATE_SIZE, DATE_BOX_WIDTH);
        let expected = (PANEL_PADDING
            + date_h
            + 12.0
            + (IMAGE_BOX_HEIGHT + 8.0)
            + PANEL_PADDING)
            .ceil();
        assert!(plan.panel.height >= expected);
    }

    #[test]
    fn row_heights_follow_field_count() {
        assert_eq!(plan_for(true, RenderMode::Centered).row_heights.len(), 1);
        assert_eq!(plan_for(false, RenderMode::Centered).row_heights.len(), 5);
    }
}
