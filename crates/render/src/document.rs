//! Receipt composition: turns a request, its layout plan and the resolved
//! assets into an ordered list of draw instructions.
//!
//! The op list is the whole contract with the PDF backend — z-order is the
//! order of the vector, text is pre-wrapped and pre-positioned here, and a
//! line of mixed-style text is one [`DrawOp::TextLine`] holding several
//! spans that share a baseline.

use crate::color::{self, Color};
use crate::geometry::Rect;
use crate::layout::{
    self, LayoutPlan, DATE_SIZE, FIELD_SIZE, PANEL_OPACITY, PANEL_RADIUS, ROW_ADVANCE,
    SUBTITLE_ADVANCE, SUBTITLE_SIZE, TITLE_ADVANCE, TITLE_SIZE,
};
use crate::receipt::ReceiptRequest;
use crate::text::{wrap, TextMeasurer};

/// How an image fills its target region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// Stretch to the region, ignoring aspect ratio (background template).
    Stretch,
    /// Scale to fit inside the region, preserving aspect ratio, anchored at
    /// the region's top-left (subject image).
    Contain,
}

/// One positioned run of uniformly-styled text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub x: f32,
    pub text: String,
    pub font_size: f32,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub enum DrawOp {
    Image {
        data: Vec<u8>,
        region: Rect,
        fit: ImageFit,
    },
    /// Rounded rectangle fill; a radius of zero degrades to a plain rect.
    RoundedRect {
        region: Rect,
        radius: f32,
        color: Color,
        opacity: f32,
    },
    /// Spans drawn left to right on one shared baseline. `y` is the top of
    /// the line; the backend derives the baseline from the largest span.
    TextLine { y: f32, spans: Vec<TextSpan> },
}

/// Emits the receipt's draw ops in fixed z-order: background, panel, date
/// label, subject image, title, subtitles, field rows.
pub fn compose_receipt(
    request: &ReceiptRequest,
    date_label: &str,
    plan: &LayoutPlan,
    background: Option<Vec<u8>>,
    subject: Option<Vec<u8>>,
    measurer: &dyn TextMeasurer,
) -> Vec<DrawOp> {
    let mut ops = Vec::new();

    if let Some(data) = background {
        ops.push(DrawOp::Image {
            data,
            region: Rect::new(0.0, 0.0, layout::PAGE_WIDTH, layout::PAGE_HEIGHT),
            fit: ImageFit::Stretch,
        });
    }

    ops.push(DrawOp::RoundedRect {
        region: plan.panel,
        radius: PANEL_RADIUS,
        color: color::WHITE,
        opacity: PANEL_OPACITY,
    });

    push_aligned_right(
        &mut ops,
        measurer,
        date_label,
        DATE_SIZE,
        color::TEXT_DATE,
        plan.date_box,
    );

    if let Some(data) = subject {
        ops.push(DrawOp::Image {
            data,
            region: plan.image_box,
            fit: ImageFit::Contain,
        });
    }

    let mut cursor = plan.content_start;

    if let Some(title) = request.title_line() {
        push_wrapped(
            &mut ops,
            measurer,
            &title,
            TITLE_SIZE,
            color::TEXT_BODY,
            plan.content_x,
            cursor,
            plan.content_width,
        );
        cursor += TITLE_ADVANCE;
    }

    if !request.minimal {
        for line in [request.centimeters_line(), request.quantity_line()] {
            push_wrapped(
                &mut ops,
                measurer,
                &line,
                SUBTITLE_SIZE,
                color::TEXT_BODY,
                plan.content_x,
                cursor,
                plan.content_width,
            );
            cursor += SUBTITLE_ADVANCE;
        }
    }

    for (label, value) in request.field_rows() {
        push_field_row(
            &mut ops,
            measurer,
            label,
            &value,
            plan.content_x,
            cursor,
            plan.content_width,
        );
        // Fixed advance regardless of wrapped height; a very tall value can
        // overlap the next row (kept as-is, see DESIGN.md).
        cursor += ROW_ADVANCE;
    }

    ops
}

fn push_wrapped(
    ops: &mut Vec<DrawOp>,
    measurer: &dyn TextMeasurer,
    text: &str,
    font_size: f32,
    color: Color,
    x: f32,
    y: f32,
    width: f32,
) {
    let line_height = measurer.line_height(font_size);
    for (i, line) in wrap::wrap_lines(measurer, text, font_size, width)
        .into_iter()
        .enumerate()
    {
        if line.is_empty() {
            continue;
        }
        ops.push(DrawOp::TextLine {
            y: y + i as f32 * line_height,
            spans: vec![TextSpan {
                x,
                text: line,
                font_size,
                color,
            }],
        });
    }
}

fn push_aligned_right(
    ops: &mut Vec<DrawOp>,
    measurer: &dyn TextMeasurer,
    text: &str,
    font_size: f32,
    color: Color,
    region: Rect,
) {
    let line_height = measurer.line_height(font_size);
    for (i, line) in wrap::wrap_lines(measurer, text, font_size, region.width)
        .into_iter()
        .enumerate()
    {
        if line.is_empty() {
            continue;
        }
        let line_width = measurer.text_width(&line, font_size);
        ops.push(DrawOp::TextLine {
            y: region.y + i as f32 * line_height,
            spans: vec![TextSpan {
                x: region.right() - line_width,
                text: line,
                font_size,
                color,
            }],
        });
    }
}

/// One field row: muted non-wrapping `label: ` prefix and a body-color value
/// that starts on the same baseline and wraps to the full column width on
/// the lines below.
fn push_field_row(
    ops: &mut Vec<DrawOp>,
    measurer: &dyn TextMeasurer,
    label: &str,
    value: &str,
    x: f32,
    y: f32,
    width: f32,
) {
    let prefix = format!("{}: ", label);
    let prefix_width = measurer.text_width(&prefix, FIELD_SIZE);
    let first_width = (width - prefix_width).max(0.0);

    let value_lines = wrap::wrap_first_rest(measurer, value, FIELD_SIZE, first_width, width);
    let line_height = measurer.line_height(FIELD_SIZE);

    let mut first_spans = vec![TextSpan {
        x,
        text: prefix,
        font_size: FIELD_SIZE,
        color: color::TEXT_LABEL,
    }];
    if let Some(first_value) = value_lines.first() {
        if !first_value.is_empty() {
            first_spans.push(TextSpan {
                x: x + prefix_width,
                text: first_value.clone(),
                font_size: FIELD_SIZE,
                color: color::TEXT_BODY,
            });
        }
    }
    ops.push(DrawOp::TextLine {
        y,
        spans: first_spans,
    });

    for (i, line) in value_lines.iter().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        ops.push(DrawOp::TextLine {
            y: y + i as f32 * line_height,
            spans: vec![TextSpan {
                x,
                text: line.clone(),
                font_size: FIELD_SIZE,
                color: color::TEXT_BODY,
            }],
        });
    }
}
