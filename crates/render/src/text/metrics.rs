//! Text measurement for the receipt layout.
//!
//! Layout never talks to a font file directly; it receives a [`TextMeasurer`]
//! capability and asks for widths and line heights. The production
//! implementation, [`HelveticaMetrics`], carries the AFM advance widths of
//! the Helvetica base font the PDF backend references, so measured geometry
//! matches the face a viewer substitutes — deterministically, with no system
//! font discovery involved.

use crate::text::wrap;

/// Measurement capability injected into the layout engine.
pub trait TextMeasurer: Send + Sync {
    /// Width in points of a single unwrapped run at the given size.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Vertical advance of one line at the given size.
    fn line_height(&self, font_size: f32) -> f32;

    /// Height of `text` word-wrapped into `wrap_width`. Empty text still
    /// occupies one line, matching how the drawing cursor advances.
    fn height_of(&self, text: &str, font_size: f32, wrap_width: f32) -> f32 {
        let lines = wrap::wrap_lines(self, text, font_size, wrap_width);
        lines.len().max(1) as f32 * self.line_height(font_size)
    }
}

/// Helvetica font bounding box, AFM units per em.
const BBOX_TOP: f32 = 931.0;
const BBOX_BOTTOM: f32 = -225.0;
const UNITS_PER_EM: f32 = 1000.0;

/// Advance width used for characters outside the table.
const DEFAULT_WIDTH: u16 = 556;

/// AFM advance widths for Helvetica, `0x20..=0x7E`.
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Deterministic Helvetica metrics (AFM widths, bbox-derived line height).
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    pub fn new() -> Self {
        Self
    }

    fn char_width_units(c: char) -> u16 {
        let code = c as u32;
        if (0x20..=0x7e).contains(&code) {
            return ASCII_WIDTHS[(code - 0x20) as usize];
        }
        // Accented Latin letters carry the advance of their base letter.
        let folded = crate::sanitize::fold_diacritic(c);
        if folded != c {
            return Self::char_width_units(folded);
        }
        DEFAULT_WIDTH
    }
}

impl TextMeasurer for HelveticaMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| u32::from(Self::char_width_units(c)))
            .sum();
        units as f32 * font_size / UNITS_PER_EM
    }

    fn line_height(&self, font_size: f32) -> f32 {
        (BBOX_TOP - BBOX_BOTTOM) / UNITS_PER_EM * font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_linearly_with_font_size() {
        let m = HelveticaMetrics::new();
        let narrow = m.text_width("Pedido", 12.0);
        let wide = m.text_width("Pedido", 24.0);
        assert!((wide - narrow * 2.0).abs() < 0.001);
    }

    #[test]
    fn known_ascii_widths() {
        let m = HelveticaMetrics::new();
        // space = 278/1000 em
        assert!((m.text_width(" ", 10.0) - 2.78).abs() < 0.001);
        // 'W' is the widest letter
        assert!(m.text_width("W", 12.0) > m.text_width("i", 12.0));
    }

    #[test]
    fn accented_letter_measures_like_base() {
        let m = HelveticaMetrics::new();
        assert_eq!(m.text_width("é", 12.0), m.text_width("e", 12.0));
        assert_eq!(m.text_width("Ñ", 12.0), m.text_width("N", 12.0));
    }

    #[test]
    fn line_height_matches_bbox() {
        let m = HelveticaMetrics::new();
        assert!((m.line_height(12.0) - 13.872).abs() < 0.01);
    }

    #[test]
    fn empty_text_still_one_line_high() {
        let m = HelveticaMetrics::new();
        assert_eq!(m.height_of("", 12.0, 220.0), m.line_height(12.0));
    }
}
