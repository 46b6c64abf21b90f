//! Greedy word wrapping over a [`TextMeasurer`].

use crate::text::metrics::TextMeasurer;

/// Wraps `text` into lines no wider than `max_width`. Explicit newlines are
/// honored; a single word wider than the line is hard-broken by character so
/// a long token cannot push past the panel edge.
pub fn wrap_lines<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    wrap_first_rest(measurer, text, font_size, max_width, max_width)
}

/// Same as [`wrap_lines`] but with a distinct width budget for the first
/// line. Used for label/value rows where the value starts after a
/// non-wrapping label prefix and continues at full width below it.
pub fn wrap_first_rest<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font_size: f32,
    first_width: f32,
    rest_width: f32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    let width_budget = |line_index: usize| {
        if line_index == 0 {
            first_width
        } else {
            rest_width
        }
    };

    for (i, segment) in text.split('\n').enumerate() {
        if i > 0 {
            lines.push(std::mem::take(&mut current));
        }
        for word in segment.split_whitespace() {
            if current.is_empty() {
                if measurer.text_width(word, font_size) > width_budget(lines.len()) {
                    break_long_word(measurer, word, font_size, &width_budget, &mut lines, &mut current);
                } else {
                    current = word.to_string();
                }
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if measurer.text_width(&candidate, font_size) <= width_budget(lines.len()) {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                if measurer.text_width(word, font_size) > width_budget(lines.len()) {
                    break_long_word(measurer, word, font_size, &width_budget, &mut lines, &mut current);
                } else {
                    current = word.to_string();
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn break_long_word<M: TextMeasurer + ?Sized>(
    measurer: &M,
    word: &str,
    font_size: f32,
    width_budget: &dyn Fn(usize) -> f32,
    lines: &mut Vec<String>,
    current: &mut String,
) {
    for c in word.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if !current.is_empty()
            && measurer.text_width(&candidate, font_size) > width_budget(lines.len())
        {
            lines.push(std::mem::take(current));
            current.push(c);
        } else {
            *current = candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-width fake: every char advances `unit` points per font-size
    /// point, so expected break positions are exact.
    struct FixedWidth {
        unit: f32,
    }

    impl TextMeasurer for FixedWidth {
        fn text_width(&self, text: &str, font_size: f32) -> f32 {
            text.chars().count() as f32 * self.unit * font_size
        }

        fn line_height(&self, font_size: f32) -> f32 {
            font_size * 1.2
        }
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let m = FixedWidth { unit: 0.5 };
        assert_eq!(wrap_lines(&m, "hola mundo", 10.0, 100.0), vec!["hola mundo"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let m = FixedWidth { unit: 1.0 };
        // budget of 7 chars at size 1
        let lines = wrap_lines(&m, "uno dos tres", 1.0, 7.0);
        assert_eq!(lines, vec!["uno dos", "tres"]);
    }

    #[test]
    fn honors_explicit_newlines() {
        let m = FixedWidth { unit: 0.1 };
        let lines = wrap_lines(&m, "uno\ndos", 10.0, 500.0);
        assert_eq!(lines, vec!["uno", "dos"]);
    }

    #[test]
    fn hard_breaks_oversized_word() {
        let m = FixedWidth { unit: 1.0 };
        let lines = wrap_lines(&m, "abcdefgh", 1.0, 3.0);
        assert_eq!(lines, vec!["abc", "def", "gh"]);
    }

    #[test]
    fn first_line_budget_differs() {
        let m = FixedWidth { unit: 1.0 };
        let lines = wrap_first_rest(&m, "aa bb cc dd", 1.0, 5.0, 11.0);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn empty_text_is_single_empty_line() {
        let m = FixedWidth { unit: 1.0 };
        assert_eq!(wrap_lines(&m, "", 1.0, 10.0), vec![""]);
    }
}
