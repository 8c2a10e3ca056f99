//! Approximate Helvetica metrics and greedy word wrapping.
//!
//! Widths are grouped into a handful of classes taken from the Helvetica
//! AFM tables (units per 1000 em). Wrapping never needs a font file and is
//! the same on every machine.

/// Millimetres per PostScript point
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Advance width of a glyph in 1/1000 em
pub fn glyph_width(c: char) -> u32 {
    match c {
        ' ' | 'i' | 'j' | 'l' | 'I' | '.' | ',' | ';' | ':' | '!' | '|' | '\'' => 278,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '/' => 333,
        'm' | 'M' => 833,
        'w' | 'W' => 778,
        '@' | '%' => 889,
        c if c.is_uppercase() => 667,
        _ => 556,
    }
}

/// Width of `text` in millimetres at `size` points
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(glyph_width).sum();
    units as f32 / 1000.0 * size * MM_PER_PT
}

/// Split `text` into lines no wider than `max_width` mm.
///
/// Explicit newlines start a new line; a single word wider than the limit
/// is broken between characters. Always returns at least one line.
pub fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, size) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    current.push(c);
                    if text_width(&current, size) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap("Fala: oi", 12.0, 170.0), vec!["Fala: oi"]);
        assert_eq!(wrap("", 12.0, 170.0), vec![""]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "produtividade ".repeat(40);
        let lines = wrap(&text, 12.0, 170.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 12.0) <= 170.0, "line too wide: {}", line);
        }
        assert_eq!(lines.join(" ").split_whitespace().count(), 40);
    }

    #[test]
    fn test_long_word_is_broken() {
        let word = "a".repeat(200);
        let lines = wrap(&word, 12.0, 50.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_explicit_newlines() {
        assert_eq!(wrap("um\ndois", 10.0, 170.0), vec!["um", "dois"]);
    }
}
