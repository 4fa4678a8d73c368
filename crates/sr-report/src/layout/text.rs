//! Text measurement and word wrapping.
//!
//! Widths come from the Helvetica AFM advance table (units of 1/1000 em),
//! the standard font the PDF encoder references, so wrapped lines match
//! what a viewer renders.

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Helvetica advance widths for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

/// Width used for characters outside the table.
const FALLBACK_WIDTH: u16 = 556;

/// Bold faces run slightly wider than the regular table.
const BOLD_FACTOR: f32 = 1.06;

fn char_units(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, size_pt: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| char_units(c) as u32).sum();
    let factor = if bold { BOLD_FACTOR } else { 1.0 };
    units as f32 / 1000.0 * size_pt * MM_PER_PT * factor
}

/// Wrap `text` so that no line exceeds `max_width` millimetres.
///
/// Explicit newlines start new lines. Runs of whitespace collapse to a
/// single space. A word wider than a full line is split by character.
pub fn wrap(text: &str, size_pt: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, size_pt, bold) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, size_pt, bold) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = split_word(word, size_pt, bold, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Hard-split a word into pieces that each fit `max_width`.
///
/// Every piece holds at least one character, so a width smaller than a
/// single glyph still terminates.
fn split_word(word: &str, size_pt: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && text_width(&current, size_pt, bold) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
pub fn truncate_to_width(text: &str, size_pt: f32, bold: bool, max_width: f32) -> String {
    if text_width(text, size_pt, bold) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "...";
        if text_width(&candidate, size_pt, bold) <= max_width {
            return candidate;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_size() {
        let small = text_width("Security", 10.0, false);
        let large = text_width("Security", 20.0, false);
        assert!((large - 2.0 * small).abs() < 1e-4);
        assert!(text_width("Security", 10.0, true) > small);
    }

    #[test]
    fn test_known_width() {
        // "Hi" = 722 + 222 units at 10pt.
        let w = text_width("Hi", 10.0, false);
        assert!((w - 0.944 * 10.0 * MM_PER_PT).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "Reconnect twelve disconnected endpoints to restore monitoring coverage \
                    across the production and staging environments before the audit";
        let lines = wrap(text, 10.0, false, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, false) <= 60.0, "line too wide: {}", line);
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_long_word() {
        let word = "x".repeat(200);
        let lines = wrap(&word, 10.0, false, 30.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(text_width(line, 10.0, false) <= 30.0);
        }
    }

    #[test]
    fn test_wrap_newlines_and_empty() {
        assert!(wrap("", 10.0, false, 100.0).is_empty());
        assert!(wrap("   ", 10.0, false, 100.0).is_empty());
        assert_eq!(wrap("a\nb", 10.0, false, 100.0), vec!["a", "b"]);
    }

    #[test]
    fn test_wrap_tiny_width_terminates() {
        let lines = wrap("abc", 10.0, false, 0.1);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_to_width("short", 10.0, false, 100.0), "short");
        let cut = truncate_to_width("A very long country name indeed", 10.0, false, 25.0);
        assert!(cut.ends_with("..."));
        assert!(text_width(&cut, 10.0, false) <= 25.0);
    }
}
