use crate::traits::FontFace;

/// Convert a top-left-origin Y coordinate to PDF space (origin bottom-left).
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Approximate advance width of `text` in the built-in Helvetica faces.
///
/// Only used for centering and wrapping, where being a few points off is
/// harmless.
pub fn estimate_text_width(text: &str, size: f32, font: FontFace) -> f32 {
    let em = match font {
        FontFace::Regular => 0.52,
        FontFace::Bold => 0.56,
    };
    text.chars().count() as f32 * size * em
}

/// Cuts `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Greedy word wrap into at most `max_lines` lines; the last line is cut
/// short if words remain.
pub fn wrap_text(text: &str, max_width: f32, size: f32, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if current.is_empty()
            || estimate_text_width(&candidate, size, FontFace::Regular) <= max_width
        {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
            if lines.len() == max_lines {
                break;
            }
        }
    }
    if lines.len() < max_lines && !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("Zürich depot", 3), "Zür");
        assert_eq!(truncate_chars("short", 40), "short");
    }

    #[test]
    fn wraps_and_caps_lines() {
        let lines = wrap_text("one two three four five six seven", 40.0, 10.0, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one two");
        assert!(wrap_text("", 100.0, 8.0, 2).is_empty());
        assert_eq!(wrap_text("single", 1.0, 8.0, 2), vec!["single".to_string()]);
    }

    #[test]
    fn flips_into_pdf_space() {
        assert_eq!(flip_y(100.0, 800.0), 700.0);
    }
}
