use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn align_right(text: &str, width: usize) -> String {
    let extra: usize = text
        .chars()
        .filter_map(|c| c.width_cjk().and_then(|w| w.checked_sub(1)))
        .sum();
    format!(
        "{text:>width$}",
        width = width.checked_sub(extra).unwrap_or(width)
    )
}

/// Display width in terminal cells
pub fn width(text: &str) -> usize {
    text.width_cjk()
}

/// Cut to `max` cells, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if width(text) <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width_cjk().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    if max > 0 {
        out.push('…');
    }
    out
}
