//! Shared text formatting helpers used by terminal rendering.

/// Count visible character width (single-cell approximation).
pub fn visible_width(s: &str) -> usize {
    s.chars().count()
}

/// Clip a string to at most `max_width` visible characters.
pub fn clip_to_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Left-align `s` in a field of `width` cells, clipping when longer.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let clipped = clip_to_width(s, width);
    let pad = width.saturating_sub(visible_width(&clipped));
    format!("{clipped}{}", " ".repeat(pad))
}

/// Word-wrap `line` into rows of at most `max_width` characters.
///
/// Runs of whitespace collapse to one space; words longer than a row are
/// split.
pub fn wrap_for_block(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }
    let mut rows = Vec::new();
    let mut row = String::new();
    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_width {
            if !row.is_empty() {
                rows.push(std::mem::take(&mut row));
            }
            rows.push(word.drain(..max_width).collect());
        }
        if word.is_empty() {
            continue;
        }
        let needed = word.len() + usize::from(!row.is_empty());
        if visible_width(&row) + needed > max_width {
            rows.push(std::mem::take(&mut row));
        }
        if !row.is_empty() {
            row.push(' ');
        }
        row.extend(word);
    }
    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }
    rows
}
