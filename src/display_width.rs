use unicode_width::UnicodeWidthStr;

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad `s` with spaces on the right until it occupies `width` columns.
/// Strings already at least that wide are returned unchanged.
pub fn pad_to(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    let mut padded = String::with_capacity(s.len() + fill);
    padded.push_str(s);
    padded.extend(std::iter::repeat_n(' ', fill));
    padded
}

/// Widest display width among `items`.
pub fn max_width<'a>(items: impl IntoIterator<Item = &'a str>) -> usize {
    items.into_iter().map(display_width).max().unwrap_or(0)
}
