/// Default preview length in characters
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Truncate a string to a maximum number of characters
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect::<String>() + "..."
    }
}

/// Single-line display preview: whitespace runs collapse to one space, then truncate
pub fn preview(s: &str, max: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max)
}

/// True if the string has no non-whitespace content
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
