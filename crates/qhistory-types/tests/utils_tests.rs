use qhistory_types::{DEFAULT_PREVIEW_CHARS, is_blank, preview, truncate};

#[test]
fn test_truncate_short_string_is_unchanged() {
    assert_eq!(truncate("show me git status", 100), "show me git status");
}

#[test]
fn test_truncate_counts_chars_not_bytes() {
    let text = "日本語のテキスト";
    assert_eq!(truncate(text, 3), "日本語...");
}

#[test]
fn test_preview_collapses_newlines() {
    let text = "first line\n\n   second line";
    assert_eq!(preview(text, DEFAULT_PREVIEW_CHARS), "first line second line");
}

#[test]
fn test_preview_truncates_to_limit() {
    let text = "a".repeat(150);
    let result = preview(&text, DEFAULT_PREVIEW_CHARS);
    assert_eq!(result.len(), 103);
    assert!(result.ends_with("..."));
}

#[test]
fn test_is_blank() {
    assert!(is_blank(""));
    assert!(is_blank("  \n\t"));
    assert!(!is_blank(" x "));
}
