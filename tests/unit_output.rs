// Unit tests for terminal helpers: truncate_chars UTF-8 safety.

use firebreak::output::truncate_chars;

#[test]
fn truncate_leaves_short_strings_alone() {
    assert_eq!(truncate_chars("hello", 10), "hello");
}

#[test]
fn truncate_at_exact_length_is_unchanged() {
    assert_eq!(truncate_chars("hello", 5), "hello");
}

#[test]
fn truncate_cuts_and_marks_long_strings() {
    assert_eq!(truncate_chars("hello world", 5), "hello...");
}

#[test]
fn truncate_counts_chars_not_bytes() {
    // Each of these is multibyte in UTF-8; slicing bytes would panic.
    assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
    assert_eq!(truncate_chars("日本語のテキスト", 3), "日本語...");
}

#[test]
fn truncate_empty_string() {
    assert_eq!(truncate_chars("", 5), "");
}
