//! Raw-markup substring checks
//!
//! Several structural signals (JSON-LD, viewport, Open Graph, inline styles,
//! tag counts) are matched against the raw markup instead of the DOM. These
//! helpers keep those checks literal and case-sensitive unless stated.

/// Count non-overlapping occurrences of `needle` in `haystack`
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// True when any of `needles` occurs in `haystack`
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// ASCII case-insensitive substring search (no allocation)
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return true;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_tag_prefixes() {
        let html = "<img src=a><img src=b><p>img</p><img>";
        assert_eq!(count_occurrences(html, "<img"), 3);
        assert_eq!(count_occurrences(html, "<script"), 0);
        assert_eq!(count_occurrences(html, ""), 0);
    }

    #[test]
    fn counts_are_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
    }

    #[test]
    fn any_matches_first_or_later() {
        assert!(contains_any("<section>", &["<article", "<section"]));
        assert!(!contains_any("<div>", &["<article", "<section"]));
    }

    #[test]
    fn ignore_case_matches_doctype_variants() {
        assert!(contains_ignore_ascii_case("<!DOCTYPE html>", "<!doctype html>"));
        assert!(contains_ignore_ascii_case("x<!DocType HTML>", "<!doctype html>"));
        assert!(!contains_ignore_ascii_case("<html>", "<!doctype html>"));
        assert!(!contains_ignore_ascii_case("", "<!doctype html>"));
    }
}
