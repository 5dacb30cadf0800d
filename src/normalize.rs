//! Text normalization and whitespace-tolerant matching.
//!
//! Every comparison the engine makes runs over *normalized* text: runs of
//! whitespace collapsed to a single space, outer whitespace trimmed, case
//! untouched. Document offsets, on the other hand, are always raw byte
//! offsets — so locating a normalized needle inside raw document text goes
//! through a whitespace-flexible regex built from the needle's escaped
//! words. The match ranges it yields are true offsets into the raw text.

use std::ops::Range;

use regex::Regex;

/// Collapse whitespace runs to single spaces and trim.
///
/// Pure function of whitespace only — no case folding, no Unicode
/// normalization. Applying it twice yields the same string.
#[must_use]
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Length in chars ("units" in host terms — the 255 search limit is
/// measured this way, not in bytes).
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Normalized-length ratio of `found` against `target`.
///
/// Both inputs are expected normalized. A ratio of 1.0 means the lengths
/// agree exactly; the acceptance band is checked by the strategies.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn length_ratio(found: &str, target: &str) -> f64 {
    let target_len = char_len(target);
    if target_len == 0 {
        return 0.0;
    }
    char_len(found) as f64 / target_len as f64
}

/// First `n` whitespace-separated words of `s`, joined by single spaces.
/// Yields fewer words when `s` is shorter.
#[must_use]
pub fn first_words(s: &str, n: usize) -> String {
    s.split_whitespace().take(n).collect::<Vec<&str>>().join(" ")
}

/// Last `n` whitespace-separated words of `s`, joined by single spaces.
#[must_use]
pub fn last_words(s: &str, n: usize) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    let skip = words.len().saturating_sub(n);
    words[skip..].join(" ")
}

/// Prefix of `s` spanning at most `n` chars (whole chars, byte-safe).
#[must_use]
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Suffix of `s` spanning at most `n` chars.
#[must_use]
pub fn char_suffix(s: &str, n: usize) -> &str {
    let len = char_len(s);
    if len <= n {
        return s;
    }
    match s.char_indices().nth(len - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Build a case-insensitive regex matching `needle` with any whitespace
/// runs between its words. Returns `None` for all-whitespace needles or
/// needles too large to compile.
fn flexible_regex(needle: &str) -> Option<Regex> {
    let words: Vec<&str> = needle.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    let pattern = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!("(?i){pattern}")).ok()
}

/// First whitespace-tolerant occurrence of `needle` in `haystack`.
/// The returned range is in raw bytes of `haystack`.
pub(crate) fn find_flexible(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let re = flexible_regex(needle)?;
    re.find(haystack).map(|m| m.range())
}

/// First occurrence at or after byte offset `start`.
pub(crate) fn find_flexible_at(
    haystack: &str,
    needle: &str,
    start: usize,
) -> Option<Range<usize>> {
    if start > haystack.len() {
        return None;
    }
    let re = flexible_regex(needle)?;
    re.find_at(haystack, start).map(|m| m.range())
}

/// Last whitespace-tolerant occurrence of `needle` in `haystack`.
pub(crate) fn rfind_flexible(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let re = flexible_regex(needle)?;
    re.find_iter(haystack).last().map(|m| m.range())
}

/// All non-overlapping whitespace-tolerant occurrences, in document order.
pub(crate) fn find_all_flexible(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    flexible_regex(needle).map_or_else(Vec::new, |re| {
        re.find_iter(haystack).map(|m| m.range()).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize_ws("a  b\t\nc"), "a b c");
        assert_eq!(normalize_ws("  padded  "), "padded");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize_ws("the   parties \n agree");
        assert_eq!(normalize_ws(&once), once);
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(normalize_ws("WHEREAS the Parties"), "WHEREAS the Parties");
    }

    #[test]
    fn test_boundary_words() {
        assert_eq!(first_words("a b c d e", 3), "a b c");
        assert_eq!(last_words("a b c d e", 3), "c d e");
        assert_eq!(first_words("a b", 5), "a b");
        assert_eq!(last_words("a b", 5), "a b");
    }

    #[test]
    fn test_char_prefix_suffix() {
        assert_eq!(char_prefix("hello", 3), "hel");
        assert_eq!(char_suffix("hello", 3), "llo");
        assert_eq!(char_prefix("hi", 10), "hi");
        // Multibyte chars are never split.
        assert_eq!(char_prefix("héllo", 2), "hé");
    }

    #[test]
    fn test_find_flexible_across_breaks() {
        let haystack = "The  parties\nhereby   agree to the terms.";
        let range = find_flexible(haystack, "parties hereby agree")
            .expect("should match across whitespace runs");
        assert_eq!(&haystack[range], "parties\nhereby   agree");
    }

    #[test]
    fn test_find_flexible_case_insensitive() {
        let range = find_flexible("WHEREAS the Parties", "whereas the parties");
        assert!(range.is_some());
    }

    #[test]
    fn test_find_flexible_at_skips_earlier_hit() {
        let haystack = "term one term two";
        let first = find_flexible(haystack, "term").expect("first hit");
        let second =
            find_flexible_at(haystack, "term", first.end).expect("second hit");
        assert!(second.start > first.start);
        assert_eq!(&haystack[second], "term");
    }

    #[test]
    fn test_rfind_flexible_takes_last() {
        let haystack = "alpha beta alpha";
        let range = rfind_flexible(haystack, "alpha").expect("hit");
        assert_eq!(range.start, 11);
    }

    #[test]
    fn test_length_ratio() {
        assert!((length_ratio("abcd", "abcd") - 1.0).abs() < f64::EPSILON);
        assert!(length_ratio("ab", "abcd") < 0.9);
    }
}
