//! Replacement previews using the `similar` crate.
//!
//! Renders what a locate-and-replace did (or would do) to the document
//! body as a unified diff, for the demo CLI and for callers that surface
//! a redraft preview before committing.

use similar::{Algorithm, TextDiff};

/// Unified diff between the document body before and after a replacement.
///
/// Patience diff keeps hunks aligned on the untouched paragraphs, which
/// reads well for prose documents.
pub fn replacement_preview(label: &str, before: &str, after: &str) -> String {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Patience)
        .diff_lines(before, after);

    diff.unified_diff()
        .header(&format!("{label} (original)"), &format!("{label} (redrafted)"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_body_produces_no_hunks() {
        let preview = replacement_preview("agreement.txt", "clause\n", "clause\n");
        assert!(!preview.contains("\n+") || !preview.contains("\n-"));
    }

    #[test]
    fn test_replacement_shows_both_sides() {
        let before = "intro\nold clause text\noutro\n";
        let after = "intro\n[REDACTED]\noutro\n";
        let preview = replacement_preview("agreement.txt", before, after);
        assert!(preview.contains("-old clause text"));
        assert!(preview.contains("+[REDACTED]"));
    }
}
