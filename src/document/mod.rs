//! The document boundary: anchors and the accessor capability.
//!
//! The engine never touches a host object model directly. Everything it
//! reads or writes goes through [`DocumentAccessor`], which a production
//! add-in implements over the word-processor host and which
//! [`BufferDocument`] implements over a plain string for demo mode and
//! tests. Each trait call is one logical host round-trip returning fully
//! materialized data; the engine issues them strictly sequentially.

pub mod buffer;

pub use buffer::BufferDocument;

use serde::{Deserialize, Serialize};

use crate::error::LocatorResult;
use crate::normalize::char_len;

/// The host's single-search-call pattern limit, in chars.
///
/// Patterns longer than this must never reach [`DocumentAccessor::search`];
/// the strategy chain guarantees it by deferring long targets to chunked
/// strategies.
pub const HOST_SEARCH_LIMIT: usize = 255;

/// A located half-open byte-offset interval `[start, end)` in the live
/// document, plus the text that was materialized for it at load time.
///
/// Offsets are raw document bytes; `text` is a snapshot and goes stale if
/// the document changes. The engine performs at most one write per call,
/// after all reads, so anchors stay valid for the duration of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Anchor {
    #[must_use]
    pub const fn new(start: usize, end: usize, text: String) -> Self {
        Self { start, end, text }
    }

    /// Length of the materialized text in chars.
    #[must_use]
    pub fn len_units(&self) -> usize {
        char_len(&self.text)
    }

    /// Whether the given document byte offset falls inside this anchor.
    #[must_use]
    pub const fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Carve a sub-anchor at a byte range *relative to this anchor's text*.
    ///
    /// This is how the engine turns a window-relative match back into a
    /// document anchor without another host round-trip. The range must lie
    /// within `self.text` on char boundaries (ranges produced by the
    /// whitespace-flexible matcher always do).
    #[must_use]
    pub fn slice(&self, rel: std::ops::Range<usize>) -> Self {
        Self {
            start: self.start + rel.start,
            end: self.start + rel.end,
            text: self.text[rel].to_owned(),
        }
    }

    /// The smallest interval covering both anchors. The text is left empty;
    /// callers re-materialize it with [`DocumentAccessor::expand`] by zero.
    #[must_use]
    pub fn cover(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            text: String::new(),
        }
    }
}

/// One paragraph of the document body, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphInfo {
    /// Zero-based position among siblings.
    pub index: usize,
    /// The paragraph's range and text (excluding the paragraph break).
    pub anchor: Anchor,
}

/// Capability the engine reads and writes the document through.
///
/// Implementations bridge to the host's batched load-then-sync model: a
/// call returns only fully populated data, and the engine never holds a
/// handle across a write.
pub trait DocumentAccessor {
    /// Case-insensitive, whitespace-tolerant substring search over the
    /// document body. Candidates come back in document order.
    ///
    /// # Errors
    ///
    /// [`crate::LocatorError::PatternTooLong`] if the pattern exceeds
    /// [`HOST_SEARCH_LIMIT`]; host/transport failures otherwise.
    fn search(&self, pattern: &str) -> LocatorResult<Vec<Anchor>>;

    /// Grow an anchor by `by` chars in both directions, clamped to the
    /// document body, and re-materialize its text. `expand(a, 0)` is the
    /// "load text for these offsets" round-trip.
    ///
    /// # Errors
    ///
    /// Fails if the anchor's offsets are not valid for the current body.
    fn expand(&self, anchor: &Anchor, by: usize) -> LocatorResult<Anchor>;

    /// All paragraphs of the body, in document order.
    ///
    /// # Errors
    ///
    /// Host/transport failures only.
    fn paragraphs(&self) -> LocatorResult<Vec<ParagraphInfo>>;

    /// Replace the anchored range with `replacement` and commit the host
    /// transaction. The engine calls this at most once per operation, and
    /// only with a fully validated anchor.
    ///
    /// # Errors
    ///
    /// Fails if the anchor is stale/out of bounds or the commit fails.
    fn replace(&mut self, anchor: &Anchor, replacement: &str) -> LocatorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_slice_offsets() {
        let window = Anchor::new(100, 120, "the quick brown fox!".to_owned());
        let sub = window.slice(4..9);
        assert_eq!(sub.start, 104);
        assert_eq!(sub.end, 109);
        assert_eq!(sub.text, "quick");
    }

    #[test]
    fn test_anchor_cover() {
        let a = Anchor::new(10, 20, String::new());
        let b = Anchor::new(15, 40, String::new());
        let c = a.cover(&b);
        assert_eq!((c.start, c.end), (10, 40));
    }

    #[test]
    fn test_contains_offset_half_open() {
        let a = Anchor::new(5, 8, "abc".to_owned());
        assert!(a.contains_offset(5));
        assert!(a.contains_offset(7));
        assert!(!a.contains_offset(8));
    }
}
