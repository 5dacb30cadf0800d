//! In-memory document accessor for demo mode and tests.
//!
//! Models the document body as a plain string with one paragraph per line.
//! Search mirrors the host contract: case-insensitive, tolerant of
//! whitespace runs (the host matches across soft breaks the same way), and
//! bounded to [`HOST_SEARCH_LIMIT`] chars per pattern.

use std::io::Write as _;
use std::path::Path;

use crate::document::{Anchor, DocumentAccessor, HOST_SEARCH_LIMIT, ParagraphInfo};
use crate::error::{LocatorError, LocatorResult};
use crate::normalize::{char_len, find_all_flexible};

/// A document held entirely in memory.
#[derive(Debug, Clone)]
pub struct BufferDocument {
    body: String,
}

impl BufferDocument {
    /// Wrap an existing body string.
    #[must_use]
    pub fn from_text(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Load a document body from a plain-text file.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Io`] if the file cannot be read.
    pub fn from_file(path: &Path) -> LocatorResult<Self> {
        let body = std::fs::read_to_string(path).map_err(|source| LocatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { body })
    }

    /// Current document body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Atomically persist the body to `path` (tempfile + rename, so a
    /// crash mid-write never leaves a truncated document behind).
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Io`] on any filesystem failure.
    pub fn persist_to(&self, path: &Path) -> LocatorResult<()> {
        let io_err = |source: std::io::Error| LocatorError::Io {
            path: path.to_path_buf(),
            source,
        };

        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match parent {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new(),
        }
        .map_err(io_err)?;

        tmp.write_all(self.body.as_bytes()).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Validate that an anchor denotes a well-formed range of the body.
    fn check_anchor(&self, anchor: &Anchor) -> LocatorResult<()> {
        let valid = anchor.start <= anchor.end
            && anchor.end <= self.body.len()
            && self.body.is_char_boundary(anchor.start)
            && self.body.is_char_boundary(anchor.end);
        if valid {
            Ok(())
        } else {
            Err(LocatorError::AnchorOutOfBounds {
                start: anchor.start,
                end: anchor.end,
            })
        }
    }

    /// Byte offset `chars` chars before `from`, clamped to the body start.
    fn step_back(&self, from: usize, chars: usize) -> usize {
        let mut idx = from;
        for _ in 0..chars {
            match self.body[..idx].chars().next_back() {
                Some(c) => idx -= c.len_utf8(),
                None => break,
            }
        }
        idx
    }

    /// Byte offset `chars` chars after `from`, clamped to the body end.
    fn step_forward(&self, from: usize, chars: usize) -> usize {
        let mut idx = from;
        for _ in 0..chars {
            match self.body[idx..].chars().next() {
                Some(c) => idx += c.len_utf8(),
                None => break,
            }
        }
        idx
    }
}

impl DocumentAccessor for BufferDocument {
    fn search(&self, pattern: &str) -> LocatorResult<Vec<Anchor>> {
        let len = char_len(pattern);
        if len > HOST_SEARCH_LIMIT {
            return Err(LocatorError::PatternTooLong {
                len,
                limit: HOST_SEARCH_LIMIT,
            });
        }

        Ok(find_all_flexible(&self.body, pattern)
            .into_iter()
            .map(|range| {
                let text = self.body[range.clone()].to_owned();
                Anchor::new(range.start, range.end, text)
            })
            .collect())
    }

    fn expand(&self, anchor: &Anchor, by: usize) -> LocatorResult<Anchor> {
        self.check_anchor(anchor)?;
        let start = self.step_back(anchor.start, by);
        let end = self.step_forward(anchor.end, by);
        Ok(Anchor::new(start, end, self.body[start..end].to_owned()))
    }

    fn paragraphs(&self) -> LocatorResult<Vec<ParagraphInfo>> {
        let mut paragraphs = Vec::new();
        let mut start = 0;
        for (index, line) in self.body.split('\n').enumerate() {
            let end = start + line.len();
            paragraphs.push(ParagraphInfo {
                index,
                anchor: Anchor::new(start, end, line.to_owned()),
            });
            start = end + 1;
        }
        Ok(paragraphs)
    }

    fn replace(&mut self, anchor: &Anchor, replacement: &str) -> LocatorResult<()> {
        self.check_anchor(anchor)?;
        self.body
            .replace_range(anchor.start..anchor.end, replacement);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_case_insensitive() {
        let doc = BufferDocument::from_text("WHEREAS the Parties agree");
        let hits = doc.search("whereas the parties").expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "WHEREAS the Parties");
        assert_eq!(hits[0].start, 0);
    }

    #[test]
    fn test_search_across_paragraph_break() {
        let doc = BufferDocument::from_text("the parties\nhereby agree");
        let hits = doc.search("parties hereby").expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "parties\nhereby");
    }

    #[test]
    fn test_search_rejects_oversized_pattern() {
        let doc = BufferDocument::from_text("short body");
        let pattern = "x".repeat(HOST_SEARCH_LIMIT + 1);
        let err = doc.search(&pattern).expect_err("should reject");
        assert!(matches!(err, LocatorError::PatternTooLong { .. }));
    }

    #[test]
    fn test_expand_clamps_at_edges() {
        let doc = BufferDocument::from_text("abcdef");
        let anchor = Anchor::new(2, 4, "cd".to_owned());
        let grown = doc.expand(&anchor, 10).expect("expand");
        assert_eq!((grown.start, grown.end), (0, 6));
        assert_eq!(grown.text, "abcdef");
    }

    #[test]
    fn test_expand_zero_rematerializes() {
        let doc = BufferDocument::from_text("abcdef");
        let anchor = Anchor::new(1, 4, String::new());
        let loaded = doc.expand(&anchor, 0).expect("expand");
        assert_eq!(loaded.text, "bcd");
    }

    #[test]
    fn test_expand_rejects_stale_anchor() {
        let doc = BufferDocument::from_text("tiny");
        let anchor = Anchor::new(2, 40, String::new());
        assert!(matches!(
            doc.expand(&anchor, 1),
            Err(LocatorError::AnchorOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_paragraph_offsets() {
        let doc = BufferDocument::from_text("first\nsecond\nthird");
        let paras = doc.paragraphs().expect("paragraphs");
        assert_eq!(paras.len(), 3);
        assert_eq!(paras[1].anchor.text, "second");
        assert_eq!(paras[1].anchor.start, 6);
        assert_eq!(paras[2].index, 2);
    }

    #[test]
    fn test_replace_splices_body() {
        let mut doc = BufferDocument::from_text("keep REMOVE keep");
        let anchor = Anchor::new(5, 11, "REMOVE".to_owned());
        doc.replace(&anchor, "[REDACTED]").expect("replace");
        assert_eq!(doc.body(), "keep [REDACTED] keep");
    }
}
