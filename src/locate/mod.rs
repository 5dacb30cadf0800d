//! Clause location strategies and their fallback chain.
//!
//! Each strategy takes `(accessor, normalized target)` and returns a
//! [`MatchResult`] — a validated anchor or `NotFound`. The [`locate`]
//! orchestrator invokes them in strict order and short-circuits on the
//! first success:
//!
//! 1. `DirectSearch` — one bounded host search (≤ 255 units).
//! 2. `SequentialChunkSearch` — overlapping-chunk stitching for long text.
//! 3. `RangeExtension` — grow a matched prefix forward / suffix backward.
//! 4. `ParagraphExpansionFallback` — greedy growth around a partial anchor
//!    found by the generic word-strategy search.
//!
//! Strategies never throw for a plain miss; only host failures are `Err`.

pub mod chunked;
pub mod direct;
pub mod extend;
pub mod paragraphs;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::{Anchor, DocumentAccessor, HOST_SEARCH_LIMIT};
use crate::error::LocatorResult;
use crate::normalize::{char_len, length_ratio, normalize_ws};

/// Tunable heuristics of the locator.
///
/// Defaults reproduce the constants the engine was calibrated with; the
/// acceptance band and word counts in particular may want tuning per
/// document corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Host single-search-call pattern limit, in chars.
    pub search_limit: usize,
    /// Nominal chunk size for sequential chunk search.
    pub chunk_size: usize,
    /// Overlap between neighboring chunks.
    pub chunk_overlap: usize,
    /// How many first/middle-chunk candidates to try before giving up.
    pub max_candidates: usize,
    /// How many edge-anchor candidates range extension tries.
    pub max_extension_candidates: usize,
    /// Length of the prefix/suffix anchor used by range extension.
    pub edge_anchor_len: usize,
    /// Words compared at each end for boundary-word validation.
    pub boundary_words: usize,
    /// Words used as landmarks when carving a range out of a window.
    pub landmark_words: usize,
    /// Lower bound of the accepted normalized-length ratio (exclusive).
    pub min_length_ratio: f64,
    /// Upper bound of the accepted normalized-length ratio (exclusive).
    pub max_length_ratio: f64,
    /// Paragraphs inspected on each side of a partial anchor.
    pub paragraph_radius: usize,
    /// A containing paragraph shorter than this fraction of the target
    /// marks the anchor as partial (clause spans multiple paragraphs).
    pub partial_paragraph_ratio: f64,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            search_limit: HOST_SEARCH_LIMIT,
            chunk_size: 200,
            chunk_overlap: 50,
            max_candidates: 5,
            max_extension_candidates: 3,
            edge_anchor_len: 200,
            boundary_words: 3,
            landmark_words: 5,
            min_length_ratio: 0.9,
            max_length_ratio: 1.1,
            paragraph_radius: 5,
            partial_paragraph_ratio: 0.7,
        }
    }
}

impl LocatorConfig {
    /// Whether `found` is close enough in normalized length to `target`.
    /// Both arguments must already be normalized.
    #[must_use]
    pub(crate) fn ratio_in_band(&self, found: &str, target: &str) -> bool {
        let ratio = length_ratio(found, target);
        ratio > self.min_length_ratio && ratio < self.max_length_ratio
    }
}

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Direct,
    ChunkStitch,
    ExtendForward,
    ExtendBackward,
    ParagraphExpansion,
}

impl Strategy {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Direct => "DirectSearch",
            Self::ChunkStitch => "SequentialChunkSearch",
            Self::ExtendForward => "RangeExtension(forward)",
            Self::ExtendBackward => "RangeExtension(backward)",
            Self::ParagraphExpansion => "ParagraphExpansionFallback",
        }
    }
}

/// A validated match: the winning anchor and the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub anchor: Anchor,
    pub strategy: Strategy,
}

/// Uniform return contract of every strategy and the engine as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Found(Match),
    NotFound,
}

impl MatchResult {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub fn into_match(self) -> Option<Match> {
        match self {
            Self::Found(m) => Some(m),
            Self::NotFound => None,
        }
    }

    pub(crate) fn found(anchor: Anchor, strategy: Strategy) -> Self {
        Self::Found(Match { anchor, strategy })
    }
}

/// Locate `target` in the document, trying each strategy in order.
///
/// The target is whitespace-normalized before anything else; the returned
/// anchor carries raw document offsets. First match in document order wins
/// when several candidates validate.
///
/// # Errors
///
/// Only host/transport failures. A clean miss is `Ok(NotFound)`.
pub fn locate(
    doc: &dyn DocumentAccessor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<MatchResult> {
    let target = normalize_ws(target);
    if target.is_empty() {
        return Ok(MatchResult::NotFound);
    }

    let result = direct::direct_search(doc, &target, config)?;
    if result.is_found() {
        return Ok(result);
    }

    if char_len(&target) > config.search_limit {
        let result = chunked::sequential_chunk_search(doc, &target, config)?;
        if result.is_found() {
            return Ok(result);
        }

        let result = extend::extend_forward_search(doc, &target, config)?;
        if result.is_found() {
            return Ok(result);
        }

        let result = extend::extend_backward_search(doc, &target, config)?;
        if result.is_found() {
            return Ok(result);
        }
    }

    // Last resort: a generic word-strategy hit gives a partial anchor the
    // paragraph fallback can grow into the full clause.
    if let Some(anchor) = anchor_search(doc, &target, config)? {
        let result = paragraphs::paragraph_expansion(doc, &anchor, &target, config)?;
        if result.is_found() {
            return Ok(result);
        }
    }

    warn!(target_units = char_len(&target), "all location strategies exhausted");
    Ok(MatchResult::NotFound)
}

/// Generic multi-strategy clause search.
///
/// Finds *some* anchor for the clause using progressively less distinctive
/// patterns: the first 8 words, a middle 6-word window, the first sentence,
/// then the first 4 words. The hit may cover only part of the clause —
/// callers either navigate to it or hand it to the paragraph fallback.
///
/// # Errors
///
/// Only host/transport failures.
pub fn anchor_search(
    doc: &dyn DocumentAccessor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<Option<Anchor>> {
    let target = normalize_ws(target);
    let words: Vec<&str> = target.split_whitespace().collect();

    if words.len() >= 6 {
        let first_chunk = words[..8.min(words.len())].join(" ");
        if let Some(anchor) = bounded_search(doc, &first_chunk, config)? {
            debug!("anchor via first-words strategy");
            return Ok(Some(anchor));
        }
    }

    if words.len() >= 10 {
        let mid = words.len() / 2;
        let mid_chunk = words[mid - 3..mid + 3].join(" ");
        if let Some(anchor) = bounded_search(doc, &mid_chunk, config)? {
            debug!("anchor via middle-words strategy");
            return Ok(Some(anchor));
        }
    }

    if let Ok(re) = Regex::new(r"^[^.!?]+[.!?]") {
        if let Some(sentence) = re.find(&target).map(|m| m.as_str()) {
            let len = char_len(sentence);
            if len > 20 && len < 200 {
                if let Some(anchor) = bounded_search(doc, sentence, config)? {
                    debug!("anchor via first-sentence strategy");
                    return Ok(Some(anchor));
                }
            }
        }
    }

    if words.len() >= 4 {
        let fallback_chunk = words[..4].join(" ");
        if let Some(anchor) = bounded_search(doc, &fallback_chunk, config)? {
            debug!("anchor via four-word fallback strategy");
            return Ok(Some(anchor));
        }
    }

    Ok(None)
}

/// Issue a host search only when the pattern respects the length limit;
/// returns the first candidate in document order.
fn bounded_search(
    doc: &dyn DocumentAccessor,
    pattern: &str,
    config: &LocatorConfig,
) -> LocatorResult<Option<Anchor>> {
    if pattern.is_empty() || char_len(pattern) > config.search_limit {
        return Ok(None);
    }
    Ok(doc.search(pattern)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BufferDocument;

    #[test]
    fn test_default_config_band() {
        let config = LocatorConfig::default();
        assert!(config.ratio_in_band("a".repeat(95).as_str(), "b".repeat(100).as_str()));
        assert!(!config.ratio_in_band("a".repeat(80).as_str(), "b".repeat(100).as_str()));
        // The band is exclusive at both ends.
        assert!(config.ratio_in_band("abcd", "abcd"));
    }

    #[test]
    fn test_locate_empty_target() {
        let doc = BufferDocument::from_text("some body");
        let result = locate(&doc, "   ", &LocatorConfig::default()).expect("locate");
        assert_eq!(result, MatchResult::NotFound);
    }

    #[test]
    fn test_anchor_search_first_words() {
        let doc = BufferDocument::from_text(
            "Preamble text.\nThe Supplier shall indemnify the Customer against all losses.",
        );
        let anchor = anchor_search(
            &doc,
            "The Supplier shall indemnify the Customer against all losses arising out of breach",
            &LocatorConfig::default(),
        )
        .expect("search")
        .expect("should find a partial anchor");
        assert!(anchor.text.starts_with("The Supplier"));
    }

    #[test]
    fn test_anchor_search_four_word_fallback() {
        // Only the opening four words appear in the body.
        let doc = BufferDocument::from_text("Force majeure events excuse nothing here.");
        let anchor = anchor_search(
            &doc,
            "Force majeure events excuse delay when notice is given promptly",
            &LocatorConfig::default(),
        )
        .expect("search");
        // First-words (8) misses, middle-words misses, sentence misses,
        // but the four-word fallback hits.
        assert!(anchor.is_some());
    }

    #[test]
    fn test_anchor_search_miss() {
        let doc = BufferDocument::from_text("Completely unrelated body text.");
        let anchor = anchor_search(
            &doc,
            "The Supplier shall indemnify the Customer against all losses",
            &LocatorConfig::default(),
        )
        .expect("search");
        assert!(anchor.is_none());
    }
}
