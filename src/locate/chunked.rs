//! Sequential chunk search: locate text longer than the host search limit
//! by stitching overlapping chunk matches into one contiguous range.
//!
//! The target is split into ~200-unit chunks overlapping by ~50 units.
//! Candidates for the first chunk seed a stitching pass that walks the
//! remaining chunks forward through expanding windows; a completed range
//! validates by normalized-length ratio or by boundary-word agreement.
//! When no first-chunk candidate stitches, a middle chunk (usually more
//! distinctive than boilerplate clause openings) seeds a landmark-based
//! best-match carve instead.

use tracing::debug;

use crate::document::{Anchor, DocumentAccessor};
use crate::error::LocatorResult;
use crate::locate::{LocatorConfig, MatchResult, Strategy};
use crate::normalize::{
    char_len, find_flexible, first_words, last_words, normalize_ws, rfind_flexible,
};

/// Hard cap on the per-chunk forward expansion during stitching.
const MAX_STEP_EXPANSION: usize = 300;

/// Locate a long normalized target by chunk stitching.
///
/// # Errors
///
/// Only host/transport failures; every kind of miss is `Ok(NotFound)`.
pub fn sequential_chunk_search(
    doc: &dyn DocumentAccessor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<MatchResult> {
    let chunks = chunk_spans(target, config.chunk_size, config.chunk_overlap);
    let Some(first_chunk) = chunks.first() else {
        return Ok(MatchResult::NotFound);
    };
    debug!(chunks = chunks.len(), "starting sequential chunk search");

    if char_len(first_chunk) > config.search_limit {
        // Misconfigured chunk size; never hand the host an oversized pattern.
        return Ok(MatchResult::NotFound);
    }

    let first_hits = doc.search(first_chunk)?;
    for candidate in first_hits.iter().take(config.max_candidates) {
        if let Some(anchor) = validate_and_extend(doc, candidate, &chunks, target, config)? {
            debug!(start = anchor.start, end = anchor.end, "chunk stitching succeeded");
            return Ok(MatchResult::found(anchor, Strategy::ChunkStitch));
        }
    }

    // First-chunk seeding failed; a middle chunk is often more distinctive
    // when the document drifts slightly from the supplied text.
    if chunks.len() >= 3 {
        let middle_chunk = chunks[chunks.len() / 2];
        if char_len(middle_chunk) > config.search_limit {
            return Ok(MatchResult::NotFound);
        }
        let middle_hits = doc.search(middle_chunk)?;
        for candidate in middle_hits.iter().take(config.max_candidates) {
            let window = doc.expand(candidate, char_len(target))?;
            if let Some(anchor) = best_match_in_window(&window, target, config) {
                debug!(
                    start = anchor.start,
                    "middle-chunk landmark carve succeeded"
                );
                return Ok(MatchResult::found(anchor, Strategy::ChunkStitch));
            }
        }
    }

    debug!("sequential chunk search found no complete match");
    Ok(MatchResult::NotFound)
}

/// Walk chunks 1..n forward from a first-chunk candidate, growing the
/// stitched range. Each step searches a tight window first, then retries
/// once with a broader one before failing the candidate.
fn validate_and_extend(
    doc: &dyn DocumentAccessor,
    first_hit: &Anchor,
    chunks: &[&str],
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<Option<Anchor>> {
    let mut current = first_hit.clone();
    let mut complete = first_hit.clone();

    for chunk in &chunks[1..] {
        let expansion = MAX_STEP_EXPANSION.min(2 * char_len(chunk));
        let window = doc.expand(&current, expansion)?;

        let next = match find_flexible(&window.text, chunk) {
            Some(rel) => Some(window.slice(rel)),
            None => {
                // Not where expected; one broader look around the current
                // position before declaring the sequence broken.
                let broader = doc.expand(&current, char_len(target) / 2)?;
                find_flexible(&broader.text, chunk).map(|rel| broader.slice(rel))
            }
        };

        let Some(next) = next else {
            return Ok(None);
        };
        complete = complete.cover(&next);
        current = next;
    }

    let complete = doc.expand(&complete, 0)?;
    let found = normalize_ws(&complete.text);

    if config.ratio_in_band(&found, target)
        || boundary_words_match(&found, target, config.boundary_words)
    {
        Ok(Some(complete))
    } else {
        debug!("stitched range failed validation");
        Ok(None)
    }
}

/// Do the first and last `n` normalized words of both texts agree?
fn boundary_words_match(found: &str, target: &str, n: usize) -> bool {
    first_words(found, n) == first_words(target, n)
        && last_words(found, n) == last_words(target, n)
}

/// Carve the best-fitting sub-range for `target` out of a window using its
/// first and last landmark words, band-validated.
pub(crate) fn best_match_in_window(
    window: &Anchor,
    target: &str,
    config: &LocatorConfig,
) -> Option<Anchor> {
    let head = first_words(target, config.landmark_words);
    let tail = last_words(target, config.landmark_words);

    let start = find_flexible(&window.text, &head)?;
    let end = rfind_flexible(&window.text, &tail)?;
    if end.end <= start.start {
        return None;
    }

    let candidate = window.slice(start.start..end.end);
    let found = normalize_ws(&candidate.text);
    config.ratio_in_band(&found, target).then_some(candidate)
}

/// Split `s` into chunks of `size` chars stepping `size - overlap`, so each
/// chunk shares `overlap` chars with its neighbor. The last chunk may be
/// shorter; a boundary landing mid-word is fine because chunks are searched
/// as literal (whitespace-flexible) substrings, not token sequences.
fn chunk_spans(s: &str, size: usize, overlap: usize) -> Vec<&str> {
    if s.is_empty() || size == 0 {
        return Vec::new();
    }
    let step = size.saturating_sub(overlap).max(1);
    let boundaries: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    let n_chars = boundaries.len();

    let mut chunks = Vec::new();
    let mut at = 0;
    loop {
        let end_char = (at + size).min(n_chars);
        let start_byte = boundaries[at];
        let end_byte = if end_char == n_chars {
            s.len()
        } else {
            boundaries[end_char]
        };
        chunks.push(&s[start_byte..end_byte]);
        if end_char == n_chars {
            break;
        }
        at += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BufferDocument;

    fn clause(words: usize) -> String {
        (0..words)
            .map(|i| format!("term{i:03}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_chunk_spans_overlap() {
        let text = "x".repeat(500);
        let chunks = chunk_spans(&text, 200, 50);
        // Steps of 150: starts at 0, 150, 300, 450.
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].len(), 200);
        assert_eq!(chunks[3].len(), 50);
    }

    #[test]
    fn test_chunk_spans_short_input_single_chunk() {
        let chunks = chunk_spans("short", 200, 50);
        assert_eq!(chunks, vec!["short"]);
    }

    #[test]
    fn test_stitches_clause_across_paragraph_breaks() {
        // ~1,400 units of clause text, split over paragraph breaks in the
        // document but supplied as one whitespace-normalized string.
        let target = clause(180);
        let mut body = String::from("Preamble paragraph.\n");
        for (i, word) in target.split(' ').enumerate() {
            body.push_str(word);
            body.push(if i % 12 == 11 { '\n' } else { ' ' });
        }
        body.push_str("\nClosing paragraph.");

        let doc = BufferDocument::from_text(body);
        let config = LocatorConfig::default();
        let result = sequential_chunk_search(&doc, &target, &config).expect("search");
        let m = result.into_match().expect("should stitch the full clause");
        assert_eq!(m.strategy, Strategy::ChunkStitch);

        let found = normalize_ws(&m.anchor.text);
        let ratio = crate::normalize::length_ratio(&found, &target);
        assert!(ratio > 0.9 && ratio < 1.1, "ratio {ratio} out of band");
    }

    #[test]
    fn test_rejects_decoy_sharing_first_chunk() {
        let target = clause(120);
        let first_chunk: String = target.chars().take(200).collect();
        // Document contains only the first chunk, then diverges completely.
        let body = format!("{first_chunk} and then something entirely different. {}", "filler ".repeat(200));

        let doc = BufferDocument::from_text(body);
        let result = sequential_chunk_search(&doc, &target, &LocatorConfig::default())
            .expect("search");
        assert_eq!(result, MatchResult::NotFound);
    }

    #[test]
    fn test_best_match_in_window_carves_tight_range() {
        let target = "alpha bravo charlie delta echo foxtrot golf hotel india juliett";
        let window_text = format!("NOISE BEFORE {target} NOISE AFTER");
        let window = Anchor::new(1000, 1000 + window_text.len(), window_text.clone());

        let carved = best_match_in_window(&window, target, &LocatorConfig::default())
            .expect("should carve");
        assert_eq!(normalize_ws(&carved.text), target);
        assert_eq!(carved.start, 1000 + window_text.find("alpha").expect("offset"));
    }

    #[test]
    fn test_best_match_rejects_wrong_length() {
        // Landmarks present but far apart with unrelated filler between:
        // the carved range is way over-length and must be rejected.
        let target = "alpha bravo charlie delta echo foxtrot golf hotel";
        let window_text = format!(
            "alpha bravo charlie delta echo {} delta echo foxtrot golf hotel",
            "junk ".repeat(80)
        );
        let window = Anchor::new(0, window_text.len(), window_text);
        assert!(best_match_in_window(&window, target, &LocatorConfig::default()).is_none());
    }
}
