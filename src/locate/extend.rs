//! Range extension: grow a matched edge of the target into the full clause.
//!
//! When chunk stitching fails, the target's first (or last) 200 units are
//! usually still distinctive enough for a bounded host search. A hit gives
//! a confirmed prefix (or suffix) anchor; the strategy expands the range
//! toward the missing side, relocates the edge inside the expanded window,
//! finds the opposite boundary by its landmark words, and accepts the
//! carved range only when its normalized length sits inside the band —
//! the pairing of a coarse signal (length) with a content signal (boundary
//! words) is what rejects coincidentally similar boilerplate.

use tracing::debug;

use crate::document::{Anchor, DocumentAccessor};
use crate::error::LocatorResult;
use crate::locate::{LocatorConfig, MatchResult, Strategy};
use crate::normalize::{
    char_len, char_prefix, char_suffix, find_flexible, find_flexible_at, first_words,
    last_words, normalize_ws, rfind_flexible,
};

/// Anchor on the target's leading edge and extend forward.
///
/// # Errors
///
/// Only host/transport failures.
pub fn extend_forward_search(
    doc: &dyn DocumentAccessor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<MatchResult> {
    let prefix = char_prefix(target, config.edge_anchor_len);
    if prefix.is_empty() || char_len(prefix) > config.search_limit {
        return Ok(MatchResult::NotFound);
    }

    let hits = doc.search(prefix)?;
    for candidate in hits.iter().take(config.max_extension_candidates) {
        if let Some(anchor) = extend_forward(doc, candidate, target, config)? {
            debug!(start = anchor.start, "forward extension succeeded");
            return Ok(MatchResult::found(anchor, Strategy::ExtendForward));
        }
    }
    Ok(MatchResult::NotFound)
}

/// Anchor on the target's trailing edge and extend backward.
///
/// # Errors
///
/// Only host/transport failures.
pub fn extend_backward_search(
    doc: &dyn DocumentAccessor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<MatchResult> {
    let suffix = char_suffix(target, config.edge_anchor_len);
    if suffix.is_empty() || char_len(suffix) > config.search_limit {
        return Ok(MatchResult::NotFound);
    }

    let hits = doc.search(suffix)?;
    for candidate in hits.iter().take(config.max_extension_candidates) {
        if let Some(anchor) = extend_backward(doc, candidate, target, config)? {
            debug!(start = anchor.start, "backward extension succeeded");
            return Ok(MatchResult::found(anchor, Strategy::ExtendBackward));
        }
    }
    Ok(MatchResult::NotFound)
}

/// Grow a confirmed prefix anchor to cover the whole target.
fn extend_forward(
    doc: &dyn DocumentAccessor,
    hit: &Anchor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<Option<Anchor>> {
    let hit_text = normalize_ws(&hit.text);
    let Some(offset) = target.find(&hit_text) else {
        return Ok(None);
    };

    let remaining = char_len(target)
        .saturating_sub(char_len(&target[..offset]))
        .saturating_sub(char_len(&hit_text));
    if remaining == 0 {
        // The anchor already covers the target's tail end.
        return Ok(config.ratio_in_band(&hit_text, target).then(|| hit.clone()));
    }

    // 1.5x buffer absorbs formatting characters the normalized target omits.
    let window = doc.expand(hit, remaining * 3 / 2)?;
    let Some(prefix_rel) = find_flexible(&window.text, &hit_text) else {
        return Ok(None);
    };

    let after_prefix = &target[offset + hit_text.len()..];
    let tail_landmark = last_words(after_prefix, config.landmark_words);
    if tail_landmark.is_empty() {
        return Ok(None);
    }
    let Some(tail_rel) = find_flexible_at(&window.text, &tail_landmark, prefix_rel.end)
    else {
        return Ok(None);
    };

    let candidate = window.slice(prefix_rel.start..tail_rel.end);
    let found = normalize_ws(&candidate.text);
    Ok(config.ratio_in_band(&found, target).then_some(candidate))
}

/// Grow a confirmed suffix anchor backward to cover the whole target.
fn extend_backward(
    doc: &dyn DocumentAccessor,
    hit: &Anchor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<Option<Anchor>> {
    let hit_text = normalize_ws(&hit.text);
    let Some(offset) = target.rfind(&hit_text) else {
        return Ok(None);
    };
    if offset == 0 {
        return Ok(config.ratio_in_band(&hit_text, target).then(|| hit.clone()));
    }

    let window = doc.expand(hit, char_len(target) * 3 / 2)?;
    let Some(suffix_rel) = rfind_flexible(&window.text, &hit_text) else {
        return Ok(None);
    };

    let before_suffix = &target[..offset];
    let head_landmark = first_words(before_suffix, config.landmark_words);
    if head_landmark.is_empty() {
        return Ok(None);
    }
    let Some(head_rel) = find_flexible(&window.text, &head_landmark) else {
        return Ok(None);
    };
    if head_rel.start >= suffix_rel.start {
        return Ok(None);
    }

    let candidate = window.slice(head_rel.start..suffix_rel.end);
    let found = normalize_ws(&candidate.text);
    Ok(config.ratio_in_band(&found, target).then_some(candidate))
}
