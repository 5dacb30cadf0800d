//! Paragraph expansion: the last-resort strategy for a short confirmed
//! anchor sitting inside a clause that spans multiple paragraphs.
//!
//! The anchor's containing paragraph tells us whether the match is
//! partial (paragraph much shorter than the target). If so, a bounded
//! window of neighboring paragraphs is combined and the anchor's span is
//! grown greedily, one char at a time in each direction, accepting an
//! extension only while the normalized grown substring is still contained
//! in the normalized target. Containment testing survives structural
//! whitespace and numbering the target omits, where a length heuristic
//! would not.

use tracing::debug;

use crate::document::{Anchor, DocumentAccessor, ParagraphInfo};
use crate::error::LocatorResult;
use crate::locate::{LocatorConfig, MatchResult, Strategy};
use crate::normalize::{char_len, normalize_ws};

/// Grow a partial anchor into the full clause via its paragraph window.
///
/// # Errors
///
/// Only host/transport failures.
pub fn paragraph_expansion(
    doc: &dyn DocumentAccessor,
    anchor: &Anchor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<MatchResult> {
    let paragraphs = doc.paragraphs()?;
    let Some(index) = paragraphs
        .iter()
        .position(|p| p.anchor.contains_offset(anchor.start))
    else {
        return Ok(MatchResult::NotFound);
    };

    let paragraph_units = char_len(&normalize_ws(&paragraphs[index].anchor.text));
    #[allow(clippy::cast_precision_loss)]
    let partial =
        (paragraph_units as f64) < config.partial_paragraph_ratio * char_len(target) as f64;

    // A partial anchor pulls in neighbors; otherwise growth stays inside
    // the containing paragraph so a short hit in a long paragraph can
    // still spread to the clause around it without leaving it.
    let (lo, hi) = if partial {
        paragraph_window(paragraphs.len(), index, config.paragraph_radius)
    } else {
        (index, index)
    };
    debug!(index, lo, hi, partial, "building paragraph window");

    let window = combined_window(doc, &paragraphs, lo, hi)?;
    if anchor.start < window.start || anchor.start >= window.end {
        return Ok(MatchResult::NotFound);
    }
    let rel_start = anchor.start - window.start;
    let rel_end = anchor.end.min(window.end) - window.start;

    let (best_start, best_end) = grow_by_containment(&window.text, rel_start, rel_end, target);

    let candidate = window.slice(best_start..best_end);
    let found = normalize_ws(&candidate.text);
    if config.ratio_in_band(&found, target) {
        debug!(
            start = candidate.start,
            end = candidate.end,
            "paragraph expansion accepted"
        );
        Ok(MatchResult::found(candidate, Strategy::ParagraphExpansion))
    } else {
        debug!("paragraph expansion failed the length band");
        Ok(MatchResult::NotFound)
    }
}

/// Window bounds of at most `radius` paragraphs on each side of `index`.
pub(crate) fn paragraph_window(count: usize, index: usize, radius: usize) -> (usize, usize) {
    (
        index.saturating_sub(radius),
        (index + radius).min(count.saturating_sub(1)),
    )
}

/// One combined, materialized range over paragraphs `lo..=hi`.
fn combined_window(
    doc: &dyn DocumentAccessor,
    paragraphs: &[ParagraphInfo],
    lo: usize,
    hi: usize,
) -> LocatorResult<Anchor> {
    let span = Anchor::new(
        paragraphs[lo].anchor.start,
        paragraphs[hi].anchor.end,
        String::new(),
    );
    doc.expand(&span, 0)
}

/// Greedily widen `[start, end)` within `text` while the normalized grown
/// substring remains a substring of the normalized target. Growth stops the
/// first time either side fails; each step moves exactly one char.
fn grow_by_containment(
    text: &str,
    mut start: usize,
    mut end: usize,
    target: &str,
) -> (usize, usize) {
    loop {
        let Some(prev) = prev_char_boundary(text, start) else {
            break;
        };
        if target.contains(&normalize_ws(&text[prev..end])) {
            start = prev;
        } else {
            break;
        }
    }

    loop {
        let Some(next) = next_char_boundary(text, end) else {
            break;
        };
        if target.contains(&normalize_ws(&text[start..next])) {
            end = next;
        } else {
            break;
        }
    }

    (start, end)
}

fn prev_char_boundary(s: &str, idx: usize) -> Option<usize> {
    s[..idx].chars().next_back().map(|c| idx - c.len_utf8())
}

fn next_char_boundary(s: &str, idx: usize) -> Option<usize> {
    s[idx..].chars().next().map(|c| idx + c.len_utf8())
}
