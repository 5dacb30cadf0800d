//! Exact bounded-length search — the cheapest strategy, tried first.

use tracing::debug;

use crate::document::DocumentAccessor;
use crate::error::LocatorResult;
use crate::locate::{LocatorConfig, MatchResult, Strategy};
use crate::normalize::char_len;

/// One case-insensitive host search for the whole normalized target.
///
/// Defers immediately (without issuing a call the host would reject) when
/// the target exceeds the search limit. The first candidate in document
/// order wins.
///
/// # Errors
///
/// Only host/transport failures; a miss is `Ok(NotFound)`.
pub fn direct_search(
    doc: &dyn DocumentAccessor,
    target: &str,
    config: &LocatorConfig,
) -> LocatorResult<MatchResult> {
    let len = char_len(target);
    if len > config.search_limit {
        debug!(
            units = len,
            limit = config.search_limit,
            "target too long for direct search, deferring"
        );
        return Ok(MatchResult::NotFound);
    }

    match doc.search(target)?.into_iter().next() {
        Some(anchor) => {
            debug!(start = anchor.start, "direct search hit");
            Ok(MatchResult::found(anchor, Strategy::Direct))
        }
        None => Ok(MatchResult::NotFound),
    }
}
