//! The replace coordinator: locate, then one atomic substitution.
//!
//! Wraps the strategy chain with the write discipline the engine promises:
//! exactly one `replace` call on the winning anchor, zero mutation when
//! every strategy comes up empty. There is no retry — retrying a failed
//! replace blindly risks double writes, so any retry is a caller decision
//! operating on a fresh search.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::DocumentAccessor;
use crate::error::LocatorResult;
use crate::locate::{LocatorConfig, MatchResult, Strategy, locate};

/// Outcome of a locate-and-replace call.
///
/// `success: false` means every strategy was exhausted and the document
/// was left untouched. Host/transport failures are surfaced as errors
/// instead, since the document state is then unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOutcome {
    pub success: bool,
    /// The strategy that located the clause, when one did.
    pub strategy: Option<Strategy>,
}

/// Locate `target` and replace it with `replacement` in one atomic write.
///
/// # Errors
///
/// Only host/transport failures (including a failed commit of the write
/// itself). "Clause not found" is `Ok` with `success: false`.
pub fn locate_and_replace(
    doc: &mut dyn DocumentAccessor,
    target: &str,
    replacement: &str,
    config: &LocatorConfig,
) -> LocatorResult<ReplaceOutcome> {
    match locate(&*doc, target, config)? {
        MatchResult::Found(m) => {
            debug!(
                strategy = m.strategy.name(),
                start = m.anchor.start,
                end = m.anchor.end,
                "replacing located clause"
            );
            doc.replace(&m.anchor, replacement)?;
            Ok(ReplaceOutcome {
                success: true,
                strategy: Some(m.strategy),
            })
        }
        MatchResult::NotFound => {
            warn!("clause not located; document left unmodified");
            Ok(ReplaceOutcome {
                success: false,
                strategy: None,
            })
        }
    }
}
