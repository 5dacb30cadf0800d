//! Error types for the clause-engine crate.

use std::path::PathBuf;

/// Locator-specific error types.
///
/// Ordinary "clause not found" outcomes are **not** errors — strategies
/// report those through [`crate::locate::MatchResult::NotFound`]. Only
/// host/transport failures and contract violations surface here.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    /// A search pattern exceeded the host's single-call length limit.
    /// The engine never issues such a call; seeing this means a caller
    /// bypassed the strategy chain and hit the accessor directly.
    #[error("search pattern of {len} units exceeds host limit of {limit}")]
    PatternTooLong { len: usize, limit: usize },

    /// An anchor refers to offsets outside the current document body,
    /// e.g. a stale handle used after an external edit.
    #[error("anchor [{start}, {end}) lies outside the document body")]
    AnchorOutOfBounds { start: usize, end: usize },

    /// The document host itself failed (transport/connection/crash).
    /// The search-and-replace state is unknown; callers must not retry
    /// blindly on top of this.
    #[error("document host error: {0}")]
    Host(String),

    /// I/O error with path context (buffer-backed demo documents).
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for clause-engine operations.
pub type LocatorResult<T> = Result<T, LocatorError>;
