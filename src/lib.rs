//! `clause-engine` — clause location and replacement for live
//! word-processor documents.
//!
//! Finds a piece of legal text inside a formatted document and replaces it
//! safely, even when the text exceeds the host's single-search length
//! limit, drifts from the document by whitespace/formatting, crosses
//! paragraph boundaries, or collides with lookalike matches that must be
//! rejected.
//!
//! # Strategies
//!
//! [`locate`] runs four strategies in strict fallback order, stopping at
//! the first validated match:
//!
//! 1. Direct bounded search (≤ 255 units)
//! 2. Sequential chunk search (overlapping-chunk stitching)
//! 3. Range extension (grow a matched prefix/suffix to the full clause)
//! 4. Paragraph expansion (greedy growth around a partial anchor)
//!
//! [`locate_and_replace`] wraps the chain with an at-most-one-write
//! guarantee: a single substitution on success, no mutation at all on
//! failure.
//!
//! # The document boundary
//!
//! The engine owns no host objects. It reads and writes exclusively
//! through the [`DocumentAccessor`] capability — a word-processor add-in
//! adapter in production, [`BufferDocument`] in demo mode and tests.
//!
//! ```
//! use clause_engine::{BufferDocument, LocatorConfig, locate_and_replace};
//!
//! let mut doc = BufferDocument::from_text("Intro. THE OLD CLAUSE. Outro.");
//! let outcome = locate_and_replace(
//!     &mut doc,
//!     "the old clause.",
//!     "the redrafted clause.",
//!     &LocatorConfig::default(),
//! )?;
//! assert!(outcome.success);
//! # Ok::<(), clause_engine::LocatorError>(())
//! ```

pub mod diff;
pub mod document;
pub mod error;
pub mod locate;
pub mod normalize;
pub mod replace;

pub use document::{Anchor, BufferDocument, DocumentAccessor, HOST_SEARCH_LIMIT, ParagraphInfo};
pub use error::{LocatorError, LocatorResult};
pub use locate::{LocatorConfig, Match, MatchResult, Strategy, anchor_search, locate};
pub use replace::{ReplaceOutcome, locate_and_replace};
