//! Domain models and types for nerscrub.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Span models** ([`TaggedToken`], [`PiiSpan`], [`PiiKind`])
//! - **Error types** ([`NerScrubError`], [`BackendError`], [`OffsetRecoveryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, NerScrubError>`]:
//!
//! ```rust
//! use nerscrub::domain::{NerScrubError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(NerScrubError::Validation("empty input".to_string()))
//! }
//! ```

pub mod errors;
pub mod result;
pub mod span;

// Re-export commonly used types for convenience
pub use errors::{BackendError, NerScrubError, OffsetRecoveryError};
pub use result::Result;
pub use span::{PiiKind, PiiSpan, TaggedToken, NON_ENTITY_LABEL};
