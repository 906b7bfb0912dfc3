//! NER backend abstraction
//!
//! A backend does one thing: produce tagged tokens for a text. Everything
//! after that (label mapping, span extraction, redaction) is shared and
//! lives in [`crate::detection`].

use crate::detection::label_map::LabelTable;
use crate::domain::{Result, TaggedToken};
use async_trait::async_trait;

/// Tagging backend capability
///
/// Implementations own their external resources (HTTP client, model paths,
/// process settings). They are constructed explicitly and handed to an
/// [`EntityDetector`](crate::detection::EntityDetector); nothing is held in
/// process-wide state.
#[async_trait]
pub trait NerBackend: Send + Sync {
    /// Tag `text`
    ///
    /// Tokens must be in source order. Offsets, when set, are byte offsets
    /// into `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable, fails, or answers
    /// with output that cannot be parsed.
    async fn tag(&self, text: &str) -> Result<Vec<TaggedToken>>;

    /// Short backend name used as the detector name (`"corenlp"`, ...)
    fn name(&self) -> &'static str;

    /// Static label vocabulary of this backend
    fn label_table(&self) -> LabelTable;

    /// Whether the backend's model or resources look installed
    fn is_available(&self) -> bool;
}
