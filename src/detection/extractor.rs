//! Entity span extraction
//!
//! Turns a backend's tagged-token stream into ordered, non-overlapping
//! [`PiiSpan`]s whose text is always the exact source slice.
//!
//! # Algorithm
//!
//! Tokens are walked in order with a single open accumulator. Each token is
//! placed in the source text, either from backend offsets or by searching
//! forward from a cursor that sits right after the previous token. A token
//! whose kind matches the accumulator and whose gap to it is allowed by the
//! [`MergePolicy`] extends the accumulator; anything else closes it.
//!
//! ```
//! use nerscrub::detection::extractor::SpanExtractor;
//! use nerscrub::detection::label_map::{LabelMap, STANZA_LABELS};
//! use nerscrub::domain::{PiiKind, TaggedToken};
//!
//! let text = "New York is big";
//! let tokens = vec![
//!     TaggedToken::with_offsets("New", "LOC", 0, 3),
//!     TaggedToken::with_offsets("York", "LOC", 4, 8),
//!     TaggedToken::with_offsets("is", "O", 9, 11),
//!     TaggedToken::with_offsets("big", "O", 12, 15),
//! ];
//! let spans = SpanExtractor::default()
//!     .extract(text, &tokens, &LabelMap::from_table(STANZA_LABELS))
//!     .unwrap();
//!
//! assert_eq!(spans.len(), 1);
//! assert_eq!(spans[0].kind, PiiKind::Location);
//! assert_eq!(spans[0].text, "New York");
//! ```

use super::label_map::LabelMap;
use crate::domain::{OffsetRecoveryError, PiiKind, PiiSpan, TaggedToken};
use serde::{Deserialize, Serialize};

/// When two same-kind tokens join into one span
///
/// Contiguous tokens always qualify. Otherwise the gap between them must be
/// at most `max_gap` bytes (unbounded when `None`) and, when
/// `whitespace_only` is set, consist of whitespace alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    /// Maximum gap in bytes, `None` for no limit
    #[serde(default)]
    pub max_gap: Option<usize>,

    /// Require the gap to be whitespace
    #[serde(default = "default_whitespace_only")]
    pub whitespace_only: bool,
}

fn default_whitespace_only() -> bool {
    true
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            max_gap: None,
            whitespace_only: default_whitespace_only(),
        }
    }
}

impl MergePolicy {
    /// Only merge tokens that touch
    pub fn contiguous_only() -> Self {
        Self {
            max_gap: Some(0),
            whitespace_only: true,
        }
    }

    /// Whether `gap` (the source text between two tokens) allows a merge
    pub fn allows_gap(&self, gap: &str) -> bool {
        if gap.is_empty() {
            return true;
        }
        if let Some(max_gap) = self.max_gap {
            if gap.len() > max_gap {
                return false;
            }
        }
        !self.whitespace_only || gap.chars().all(char::is_whitespace)
    }
}

/// Span being built from consecutive tokens
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    kind: PiiKind,
    start: usize,
    end: usize,
}

impl Accumulator {
    fn into_span(self, text: &str) -> PiiSpan {
        PiiSpan::from_source(self.kind, text, self.start, self.end)
    }
}

/// Backend-agnostic span extractor
///
/// Holds only policy; every call works on its own locals, so a single
/// extractor can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SpanExtractor {
    policy: MergePolicy,
    ignored_words: Vec<String>,
}

impl SpanExtractor {
    /// Create an extractor with the given merge policy
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            ignored_words: Vec::new(),
        }
    }

    /// Treat these words as non-entities regardless of their label
    ///
    /// Matching is case-insensitive on the trimmed token text.
    pub fn with_ignored_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self
    }

    /// Merge policy in use
    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Extract spans from `tokens` tagged over `text`
    ///
    /// # Errors
    ///
    /// Returns [`OffsetRecoveryError`] when a token cannot be placed: its
    /// text does not occur after the cursor, or its supplied offsets are out
    /// of range, not on a char boundary, or behind the previous token.
    pub fn extract(
        &self,
        text: &str,
        tokens: &[TaggedToken],
        labels: &LabelMap,
    ) -> Result<Vec<PiiSpan>, OffsetRecoveryError> {
        let mut spans = Vec::new();
        let mut open: Option<Accumulator> = None;
        let mut cursor = 0usize;

        for token in tokens {
            let Some((start, end)) = locate(text, token, cursor)? else {
                continue;
            };
            cursor = end;

            let kind = self.classify(token, labels);

            if let (Some(acc), Some(kind)) = (open.as_mut(), kind) {
                if acc.kind == kind && self.policy.allows_gap(&text[acc.end..start]) {
                    acc.end = end;
                    continue;
                }
            }

            if let Some(acc) = open.take() {
                spans.push(acc.into_span(text));
            }
            open = kind.map(|kind| Accumulator { kind, start, end });
        }

        if let Some(acc) = open {
            spans.push(acc.into_span(text));
        }

        tracing::trace!(
            tokens = tokens.len(),
            spans = spans.len(),
            "Extracted entity spans"
        );

        Ok(spans)
    }

    fn classify(&self, token: &TaggedToken, labels: &LabelMap) -> Option<PiiKind> {
        let kind = labels.kind_of(&token.label)?;
        if self.is_ignored(&token.text) {
            return None;
        }
        Some(kind)
    }

    fn is_ignored(&self, word: &str) -> bool {
        if self.ignored_words.is_empty() {
            return false;
        }
        let word = word.trim().to_lowercase();
        self.ignored_words.iter().any(|ignored| *ignored == word)
    }
}

/// Byte range covered by `token`, `None` for zero-width tokens
fn locate(
    text: &str,
    token: &TaggedToken,
    cursor: usize,
) -> Result<Option<(usize, usize)>, OffsetRecoveryError> {
    if let Some((start, end)) = token.offsets() {
        if start > end || end > text.len() {
            return Err(OffsetRecoveryError::new(
                &token.text,
                cursor,
                format!("offsets {start}..{end} outside text of {} bytes", text.len()),
            ));
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(OffsetRecoveryError::new(
                &token.text,
                cursor,
                format!("offsets {start}..{end} split a character"),
            ));
        }
        if start < cursor {
            return Err(OffsetRecoveryError::new(
                &token.text,
                cursor,
                format!("offsets {start}..{end} overlap the previous token"),
            ));
        }
        return Ok((start < end).then_some((start, end)));
    }

    if token.text.is_empty() {
        return Ok(None);
    }

    match text[cursor..].find(token.text.as_str()) {
        Some(idx) => {
            let start = cursor + idx;
            Ok(Some((start, start + token.text.len())))
        }
        None => Err(OffsetRecoveryError::new(
            &token.text,
            cursor,
            "token text not found in remaining input",
        )),
    }
}
