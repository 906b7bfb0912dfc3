//! Tagged token and PII span models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used by every supported backend for "not an entity"
pub const NON_ENTITY_LABEL: &str = "O";

/// Canonical PII categories understood by the redaction pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    /// Geographic locations (cities, countries, addresses)
    Location,
    /// Person names
    Name,
    /// Organization names
    Organization,
}

impl PiiKind {
    /// Placeholder label used when redacting
    pub fn label(&self) -> &'static str {
        match self {
            Self::Location => "LOCATION",
            Self::Name => "NAME",
            Self::Organization => "ORGANIZATION",
        }
    }

    /// All kinds, in a stable order
    pub fn all() -> [PiiKind; 3] {
        [Self::Location, Self::Name, Self::Organization]
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One unit of backend output
///
/// Offsets, when present, are byte offsets into the text that was tagged.
/// Backends that only return token sequences leave them as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Surface token as produced by the backend tokenizer
    pub text: String,
    /// Backend-specific entity label, or [`NON_ENTITY_LABEL`]
    pub label: String,
    /// Start byte offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    /// End byte offset (exclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl TaggedToken {
    /// Create a token without offsets
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start: None,
            end: None,
        }
    }

    /// Create a token with byte offsets
    pub fn with_offsets(
        text: impl Into<String>,
        label: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Offsets as a pair, when the backend supplied both
    pub fn offsets(&self) -> Option<(usize, usize)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// A detected PII span
///
/// `text` is always exactly the slice `input[start..end]` of the text that
/// was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiSpan {
    /// PII category
    pub kind: PiiKind,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Matched source text
    pub text: String,
    /// Name of the detector that produced the span
    #[serde(default)]
    pub detector_name: String,
    /// Name of the scanned document, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    /// Locale of the scanned document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl PiiSpan {
    /// Create a span by slicing `source`
    ///
    /// The caller guarantees `start..end` is a valid char-boundary range.
    pub fn from_source(kind: PiiKind, source: &str, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            text: source[start..end].to_string(),
            detector_name: String::new(),
            document_name: None,
            locale: None,
        }
    }

    /// Attach detector metadata
    pub fn with_metadata(
        mut self,
        detector_name: &str,
        document_name: Option<&str>,
        locale: Option<&str>,
    ) -> Self {
        self.detector_name = detector_name.to_string();
        self.document_name = document_name.map(str::to_string);
        self.locale = locale.map(str::to_string);
        self
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Spans are never empty once emitted, but the check is cheap
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &PiiSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(PiiKind::Name.label(), "NAME");
        assert_eq!(PiiKind::Organization.to_string(), "ORGANIZATION");
        assert_eq!(PiiKind::all().len(), 3);
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&PiiKind::Location).unwrap();
        assert_eq!(json, "\"location\"");
    }

    #[test]
    fn test_token_offsets() {
        assert_eq!(TaggedToken::new("Bob", "PERSON").offsets(), None);
        assert_eq!(
            TaggedToken::with_offsets("Bob", "PERSON", 0, 3).offsets(),
            Some((0, 3))
        );
    }

    #[test]
    fn test_span_from_source() {
        let span = PiiSpan::from_source(PiiKind::Location, "New York is big", 0, 8)
            .with_metadata("corenlp", Some("doc-1"), Some("en_US"));
        assert_eq!(span.text, "New York");
        assert_eq!(span.len(), 8);
        assert_eq!(span.detector_name, "corenlp");
        assert_eq!(span.document_name.as_deref(), Some("doc-1"));
    }

    #[test]
    fn test_span_overlap() {
        let text = "Jane Smith";
        let a = PiiSpan::from_source(PiiKind::Name, text, 0, 4);
        let b = PiiSpan::from_source(PiiKind::Name, text, 5, 10);
        let c = PiiSpan::from_source(PiiKind::Name, text, 2, 7);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }
}
