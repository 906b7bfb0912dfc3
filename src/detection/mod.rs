//! Entity detection pipeline
//!
//! Backend-independent part of the scrubber:
//!
//! - [`label_map`] - Backend label vocabularies and the enabled-kind filter
//! - [`offset`] - Conversion of char/UTF-16 offsets to byte offsets
//! - [`extractor`] - Merging of tagged tokens into source spans
//! - [`occurrences`] - Optional search for further mentions of detected strings
//! - [`detector`] - [`EntityDetector`], one backend plus the steps above
//! - [`redaction`] - Replacing spans in the text
//! - [`audit`] - Hashed audit trail of detections

pub mod audit;
pub mod detector;
pub mod extractor;
pub mod label_map;
pub mod occurrences;
pub mod offset;
pub mod redaction;

pub use audit::{AuditConfig, AuditLogger};
pub use detector::{BatchOutcome, DetectorSettings, DocumentSpans, EntityDetector};
pub use extractor::{MergePolicy, SpanExtractor};
pub use label_map::{EnabledKinds, LabelMap, LabelTable};
pub use offset::{OffsetMap, OffsetUnit};
pub use redaction::{redact, redact_with, RedactionStrategy, Redactor};
