//! Entity detector
//!
//! Glues one [`NerBackend`] to the shared extraction pipeline:
//! tag, map labels, extract spans, optionally expand occurrences.

use super::extractor::{MergePolicy, SpanExtractor};
use super::label_map::{EnabledKinds, LabelMap};
use super::occurrences::expand_occurrences;
use crate::adapters::NerBackend;
use crate::domain::{NerScrubError, PiiSpan, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Default words never reported as entities
pub fn default_ignored_words() -> Vec<String> {
    vec!["tennant".to_string()]
}

/// Settings for an [`EntityDetector`]
#[derive(Debug, Clone)]
pub struct DetectorSettings {
    /// Detector name override; defaults to the backend name
    pub name: Option<String>,
    /// Kinds to report
    pub enabled: EnabledKinds,
    /// Words treated as non-entities
    pub ignored_words: Vec<String>,
    /// Token merge policy
    pub merge: MergePolicy,
    /// Flag every occurrence of detected strings
    pub expand_occurrences: bool,
    /// Document locale, e.g. `en_US`
    pub locale: String,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            name: None,
            enabled: EnabledKinds::default(),
            ignored_words: default_ignored_words(),
            merge: MergePolicy::default(),
            expand_occurrences: false,
            locale: "en_US".to_string(),
        }
    }
}

/// Spans found in one document of a batch
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSpans {
    /// Document name
    pub document_name: String,
    /// Detected spans
    pub spans: Vec<PiiSpan>,
}

/// Outcome of [`EntityDetector::detect_many`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Documents that were scanned
    pub documents: Vec<DocumentSpans>,
    /// Documents that failed, with the error message
    pub failures: Vec<(String, String)>,
}

impl BatchOutcome {
    /// Total spans across all scanned documents
    pub fn total_spans(&self) -> usize {
        self.documents.iter().map(|d| d.spans.len()).sum()
    }
}

/// Detector for names, organizations and locations
///
/// # Thread Safety
///
/// The detector holds the backend behind an `Arc` and has no mutable state,
/// so it can be shared between tasks.
pub struct EntityDetector {
    name: String,
    backend: Arc<dyn NerBackend>,
    labels: LabelMap,
    extractor: SpanExtractor,
    expand_occurrences: bool,
    locale: String,
}

impl std::fmt::Debug for EntityDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDetector")
            .field("name", &self.name)
            .field("backend", &self.backend.name())
            .field("labels", &self.labels)
            .field("locale", &self.locale)
            .finish()
    }
}

impl EntityDetector {
    /// Create a detector around `backend`
    ///
    /// # Errors
    ///
    /// Returns a validation error if no kind is enabled or the locale is not
    /// supported.
    pub fn new(backend: Arc<dyn NerBackend>, settings: DetectorSettings) -> Result<Self> {
        if !settings.enabled.any() {
            return Err(NerScrubError::Validation(
                "At least one of person, organization or location must be enabled".to_string(),
            ));
        }
        if !Self::supported_locale(&settings.locale) {
            return Err(NerScrubError::Validation(format!(
                "Unsupported locale '{}': only English (en) models are available",
                settings.locale
            )));
        }

        let labels = LabelMap::filtered(backend.label_table(), &settings.enabled);
        let extractor =
            SpanExtractor::new(settings.merge).with_ignored_words(&settings.ignored_words);
        let name = settings
            .name
            .unwrap_or_else(|| backend.name().to_string());

        Ok(Self {
            name,
            backend,
            labels,
            extractor,
            expand_occurrences: settings.expand_occurrences,
            locale: settings.locale,
        })
    }

    /// Whether documents in `locale` can be scanned
    ///
    /// Locales are `xx` or `xx_YY`; only the language part is checked.
    pub fn supported_locale(locale: &str) -> bool {
        let language = locale
            .split(['_', '-'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        language == "en"
    }

    /// Detector name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active label map
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Backend in use
    pub fn backend(&self) -> &Arc<dyn NerBackend> {
        &self.backend
    }

    /// Detect PII spans in `text`
    ///
    /// # Errors
    ///
    /// Propagates backend failures and [`NerScrubError::OffsetRecovery`]
    /// when the backend's tokens cannot be aligned with `text`.
    pub async fn detect(&self, text: &str, document_name: Option<&str>) -> Result<Vec<PiiSpan>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let tokens = self.backend.tag(text).await?;

        let spans = match self.extractor.extract(text, &tokens, &self.labels) {
            Ok(spans) => spans,
            Err(e) => {
                tracing::warn!(
                    detector = %self.name,
                    document = document_name.unwrap_or("-"),
                    cursor = e.cursor,
                    reason = %e.reason,
                    "Backend tokens do not align with input text"
                );
                return Err(e.into());
            }
        };

        let spans = if self.expand_occurrences {
            expand_occurrences(text, spans)?
        } else {
            spans
        };

        let spans: Vec<PiiSpan> = spans
            .into_iter()
            .map(|span| span.with_metadata(&self.name, document_name, Some(&self.locale)))
            .collect();

        tracing::debug!(
            detector = %self.name,
            document = document_name.unwrap_or("-"),
            tokens = tokens.len(),
            spans = spans.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Detection completed"
        );

        Ok(spans)
    }

    /// Detect spans in several `(document_name, text)` pairs
    ///
    /// A failing document is logged and recorded in
    /// [`BatchOutcome::failures`]; the rest of the batch continues.
    pub async fn detect_many(&self, documents: &[(String, String)]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (document_name, text) in documents {
            match self.detect(text, Some(document_name)).await {
                Ok(spans) => outcome.documents.push(DocumentSpans {
                    document_name: document_name.clone(),
                    spans,
                }),
                Err(e) => {
                    tracing::warn!(
                        detector = %self.name,
                        document = %document_name,
                        error = %e,
                        "Skipping document after detection failure"
                    );
                    outcome.failures.push((document_name.clone(), e.to_string()));
                }
            }
        }

        outcome
    }
}
