//! Backend factory
//!
//! Builds the configured [`NerBackend`] and the [`EntityDetector`] around it.

use super::corenlp::CoreNlpBackend;
use super::stanford::StanfordTaggerBackend;
use super::stanza::StanzaBackend;
use super::NerBackend;
use crate::config::{BackendKind, NerScrubConfig};
use crate::detection::{DetectorSettings, EntityDetector};
use crate::domain::Result;
use std::sync::Arc;

/// Create the backend selected by `config.detector.backend`
///
/// # Errors
///
/// Returns an error if the backend's configuration cannot be applied
/// (for example an unparseable CoreNLP URL).
pub fn create_backend(config: &NerScrubConfig) -> Result<Arc<dyn NerBackend>> {
    let backend: Arc<dyn NerBackend> = match config.detector.backend {
        BackendKind::CoreNlp => Arc::new(CoreNlpBackend::new(config.corenlp.clone())?),
        BackendKind::Stanford => Arc::new(StanfordTaggerBackend::new(config.stanford.clone())),
        BackendKind::Stanza => Arc::new(StanzaBackend::new(config.stanza.clone())),
    };

    if !backend.is_available() {
        tracing::warn!(
            backend = backend.name(),
            "Backend models or resources were not found"
        );
    }

    Ok(backend)
}

/// Detector settings described by the config
pub fn detector_settings(config: &NerScrubConfig) -> DetectorSettings {
    let detector = &config.detector;
    DetectorSettings {
        name: detector.name.clone(),
        enabled: detector.enabled,
        ignored_words: detector.ignored_words.clone(),
        merge: detector.merge.clone(),
        expand_occurrences: detector.expand_occurrences,
        locale: detector.locale.clone(),
    }
}

/// Create the configured backend and wrap it in a detector
pub fn create_detector(config: &NerScrubConfig) -> Result<EntityDetector> {
    let backend = create_backend(config)?;
    EntityDetector::new(backend, detector_settings(config))
}
