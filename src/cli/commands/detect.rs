//! Detect command implementation
//!
//! Prints detected spans as JSON on stdout. With one input the output is the
//! span array; with several it is a batch report listing spans per document
//! and any documents that failed.

use super::{document_name, load_settings, override_backend, read_input, STDIN};
use crate::adapters::create_detector;
use crate::cli::{EXIT_CONFIG, EXIT_DETECTION, EXIT_OK};
use crate::config::BackendKind;
use crate::detection::{AuditLogger, EntityDetector};
use crate::domain::NerScrubError;
use clap::Args;
use std::time::Instant;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Input files, `-` for stdin
    #[arg(short, long = "input", default_value = STDIN)]
    pub inputs: Vec<String>,

    /// Document name for single-input runs
    #[arg(long)]
    pub document_name: Option<String>,

    /// Override the configured backend (corenlp, stanford, stanza)
    #[arg(long)]
    pub backend: Option<BackendKind>,

    /// Also report later occurrences of detected strings
    #[arg(long)]
    pub expand_occurrences: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_settings(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };
        if let Err(e) = override_backend(&mut config, self.backend) {
            eprintln!("Configuration error: {e}");
            return Ok(EXIT_CONFIG);
        }
        if self.expand_occurrences {
            config.detector.expand_occurrences = true;
        }

        let detector = match create_detector(&config) {
            Ok(detector) => detector,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };
        let audit = if config.audit.enabled {
            Some(AuditLogger::new(&config.audit)?)
        } else {
            None
        };

        tracing::info!(
            detector = detector.name(),
            inputs = self.inputs.len(),
            "Starting detection"
        );

        if self.inputs.len() == 1 {
            self.detect_single(&detector, audit.as_ref()).await
        } else {
            self.detect_batch(&detector, audit.as_ref()).await
        }
    }

    async fn detect_single(
        &self,
        detector: &EntityDetector,
        audit: Option<&AuditLogger>,
    ) -> anyhow::Result<i32> {
        let input = &self.inputs[0];
        let text = read_input(input)?;
        let name = document_name(input, self.document_name.as_deref());

        let started = Instant::now();
        match detector.detect(&text, name.as_deref()).await {
            Ok(spans) => {
                if let Some(audit) = audit {
                    audit.log_detections(
                        detector.name(),
                        name.as_deref(),
                        &spans,
                        started.elapsed().as_millis() as u64,
                    )?;
                }
                self.print(&spans)?;
                Ok(EXIT_OK)
            }
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn detect_batch(
        &self,
        detector: &EntityDetector,
        audit: Option<&AuditLogger>,
    ) -> anyhow::Result<i32> {
        let mut documents = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            documents.push((input.clone(), read_input(input)?));
        }

        let outcome = detector.detect_many(&documents).await;

        if let Some(audit) = audit {
            for document in &outcome.documents {
                audit.log_detections(
                    detector.name(),
                    Some(&document.document_name),
                    &document.spans,
                    0,
                )?;
            }
        }

        tracing::info!(
            documents = outcome.documents.len(),
            failures = outcome.failures.len(),
            spans = outcome.total_spans(),
            "Detection completed"
        );

        self.print(&outcome)?;
        Ok(if outcome.failures.is_empty() {
            EXIT_OK
        } else {
            EXIT_DETECTION
        })
    }

    fn print<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{json}");
        Ok(())
    }
}

/// Print a detection failure and pick the exit code
pub(crate) fn report_failure(error: &NerScrubError) -> i32 {
    eprintln!("Detection failed: {error}");
    match error {
        NerScrubError::Configuration(_) | NerScrubError::Validation(_) => EXIT_CONFIG,
        _ => EXIT_DETECTION,
    }
}
