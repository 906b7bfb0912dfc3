//! Clean command implementation
//!
//! Prints the input with every detected span replaced by a placeholder.

use super::detect::report_failure;
use super::{document_name, load_settings, override_backend, read_input, STDIN};
use crate::adapters::create_detector;
use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::BackendKind;
use crate::detection::{redact, AuditLogger, RedactionStrategy};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::time::Instant;

/// Replacement style
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// `{{NAME}}`
    Placeholder,
    /// `{{NAME-1}}`, stable per value
    Numbered,
}

impl From<StrategyArg> for RedactionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Placeholder => RedactionStrategy::Placeholder,
            StrategyArg::Numbered => RedactionStrategy::Numbered,
        }
    }
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Input file, `-` for stdin
    #[arg(short, long, default_value = STDIN)]
    pub input: String,

    /// Document name used in logs and the audit trail
    #[arg(long)]
    pub document_name: Option<String>,

    /// Override the configured backend (corenlp, stanford, stanza)
    #[arg(long)]
    pub backend: Option<BackendKind>,

    /// Override the configured replacement style
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

impl CleanArgs {
    /// Execute the clean command
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

        let detector = match create_detector(&config) {
            Ok(detector) => detector,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };
        let strategy = self
            .strategy
            .map(RedactionStrategy::from)
            .unwrap_or(config.detector.redaction);

        let text = read_input(&self.input)?;
        let name = document_name(&self.input, self.document_name.as_deref());

        let started = Instant::now();
        let spans = match detector.detect(&text, name.as_deref()).await {
            Ok(spans) => spans,
            Err(e) => return Ok(report_failure(&e)),
        };

        if config.audit.enabled {
            AuditLogger::new(&config.audit)?.log_detections(
                detector.name(),
                name.as_deref(),
                &spans,
                started.elapsed().as_millis() as u64,
            )?;
        }

        tracing::info!(
            detector = detector.name(),
            spans = spans.len(),
            strategy = ?strategy,
            "Redacting document"
        );

        let cleaned = redact(&text, &spans, strategy);
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(cleaned.as_bytes())?;
        stdout.flush()?;

        Ok(EXIT_OK)
    }
}
