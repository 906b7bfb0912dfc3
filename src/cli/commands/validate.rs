//! Validate config command implementation

use crate::adapters::corenlp::CoreNlpBackend;
use crate::adapters::create_backend;
use crate::cli::{EXIT_CONFIG, EXIT_DETECTION, EXIT_OK};
use crate::config::{load_config, BackendKind, NerScrubConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also check that the selected backend is installed or reachable
    #[arg(long)]
    pub check_backend: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");

        let config = match load_config(config_path) {
            Ok(config) => {
                println!("  Configuration is valid");
                config
            }
            Err(e) => {
                println!("  Configuration is invalid");
                println!("  Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        print_summary(&config);

        if self.check_backend {
            return Ok(check_backend(&config).await);
        }
        Ok(EXIT_OK)
    }
}

fn print_summary(config: &NerScrubConfig) {
    let detector = &config.detector;
    println!();
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Backend: {}", detector.backend.as_str());
    println!(
        "  Kinds: person={} organization={} location={}",
        detector.enabled.person, detector.enabled.organization, detector.enabled.location
    );
    println!("  Ignored Words: {}", detector.ignored_words.len());
    println!("  Locale: {}", detector.locale);
    println!("  Expand Occurrences: {}", detector.expand_occurrences);

    match detector.backend {
        BackendKind::CoreNlp => {
            println!("  CoreNLP URL: {}", config.corenlp.url);
            println!(
                "  CoreNLP Auth: {}",
                if config.corenlp.username.is_some() {
                    "basic"
                } else {
                    "none"
                }
            );
        }
        BackendKind::Stanford => {
            println!(
                "  Stanford Install: {}",
                config.stanford.resolved_install_dir().display()
            );
            println!("  Stanford Version: {}", config.stanford.version);
        }
        BackendKind::Stanza => {
            println!(
                "  Stanza Resources: {}",
                config.stanza.resolved_resources_dir().display()
            );
        }
    }
    println!("  Audit: {}", config.audit.enabled);
}

async fn check_backend(config: &NerScrubConfig) -> i32 {
    println!();
    if config.detector.backend == BackendKind::CoreNlp {
        let result = match CoreNlpBackend::new(config.corenlp.clone()) {
            Ok(backend) => backend.health_check().await,
            Err(e) => Err(e),
        };
        return match result {
            Ok(()) => {
                println!("  CoreNLP server is ready");
                EXIT_OK
            }
            Err(e) => {
                println!("  CoreNLP server is not ready: {e}");
                EXIT_DETECTION
            }
        };
    }

    match create_backend(config) {
        Ok(backend) if backend.is_available() => {
            println!("  {} models found", backend.name());
            EXIT_OK
        }
        Ok(backend) => {
            println!("  {} models not found", backend.name());
            EXIT_DETECTION
        }
        Err(e) => {
            println!("  Backend could not be created: {e}");
            EXIT_CONFIG
        }
    }
}
