//! Init command implementation
//!
//! Writes a commented sample configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "nerscrub.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(()) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Pick a backend in [detector] (corenlp, stanford, stanza)");
                println!("  2. Set NERSCRUB_CORENLP_PASSWORD in .env if the server needs auth");
                println!("  3. Validate: nerscrub validate-config --check-backend");
                println!("  4. Run: nerscrub detect -i notes.txt");
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

/// Sample configuration with every section and its defaults
pub fn sample_config() -> &'static str {
    r#"# nerscrub configuration
#
# Values may reference environment variables as ${VAR}.
# Any setting can also be overridden with NERSCRUB_<SECTION>_<KEY>,
# e.g. NERSCRUB_DETECTOR_BACKEND=stanza.

[application]
# trace, debug, info, warn, error
log_level = "info"

[detector]
# corenlp (HTTP server), stanford (local CRF classifier), stanza (python)
backend = "corenlp"
# name = "corenlp_ner"
ignored_words = ["tennant"]
expand_occurrences = false
locale = "en_US"
# placeholder ({{NAME}}) or numbered ({{NAME-1}})
redaction = "placeholder"

[detector.enabled]
person = true
organization = true
location = false

[detector.merge]
# Largest gap in bytes between merged tokens; leave unset for no limit
# max_gap = 1
whitespace_only = true

[corenlp]
url = "http://localhost:9000"
timeout_seconds = 60
# username = "nerscrub"
# password = "${NERSCRUB_CORENLP_PASSWORD}"

[corenlp.retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[stanford]
# install_dir = "/opt/stanford_ner"
version = "4.0.0"
java_bin = "java"
java_heap = "1000m"
timeout_seconds = 120

[stanza]
python_bin = "python3"
# command = ["my-tagger", "--json"]
# resources_dir = "/opt/stanza_resources"
timeout_seconds = 120

[audit]
enabled = false
log_path = "./audit/detections.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
# daily, hourly, never
local_rotation = "daily"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_str, BackendKind};
    use tempfile::tempdir;

    #[test]
    fn test_sample_config_loads() {
        let config = load_config_str(sample_config()).unwrap();
        assert_eq!(config.detector.backend, BackendKind::CoreNlp);
        assert!(config.detector.enabled.person);
        assert!(!config.detector.enabled.location);
        assert!(config.corenlp.password.is_none());
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nerscrub.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");

        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_OK);
        assert!(fs::read_to_string(&path).unwrap().contains("[detector]"));
    }
}
