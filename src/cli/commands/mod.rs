//! CLI command implementations

pub mod clean;
pub mod detect;
pub mod init;
pub mod validate;

use crate::config::{load_config, load_config_str, BackendKind, NerScrubConfig};
use crate::domain::Result;
use anyhow::Context;
use std::io::Read;
use std::path::Path;

/// Marker for reading from stdin
pub const STDIN: &str = "-";

/// Load the configuration for a command
///
/// A missing file falls back to defaults (plus env overrides), so the tool
/// works without running `init` first. A file that exists must be valid.
pub fn load_settings(config_path: &str) -> Result<NerScrubConfig> {
    if Path::new(config_path).exists() {
        load_config(config_path)
    } else {
        tracing::info!(
            config_path = %config_path,
            "Configuration file not found, using defaults"
        );
        load_config_str("")
    }
}

/// Apply a `--backend` override and re-validate
pub fn override_backend(config: &mut NerScrubConfig, backend: Option<BackendKind>) -> Result<()> {
    if let Some(backend) = backend {
        tracing::info!(backend = backend.as_str(), "Overriding backend from CLI");
        config.detector.backend = backend;
        config
            .validate()
            .map_err(crate::domain::NerScrubError::Configuration)?;
    }
    Ok(())
}

/// Read a document from a file, or stdin for `-`
pub fn read_input(input: &str) -> anyhow::Result<String> {
    if input == STDIN {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

/// Name used for a document in output and logs
pub fn document_name(input: &str, explicit: Option<&str>) -> Option<String> {
    match explicit {
        Some(name) => Some(name.to_string()),
        None if input == STDIN => None,
        None => Some(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_document_name() {
        assert_eq!(document_name("-", None), None);
        assert_eq!(document_name("a.txt", None).as_deref(), Some("a.txt"));
        assert_eq!(document_name("-", Some("memo")).as_deref(), Some("memo"));
    }

    #[test]
    fn test_read_input_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "Jane Smith").unwrap();

        let text = read_input(path.to_str().unwrap()).unwrap();
        assert_eq!(text, "Jane Smith");
        assert!(read_input(dir.path().join("missing.txt").to_str().unwrap()).is_err());
    }

    #[test]
    fn test_load_settings_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_settings(path.to_str().unwrap()).unwrap();
        assert!(config.detector.enabled.person);
    }

    #[test]
    fn test_override_backend() {
        let mut config = NerScrubConfig::default();
        override_backend(&mut config, Some(BackendKind::Stanza)).unwrap();
        assert_eq!(config.detector.backend, BackendKind::Stanza);

        override_backend(&mut config, None).unwrap();
        assert_eq!(config.detector.backend, BackendKind::Stanza);
    }
}
