//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::NerScrubConfig;
use super::secret::secret_string;
use crate::domain::errors::NerScrubError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// Steps, in order:
/// 1. Read the file
/// 2. Substitute `${VAR}` placeholders from the environment
/// 3. Parse TOML into [`NerScrubConfig`]
/// 4. Apply `NERSCRUB_<SECTION>_<KEY>` overrides
/// 5. Validate
///
/// # Errors
///
/// Returns [`NerScrubError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails, or validation
/// rejects a value.
///
/// # Examples
///
/// ```no_run
/// use nerscrub::config::loader::load_config;
///
/// let config = load_config("nerscrub.toml").expect("Failed to load config");
/// println!("backend: {}", config.detector.backend.as_str());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NerScrubConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(NerScrubError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        NerScrubError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] without the file read.
pub fn load_config_str(contents: &str) -> Result<NerScrubConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: NerScrubConfig = toml::from_str(&contents)
        .map_err(|e| NerScrubError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        NerScrubError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| NerScrubError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(NerScrubError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("NERSCRUB_{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        NerScrubError::Configuration(format!(
            "Invalid value '{value}' for environment override NERSCRUB_{key}"
        ))
    })
}

/// Applies `NERSCRUB_<SECTION>_<KEY>` environment overrides
///
/// For example `NERSCRUB_DETECTOR_BACKEND=stanza` or
/// `NERSCRUB_CORENLP_PASSWORD=...`. Unparseable values are an error rather
/// than silently ignored.
fn apply_env_overrides(config: &mut NerScrubConfig) -> Result<()> {
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Detector
    if let Some(val) = env_override("DETECTOR_BACKEND") {
        config.detector.backend = val.parse().map_err(NerScrubError::Configuration)?;
    }
    if let Some(val) = env_override("DETECTOR_LOCALE") {
        config.detector.locale = val;
    }
    if let Some(val) = env_override("DETECTOR_ENABLE_PERSON") {
        config.detector.enabled.person = parse_override("DETECTOR_ENABLE_PERSON", &val)?;
    }
    if let Some(val) = env_override("DETECTOR_ENABLE_ORGANIZATION") {
        config.detector.enabled.organization =
            parse_override("DETECTOR_ENABLE_ORGANIZATION", &val)?;
    }
    if let Some(val) = env_override("DETECTOR_ENABLE_LOCATION") {
        config.detector.enabled.location = parse_override("DETECTOR_ENABLE_LOCATION", &val)?;
    }
    if let Some(val) = env_override("DETECTOR_EXPAND_OCCURRENCES") {
        config.detector.expand_occurrences =
            parse_override("DETECTOR_EXPAND_OCCURRENCES", &val)?;
    }

    // CoreNLP
    if let Some(val) = env_override("CORENLP_URL") {
        config.corenlp.url = val;
    }
    if let Some(val) = env_override("CORENLP_USERNAME") {
        config.corenlp.username = Some(val);
    }
    if let Some(val) = env_override("CORENLP_PASSWORD") {
        config.corenlp.password = Some(secret_string(val));
    }
    if let Some(val) = env_override("CORENLP_TIMEOUT_SECONDS") {
        config.corenlp.timeout_seconds = parse_override("CORENLP_TIMEOUT_SECONDS", &val)?;
    }

    // Stanford
    if let Some(val) = env_override("STANFORD_INSTALL_DIR") {
        config.stanford.install_dir = Some(PathBuf::from(val));
    }
    if let Some(val) = env_override("STANFORD_JAVA_BIN") {
        config.stanford.java_bin = val;
    }
    if let Some(val) = env_override("STANFORD_JAVA_HEAP") {
        config.stanford.java_heap = val;
    }

    // Stanza
    if let Some(val) = env_override("STANZA_PYTHON_BIN") {
        config.stanza.python_bin = val;
    }
    if let Some(val) = env_override("STANZA_RESOURCES_DIR") {
        config.stanza.resources_dir = Some(PathBuf::from(val));
    }

    // Audit
    if let Some(val) = env_override("AUDIT_ENABLED") {
        config.audit.enabled = parse_override("AUDIT_ENABLED", &val)?;
    }
    if let Some(val) = env_override("AUDIT_LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }

    // Logging
    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("NERSCRUB_TEST_SUB_VAR", "test_value");
        let input = "password = \"${NERSCRUB_TEST_SUB_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("NERSCRUB_TEST_SUB_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("NERSCRUB_TEST_MISSING_VAR");
        let input = "password = \"${NERSCRUB_TEST_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("NERSCRUB_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# password = \"${NERSCRUB_TEST_COMMENTED_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${NERSCRUB_TEST_COMMENTED_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-nerscrub.toml");
        assert!(matches!(result, Err(NerScrubError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[detector]
backend = "stanza"
ignored_words = ["tennant", "Sir"]

[detector.enabled]
location = true

[stanza]
python_bin = "python3.11"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.detector.backend, BackendKind::Stanza);
        assert!(config.detector.enabled.location);
        assert!(config.detector.enabled.person);
        assert_eq!(config.stanza.python_bin, "python3.11");
        assert_eq!(config.detector.ignored_words.len(), 2);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let result = load_config_str("[application]\nlog_level = \"chatty\"\n");
        assert!(matches!(result, Err(NerScrubError::Configuration(_))));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_str("").unwrap();
        assert_eq!(config.detector.backend, BackendKind::CoreNlp);
        assert_eq!(config.corenlp.url, "http://localhost:9000");
        assert_eq!(config.detector.ignored_words, vec!["tennant".to_string()]);
    }
}
