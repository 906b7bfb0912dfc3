//! Configuration schema types
//!
//! Maps `nerscrub.toml` onto typed sections. Every section has defaults so a
//! minimal file only needs to pick a backend.

use crate::config::SecretString;
use crate::detection::{AuditConfig, EnabledKinds, MergePolicy, RedactionStrategy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tagging backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// CoreNLP server over HTTP
    #[default]
    CoreNlp,
    /// Stanford NER jar run through Java
    Stanford,
    /// Stanza pipeline run through Python
    Stanza,
}

impl BackendKind {
    /// Name used in config files and as the detector name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoreNlp => "corenlp",
            Self::Stanford => "stanford",
            Self::Stanza => "stanza",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "corenlp" => Ok(Self::CoreNlp),
            "stanford" => Ok(Self::Stanford),
            "stanza" => Ok(Self::Stanza),
            other => Err(format!(
                "Invalid backend '{other}'. Must be one of: corenlp, stanford, stanza"
            )),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NerScrubConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Detection settings shared by all backends
    #[serde(default)]
    pub detector: DetectorConfig,

    /// CoreNLP server backend
    #[serde(default)]
    pub corenlp: CoreNlpConfig,

    /// Stanford NER backend
    #[serde(default)]
    pub stanford: StanfordConfig,

    /// Stanza backend
    #[serde(default)]
    pub stanza: StanzaConfig,

    /// Detection audit trail
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NerScrubConfig {
    /// Validates the configuration
    ///
    /// Only the selected backend's section is checked, so unused sections
    /// may hold placeholders.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detector.validate()?;

        match self.detector.backend {
            BackendKind::CoreNlp => self.corenlp.validate()?,
            BackendKind::Stanford => self.stanford.validate()?,
            BackendKind::Stanza => self.stanza.validate()?,
        }

        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Backend to tag with
    #[serde(default)]
    pub backend: BackendKind,

    /// Detector name override
    #[serde(default)]
    pub name: Option<String>,

    /// Entity kinds to report
    #[serde(default)]
    pub enabled: EnabledKinds,

    /// Words never reported, compared case-insensitively
    #[serde(default = "default_ignored_words")]
    pub ignored_words: Vec<String>,

    /// Token merge policy
    #[serde(default)]
    pub merge: MergePolicy,

    /// Also flag later occurrences of detected strings
    #[serde(default)]
    pub expand_occurrences: bool,

    /// Locale of the scanned documents
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Replacement style used by `clean`
    #[serde(default)]
    pub redaction: RedactionStrategy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            name: None,
            enabled: EnabledKinds::default(),
            ignored_words: default_ignored_words(),
            merge: MergePolicy::default(),
            expand_occurrences: false,
            locale: default_locale(),
            redaction: RedactionStrategy::default(),
        }
    }
}

impl DetectorConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled.any() {
            return Err(
                "detector.enabled must enable at least one of person, organization, location"
                    .to_string(),
            );
        }

        if self.locale.trim().is_empty() {
            return Err("detector.locale cannot be empty".to_string());
        }

        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err("detector.name cannot be empty when set".to_string());
            }
        }

        Ok(())
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("retry.max_retries must be > 0".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err("retry.initial_delay_ms cannot exceed retry.max_delay_ms".to_string());
        }
        Ok(())
    }
}

/// CoreNLP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreNlpConfig {
    /// Server URL
    #[serde(default = "default_corenlp_url")]
    pub url: String,

    /// Username for basic authentication (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_corenlp_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for CoreNlpConfig {
    fn default() -> Self {
        Self {
            url: default_corenlp_url(),
            username: None,
            password: None,
            timeout_seconds: default_corenlp_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

impl CoreNlpConfig {
    fn validate(&self) -> Result<(), String> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| format!("corenlp.url '{}' is not a valid URL: {e}", self.url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err("corenlp.url must start with http:// or https://".to_string());
        }

        if self.password.is_some() && self.username.is_none() {
            return Err("corenlp.username is required when corenlp.password is set".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("corenlp.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()?;
        Ok(())
    }
}

/// Stanford NER configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StanfordConfig {
    /// Directory holding `stanford-ner-{version}`; defaults to
    /// `~/.scrubadub/stanford_ner`
    #[serde(default)]
    pub install_dir: Option<PathBuf>,

    /// Stanford NER release
    #[serde(default = "default_stanford_version")]
    pub version: String,

    /// Java executable
    #[serde(default = "default_java_bin")]
    pub java_bin: String,

    /// Maximum Java heap, passed as `-mx`
    #[serde(default = "default_java_heap")]
    pub java_heap: String,

    /// Tagger timeout in seconds
    #[serde(default = "default_subprocess_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for StanfordConfig {
    fn default() -> Self {
        Self {
            install_dir: None,
            version: default_stanford_version(),
            java_bin: default_java_bin(),
            java_heap: default_java_heap(),
            timeout_seconds: default_subprocess_timeout_seconds(),
        }
    }
}

impl StanfordConfig {
    /// Installation directory with the default applied
    pub fn resolved_install_dir(&self) -> PathBuf {
        self.install_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".scrubadub").join("stanford_ner"))
    }

    fn validate(&self) -> Result<(), String> {
        if self.version.trim().is_empty() {
            return Err("stanford.version cannot be empty".to_string());
        }
        if self.java_bin.trim().is_empty() {
            return Err("stanford.java_bin cannot be empty".to_string());
        }
        let heap_ok = self
            .java_heap
            .strip_suffix(['m', 'M', 'g', 'G', 'k', 'K'])
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));
        if !heap_ok {
            return Err(format!(
                "Invalid stanford.java_heap '{}'. Expected a size such as 1000m or 2g",
                self.java_heap
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("stanford.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Stanza configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StanzaConfig {
    /// Python interpreter used with the bundled pipeline script
    #[serde(default = "default_python_bin")]
    pub python_bin: String,

    /// Full command replacing the bundled script; receives text on stdin and
    /// prints the entity JSON array
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Stanza resources directory; defaults to `STANZA_RESOURCES_DIR` or
    /// `~/stanza_resources`
    #[serde(default)]
    pub resources_dir: Option<PathBuf>,

    /// Pipeline timeout in seconds
    #[serde(default = "default_subprocess_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for StanzaConfig {
    fn default() -> Self {
        Self {
            python_bin: default_python_bin(),
            command: None,
            resources_dir: None,
            timeout_seconds: default_subprocess_timeout_seconds(),
        }
    }
}

impl StanzaConfig {
    /// Resources directory with env and default applied
    pub fn resolved_resources_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.resources_dir {
            return dir.clone();
        }
        match std::env::var_os("STANZA_RESOURCES_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => home_dir().join("stanza_resources"),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self.command {
            Some(ref command) if command.is_empty() || command[0].trim().is_empty() => {
                return Err("stanza.command must name an executable".to_string());
            }
            Some(_) => {}
            None if self.python_bin.trim().is_empty() => {
                return Err("stanza.python_bin cannot be empty".to_string());
            }
            None => {}
        }
        if self.timeout_seconds == 0 {
            return Err("stanza.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".into());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// Current user's home directory, `.` when it cannot be determined
pub(crate) fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_ignored_words() -> Vec<String> {
    crate::detection::detector::default_ignored_words()
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_corenlp_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_corenlp_timeout_seconds() -> u64 {
    60
}

fn default_stanford_version() -> String {
    "4.0.0".to_string()
}

fn default_java_bin() -> String {
    "java".to_string()
}

fn default_java_heap() -> String {
    "1000m".to_string()
}

fn default_python_bin() -> String {
    "python3".to_string()
}

fn default_subprocess_timeout_seconds() -> u64 {
    120
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
