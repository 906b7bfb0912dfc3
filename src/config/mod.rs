//! Configuration management
//!
//! `nerscrub.toml` selects a tagging backend and tunes detection. Loading
//! supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `NERSCRUB_<SECTION>_<KEY>` overrides
//! - Defaults for every setting
//! - Validation of the active backend's section
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nerscrub::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("nerscrub.toml")?;
//! println!("Backend: {}", config.detector.backend.as_str());
//! println!("CoreNLP URL: {}", config.corenlp.url);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [detector]
//! backend = "corenlp"
//! ignored_words = ["tennant"]
//!
//! [detector.enabled]
//! person = true
//! organization = true
//! location = false
//!
//! [corenlp]
//! url = "http://localhost:9000"
//! username = "nlp"
//! password = "${CORENLP_PASSWORD}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, BackendKind, CoreNlpConfig, DetectorConfig, LoggingConfig,
    NerScrubConfig, RetryConfig, StanfordConfig, StanzaConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
