//! NER backend integrations
//!
//! Each backend turns text into tagged tokens:
//!
//! - [`corenlp`] - CoreNLP server over HTTP
//! - [`stanford`] - Stanford NER jar run through Java
//! - [`stanza`] - Stanza pipeline run through Python
//!
//! Backends implement [`NerBackend`] and are interchangeable behind
//! `Arc<dyn NerBackend>`; [`factory`] picks one from configuration.
//!
//! ```rust,no_run
//! use nerscrub::adapters::corenlp::CoreNlpBackend;
//! use nerscrub::config::{secret_string, CoreNlpConfig};
//! use nerscrub::detection::{DetectorSettings, EntityDetector};
//! use std::sync::Arc;
//!
//! # async fn example() -> nerscrub::domain::Result<()> {
//! let config = CoreNlpConfig {
//!     url: "https://corenlp.internal:9000".to_string(),
//!     username: Some("nlp".to_string()),
//!     password: Some(secret_string("pass".to_string())),
//!     ..Default::default()
//! };
//!
//! let backend = Arc::new(CoreNlpBackend::new(config)?);
//! let detector = EntityDetector::new(backend, DetectorSettings::default())?;
//! let spans = detector.detect("Jane works at Acme.", None).await?;
//! # Ok(())
//! # }
//! ```

pub mod corenlp;
pub mod factory;
pub mod process;
pub mod stanford;
pub mod stanza;
pub mod traits;

pub use factory::{create_backend, create_detector};
pub use traits::NerBackend;
