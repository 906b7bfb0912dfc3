// nerscrub - NER-based PII detection and redaction
// Copyright (c) 2025 nerscrub Contributors
// Licensed under the MIT License

//! # nerscrub - NER-based PII detection
//!
//! nerscrub finds person names, organizations and locations in free text by
//! running a Stanford-family named-entity tagger and turning its per-token
//! labels into character spans over the original document.
//!
//! ## Overview
//!
//! Three taggers are supported behind one [`adapters::NerBackend`] trait:
//!
//! - **CoreNLP**: a running CoreNLP server, reached over HTTP
//! - **Stanford**: the Stanford NER CRF classifier, run as a local `java` process
//! - **Stanza**: the Stanza python pipeline, run as a local `python3` process
//!
//! Whatever the backend, spans are produced by the same
//! [`detection::SpanExtractor`]: adjacent tokens with the same kind are
//! merged, ignored words are dropped, and every span's `start..end` is a byte
//! range into the input, so `&text[span.start..span.end] == span.text`.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - Span extraction, label mapping, redaction and audit
//! - [`adapters`] - Tagger backends (CoreNLP, Stanford, Stanza)
//! - [`domain`] - Span and token types, errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nerscrub::adapters::create_detector;
//! use nerscrub::config::load_config;
//! use nerscrub::detection::{redact, RedactionStrategy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("nerscrub.toml")?;
//!     let detector = create_detector(&config)?;
//!
//!     let text = "Jane Smith works at Acme Corp.";
//!     let spans = detector.detect(text, Some("memo.txt")).await?;
//!
//!     println!("{}", redact(text, &spans, RedactionStrategy::Placeholder));
//!     Ok(())
//! }
//! ```
//!
//! ## Extracting spans from tagged tokens
//!
//! The extractor can be used without any backend when tokens come from
//! elsewhere:
//!
//! ```rust
//! use nerscrub::detection::label_map::CORENLP_LABELS;
//! use nerscrub::detection::{LabelMap, MergePolicy, SpanExtractor};
//! use nerscrub::domain::{PiiKind, TaggedToken};
//!
//! let text = "Jane Smith lives here";
//! let tokens = vec![
//!     TaggedToken::new("Jane", "PERSON"),
//!     TaggedToken::new("Smith", "PERSON"),
//!     TaggedToken::new("lives", "O"),
//!     TaggedToken::new("here", "O"),
//! ];
//! let labels = LabelMap::from_table(CORENLP_LABELS);
//! let spans = SpanExtractor::new(MergePolicy::default())
//!     .extract(text, &tokens, &labels)
//!     .unwrap();
//!
//! assert_eq!(spans.len(), 1);
//! assert_eq!(spans[0].kind, PiiKind::Name);
//! assert_eq!(spans[0].text, "Jane Smith");
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::NerScrubError`]; backend failures are
//! wrapped as [`domain::BackendError`] and token placement failures as
//! [`domain::OffsetRecoveryError`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod detection;
pub mod domain;
pub mod logging;
