//! CoreNLP server backend

pub mod client;
pub mod models;

pub use client::CoreNlpBackend;
pub use models::{CoreNlpDocument, CoreNlpSentence, CoreNlpToken};
