//! Stanford NER backend
//!
//! Runs the Stanford CRF classifier jar with the three-class English model.
//! The release must already be unpacked; see [`StanfordInstall`].

pub mod install;
pub mod tagger;

pub use install::StanfordInstall;
pub use tagger::StanfordTaggerBackend;
