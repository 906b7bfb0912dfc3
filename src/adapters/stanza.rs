//! Stanza pipeline backend
//!
//! Stanza is Python only, so the pipeline runs in a child process. The
//! process reads the text on stdin and prints a JSON array of entities:
//!
//! ```json
//! [{"text": "Jane", "type": "PERSON", "start_char": 0, "end_char": 4}]
//! ```
//!
//! `start_char`/`end_char` are optional code point offsets. A custom
//! `stanza.command` can replace the bundled script as long as it speaks the
//! same protocol.

use super::process::run_process;
use super::NerBackend;
use crate::config::StanzaConfig;
use crate::detection::label_map::{LabelTable, STANZA_LABELS};
use crate::detection::offset::{OffsetMap, OffsetUnit};
use crate::domain::{BackendError, NerScrubError, Result, TaggedToken};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// Bundled pipeline script, run with `python -c`
///
/// Passing `download` as the first argument fetches the English models
/// before building the pipeline.
pub const PIPELINE_SCRIPT: &str = r#"
import json
import sys

import stanza

if "download" in sys.argv[1:]:
    stanza.download("en", verbose=False)

pipeline = stanza.Pipeline(lang="en", processors="tokenize,ner", download_method=None, verbose=False)
doc = pipeline(sys.stdin.read())
json.dump(
    [
        {"text": ent.text, "type": ent.type, "start_char": ent.start_char, "end_char": ent.end_char}
        for ent in doc.ents
    ],
    sys.stdout,
)
"#;

/// One entity reported by the pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct StanzaEntity {
    /// Entity text
    pub text: String,
    /// Entity type (`PERSON`, `ORG`, `LOC`, ...)
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Start code point offset
    #[serde(default)]
    pub start_char: Option<usize>,
    /// End code point offset
    #[serde(default)]
    pub end_char: Option<usize>,
}

/// Parse pipeline output into tokens with byte offsets into `text`
///
/// # Errors
///
/// Returns [`BackendError::InvalidResponse`] for malformed JSON or offsets
/// outside `text`.
pub fn parse_entities(output: &str, text: &str) -> Result<Vec<TaggedToken>> {
    let entities: Vec<StanzaEntity> = serde_json::from_str(output.trim()).map_err(|e| {
        NerScrubError::from(BackendError::InvalidResponse(format!(
            "Stanza returned invalid JSON: {e}"
        )))
    })?;

    let offsets = OffsetMap::new(text, OffsetUnit::Char);
    entities
        .into_iter()
        .map(|entity| -> Result<TaggedToken> {
            match (entity.start_char, entity.end_char) {
                (Some(begin), Some(end)) => {
                    let (start, end) = offsets.to_byte_range(begin, end).ok_or_else(|| {
                        BackendError::InvalidResponse(format!(
                            "entity {:?} has offsets {begin}..{end} outside the input",
                            entity.text
                        ))
                    })?;
                    Ok(TaggedToken::with_offsets(
                        entity.text,
                        entity.entity_type,
                        start,
                        end,
                    ))
                }
                _ => Ok(TaggedToken::new(entity.text, entity.entity_type)),
            }
        })
        .collect()
}

/// Backend running a Stanza NER pipeline
#[derive(Debug, Clone)]
pub struct StanzaBackend {
    config: StanzaConfig,
    resources_dir: PathBuf,
}

impl StanzaBackend {
    /// Create a backend from config
    pub fn new(config: StanzaConfig) -> Self {
        let resources_dir = config.resolved_resources_dir();
        Self {
            config,
            resources_dir,
        }
    }

    /// Resources directory the pipeline loads models from
    pub fn resources_dir(&self) -> &PathBuf {
        &self.resources_dir
    }

    /// Whether the English models are present
    pub fn models_downloaded(&self) -> bool {
        self.resources_dir.join("en").is_dir()
    }

    /// Command line for one pipeline run
    pub fn command(&self) -> Command {
        let mut command = match self.config.command {
            Some(ref custom) if !custom.is_empty() => {
                let mut command = Command::new(&custom[0]);
                command.args(&custom[1..]);
                command
            }
            _ => {
                let mut command = Command::new(&self.config.python_bin);
                command.arg("-c").arg(PIPELINE_SCRIPT);
                if !self.models_downloaded() {
                    command.arg("download");
                }
                command
            }
        };
        command.env("STANZA_RESOURCES_DIR", &self.resources_dir);
        command
    }

    fn program(&self) -> &str {
        match self.config.command {
            Some(ref custom) if !custom.is_empty() => &custom[0],
            _ => &self.config.python_bin,
        }
    }
}

#[async_trait]
impl NerBackend for StanzaBackend {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        if self.config.command.is_none() && !self.models_downloaded() {
            tracing::warn!(
                resources_dir = %self.resources_dir.display(),
                "Stanza English models not found, the pipeline will download them (about 210MB)"
            );
        }

        let output = run_process(
            self.command(),
            Some(text.as_bytes()),
            Duration::from_secs(self.config.timeout_seconds),
            self.program(),
        )
        .await?;

        parse_entities(&output, text)
    }

    fn name(&self) -> &'static str {
        "stanza"
    }

    fn label_table(&self) -> LabelTable {
        STANZA_LABELS
    }

    fn is_available(&self) -> bool {
        self.config.command.is_some() || self.models_downloaded()
    }
}
