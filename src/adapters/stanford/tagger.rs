//! Stanford CRF NER tagger run through Java

use super::install::StanfordInstall;
use crate::adapters::process::run_process;
use crate::adapters::NerBackend;
use crate::config::StanfordConfig;
use crate::detection::label_map::{LabelTable, STANFORD_3CLASS_LABELS};
use crate::domain::{BackendError, NerScrubError, Result, TaggedToken};
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

const CLASSIFIER_MAIN: &str = "edu.stanford.nlp.ie.crf.CRFClassifier";
const WHITESPACE_TOKENIZER: &str = "edu.stanford.nlp.process.WhitespaceTokenizer";

/// Split `text` into word tokens
///
/// Whitespace separates tokens, and punctuation at either end of a chunk
/// becomes its own token so that `London.` tags as `London` and `.`.
/// Every token is a slice of `text`, in order.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();

    for chunk in text.split_whitespace() {
        let core_start = chunk
            .char_indices()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, _)| i);
        let Some(core_start) = core_start else {
            tokens.extend(punctuation(chunk));
            continue;
        };
        let core_end = chunk
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(chunk.len());

        tokens.extend(punctuation(&chunk[..core_start]));
        tokens.push(&chunk[core_start..core_end]);
        tokens.extend(punctuation(&chunk[core_end..]));
    }

    tokens
}

fn punctuation(s: &str) -> impl Iterator<Item = &str> {
    s.char_indices().map(move |(i, c)| &s[i..i + c.len_utf8()])
}

/// Parse `slashTags` output into tokens
///
/// Each whitespace-separated item is `word/TAG`; the tag follows the last
/// slash so words containing slashes survive.
///
/// # Errors
///
/// Returns [`BackendError::InvalidResponse`] for an item without a tag.
pub fn parse_slash_tags(output: &str) -> Result<Vec<TaggedToken>> {
    output
        .split_whitespace()
        .map(|item| match item.rsplit_once('/') {
            Some((word, tag)) if !word.is_empty() && !tag.is_empty() => {
                Ok(TaggedToken::new(word, tag))
            }
            _ => Err(NerScrubError::from(BackendError::InvalidResponse(format!(
                "Malformed slashTags item {item:?}"
            )))),
        })
        .collect()
}

/// Backend running the Stanford three-class English model
pub struct StanfordTaggerBackend {
    install: StanfordInstall,
    config: StanfordConfig,
}

impl StanfordTaggerBackend {
    /// Create a backend from config
    ///
    /// The installation is checked when tagging, not here.
    pub fn new(config: StanfordConfig) -> Self {
        Self {
            install: StanfordInstall::from_config(&config),
            config,
        }
    }

    /// Installation layout in use
    pub fn install(&self) -> &StanfordInstall {
        &self.install
    }

    /// Java command line for classifying `text_file`
    pub fn command(&self, text_file: &Path) -> Command {
        let mut command = Command::new(&self.config.java_bin);
        command
            .arg(format!("-mx{}", self.config.java_heap))
            .arg("-cp")
            .arg(self.install.jar_path())
            .arg(CLASSIFIER_MAIN)
            .arg("-loadClassifier")
            .arg(self.install.classifier_path())
            .arg("-textFile")
            .arg(text_file)
            .args(["-outputFormat", "slashTags"])
            .args(["-tokenizerFactory", WHITESPACE_TOKENIZER])
            .args(["-tokenizerOptions", "tokenizeNLs=false"])
            .args(["-nthreads", "1"])
            .arg("-encoding")
            .arg("utf8");
        command
    }
}

#[async_trait]
impl NerBackend for StanfordTaggerBackend {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        self.install.verify()?;

        let words = tokenize(text);
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let mut input = tempfile::NamedTempFile::new()?;
        input.write_all(words.join(" ").as_bytes())?;
        input.flush()?;

        let output = run_process(
            self.command(input.path()),
            None,
            Duration::from_secs(self.config.timeout_seconds),
            "java",
        )
        .await?;

        let mut tokens = parse_slash_tags(&output)?;

        // The tagger may escape brackets and quotes; when the counts line up
        // the original words are restored so they can be found in `text`.
        if tokens.len() == words.len() {
            for (token, word) in tokens.iter_mut().zip(&words) {
                token.text = (*word).to_string();
            }
        } else {
            tracing::warn!(
                expected = words.len(),
                received = tokens.len(),
                "Stanford tagger token count differs from input"
            );
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "stanford"
    }

    fn label_table(&self) -> LabelTable {
        STANFORD_3CLASS_LABELS
    }

    fn is_available(&self) -> bool {
        self.install.is_installed()
    }
}
