//! Stanford NER installation layout

use crate::config::StanfordConfig;
use crate::domain::{BackendError, Result};
use std::path::{Path, PathBuf};

/// Release archive URL, `{version}` is substituted
pub const DOWNLOAD_URL: &str = "https://nlp.stanford.edu/software/stanford-ner-{version}.zip";

/// Files of an unpacked Stanford NER release
///
/// ```text
/// <root>/stanford-ner-<version>/stanford-ner.jar
/// <root>/stanford-ner-<version>/classifiers/english.all.3class.distsim.crf.ser.gz
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StanfordInstall {
    root: PathBuf,
    version: String,
}

impl StanfordInstall {
    /// Layout under `root` for `version`
    pub fn new(root: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            version: version.into(),
        }
    }

    /// Layout described by the config
    pub fn from_config(config: &StanfordConfig) -> Self {
        Self::new(config.resolved_install_dir(), config.version.clone())
    }

    /// Installation root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Release directory
    pub fn package_dir(&self) -> PathBuf {
        self.root.join(format!("stanford-ner-{}", self.version))
    }

    /// Three-class English CRF model
    pub fn classifier_path(&self) -> PathBuf {
        self.package_dir()
            .join("classifiers")
            .join("english.all.3class.distsim.crf.ser.gz")
    }

    /// Tagger jar
    pub fn jar_path(&self) -> PathBuf {
        self.package_dir().join("stanford-ner.jar")
    }

    /// Where the release can be downloaded from
    pub fn download_url(&self) -> String {
        DOWNLOAD_URL.replace("{version}", &self.version)
    }

    /// Required files that do not exist
    pub fn missing_files(&self) -> Vec<PathBuf> {
        [self.classifier_path(), self.jar_path()]
            .into_iter()
            .filter(|path| !path.is_file())
            .collect()
    }

    /// Whether every required file exists
    pub fn is_installed(&self) -> bool {
        self.missing_files().is_empty()
    }

    /// Fail with [`BackendError::ModelUnavailable`] unless installed
    pub fn verify(&self) -> Result<()> {
        let missing = self.missing_files();
        if missing.is_empty() {
            return Ok(());
        }

        let listed: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        Err(BackendError::ModelUnavailable(format!(
            "Stanford NER {} is not installed, missing: {}. Download {} and unpack it into {}",
            self.version,
            listed.join(", "),
            self.download_url(),
            self.root.display()
        ))
        .into())
    }
}
