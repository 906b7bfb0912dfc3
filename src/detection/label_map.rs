//! Backend label tables
//!
//! Each backend speaks its own label vocabulary. The tables below are the
//! static mapping from that vocabulary to [`PiiKind`]; adding a backend means
//! adding a table here, never touching the extractor.

use crate::domain::{PiiKind, NON_ENTITY_LABEL};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static label table: `(backend label, canonical kind)`
pub type LabelTable = &'static [(&'static str, PiiKind)];

/// Stanford CRF tagger, 3-class English model (`english.all.3class.distsim`)
pub const STANFORD_3CLASS_LABELS: LabelTable = &[
    ("PERSON", PiiKind::Name),
    ("ORGANIZATION", PiiKind::Organization),
    ("LOCATION", PiiKind::Location),
];

/// CoreNLP server with fine-grained NER disabled
pub const CORENLP_LABELS: LabelTable = &[
    ("PERSON", PiiKind::Name),
    ("ORGANIZATION", PiiKind::Organization),
    ("LOCATION", PiiKind::Location),
];

/// Stanza English NER (OntoNotes-style short labels)
pub const STANZA_LABELS: LabelTable = &[
    ("PERSON", PiiKind::Name),
    ("ORG", PiiKind::Organization),
    ("LOC", PiiKind::Location),
];

/// Which PII kinds a detector reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledKinds {
    /// Report person names
    #[serde(default = "default_true")]
    pub person: bool,
    /// Report organization names
    #[serde(default = "default_true")]
    pub organization: bool,
    /// Report locations
    #[serde(default)]
    pub location: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EnabledKinds {
    fn default() -> Self {
        Self {
            person: true,
            organization: true,
            location: false,
        }
    }
}

impl EnabledKinds {
    /// Every kind enabled
    pub fn all() -> Self {
        Self {
            person: true,
            organization: true,
            location: true,
        }
    }

    /// Whether `kind` is reported
    pub fn allows(&self, kind: PiiKind) -> bool {
        match kind {
            PiiKind::Name => self.person,
            PiiKind::Organization => self.organization,
            PiiKind::Location => self.location,
        }
    }

    /// Whether at least one kind is reported
    pub fn any(&self) -> bool {
        self.person || self.organization || self.location
    }
}

/// Lookup from backend label to canonical kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: HashMap<String, PiiKind>,
}

impl LabelMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map holding every entry of `table`
    pub fn from_table(table: LabelTable) -> Self {
        table
            .iter()
            .map(|(label, kind)| (label.to_string(), *kind))
            .collect()
    }

    /// Build a map holding only the entries whose kind is enabled
    pub fn filtered(table: LabelTable, enabled: &EnabledKinds) -> Self {
        table
            .iter()
            .filter(|(_, kind)| enabled.allows(*kind))
            .map(|(label, kind)| (label.to_string(), *kind))
            .collect()
    }

    /// Add or replace an entry
    pub fn insert(&mut self, label: impl Into<String>, kind: PiiKind) {
        self.entries.insert(label.into(), kind);
    }

    /// Canonical kind for `label`, `None` for unknown labels and the sentinel
    pub fn kind_of(&self, label: &str) -> Option<PiiKind> {
        if label == NON_ENTITY_LABEL {
            return None;
        }
        self.entries.get(label).copied()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels that map to `kind`
    pub fn labels_for(&self, kind: PiiKind) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(label, _)| label.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }
}

impl FromIterator<(String, PiiKind)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (String, PiiKind)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enabled_kinds() {
        let enabled = EnabledKinds::default();
        assert!(enabled.allows(PiiKind::Name));
        assert!(enabled.allows(PiiKind::Organization));
        assert!(!enabled.allows(PiiKind::Location));
    }

    #[test]
    fn test_filtered_map() {
        let map = LabelMap::filtered(STANZA_LABELS, &EnabledKinds::default());
        assert_eq!(map.kind_of("PERSON"), Some(PiiKind::Name));
        assert_eq!(map.kind_of("ORG"), Some(PiiKind::Organization));
        assert_eq!(map.kind_of("LOC"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_sentinel_never_maps() {
        let mut map = LabelMap::from_table(CORENLP_LABELS);
        map.insert(NON_ENTITY_LABEL, PiiKind::Name);
        assert_eq!(map.kind_of("O"), None);
    }

    #[test]
    fn test_labels_for_kind() {
        let map = LabelMap::from_table(STANFORD_3CLASS_LABELS);
        assert_eq!(map.labels_for(PiiKind::Location), vec!["LOCATION"]);
    }

    #[test]
    fn test_enabled_kinds_from_toml() {
        let enabled: EnabledKinds = toml::from_str("location = true").unwrap();
        assert!(enabled.person);
        assert!(enabled.organization);
        assert!(enabled.location);
    }
}
