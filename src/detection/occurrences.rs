//! Occurrence expansion
//!
//! A name recognised once is usually PII everywhere it appears, even where
//! the tagger missed it. This pass searches the whole document for every
//! distinct detected string and adds the positions the tagger did not report.

use crate::domain::{NerScrubError, PiiKind, PiiSpan, Result};
use regex::Regex;
use std::collections::HashSet;

/// Build the search pattern for a detected string
///
/// Whitespace runs match any whitespace run; word boundaries are only
/// required at edges that are word characters.
fn occurrence_pattern(needle: &str) -> Option<String> {
    let parts: Vec<String> = needle.split_whitespace().map(regex::escape).collect();
    if parts.is_empty() {
        return None;
    }

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::new();
    if needle.trim_start().starts_with(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&parts.join(r"\s+"));
    if needle.trim_end().ends_with(is_word) {
        pattern.push_str(r"\b");
    }
    Some(pattern)
}

/// Add every other occurrence of the detected strings in `text`
///
/// Extracted spans always win; a found occurrence is only added when it
/// overlaps nothing already kept. Among found occurrences, earlier and then
/// longer matches are preferred. The result is sorted by `start`.
pub fn expand_occurrences(text: &str, spans: Vec<PiiSpan>) -> Result<Vec<PiiSpan>> {
    let mut seen: HashSet<(PiiKind, String)> = HashSet::new();
    let mut found: Vec<PiiSpan> = Vec::new();

    for span in &spans {
        if !seen.insert((span.kind, span.text.clone())) {
            continue;
        }
        let Some(pattern) = occurrence_pattern(&span.text) else {
            continue;
        };
        let regex = Regex::new(&pattern).map_err(|e| {
            NerScrubError::Other(format!("Failed to build occurrence pattern: {e}"))
        })?;

        for matched in regex.find_iter(text) {
            let mut occurrence =
                PiiSpan::from_source(span.kind, text, matched.start(), matched.end());
            occurrence.detector_name = span.detector_name.clone();
            occurrence.document_name = span.document_name.clone();
            occurrence.locale = span.locale.clone();
            found.push(occurrence);
        }
    }

    found.sort_by(|a, b| a.start.cmp(&b.start).then(b.len().cmp(&a.len())));

    let mut kept = spans;
    for candidate in found {
        if kept.iter().any(|span| span.overlaps(&candidate)) {
            continue;
        }
        kept.push(candidate);
    }
    kept.sort_by_key(|span| span.start);

    tracing::debug!(spans = kept.len(), "Expanded entity occurrences");
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_boundaries() {
        assert_eq!(occurrence_pattern("New York").unwrap(), r"\bNew\s+York\b");
        assert_eq!(occurrence_pattern("London.").unwrap(), r"\bLondon\.");
        assert!(occurrence_pattern("   ").is_none());
    }

    #[test]
    fn test_finds_missed_occurrences() {
        let text = "Jane called. Later Jane left.";
        let spans = vec![PiiSpan::from_source(PiiKind::Name, text, 0, 4)];

        let expanded = expand_occurrences(text, spans).unwrap();

        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[1].start, 19);
        assert_eq!(expanded[1].text, "Jane");
    }

    #[test]
    fn test_whitespace_variants_match() {
        let text = "New York and New\nYork";
        let spans = vec![PiiSpan::from_source(PiiKind::Location, text, 0, 8)];

        let expanded = expand_occurrences(text, spans).unwrap();

        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[1].text, "New\nYork");
    }

    #[test]
    fn test_word_boundary_respected() {
        let text = "Ann visited Annapolis";
        let spans = vec![PiiSpan::from_source(PiiKind::Name, text, 0, 3)];

        let expanded = expand_occurrences(text, spans).unwrap();
        assert_eq!(expanded.len(), 1);
    }

    #[test]
    fn test_overlaps_are_dropped() {
        // "Jane Smith" and "Smith" both detected; the bare "Smith" inside
        // "Jane Smith" elsewhere must not overlap the longer match
        let text = "Jane Smith met Smith. Jane Smith again.";
        let spans = vec![
            PiiSpan::from_source(PiiKind::Name, text, 0, 10),
            PiiSpan::from_source(PiiKind::Name, text, 15, 20),
        ];

        let expanded = expand_occurrences(text, spans).unwrap();

        for pair in expanded.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(expanded.iter().any(|s| s.start == 22 && s.text == "Jane Smith"));
        assert_eq!(expanded.len(), 3);
    }

    #[test]
    fn test_metadata_copied() {
        let text = "Acme sued Acme";
        let spans = vec![PiiSpan::from_source(PiiKind::Organization, text, 0, 4)
            .with_metadata("stanza", Some("doc"), Some("en_US"))];

        let expanded = expand_occurrences(text, spans).unwrap();

        assert_eq!(expanded[1].detector_name, "stanza");
        assert_eq!(expanded[1].document_name.as_deref(), Some("doc"));
    }
}
