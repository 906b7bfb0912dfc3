//! Span redaction strategies
//!
//! Replaces detected spans in the source text. Two strategies are provided:
//! a fixed placeholder per kind (`{{NAME}}`) and a numbered placeholder that
//! stays stable for repeated values within one text (`{{NAME-1}}`).

use crate::domain::{PiiKind, PiiSpan};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Redaction strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionStrategy {
    /// Replace with `{{KIND}}`
    #[default]
    Placeholder,
    /// Replace with `{{KIND-N}}`, same N for the same value
    Numbered,
}

/// Produces the replacement for a span
pub trait Redactor {
    /// Replacement text for `span`
    fn replacement(&mut self, span: &PiiSpan) -> String;
}

/// `{{KIND}}` placeholders
#[derive(Debug, Default)]
pub struct PlaceholderRedactor;

impl Redactor for PlaceholderRedactor {
    fn replacement(&mut self, span: &PiiSpan) -> String {
        format!("{{{{{}}}}}", span.kind.label())
    }
}

/// `{{KIND-N}}` placeholders, numbered per kind in order of first appearance
#[derive(Debug, Default)]
pub struct NumberedRedactor {
    counters: HashMap<PiiKind, usize>,
    assigned: HashMap<(PiiKind, String), usize>,
}

impl NumberedRedactor {
    /// Create a redactor with fresh counters
    pub fn new() -> Self {
        Self::default()
    }
}

impl Redactor for NumberedRedactor {
    fn replacement(&mut self, span: &PiiSpan) -> String {
        let key = (span.kind, span.text.split_whitespace().collect::<Vec<_>>().join(" "));
        let number = match self.assigned.get(&key) {
            Some(number) => *number,
            None => {
                let counter = self.counters.entry(span.kind).or_insert(0);
                *counter += 1;
                self.assigned.insert(key, *counter);
                *counter
            }
        };
        format!("{{{{{}-{}}}}}", span.kind.label(), number)
    }
}

/// Replace every span in `text` using `strategy`
///
/// Spans must come from the same text. Overlapping spans (which the
/// extractor never produces) are skipped after the first.
pub fn redact(text: &str, spans: &[PiiSpan], strategy: RedactionStrategy) -> String {
    match strategy {
        RedactionStrategy::Placeholder => redact_with(text, spans, &mut PlaceholderRedactor),
        RedactionStrategy::Numbered => redact_with(text, spans, &mut NumberedRedactor::new()),
    }
}

/// Replace every span in `text` using a custom [`Redactor`]
pub fn redact_with(text: &str, spans: &[PiiSpan], redactor: &mut dyn Redactor) -> String {
    let mut ordered: Vec<&PiiSpan> = spans.iter().collect();
    ordered.sort_by_key(|span| span.start);

    let mut output = String::with_capacity(text.len());
    let mut position = 0;

    for span in ordered {
        if span.start < position || span.end > text.len() {
            continue;
        }
        output.push_str(&text[position..span.start]);
        output.push_str(&redactor.replacement(span));
        position = span.end;
    }
    output.push_str(&text[position..]);
    output
}
