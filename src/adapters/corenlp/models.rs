//! CoreNLP server response models

use crate::detection::offset::{OffsetMap, OffsetUnit};
use crate::domain::{BackendError, Result, TaggedToken, NON_ENTITY_LABEL};
use serde::Deserialize;

/// Annotated document returned with `outputFormat=json`
#[derive(Debug, Clone, Deserialize)]
pub struct CoreNlpDocument {
    /// Sentences in document order
    #[serde(default)]
    pub sentences: Vec<CoreNlpSentence>,
}

/// One sentence
#[derive(Debug, Clone, Deserialize)]
pub struct CoreNlpSentence {
    /// Tokens in sentence order
    #[serde(default)]
    pub tokens: Vec<CoreNlpToken>,
}

/// One token
///
/// Character offsets count UTF-16 code units, as the server is written in
/// Java.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreNlpToken {
    /// Normalised token (`-LRB-` for `(` and similar)
    pub word: String,
    /// Token exactly as it appears in the input
    #[serde(default)]
    pub original_text: Option<String>,
    /// Coarse NER label
    #[serde(default)]
    pub ner: Option<String>,
    /// Start offset
    #[serde(default)]
    pub character_offset_begin: Option<usize>,
    /// End offset
    #[serde(default)]
    pub character_offset_end: Option<usize>,
}

impl CoreNlpDocument {
    /// Convert to tagged tokens with byte offsets into `text`
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidResponse`] when an offset does not land
    /// on a character of `text`.
    pub fn into_tagged_tokens(self, text: &str) -> Result<Vec<TaggedToken>> {
        let offsets = OffsetMap::new(text, OffsetUnit::Utf16);
        let mut tokens = Vec::new();

        for token in self.sentences.into_iter().flat_map(|s| s.tokens) {
            let label = token
                .ner
                .unwrap_or_else(|| NON_ENTITY_LABEL.to_string());
            let surface = token.original_text.unwrap_or(token.word);

            let tagged = match (token.character_offset_begin, token.character_offset_end) {
                (Some(begin), Some(end)) => {
                    let (start, end) = offsets.to_byte_range(begin, end).ok_or_else(|| {
                        BackendError::InvalidResponse(format!(
                            "token {surface:?} has offsets {begin}..{end} outside the input"
                        ))
                    })?;
                    TaggedToken::with_offsets(surface, label, start, end)
                }
                _ => TaggedToken::new(surface, label),
            };
            tokens.push(tagged);
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "sentences": [{
            "index": 0,
            "tokens": [
                {"index": 1, "word": "Jane", "originalText": "Jane", "ner": "PERSON",
                 "characterOffsetBegin": 0, "characterOffsetEnd": 4},
                {"index": 2, "word": "-LRB-", "originalText": "(", "ner": "O",
                 "characterOffsetBegin": 5, "characterOffsetEnd": 6},
                {"index": 3, "word": "Acme", "originalText": "Acme", "ner": "ORGANIZATION",
                 "characterOffsetBegin": 6, "characterOffsetEnd": 10},
                {"index": 4, "word": "-RRB-", "originalText": ")", "ner": "O",
                 "characterOffsetBegin": 10, "characterOffsetEnd": 11}
            ]
        }]
    }"#;

    #[test]
    fn test_parse_tokens() {
        let doc: CoreNlpDocument = serde_json::from_str(RESPONSE).unwrap();
        let tokens = doc.into_tagged_tokens("Jane (Acme)").unwrap();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], TaggedToken::with_offsets("Jane", "PERSON", 0, 4));
        assert_eq!(tokens[1].text, "(");
        assert_eq!(tokens[2].offsets(), Some((6, 10)));
    }

    #[test]
    fn test_utf16_offsets_converted() {
        // "Zoë" after an emoji: UTF-16 offsets 3..6, bytes 5..9
        let json = r#"{"sentences":[{"tokens":[
            {"word":"😀","ner":"O","characterOffsetBegin":0,"characterOffsetEnd":2},
            {"word":"Zoë","ner":"PERSON","characterOffsetBegin":3,"characterOffsetEnd":6}
        ]}]}"#;
        let text = "😀 Zoë";
        let doc: CoreNlpDocument = serde_json::from_str(json).unwrap();
        let tokens = doc.into_tagged_tokens(text).unwrap();

        let (start, end) = tokens[1].offsets().unwrap();
        assert_eq!(&text[start..end], "Zoë");
    }

    #[test]
    fn test_missing_ner_defaults_to_outside() {
        let json = r#"{"sentences":[{"tokens":[{"word":"hello"}]}]}"#;
        let doc: CoreNlpDocument = serde_json::from_str(json).unwrap();
        let tokens = doc.into_tagged_tokens("hello").unwrap();

        assert_eq!(tokens[0].label, "O");
        assert_eq!(tokens[0].offsets(), None);
    }

    #[test]
    fn test_out_of_range_offsets_rejected() {
        let json = r#"{"sentences":[{"tokens":[
            {"word":"Bob","ner":"PERSON","characterOffsetBegin":10,"characterOffsetEnd":13}
        ]}]}"#;
        let doc: CoreNlpDocument = serde_json::from_str(json).unwrap();
        assert!(doc.into_tagged_tokens("Bob").is_err());
    }
}
