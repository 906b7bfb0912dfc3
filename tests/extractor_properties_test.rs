//! Property-style tests for span extraction across label tables and merge
//! policies

use nerscrub::detection::label_map::{CORENLP_LABELS, STANFORD_3CLASS_LABELS, STANZA_LABELS};
use nerscrub::detection::{EnabledKinds, LabelMap, MergePolicy, SpanExtractor};
use nerscrub::domain::{PiiKind, PiiSpan, TaggedToken};
use test_case::test_case;

/// Tag each whitespace-separated word; `labels[i]` labels word `i`
fn tag(text: &str, labels: &[&str]) -> Vec<TaggedToken> {
    text.split_whitespace()
        .zip(labels)
        .map(|(word, label)| TaggedToken::new(word, *label))
        .collect()
}

fn assert_well_formed(text: &str, spans: &[PiiSpan]) {
    for span in spans {
        assert!(span.start < span.end, "empty span {span:?}");
        assert_eq!(span.text, &text[span.start..span.end]);
    }
    for pair in spans.windows(2) {
        assert!(pair[0].end <= pair[1].start, "overlap {pair:?}");
    }
}

#[test_case(CORENLP_LABELS, "PERSON", "ORGANIZATION", "LOCATION" ; "corenlp")]
#[test_case(STANFORD_3CLASS_LABELS, "PERSON", "ORGANIZATION", "LOCATION" ; "stanford")]
#[test_case(STANZA_LABELS, "PERSON", "ORG", "LOC" ; "stanza")]
fn test_every_table_maps_to_same_kinds(
    table: nerscrub::detection::LabelTable,
    person: &str,
    org: &str,
    loc: &str,
) {
    let text = "Jane Smith joined Acme Corp in Paris";
    let labels = [person, person, "O", org, org, "O", loc];
    let map = LabelMap::from_table(table);

    let spans = SpanExtractor::default()
        .extract(text, &tag(text, &labels), &map)
        .unwrap();

    assert_well_formed(text, &spans);
    let found: Vec<(PiiKind, &str)> = spans.iter().map(|s| (s.kind, s.text.as_str())).collect();
    assert_eq!(
        found,
        vec![
            (PiiKind::Name, "Jane Smith"),
            (PiiKind::Organization, "Acme Corp"),
            (PiiKind::Location, "Paris"),
        ]
    );
}

#[test_case("Ann  Lee", MergePolicy::default(), 1 ; "double space merges by default")]
#[test_case("Ann  Lee", MergePolicy { max_gap: Some(1), whitespace_only: true }, 2 ; "gap over limit splits")]
#[test_case("Ann\nLee", MergePolicy::default(), 1 ; "newline is whitespace")]
#[test_case("Ann-Lee", MergePolicy::default(), 2 ; "punctuation gap splits")]
#[test_case("Ann-Lee", MergePolicy { max_gap: Some(1), whitespace_only: false }, 1 ; "punctuation allowed when not whitespace only")]
#[test_case("AnnLee", MergePolicy::contiguous_only(), 1 ; "touching tokens always merge")]
fn test_merge_policy(text: &str, policy: MergePolicy, expected: usize) {
    let (first, second) = text.split_at(3);
    let second = second.trim_start_matches(|c: char| !c.is_alphabetic());
    let tokens = vec![
        TaggedToken::new(first, "PERSON"),
        TaggedToken::new(second, "PERSON"),
    ];
    let map = LabelMap::from_table(CORENLP_LABELS);

    let spans = SpanExtractor::new(policy)
        .extract(text, &tokens, &map)
        .unwrap();

    assert_well_formed(text, &spans);
    assert_eq!(spans.len(), expected);
}

#[test_case(EnabledKinds { person: true, organization: false, location: false }, &[PiiKind::Name] ; "names only")]
#[test_case(EnabledKinds { person: false, organization: true, location: false }, &[PiiKind::Organization] ; "organizations only")]
#[test_case(EnabledKinds { person: true, organization: true, location: true }, &[PiiKind::Name, PiiKind::Organization, PiiKind::Location] ; "everything")]
fn test_disabled_kinds_are_not_reported(enabled: EnabledKinds, expected: &[PiiKind]) {
    let text = "Ann works at Acme in Oslo";
    let labels = ["PERSON", "O", "O", "ORGANIZATION", "O", "LOCATION"];
    let map = LabelMap::filtered(CORENLP_LABELS, &enabled);

    let spans = SpanExtractor::default()
        .extract(text, &tag(text, &labels), &map)
        .unwrap();

    let kinds: Vec<PiiKind> = spans.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, expected);
}

#[test]
fn test_ignored_word_splits_a_run() {
    let text = "Mr Tennant Smith called";
    let labels = ["PERSON", "PERSON", "PERSON", "O"];
    let map = LabelMap::from_table(CORENLP_LABELS);

    let spans = SpanExtractor::default()
        .with_ignored_words(["tennant"])
        .extract(text, &tag(text, &labels), &map)
        .unwrap();

    let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Mr", "Smith"]);
}

#[test]
fn test_repeated_word_is_located_in_order() {
    let text = "Paris and Paris";
    let labels = ["LOCATION", "O", "LOCATION"];
    let map = LabelMap::from_table(CORENLP_LABELS);

    let spans = SpanExtractor::default()
        .extract(text, &tag(text, &labels), &map)
        .unwrap();

    assert_eq!(spans.len(), 2);
    assert_eq!((spans[0].start, spans[0].end), (0, 5));
    assert_eq!((spans[1].start, spans[1].end), (10, 15));
}

#[test]
fn test_multibyte_text_uses_byte_offsets() {
    let text = "Zoë Ångström visited Zürich";
    let labels = ["PERSON", "PERSON", "O", "LOCATION"];
    let map = LabelMap::from_table(CORENLP_LABELS);

    let spans = SpanExtractor::default()
        .extract(text, &tag(text, &labels), &map)
        .unwrap();

    assert_well_formed(text, &spans);
    assert_eq!(spans[0].text, "Zoë Ångström");
    assert_eq!(spans[1].text, "Zürich");
    assert_eq!(spans[1].end, text.len());
}

#[test]
fn test_unknown_token_is_an_error() {
    let text = "Jane Smith";
    let tokens = vec![
        TaggedToken::new("Jane", "PERSON"),
        TaggedToken::new("Doe", "PERSON"),
    ];
    let map = LabelMap::from_table(CORENLP_LABELS);

    let err = SpanExtractor::default()
        .extract(text, &tokens, &map)
        .unwrap_err();
    assert_eq!(err.token, "Doe");
    assert_eq!(err.cursor, 4);
}
