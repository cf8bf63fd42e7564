//! Integration tests for identifier normalization and segmentation.

use defrip::parser::{DefinitionMatcher, Segmenter};
use defrip::{normalize, parse_bytes, Classification, RawElement};
use proptest::prelude::*;

#[test]
fn test_normalize_idempotent() {
    let inputs = [
        "",
        "   ",
        "Gross Floor Area",
        "**Gross Floor Area**",
        "__Lot Line__",
        "a _b",
        "Building, Accessory (Detached)",
        "Floor-Area   Ratio",
        "___",
        "Café Terrasse",
        "x\ty\nz",
        "**",
    ];
    for input in inputs {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
    }
}

#[test]
fn test_normalize_output_alphabet() {
    let slug = normalize("**Building, Accessory (Detached)**");
    assert_eq!(slug, "Building_Accessory_Detached");
    assert!(slug
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-'));
}

proptest! {
    #[test]
    fn normalize_is_idempotent_for_any_string(input in any::<String>()) {
        let once = normalize(&input);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_alphabet_for_any_string(input in "\\PC{0,64}") {
        let slug = normalize(&input);
        prop_assert!(slug.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-'));
        prop_assert!(!slug.contains("__"));
    }

    #[test]
    fn normalize_strips_emphasis_markers(term in "[A-Za-z][A-Za-z ]{0,20}") {
        prop_assert_eq!(normalize(&format!("**{}**", term)), normalize(&term));
    }
}

#[test]
fn test_segmentation_stops_at_table_row() {
    let mut elements = vec![RawElement::text("Yard means an open space")];
    for i in 0..3 {
        elements.push(RawElement::text(format!("({}) item", i)));
    }
    elements.push(RawElement::table_row(["Zone", "Depth"]));
    elements.push(RawElement::text("(z) after the table"));

    let units: Vec<_> = Segmenter::new().units(&elements).collect();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text.lines().count(), 4);
    assert_eq!(units[0].end, 4);
    assert!(!units[0].text.contains("after the table"));
}

#[test]
fn test_segmentation_adjacent_definitions() {
    let elements = vec![
        RawElement::text("Deck means A"),
        RawElement::text("Porch means B"),
    ];
    let records = Segmenter::new().segment(&elements);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "A");
    assert_eq!(records[1].text, "B");
    assert_eq!(records[1].term_id, "Porch");
}

#[test]
fn test_empty_continuation_before_image() {
    let elements = vec![
        RawElement::text("Term means: X"),
        RawElement::image("raw/p3.png"),
        RawElement::text("(a) not collected"),
    ];
    let units: Vec<_> = Segmenter::new().units(&elements).collect();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "X");
    assert_eq!(units[0].continuation_count(), 0);
}

#[test]
fn test_definition_start_is_case_insensitive() {
    let matcher = DefinitionMatcher::new();
    let start = matcher.match_start("**Lot Line** MEANS: the boundary").unwrap();
    assert_eq!(start.term, "Lot Line");
    assert_eq!(start.body, "the boundary");
    assert!(!matcher.is_start("(a) the basement;"));
    assert!(!matcher.is_start("Lot\nLine means the boundary"));
}

#[test]
fn test_segment_decoded_stream() {
    let data = br#"[
        {"type": "text", "content": "Preamble text"},
        {"type": "text", "content": "__Accessory Use__ means a use incidental to", "coords": {"l": 72.0, "t": 100.5, "r": 540.0, "b": 112.0}},
        {"type": "text", "content": "the principal use"},
        {"type": "table_row", "cells": ["A", "B"]}
    ]"#;
    let stream = parse_bytes(data).unwrap();
    let records = Segmenter::new().segment(stream.as_slice());

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].term_id, "Accessory_Use");
    assert_eq!(records[0].term, "Accessory Use");
    assert_eq!(records[0].text, "a use incidental to\nthe principal use");
    assert_eq!(records[0].classification, Classification::General);
    assert!(records[0].images.is_empty());
}
