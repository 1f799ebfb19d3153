// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    first_meeting = { 1, "First Meeting" },
    quant = { 2, "Quantitative Diligence" },
    patrick = { 3, "Patrick Meeting" },
    live = { 4, "Live Diligence" },
    references = { 5, "References" },
    docs = { 6, "Docs" },
)]
fn stage_numbers_and_labels(number: i64, label: &str) {
    let stage = Stage::new(number).unwrap();
    assert_eq!(i64::from(stage.number()), number);
    assert_eq!(stage.label(), label);
}

#[parameterized(
    zero = { 0 },
    seven = { 7 },
    negative = { -1 },
    large = { 1_000 },
)]
fn out_of_range_stage_is_rejected(number: i64) {
    assert_eq!(Stage::new(number), Err(EngineError::InvalidStage(number)));
}

#[test]
fn stages_are_totally_ordered() {
    for pair in Stage::ALL.windows(2) {
        assert!(pair[0] < pair[1]);
        assert_eq!(pair[0].next(), Some(pair[1]));
        assert_eq!(pair[1].prev(), Some(pair[0]));
    }
}

#[test]
fn boundaries_have_no_neighbour() {
    assert_eq!(Stage::FIRST.prev(), None);
    assert_eq!(Stage::LAST.next(), None);
    assert!(Stage::Docs.is_last());
    assert!(!Stage::References.is_last());
}

#[test]
fn default_stage_is_first_meeting() {
    assert_eq!(Stage::default(), Stage::FirstMeeting);
}

#[test]
fn display_includes_number_and_label() {
    assert_eq!(Stage::Docs.to_string(), "6 - Docs");
}

#[test]
fn serializes_as_number() {
    assert_eq!(serde_json::to_string(&Stage::LiveDiligence).unwrap(), "4");
    let stage: Stage = serde_json::from_str("2").unwrap();
    assert_eq!(stage, Stage::QuantitativeDiligence);
}

#[test]
fn deserializing_out_of_range_fails() {
    let result: Result<Stage, _> = serde_json::from_str("9");
    assert!(result.is_err());
}
