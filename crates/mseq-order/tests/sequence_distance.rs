mod common;

use common::{multi, run_rows, run_table, tokens, Band, FRACTIONATION};
use mseq_core::{CompareOptions, ObservationTable, SeqError};
use mseq_order::{sequence_distance, ComparisonTarget};
use serde_json::json;

const OLIVINE_THEN_FELDSPAR: [Band<'static>; 2] =
    [("olivine_0", 1250.0, 1000.0), ("feldspar_0", 1200.0, 1000.0)];

const THREE_PHASES: [Band<'static>; 3] = [
    ("liquid_0", 1250.0, 1000.0),
    ("olivine_0", 1200.0, 1000.0),
    ("feldspar_0", 1150.0, 1000.0),
];

const TWO_OLIVINES: [Band<'static>; 3] = [
    ("olivine_0", 1250.0, 1250.0),
    ("olivine_1", 1200.0, 1150.0),
    ("feldspar_0", 1150.0, 1000.0),
];

#[test]
fn experiment_compared_with_itself_is_zero() {
    let table = run_table("frac", &FRACTIONATION);
    let target = ComparisonTarget::Table(table.clone());
    let comparison =
        sequence_distance(&table, &target, &CompareOptions::default()).expect("comparison");
    assert_eq!(comparison.distance, 0);
    assert_eq!(comparison.a, comparison.b);
    assert_eq!(
        comparison.a,
        tokens(&["liquid", "olivine", "feldspar", "clinopyroxene", "olivine"])
    );
}

#[test]
fn swapped_pair_costs_two_substitutions() {
    let table = run_table("frac", &OLIVINE_THEN_FELDSPAR);
    let opts = CompareOptions::default();
    let same = sequence_distance(
        &table,
        &ComparisonTarget::tokens(["olivine", "feldspar"]),
        &opts,
    )
    .expect("comparison");
    assert_eq!(same.distance, 0);

    let swapped = sequence_distance(
        &table,
        &ComparisonTarget::tokens(["feldspar", "olivine"]),
        &opts,
    )
    .expect("comparison");
    assert_eq!(swapped.distance, 2);
}

#[test]
fn ignore_trailing_truncates_to_the_shorter_sequence() {
    let table = run_table("frac", &THREE_PHASES);
    let target = ComparisonTarget::tokens(["liquid", "olivine"]);

    let truncated = sequence_distance(
        &table,
        &target,
        &CompareOptions::default().with_ignore_trailing(true),
    )
    .expect("comparison");
    assert_eq!(truncated.distance, 0);
    assert_eq!(truncated.a, tokens(&["liquid", "olivine"]));

    let full = sequence_distance(&table, &target, &CompareOptions::default()).expect("comparison");
    assert_eq!(full.distance, 1);
    assert_eq!(full.a, tokens(&["liquid", "olivine", "feldspar"]));
}

#[test]
fn collapsing_names_merges_generations() {
    let table = run_table("frac", &TWO_OLIVINES);
    let target = ComparisonTarget::tokens(["olivine", "feldspar"]);

    let collapsed =
        sequence_distance(&table, &target, &CompareOptions::default()).expect("comparison");
    assert_eq!(collapsed.a, tokens(&["olivine", "olivine", "feldspar"]));
    assert_eq!(collapsed.distance, 1);

    let raw = sequence_distance(
        &table,
        &target,
        &CompareOptions::default().with_collapse_names(false),
    )
    .expect("comparison");
    assert_eq!(raw.a, tokens(&["olivine_0", "olivine_1", "feldspar_0"]));
    assert_eq!(raw.distance, 3);
}

#[test]
fn literal_identifiers_are_collapsed_too() {
    let table = run_table("frac", &OLIVINE_THEN_FELDSPAR);
    let target = ComparisonTarget::tokens(["olivine_3", "feldspar_1"]);
    let comparison =
        sequence_distance(&table, &target, &CompareOptions::default()).expect("comparison");
    assert_eq!(comparison.b, tokens(&["olivine", "feldspar"]));
    assert_eq!(comparison.distance, 0);
}

#[test]
fn literal_tokens_are_kept_verbatim_without_collapsing() {
    let table = run_table("frac", &OLIVINE_THEN_FELDSPAR);
    let target = ComparisonTarget::tokens(["olivine_00", "feldspar_0"]);
    let comparison = sequence_distance(
        &table,
        &target,
        &CompareOptions::default().with_collapse_names(false),
    )
    .expect("comparison");
    assert_eq!(comparison.b, tokens(&["olivine_00", "feldspar_0"]));
    assert_eq!(comparison.distance, 1);
}

#[test]
fn empty_table_compares_as_empty_sequence() {
    let empty = ObservationTable::from_records(&[]).expect("empty records");
    let comparison = sequence_distance(
        &empty,
        &ComparisonTarget::tokens(["liquid", "olivine"]),
        &CompareOptions::default(),
    )
    .expect("comparison");
    assert!(comparison.a.is_empty());
    assert_eq!(comparison.distance, 2);
}

#[test]
fn two_experiments_compare_by_appearance() {
    let a = run_table("frac", &THREE_PHASES);
    let b = run_table("wet", &OLIVINE_THEN_FELDSPAR);
    let comparison = sequence_distance(&a, &ComparisonTarget::Table(b), &CompareOptions::default())
        .expect("comparison");
    assert_eq!(comparison.b, tokens(&["olivine", "feldspar"]));
    assert_eq!(comparison.distance, 1);
}

#[test]
fn mixed_experiments_are_rejected() {
    let mut rows = run_rows("frac", &THREE_PHASES);
    rows.extend(run_rows("wet", &THREE_PHASES));
    let mixed = ObservationTable::from_rows(rows);
    let single = run_table("frac", &THREE_PHASES);
    let target = ComparisonTarget::tokens(["liquid"]);

    let err = sequence_distance(&mixed, &target, &CompareOptions::default()).unwrap_err();
    assert!(matches!(err, SeqError::MultiExperiment(_)));

    let err = sequence_distance(
        &single,
        &ComparisonTarget::Table(mixed),
        &CompareOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.info().code, "experiment.multiple");
}

#[test]
fn json_targets_are_classified() {
    let names = ComparisonTarget::from_json(&json!(["liquid", "olivine"])).expect("tokens");
    assert_eq!(names, ComparisonTarget::tokens(["liquid", "olivine"]));

    let records = json!([
        {"index": 0, "phase": "liquid", "phaseID": "liquid_0", "temperature": 1250.0},
        {"index": 1, "phase": "liquid", "phaseID": "liquid_0", "temperature": 1200.0},
        {"index": 1, "phase": "olivine", "phaseID": "olivine_0", "temperature": 1200.0}
    ]);
    let target = ComparisonTarget::from_json(&records).expect("table");
    assert!(matches!(target, ComparisonTarget::Table(_)));
    let table = run_table("frac", &THREE_PHASES);
    let comparison = sequence_distance(
        &table,
        &target,
        &CompareOptions::default().with_ignore_trailing(true),
    )
    .expect("comparison");
    assert_eq!(comparison.distance, 0);
}

#[test]
fn unsupported_targets_are_rejected() {
    for payload in [json!(42), json!({"phases": ["liquid"]}), json!(["liquid", 3])] {
        let err = ComparisonTarget::from_json(&payload).unwrap_err();
        assert!(matches!(err, SeqError::UnsupportedInput(_)));
        assert_eq!(err.info().code, "compare.unsupported_target");
    }
}

#[test]
fn experiments_sorted_by_distance_to_reference() {
    let experiments = multi(&[
        ("frac", &FRACTIONATION[..]),
        ("three", &THREE_PHASES[..]),
    ]);
    let reference = tokens(&["liquid", "olivine", "feldspar"]);
    let target = ComparisonTarget::Tokens(reference);
    let mut distances: Vec<(String, usize)> = experiments
        .iter()
        .map(|(id, experiment)| {
            let comparison =
                sequence_distance(experiment.table(), &target, &CompareOptions::default())
                    .expect("comparison");
            (id.to_string(), comparison.distance)
        })
        .collect();
    distances.sort_by_key(|(_, distance)| *distance);
    assert_eq!(distances[0], ("three".to_string(), 0));
    assert_eq!(distances[1], ("frac".to_string(), 2));
}
