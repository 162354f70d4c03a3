use mseq_core::{
    from_json_slice, from_yaml_slice, stable_hash_string, table_from_json_records,
    to_canonical_json_bytes, to_yaml_string, Observation, ObservationTable, SeqError,
    SequenceOptions,
};

fn sample_table() -> ObservationTable {
    ObservationTable::from_rows(vec![
        Observation::new(0)
            .with_experiment("frac_1")
            .with_phase("olivine_0")
            .with_value("temperature", 1200.0),
        Observation::new(1)
            .with_experiment("frac_1")
            .with_absent_phase("olivine_0")
            .with_value("temperature", 1150.0),
    ])
}

#[test]
fn table_roundtrips_through_canonical_json() {
    let table = sample_table();
    let bytes = to_canonical_json_bytes(&table).expect("serialize");
    let back: ObservationTable = from_json_slice(&bytes).expect("deserialize");
    assert_eq!(back, table);
    assert_eq!(to_canonical_json_bytes(&back).expect("serialize again"), bytes);
}

#[test]
fn deserialization_validates_columns() {
    let payload = br#"{"columns": ["phaseID"], "rows": [{"sample": 0, "phaseID": "olivine_0", "values": {"temperature": 1.0}}]}"#;
    let err = from_json_slice::<ObservationTable>(payload).unwrap_err();
    assert!(matches!(err, SeqError::Serde(_)));
    assert!(err.info().message.contains("temperature"));
}

#[test]
fn options_roundtrip_through_yaml() {
    let opts = SequenceOptions::default().with_index_variable("pressure");
    let yaml = to_yaml_string(&opts).expect("yaml");
    assert!(yaml.contains("descending"));
    let back: SequenceOptions = from_yaml_slice(yaml.as_bytes()).expect("parse yaml");
    assert_eq!(back, opts);
}

#[test]
fn stable_hash_ignores_construction_order() {
    let first = serde_json::json!({"b": 1, "a": [1, 2]});
    let second = serde_json::json!({"a": [1, 2], "b": 1});
    assert_eq!(
        stable_hash_string(&first).expect("hash"),
        stable_hash_string(&second).expect("hash")
    );
    assert_eq!(stable_hash_string(&first).expect("hash").len(), 64);
}

#[test]
fn record_arrays_load_as_tables() {
    let payload = br#"[
        {"index": 3, "experiment": "frac_1", "phaseID": "olivine_0", "phase": "olivine", "temperature": 1200.0},
        {"index": 4, "experiment": "frac_1", "phaseID": "olivine_0", "phase": null, "temperature": null}
    ]"#;
    let table = table_from_json_records(payload).expect("records");
    assert_eq!(table.len(), 2);
    assert_eq!(table.samples(), vec![3, 4]);
    assert!(table.has_column("temperature"));
    assert_eq!(table.rows()[1].value("temperature"), None);

    let err = table_from_json_records(b"{\"not\": \"an array\"}").expect_err("object payload");
    assert!(matches!(err, SeqError::Serde(_)));
    assert_eq!(err.info().code, "json_deserialize");
}
