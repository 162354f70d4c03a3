#![deny(missing_docs)]
#![doc = "Shared vocabulary for phase-appearance sequence analysis: errors, phase identifiers, observation tables and options."]

pub mod errors;
/// Stable hashing helpers.
pub mod hash;
pub mod options;
pub mod phase;
/// Canonical JSON and YAML serde helpers.
pub mod serde;
pub mod table;

pub use errors::{ErrorInfo, SeqError};
pub use hash::stable_hash_string;
pub use options::{
    load_compare_options, load_options, CompareOptions, Direction, IgnoreSet, SequenceOptions,
    DEFAULT_INDEX_VARIABLE,
};
pub use phase::PhaseId;
pub use crate::serde::{
    from_json_slice, from_yaml_slice, table_from_json_records, to_canonical_json_bytes,
    to_yaml_string,
};
pub use table::{
    MultiExperiment, Observation, ObservationTable, SingleExperiment, EXPERIMENT_COLUMN,
    INDEX_FIELD, PHASE_COLUMN, PHASE_ID_COLUMN,
};
