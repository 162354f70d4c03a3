//! Configuration shared by the extraction and comparison operations.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::SeqError;
use crate::phase::PhaseId;
use crate::serde::from_yaml_slice;

/// Default name of the ordering column.
pub const DEFAULT_INDEX_VARIABLE: &str = "temperature";

/// Which end of the index variable marks the first appearance of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Lowest value appears first (melting runs).
    Ascending,
    /// Highest value appears first (crystallisation runs).
    #[default]
    Descending,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    /// Picks the extremal value marking first appearance.
    pub fn extremum(self, current: f64, candidate: f64) -> f64 {
        match self {
            Direction::Ascending => current.min(candidate),
            Direction::Descending => current.max(candidate),
        }
    }
}

/// Bookkeeping pseudo-phases excluded from every sequence.
///
/// A phase is ignored when either its full identifier or its coarse name is a
/// member of the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreSet(BTreeSet<String>);

impl IgnoreSet {
    /// Creates an ignore set from the provided labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// An ignore set that excludes nothing.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns true when the phase should be excluded.
    pub fn contains(&self, phase: &PhaseId) -> bool {
        self.0.contains(phase.name()) || self.0.contains(&phase.to_string())
    }

    /// Iterates over the configured labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new(["bulk", "cumulate", "solid"])
    }
}

/// Options controlling appearance and assemblage extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOptions {
    /// Phases excluded from every computation.
    #[serde(default)]
    pub ignore: IgnoreSet,
    /// Ordering policy along the index variable.
    #[serde(default)]
    pub direction: Direction,
    /// Name of the numeric ordering column.
    #[serde(default = "SequenceOptions::default_index_variable")]
    pub index_variable: String,
}

impl SequenceOptions {
    fn default_index_variable() -> String {
        DEFAULT_INDEX_VARIABLE.to_string()
    }

    /// Returns a copy of the options with the given direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Returns a copy of the options with the given ignore set.
    pub fn with_ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    /// Returns a copy of the options ordered along another column.
    pub fn with_index_variable(mut self, index_variable: impl Into<String>) -> Self {
        self.index_variable = index_variable.into();
        self
    }
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            ignore: IgnoreSet::default(),
            direction: Direction::default(),
            index_variable: Self::default_index_variable(),
        }
    }
}

/// Options controlling sequence comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Compare coarse mineral names instead of full phase identifiers.
    #[serde(default = "CompareOptions::default_collapse_names")]
    pub collapse_names: bool,
    /// Truncate both sequences to the shorter length before comparing.
    #[serde(default)]
    pub ignore_trailing: bool,
    /// Extraction options applied to table inputs.
    #[serde(flatten)]
    pub sequence: SequenceOptions,
}

impl CompareOptions {
    fn default_collapse_names() -> bool {
        true
    }

    /// Returns a copy of the options with name collapsing toggled.
    pub fn with_collapse_names(mut self, collapse_names: bool) -> Self {
        self.collapse_names = collapse_names;
        self
    }

    /// Returns a copy of the options with trailing truncation toggled.
    pub fn with_ignore_trailing(mut self, ignore_trailing: bool) -> Self {
        self.ignore_trailing = ignore_trailing;
        self
    }

    /// Returns a copy of the options with the given extraction options.
    pub fn with_sequence(mut self, sequence: SequenceOptions) -> Self {
        self.sequence = sequence;
        self
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            collapse_names: Self::default_collapse_names(),
            ignore_trailing: false,
            sequence: SequenceOptions::default(),
        }
    }
}

/// Loads extraction options from the provided YAML path.
pub fn load_options(path: &Path) -> Result<SequenceOptions, SeqError> {
    let bytes = fs::read(path).map_err(|err| SeqError::serde("options_read", err))?;
    from_yaml_slice(&bytes)
}

/// Loads comparison options from the provided YAML path.
pub fn load_compare_options(path: &Path) -> Result<CompareOptions, SeqError> {
    let bytes = fs::read(path).map_err(|err| SeqError::serde("compare_options_read", err))?;
    from_yaml_slice(&bytes)
}
