use std::collections::BTreeMap;

use indexmap::IndexMap;
use mseq_core::{
    Direction, MultiExperiment, PhaseId, SeqError, SequenceOptions, SingleExperiment,
    PHASE_ID_COLUMN,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Phases sharing the same first-appearance key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceGroup {
    /// Integer-truncated index value at first appearance.
    pub key: i64,
    /// Phases appearing at this key, ordered by name then generation.
    pub phases: Vec<PhaseId>,
}

/// Ordered first-appearance groups for one experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceSequence {
    /// Ordering policy the groups were sorted under.
    pub direction: Direction,
    /// Groups from earliest to latest appearance.
    pub groups: Vec<AppearanceGroup>,
}

impl AppearanceSequence {
    /// Concatenates the groups into a single ordered list of phases.
    pub fn flatten(&self) -> Vec<PhaseId> {
        self.groups
            .iter()
            .flat_map(|group| group.phases.iter().cloned())
            .collect()
    }

    /// Number of distinct phases in the sequence.
    pub fn phase_count(&self) -> usize {
        self.groups.iter().map(|group| group.phases.len()).sum()
    }

    /// Returns true when no phase qualified.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Position of the group holding the phase.
    pub fn group_position(&self, phase: &PhaseId) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| group.phases.contains(phase))
    }
}

/// Extracts the first-appearance sequence of a single experiment.
///
/// Rows with a null or ignored phase identifier are skipped, as are null
/// index values. A phase whose index values are all null has no appearance
/// point and does not enter the sequence. An empty table yields an empty
/// sequence.
pub fn extract_appearance(
    experiment: &SingleExperiment,
    opts: &SequenceOptions,
) -> Result<AppearanceSequence, SeqError> {
    let table = experiment.table();
    table.require_column(PHASE_ID_COLUMN)?;
    // An empty table has no numeric columns to declare.
    if !table.is_empty() {
        table.require_column(&opts.index_variable)?;
    }

    let mut extrema: BTreeMap<&PhaseId, Option<f64>> = BTreeMap::new();
    for row in table.rows() {
        let Some(phase) = row.phase_id.as_ref() else {
            continue;
        };
        if opts.ignore.contains(phase) {
            continue;
        }
        let slot = extrema.entry(phase).or_insert(None);
        if let Some(value) = row.value(&opts.index_variable) {
            *slot = Some(match *slot {
                Some(current) => opts.direction.extremum(current, value),
                None => value,
            });
        }
    }

    let mut grouped: BTreeMap<i64, Vec<PhaseId>> = BTreeMap::new();
    for (phase, extremum) in extrema {
        if let Some(value) = extremum {
            grouped
                .entry(value.trunc() as i64)
                .or_default()
                .push(phase.clone());
        }
    }

    let mut groups: Vec<AppearanceGroup> = grouped
        .into_iter()
        .map(|(key, phases)| AppearanceGroup { key, phases })
        .collect();
    if opts.direction == Direction::Descending {
        groups.reverse();
    }

    let sequence = AppearanceSequence {
        direction: opts.direction,
        groups,
    };
    debug!(
        experiment = experiment.id().unwrap_or("<single>"),
        phases = sequence.phase_count(),
        groups = sequence.groups.len(),
        "extracted appearance sequence"
    );
    Ok(sequence)
}

/// Extracts appearance sequences for every experiment, keyed in natural order.
pub fn extract_appearance_all(
    experiments: &MultiExperiment,
    opts: &SequenceOptions,
) -> Result<IndexMap<String, AppearanceSequence>, SeqError> {
    experiments
        .iter()
        .map(|(id, experiment)| -> Result<_, SeqError> {
            Ok((id.to_string(), extract_appearance(experiment, opts)?))
        })
        .collect()
}
