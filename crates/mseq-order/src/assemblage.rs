use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use mseq_core::{MultiExperiment, PhaseId, SeqError, SequenceOptions, SingleExperiment};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::appearance::extract_appearance;

const WORD_BITS: usize = u64::BITS as usize;

/// Exact encoding of the set of active phases at one sample.
///
/// Bit `i` is set when the `i`-th phase of the flattened appearance sequence is
/// active. Two labels are equal exactly when their active sets are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssemblageLabel(Vec<u64>);

impl AssemblageLabel {
    fn empty(universe: usize) -> Self {
        Self(vec![0; universe.div_ceil(WORD_BITS)])
    }

    fn insert(&mut self, position: usize) {
        self.0[position / WORD_BITS] |= 1u64 << (position % WORD_BITS);
    }

    /// Returns true when the phase at `position` is active.
    pub fn contains(&self, position: usize) -> bool {
        self.0
            .get(position / WORD_BITS)
            .is_some_and(|word| word & (1u64 << (position % WORD_BITS)) != 0)
    }

    /// Positions of the active phases in ascending order.
    pub fn positions(&self) -> Vec<usize> {
        let mut positions = Vec::new();
        for (index, word) in self.0.iter().enumerate() {
            let mut bits = *word;
            while bits != 0 {
                let offset = bits.trailing_zeros() as usize;
                positions.push(index * WORD_BITS + offset);
                bits &= bits - 1;
            }
        }
        positions
    }

    /// Number of active phases.
    pub fn len(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Returns true when no phase is active.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|word| *word == 0)
    }
}

/// Assemblage state at one sample point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblageStep {
    /// Natural row key of the sample.
    pub sample: u64,
    /// Active phase set.
    pub label: AssemblageLabel,
    /// True when the label differs from the preceding sample's label.
    pub changepoint: bool,
}

/// Contiguous run of samples sharing one assemblage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblageSegment {
    /// First sample of the run.
    pub start: u64,
    /// Last sample of the run.
    pub end: u64,
    /// Active phases, in appearance order.
    pub phases: Vec<PhaseId>,
}

/// Per-sample assemblage labels and changepoints for one experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblageSequence {
    /// Phase universe in flattened appearance order.
    pub phases: Vec<PhaseId>,
    /// One step per distinct sample, in natural row order.
    pub steps: Vec<AssemblageStep>,
}

impl AssemblageSequence {
    /// Labels in natural row order.
    pub fn labels(&self) -> Vec<&AssemblageLabel> {
        self.steps.iter().map(|step| &step.label).collect()
    }

    /// Changepoint flags in natural row order.
    pub fn changepoints(&self) -> Vec<bool> {
        self.steps.iter().map(|step| step.changepoint).collect()
    }

    /// Number of true changepoint flags.
    pub fn changepoint_count(&self) -> usize {
        self.steps.iter().filter(|step| step.changepoint).count()
    }

    /// Resolves a label to the phases it marks active.
    pub fn active_phases(&self, label: &AssemblageLabel) -> Vec<PhaseId> {
        label
            .positions()
            .into_iter()
            .filter_map(|position| self.phases.get(position).cloned())
            .collect()
    }

    /// Collapses consecutive samples with equal labels into segments.
    pub fn segments(&self) -> Vec<AssemblageSegment> {
        let mut segments: Vec<AssemblageSegment> = Vec::new();
        for step in &self.steps {
            if !step.changepoint {
                if let Some(segment) = segments.last_mut() {
                    segment.end = step.sample;
                    continue;
                }
            }
            segments.push(AssemblageSegment {
                start: step.sample,
                end: step.sample,
                phases: self.active_phases(&step.label),
            });
        }
        segments
    }
}

/// Builds the assemblage label series of a single experiment.
///
/// A phase is active at a sample when some row at that sample carries its
/// identifier and a non-null `phase` value.
pub fn build_assemblage(
    experiment: &SingleExperiment,
    opts: &SequenceOptions,
) -> Result<AssemblageSequence, SeqError> {
    let phases = extract_appearance(experiment, opts)?.flatten();
    let positions: HashMap<&PhaseId, usize> = phases
        .iter()
        .enumerate()
        .map(|(position, phase)| (phase, position))
        .collect();

    let table = experiment.table();
    let mut present: HashSet<(u64, usize)> = HashSet::new();
    for row in table.rows() {
        if row.phase.is_none() {
            continue;
        }
        if let Some(position) = row.phase_id.as_ref().and_then(|id| positions.get(id)) {
            present.insert((row.sample, *position));
        }
    }

    let mut steps: Vec<AssemblageStep> = Vec::new();
    for sample in table.samples() {
        let mut label = AssemblageLabel::empty(phases.len());
        for position in 0..phases.len() {
            if present.contains(&(sample, position)) {
                label.insert(position);
            }
        }
        let changepoint = steps.last().is_some_and(|last| last.label != label);
        steps.push(AssemblageStep {
            sample,
            label,
            changepoint,
        });
    }

    let sequence = AssemblageSequence { phases, steps };
    debug!(
        experiment = experiment.id().unwrap_or("<single>"),
        samples = sequence.steps.len(),
        changepoints = sequence.changepoint_count(),
        "built assemblage sequence"
    );
    Ok(sequence)
}

/// Builds assemblage sequences for every experiment, keyed in natural order.
pub fn build_assemblage_all(
    experiments: &MultiExperiment,
    opts: &SequenceOptions,
) -> Result<IndexMap<String, AssemblageSequence>, SeqError> {
    experiments
        .iter()
        .map(|(id, experiment)| -> Result<_, SeqError> {
            Ok((id.to_string(), build_assemblage(experiment, opts)?))
        })
        .collect()
}
