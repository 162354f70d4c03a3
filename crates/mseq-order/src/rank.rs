use indexmap::IndexMap;
use mseq_core::{stable_hash_string, CompareOptions, MultiExperiment, SeqError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::{sequence_distance, ComparisonTarget, SequenceComparison};

/// Distance of one experiment to the reference ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedExperiment {
    /// Experiment identifier.
    pub experiment: String,
    /// Sequences compared and their distance.
    pub comparison: SequenceComparison,
}

/// Experiments ordered by similarity to a reference ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingReport {
    /// Comparison options used for every experiment.
    pub options: CompareOptions,
    /// Reference token sequence.
    pub reference: Vec<String>,
    /// Entries sorted by distance; ties keep natural experiment order.
    pub entries: Vec<RankedExperiment>,
    /// Stable hash of the options, the reference and every experiment's rows.
    pub input_hash: String,
}

impl RankingReport {
    /// Entries whose distance does not exceed `max_distance`.
    pub fn within(&self, max_distance: usize) -> impl Iterator<Item = &RankedExperiment> {
        self.entries
            .iter()
            .filter(move |entry| entry.comparison.distance <= max_distance)
    }
}

#[derive(Serialize)]
struct RankingInputs<'a> {
    options: &'a CompareOptions,
    reference: &'a [String],
    order: Vec<&'a str>,
    experiments: &'a MultiExperiment,
}

/// Compares every experiment with the reference, keyed in natural order.
///
/// Experiments are processed in parallel; the returned map keeps the input
/// order regardless of scheduling.
pub fn distances_to_reference(
    experiments: &MultiExperiment,
    reference: &[String],
    opts: &CompareOptions,
) -> Result<IndexMap<String, SequenceComparison>, SeqError> {
    let target = ComparisonTarget::Tokens(reference.to_vec());
    let jobs: Vec<_> = experiments.iter().collect();
    let results: Result<Vec<_>, SeqError> = jobs
        .par_iter()
        .enumerate()
        .map(|(index, (id, experiment))| -> Result<_, SeqError> {
            let comparison = sequence_distance(experiment.table(), &target, opts)?;
            Ok((index, id.to_string(), comparison))
        })
        .collect();
    let mut ordered = results?;
    ordered.sort_by_key(|(index, _, _)| *index);
    Ok(ordered
        .into_iter()
        .map(|(_, id, comparison)| (id, comparison))
        .collect())
}

/// Ranks experiments by edit distance to a reference ordering.
pub fn rank_experiments(
    experiments: &MultiExperiment,
    reference: &[String],
    opts: &CompareOptions,
) -> Result<RankingReport, SeqError> {
    let input_hash = stable_hash_string(&RankingInputs {
        options: opts,
        reference,
        order: experiments.ids().collect(),
        experiments,
    })?;
    let mut entries: Vec<RankedExperiment> = distances_to_reference(experiments, reference, opts)?
        .into_iter()
        .map(|(experiment, comparison)| RankedExperiment {
            experiment,
            comparison,
        })
        .collect();
    entries.sort_by_key(|entry| entry.comparison.distance);
    debug!(
        experiments = entries.len(),
        best = entries.first().map(|entry| entry.experiment.as_str()),
        "ranked experiments against reference"
    );
    Ok(RankingReport {
        options: opts.clone(),
        reference: reference.to_vec(),
        entries,
        input_hash,
    })
}
