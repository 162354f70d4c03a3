use mseq_core::{
    CompareOptions, ObservationTable, PhaseId, SeqError, SequenceOptions,
    SingleExperiment,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::appearance::extract_appearance;

/// Second operand of a sequence comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComparisonTarget {
    /// Literal ordered phase names or phase identifiers.
    Tokens(Vec<String>),
    /// Observation table of exactly one experiment.
    Table(ObservationTable),
}

impl ComparisonTarget {
    /// Literal reference ordering.
    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ComparisonTarget::Tokens(tokens.into_iter().map(Into::into).collect())
    }

    /// Interprets a JSON payload as a comparison target.
    ///
    /// An array of strings is a literal ordering, an array of objects is a
    /// record table. Any other shape is rejected.
    pub fn from_json(value: &Value) -> Result<Self, SeqError> {
        let items = value
            .as_array()
            .ok_or_else(|| SeqError::unsupported_target("is not an array"))?;
        if items.iter().all(Value::is_string) {
            let tokens = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            return Ok(ComparisonTarget::Tokens(tokens));
        }
        if items.iter().all(Value::is_object) {
            return Ok(ComparisonTarget::Table(ObservationTable::from_records(
                items,
            )?));
        }
        Err(SeqError::unsupported_target(
            "mixes or contains non-string, non-record items",
        ))
    }
}

impl From<Vec<String>> for ComparisonTarget {
    fn from(tokens: Vec<String>) -> Self {
        ComparisonTarget::Tokens(tokens)
    }
}

impl From<ObservationTable> for ComparisonTarget {
    fn from(table: ObservationTable) -> Self {
        ComparisonTarget::Table(table)
    }
}

/// Sequences actually compared and their edit distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceComparison {
    /// Normalised first sequence.
    pub a: Vec<String>,
    /// Normalised second sequence.
    pub b: Vec<String>,
    /// Levenshtein distance between `a` and `b`.
    pub distance: usize,
}

/// Unit-cost Levenshtein distance between two token sequences.
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, left) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, right) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(left != right);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

fn flattened(
    table: &ObservationTable,
    opts: &SequenceOptions,
) -> Result<Vec<PhaseId>, SeqError> {
    let experiment = SingleExperiment::from_table(table.clone())?;
    Ok(extract_appearance(&experiment, opts)?.flatten())
}

fn normalise(phases: Vec<PhaseId>, collapse_names: bool) -> Vec<String> {
    phases
        .into_iter()
        .map(|phase| {
            if collapse_names {
                phase.name().to_string()
            } else {
                phase.to_string()
            }
        })
        .collect()
}

/// Compares the appearance sequence of `a` with `b`.
///
/// `a` must hold one experiment, as must `b` when it is a table. Literal
/// tokens are reduced to their coarse names when names are collapsed and
/// are compared verbatim otherwise.
pub fn sequence_distance(
    a: &ObservationTable,
    b: &ComparisonTarget,
    opts: &CompareOptions,
) -> Result<SequenceComparison, SeqError> {
    let mut seq_a = normalise(flattened(a, &opts.sequence)?, opts.collapse_names);
    let mut seq_b: Vec<String> = match b {
        ComparisonTarget::Tokens(tokens) if opts.collapse_names => tokens
            .iter()
            .map(|token| PhaseId::parse(token).name().to_string())
            .collect(),
        ComparisonTarget::Tokens(tokens) => tokens.clone(),
        ComparisonTarget::Table(table) => {
            normalise(flattened(table, &opts.sequence)?, opts.collapse_names)
        }
    };
    if opts.ignore_trailing {
        let shortest = seq_a.len().min(seq_b.len());
        seq_a.truncate(shortest);
        seq_b.truncate(shortest);
    }
    let distance = levenshtein(&seq_a, &seq_b);
    debug!(
        len_a = seq_a.len(),
        len_b = seq_b.len(),
        distance,
        "compared appearance sequences"
    );
    Ok(SequenceComparison {
        a: seq_a,
        b: seq_b,
        distance,
    })
}
