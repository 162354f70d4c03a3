use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use mseq_core::PhaseId;
use serde::{Deserialize, Serialize};

use crate::appearance::AppearanceSequence;

/// One phase in a consensus ordering across experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Phase identifier.
    pub phase: PhaseId,
    /// Mean appearance-group position across experiments.
    pub mean_position: f64,
    /// Display label: the coarse name for the first or only generation.
    pub label: String,
}

/// Orders every phase seen in `sequences` by its mean group position.
///
/// An experiment lacking a phase contributes one more than its own phase
/// count. Ties keep first-seen order.
pub fn consensus_order(sequences: &IndexMap<String, AppearanceSequence>) -> Vec<LegendEntry> {
    let universe: IndexSet<PhaseId> = sequences
        .values()
        .flat_map(AppearanceSequence::flatten)
        .collect();

    let mut ranked: Vec<(PhaseId, f64)> = universe
        .into_iter()
        .map(|phase| {
            let total: usize = sequences
                .values()
                .map(|sequence| {
                    sequence
                        .group_position(&phase)
                        .unwrap_or(sequence.phase_count() + 1)
                })
                .sum();
            let mean = total as f64 / sequences.len() as f64;
            (phase, mean)
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut generations: HashMap<&str, usize> = HashMap::new();
    for (phase, _) in &ranked {
        *generations.entry(phase.name()).or_default() += 1;
    }

    ranked
        .iter()
        .map(|(phase, mean_position)| {
            let label = if generations[phase.name()] == 1 || phase.is_first_generation() {
                phase.name().to_string()
            } else {
                phase.to_string()
            };
            LegendEntry {
                phase: phase.clone(),
                mean_position: *mean_position,
                label,
            }
        })
        .collect()
}
