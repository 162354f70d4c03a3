#![deny(missing_docs)]
#![doc = "Phase-appearance sequences, assemblage changepoints and sequence distances for melt experiments."]

/// First-appearance sequence extraction.
pub mod appearance;
/// Assemblage labels and changepoints.
pub mod assemblage;
/// Edit distance between appearance sequences.
pub mod distance;
/// Consensus phase ordering for legends.
pub mod legend;
/// Batch ranking of experiments against a reference ordering.
pub mod rank;

pub use appearance::{
    extract_appearance, extract_appearance_all, AppearanceGroup, AppearanceSequence,
};
pub use assemblage::{
    build_assemblage, build_assemblage_all, AssemblageLabel, AssemblageSegment,
    AssemblageSequence, AssemblageStep,
};
pub use distance::{levenshtein, sequence_distance, ComparisonTarget, SequenceComparison};
pub use legend::{consensus_order, LegendEntry};
pub use rank::{distances_to_reference, rank_experiments, RankedExperiment, RankingReport};
