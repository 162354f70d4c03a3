#![allow(dead_code)]

use mseq_core::{MultiExperiment, Observation, ObservationTable, SingleExperiment};

/// Sample temperatures of a cooling run, hottest first.
pub const COOLING_PATH: [f64; 6] = [1250.0, 1200.0, 1150.0, 1100.0, 1050.0, 1000.0];

/// Phase stability bands as `(phaseID, top, bottom)` in degrees.
pub type Band<'a> = (&'a str, f64, f64);

/// Fractional crystallisation run with a second olivine generation.
pub const FRACTIONATION: [Band<'static>; 5] = [
    ("liquid_0", 1250.0, 1000.0),
    ("olivine_0", 1200.0, 1100.0),
    ("feldspar_0", 1150.0, 1000.0),
    ("clinopyroxene_0", 1100.0, 1000.0),
    ("olivine_1", 1050.0, 1000.0),
];

/// Rows of one experiment following [`COOLING_PATH`], with a bulk row per sample.
pub fn run_rows(experiment: &str, bands: &[Band<'_>]) -> Vec<Observation> {
    let mut rows = Vec::new();
    for (sample, &temperature) in COOLING_PATH.iter().enumerate() {
        rows.push(
            Observation::new(sample as u64)
                .with_experiment(experiment)
                .with_phase("bulk")
                .with_value("temperature", temperature),
        );
        for &(phase, top, bottom) in bands {
            if temperature <= top && temperature >= bottom {
                rows.push(
                    Observation::new(sample as u64)
                        .with_experiment(experiment)
                        .with_phase(phase)
                        .with_value("temperature", temperature)
                        .with_value("volume", 1.0),
                );
            }
        }
    }
    rows
}

pub fn run_table(experiment: &str, bands: &[Band<'_>]) -> ObservationTable {
    ObservationTable::from_rows(run_rows(experiment, bands))
}

pub fn single(experiment: &str, bands: &[Band<'_>]) -> SingleExperiment {
    SingleExperiment::from_table(run_table(experiment, bands)).expect("single experiment")
}

pub fn multi(runs: &[(&str, &[Band<'_>])]) -> MultiExperiment {
    let rows = runs
        .iter()
        .flat_map(|(experiment, bands)| run_rows(experiment, bands))
        .collect();
    MultiExperiment::from_table(&ObservationTable::from_rows(rows)).expect("multi experiment")
}

pub fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
