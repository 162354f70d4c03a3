//! In-memory observation tables and the experiment containers built from them.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ErrorInfo, SeqError};
use crate::phase::PhaseId;

/// Column holding the experiment identifier.
pub const EXPERIMENT_COLUMN: &str = "experiment";
/// Column holding the coarse phase label.
pub const PHASE_COLUMN: &str = "phase";
/// Column holding the fine-grained phase identifier.
pub const PHASE_ID_COLUMN: &str = "phaseID";
/// Record field carrying the natural row key.
pub const INDEX_FIELD: &str = "index";

fn schema_error(code: &str, message: impl Into<String>) -> SeqError {
    SeqError::Schema(ErrorInfo::new(code, message))
}

/// Experiment and phase labels are fixed fields of every row, so inferred
/// tables always declare them even when every value is null.
fn label_columns() -> BTreeSet<String> {
    [EXPERIMENT_COLUMN, PHASE_COLUMN, PHASE_ID_COLUMN]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// One measurement of one phase at one sample point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Natural row key; rows observed at the same sample point share it.
    pub sample: u64,
    /// Experiment the row belongs to.
    #[serde(default)]
    pub experiment: Option<String>,
    /// Coarse phase label, null when the phase is absent at this sample.
    #[serde(default)]
    pub phase: Option<String>,
    /// Fine-grained phase identifier.
    #[serde(default, rename = "phaseID")]
    pub phase_id: Option<PhaseId>,
    /// Numeric payload columns (index variable, volumes, compositions).
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl Observation {
    /// Creates an empty row at the provided sample point.
    pub fn new(sample: u64) -> Self {
        Self {
            sample,
            experiment: None,
            phase: None,
            phase_id: None,
            values: BTreeMap::new(),
        }
    }

    /// Sets the experiment identifier.
    pub fn with_experiment(mut self, experiment: impl Into<String>) -> Self {
        self.experiment = Some(experiment.into());
        self
    }

    /// Sets the phase identifier and derives the coarse label from it.
    pub fn with_phase(mut self, phase_id: &str) -> Self {
        let id = PhaseId::parse(phase_id);
        self.phase = Some(id.name().to_string());
        self.phase_id = Some(id);
        self
    }

    /// Sets the phase identifier while leaving the coarse label null.
    pub fn with_absent_phase(mut self, phase_id: &str) -> Self {
        self.phase = None;
        self.phase_id = Some(PhaseId::parse(phase_id));
        self
    }

    /// Sets a numeric payload column.
    pub fn with_value(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    /// Returns a numeric column value; NaN reads as null.
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().filter(|value| !value.is_nan())
    }
}

#[derive(Deserialize)]
struct RawTable {
    columns: BTreeSet<String>,
    rows: Vec<Observation>,
}

/// Observation rows together with their declared column set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct ObservationTable {
    columns: BTreeSet<String>,
    rows: Vec<Observation>,
}

impl TryFrom<RawTable> for ObservationTable {
    type Error = SeqError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Self::new(raw.columns, raw.rows)
    }
}

impl ObservationTable {
    /// Creates a table, checking every populated field against the declared columns.
    pub fn new<I, S>(columns: I, rows: Vec<Observation>) -> Result<Self, SeqError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: BTreeSet<String> = columns.into_iter().map(Into::into).collect();
        for (position, row) in rows.iter().enumerate() {
            let labelled = [
                (EXPERIMENT_COLUMN, row.experiment.is_some()),
                (PHASE_COLUMN, row.phase.is_some()),
                (PHASE_ID_COLUMN, row.phase_id.is_some()),
            ];
            let undeclared = labelled
                .iter()
                .filter(|(_, populated)| *populated)
                .map(|(column, _)| *column)
                .chain(row.values.keys().map(String::as_str))
                .find(|column| !columns.contains(*column));
            if let Some(column) = undeclared {
                return Err(SeqError::Schema(
                    ErrorInfo::new(
                        "table.undeclared_column",
                        format!("row {position} populates undeclared column `{column}`"),
                    )
                    .with_context("column", column)
                    .with_context("row", position.to_string()),
                ));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Creates a table declaring the label columns plus every numeric column
    /// populated by any row.
    pub fn from_rows(rows: Vec<Observation>) -> Self {
        let mut columns = label_columns();
        for row in &rows {
            columns.extend(row.values.keys().cloned());
        }
        Self { columns, rows }
    }

    /// Builds a table from record-oriented JSON objects.
    ///
    /// `index` supplies the sample key (row position otherwise), the label
    /// columns are strings or null, and every other field must be a number or
    /// null.
    pub fn from_records(records: &[Value]) -> Result<Self, SeqError> {
        let mut columns = label_columns();
        let mut rows = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| {
                schema_error(
                    "table.record_not_object",
                    format!("record {position} is not a JSON object"),
                )
            })?;
            rows.push(observation_from_record(position, object, &mut columns)?);
        }
        Ok(Self { columns, rows })
    }

    /// Declared column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Returns true when the column is declared.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Fails with a schema error when the column is not declared.
    pub fn require_column(&self, column: &str) -> Result<(), SeqError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(SeqError::missing_column(column))
        }
    }

    /// Rows in table order.
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct sample keys in order of first occurrence.
    pub fn samples(&self) -> Vec<u64> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.sample)
            .filter(|sample| seen.insert(*sample))
            .collect()
    }

    /// Distinct experiment identifiers in order of first occurrence.
    pub fn experiment_ids(&self) -> Vec<Option<&str>> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.experiment.as_deref())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    fn select(&self, keep: impl Fn(&Observation) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }
}

fn observation_from_record(
    position: usize,
    object: &Map<String, Value>,
    columns: &mut BTreeSet<String>,
) -> Result<Observation, SeqError> {
    let mut row = Observation::new(position as u64);
    for (key, value) in object {
        let invalid = || {
            SeqError::Schema(
                ErrorInfo::new(
                    "table.invalid_value",
                    format!("record {position} has an unsupported value for `{key}`"),
                )
                .with_context("column", key.as_str())
                .with_context("value", value.to_string()),
            )
        };
        match key.as_str() {
            INDEX_FIELD => {
                row.sample = value.as_u64().ok_or_else(invalid)?;
                continue;
            }
            EXPERIMENT_COLUMN | PHASE_COLUMN | PHASE_ID_COLUMN => {
                let label = match value {
                    Value::Null => None,
                    Value::String(text) => Some(text.clone()),
                    Value::Number(number) => Some(number.to_string()),
                    _ => return Err(invalid()),
                };
                match key.as_str() {
                    EXPERIMENT_COLUMN => row.experiment = label,
                    PHASE_COLUMN => row.phase = label,
                    _ => row.phase_id = label.as_deref().map(PhaseId::parse),
                }
            }
            _ => match value {
                Value::Null => {}
                Value::Number(number) => {
                    let numeric = number.as_f64().ok_or_else(invalid)?;
                    row.values.insert(key.clone(), numeric);
                }
                _ => return Err(invalid()),
            },
        }
        columns.insert(key.clone());
    }
    Ok(row)
}

/// Rows of exactly one experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleExperiment {
    id: Option<String>,
    table: ObservationTable,
}

impl SingleExperiment {
    /// Wraps a table holding at most one distinct experiment identifier.
    pub fn from_table(table: ObservationTable) -> Result<Self, SeqError> {
        let ids = table.experiment_ids();
        if ids.len() > 1 {
            return Err(SeqError::multiple_experiments(ids));
        }
        let id = ids.first().copied().flatten().map(str::to_string);
        Ok(Self { id, table })
    }

    /// Experiment identifier, when the rows carry one.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Underlying rows.
    pub fn table(&self) -> &ObservationTable {
        &self.table
    }
}

impl TryFrom<ObservationTable> for SingleExperiment {
    type Error = SeqError;

    fn try_from(table: ObservationTable) -> Result<Self, Self::Error> {
        Self::from_table(table)
    }
}

/// Several experiments keyed by identifier, in order of first occurrence.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MultiExperiment {
    experiments: IndexMap<String, SingleExperiment>,
}

impl MultiExperiment {
    /// Partitions a table by its `experiment` column.
    pub fn from_table(table: &ObservationTable) -> Result<Self, SeqError> {
        table.require_column(EXPERIMENT_COLUMN)?;
        let mut experiments = IndexMap::new();
        for id in table.experiment_ids() {
            let id = id.ok_or_else(|| {
                schema_error(
                    "table.null_experiment",
                    "rows with a null experiment identifier cannot be grouped",
                )
            })?;
            let rows = table.select(|row| row.experiment.as_deref() == Some(id));
            experiments.insert(
                id.to_string(),
                SingleExperiment {
                    id: Some(id.to_string()),
                    table: rows,
                },
            );
        }
        Ok(Self { experiments })
    }

    /// Collects already separated experiments, keeping the provided order.
    pub fn from_experiments<I>(items: I) -> Result<Self, SeqError>
    where
        I: IntoIterator<Item = SingleExperiment>,
    {
        let mut experiments = IndexMap::new();
        for experiment in items {
            let id = experiment.id.clone().ok_or_else(|| {
                schema_error(
                    "table.null_experiment",
                    "experiments without an identifier cannot be keyed",
                )
            })?;
            if experiments.contains_key(&id) {
                return Err(SeqError::Schema(
                    ErrorInfo::new("experiment.duplicate", "experiment supplied twice")
                        .with_context("experiment", id),
                ));
            }
            experiments.insert(id, experiment);
        }
        Ok(Self { experiments })
    }

    /// Looks up an experiment by identifier.
    pub fn get(&self, id: &str) -> Option<&SingleExperiment> {
        self.experiments.get(id)
    }

    /// Iterates over experiments in their natural order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &SingleExperiment)> {
        self.experiments
            .iter()
            .map(|(id, experiment)| (id.as_str(), experiment))
    }

    /// Experiment identifiers in their natural order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.experiments.keys().map(String::as_str)
    }

    /// Number of experiments.
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Returns true when no experiment is held.
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}
