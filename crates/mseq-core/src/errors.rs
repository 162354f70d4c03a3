//! Error taxonomy for sequence extraction and comparison.
//!
//! Every failure carries an [`ErrorInfo`] with a stable dotted code so that
//! callers batching many experiments can group failures without parsing
//! messages.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic carried by a [`SeqError`]: what went wrong with which table,
/// column or experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Dotted code such as `table.missing_column`.
    pub code: String,
    /// Diagnostic naming the offending input.
    pub message: String,
    /// Offending columns, rows or experiment identifiers, keyed by kind.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// How to reshape the input so the operation succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Diagnostic with a code and message but no context yet.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records the offending item of a given kind (`column`, `row`, ...).
    pub fn with_context(mut self, kind: impl Into<String>, item: impl Into<String>) -> Self {
        self.context.insert(kind.into(), item.into());
        self
    }

    /// Attaches a fix suggestion.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " | context: [{}]", pairs.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, " | hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Canonical error type for sequence extraction and comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SeqError {
    /// A required column is missing or the table is malformed.
    #[error("schema error: {0}")]
    Schema(ErrorInfo),
    /// A comparison target has an unsupported shape.
    #[error("unsupported input: {0}")]
    UnsupportedInput(ErrorInfo),
    /// Mixed-experiment data was given to a single-experiment operation.
    #[error("multiple experiments: {0}")]
    MultiExperiment(ErrorInfo),
    /// Configuration, JSON and YAML decoding errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl SeqError {
    /// Returns the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SeqError::Schema(info)
            | SeqError::UnsupportedInput(info)
            | SeqError::MultiExperiment(info)
            | SeqError::Serde(info) => info,
        }
    }

    /// A required column is absent from the table.
    pub fn missing_column(column: &str) -> Self {
        SeqError::Schema(
            ErrorInfo::new(
                "table.missing_column",
                format!("required column `{column}` is not present"),
            )
            .with_context("column", column),
        )
    }

    /// A single-experiment operation received rows of several experiments.
    pub fn multiple_experiments<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let ids: Vec<&str> = ids.into_iter().map(|id| id.unwrap_or("<null>")).collect();
        SeqError::MultiExperiment(
            ErrorInfo::new(
                "experiment.multiple",
                format!("expected one experiment, found {}", ids.len()),
            )
            .with_context("experiments", ids.join(","))
            .with_hint("filter the table to a single experiment first"),
        )
    }

    /// A comparison target is neither a token list nor a record table.
    pub fn unsupported_target(reason: &str) -> Self {
        SeqError::UnsupportedInput(
            ErrorInfo::new(
                "compare.unsupported_target",
                format!("comparison target {reason}"),
            )
            .with_hint("pass a list of phase names or a single-experiment table"),
        )
    }

    /// A configuration or serialized payload failed to encode or decode.
    pub fn serde(code: &str, err: impl ToString) -> Self {
        SeqError::Serde(ErrorInfo::new(code, err.to_string()))
    }
}
