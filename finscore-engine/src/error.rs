//! Engine errors and data issues.
//!
//! Only configuration problems abort an evaluation. Missing or degenerate
//! inputs are contained: the affected model reports an explicit outcome and
//! the evaluation carries a [`DataIssue`] describing what was skipped.

use finscore_common::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that reject an evaluation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration failed validation
    #[error("invalid scoring configuration: {0}")]
    Configuration(#[from] ValidationError),
}

/// Non-fatal input problem found while evaluating a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    /// A model lacked required fields
    MissingInput { model: String, fields: Vec<String> },
    /// Inputs were present but mathematically unusable
    DegenerateInput { model: String, reason: String },
}

impl DataIssue {
    pub fn model(&self) -> &str {
        match self {
            DataIssue::MissingInput { model, .. } | DataIssue::DegenerateInput { model, .. } => {
                model
            }
        }
    }
}

/// Outcome of a model that may lack data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome<T> {
    /// The model ran
    Computed(T),
    /// Required inputs were absent
    InsufficientData { missing: Vec<String> },
    /// Inputs were present but unusable (zero denominator, negative cash flow, ...)
    Degenerate { reason: String },
}

impl<T> ModelOutcome<T> {
    /// Insufficient-data outcome from static field names.
    pub fn missing(fields: &[&str]) -> Self {
        ModelOutcome::InsufficientData {
            missing: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        ModelOutcome::Degenerate {
            reason: reason.into(),
        }
    }

    /// Chain a dependent model, carrying a non-computed outcome through.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> ModelOutcome<U>) -> ModelOutcome<U> {
        match self {
            ModelOutcome::Computed(value) => f(value),
            ModelOutcome::InsufficientData { missing } => ModelOutcome::InsufficientData { missing },
            ModelOutcome::Degenerate { reason } => ModelOutcome::Degenerate { reason },
        }
    }

    pub fn computed(&self) -> Option<&T> {
        match self {
            ModelOutcome::Computed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, ModelOutcome::Computed(_))
    }

    /// Data issue describing why the model did not run, tagged with `model`.
    pub fn issue(&self, model: &str) -> Option<DataIssue> {
        match self {
            ModelOutcome::Computed(_) => None,
            ModelOutcome::InsufficientData { missing } => Some(DataIssue::MissingInput {
                model: model.to_string(),
                fields: missing.clone(),
            }),
            ModelOutcome::Degenerate { reason } => Some(DataIssue::DegenerateInput {
                model: model.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Names of the fields whose value is absent.
pub(crate) fn missing_fields<'a>(fields: &[(&'a str, Option<f64>)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect()
}
