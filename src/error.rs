use thiserror::Error;

use crate::estimator::EstimatorError;
use crate::store::StoreError;
use crate::table::TableError;

/// Failures surfaced to the dashboard and CLI.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetched data does not carry the expected fields.
    #[error(transparent)]
    SchemaMismatch(#[from] TableError),
    /// Too few complete rows to fit the model.
    #[error("Not enough complete rows to train: {rows} available, {required} required")]
    InsufficientData { rows: usize, required: usize },
    /// A user-supplied value could not be used.
    #[error("Invalid value {value:?} for {field}")]
    InvalidInput { field: &'static str, value: String },
    /// The document store could not be reached or answered with an error.
    #[error("Document store unavailable: {0}")]
    UpstreamUnavailable(#[from] StoreError),
    /// Model training rejected its inputs.
    #[error("Model training failed: {0}")]
    Training(String),
}

impl From<EstimatorError> for PipelineError {
    fn from(err: EstimatorError) -> Self {
        match err {
            EstimatorError::InsufficientData { rows, required } => {
                PipelineError::InsufficientData { rows, required }
            }
            EstimatorError::InvalidInput { field, value } => {
                PipelineError::InvalidInput { field, value }
            }
            EstimatorError::Training(message) => PipelineError::Training(message),
        }
    }
}

impl PipelineError {
    /// Short label for the error kind, used in logs and the UI.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::SchemaMismatch(_) => "schema_mismatch",
            PipelineError::InsufficientData { .. } => "insufficient_data",
            PipelineError::InvalidInput { .. } => "invalid_input",
            PipelineError::UpstreamUnavailable(_) => "upstream_unavailable",
            PipelineError::Training(_) => "training",
        }
    }
}
