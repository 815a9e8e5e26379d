use std::{error::Error, fmt, path::PathBuf};

use ml_core::{ArtifactError, MlError};
use polars::prelude::PolarsError;

/// The pipeline's result type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything that aborts a training run.
#[derive(Debug)]
pub enum PipelineError {
    /// The configuration cannot describe a valid run.
    InvalidConfig(String),
    /// The input file could not be opened or parsed as CSV.
    Read { path: PathBuf, source: PolarsError },
    /// Column extraction or casting failed.
    Polars(PolarsError),
    /// Required columns are absent from the input.
    MissingColumns(Vec<String>),
    /// A required column has no numeric value to derive a median from.
    EmptyColumn(&'static str),
    /// Too few rows survive cleaning to build both splits.
    NotEnoughRows { got: usize, needed: usize },
    Ml(MlError),
    Artifact(ArtifactError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Read { path, source } => {
                write!(f, "cannot read dataset {}: {source}", path.display())
            }
            Self::Polars(e) => write!(f, "dataframe error: {e}"),
            Self::MissingColumns(cols) => {
                write!(f, "missing required columns: {}", cols.join(", "))
            }
            Self::EmptyColumn(col) => write!(f, "column '{col}' has no numeric values"),
            Self::NotEnoughRows { got, needed } => write!(
                f,
                "not enough rows after cleaning: got {got}, need at least {needed}"
            ),
            Self::Ml(e) => write!(f, "model error: {e}"),
            Self::Artifact(e) => write!(f, "artifact error: {e}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Polars(e) => Some(e),
            Self::Ml(e) => Some(e),
            Self::Artifact(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PolarsError> for PipelineError {
    fn from(value: PolarsError) -> Self {
        Self::Polars(value)
    }
}

impl From<MlError> for PipelineError {
    fn from(value: MlError) -> Self {
        Self::Ml(value)
    }
}

impl From<ArtifactError> for PipelineError {
    fn from(value: ArtifactError) -> Self {
        Self::Artifact(value)
    }
}
