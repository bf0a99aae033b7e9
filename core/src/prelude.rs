use std::path::PathBuf;

/// Failure while reading or normalizing an airport dataset.
#[derive(thiserror::Error, Debug)]
pub enum DataLoadError {
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column '{column}'")]
    MissingColumn { column: String },
}

/// Common error type for every search operation.
#[derive(thiserror::Error, Debug)]
pub enum RangeError {
    #[error("data load failed: {0}")]
    DataLoad(#[from] DataLoadError),
    #[error("airport '{identifier}' not found in the dataset")]
    ReferenceNotFound { identifier: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type RangeResult<T> = Result<T, RangeError>;

pub(crate) fn ensure_non_negative(value: f64, what: &str) -> RangeResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RangeError::InvalidInput(format!(
            "{} must be a finite, non-negative number (got {})",
            what, value
        )));
    }
    Ok(())
}
