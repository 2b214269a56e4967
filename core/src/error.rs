use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Series length mismatch: {predicted} predicted vs {actual} actual")]
    SeriesLengthMismatch { predicted: usize, actual: usize },

    #[error("Unknown segment '{0}'")]
    UnknownSegment(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
