//! Error types for the correction pipeline

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorrectorError {
    /// Rejected before any work starts (e.g. an empty extension set)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport failure, including the per-request timeout
    #[error("request to inference endpoint failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("inference endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode inference response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("inference response carried no `response` field")]
    MissingResponse,
}

impl CorrectorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type Result<T, E = CorrectorError> = std::result::Result<T, E>;
