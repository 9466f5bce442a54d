use legalink_scanner::ScanError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a run. Each maps to a distinct process exit code.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("FAILED to retrieve document listing ({url}): {reason}")]
    ListingUnavailable { url: String, reason: String },

    #[error("FAILED to retrieve source ({url}) due to {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Local path({}) does not exist", .0.display())]
    LocalPathMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl CheckError {
    pub fn code(&self) -> i32 {
        match self {
            CheckError::ListingUnavailable { .. } | CheckError::FetchFailed { .. } => 3,
            CheckError::LocalPathMissing(_) => 4,
            CheckError::Io(_) => 5,
            CheckError::Scan(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
