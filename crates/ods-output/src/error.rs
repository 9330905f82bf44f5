use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing a report.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The output file could not be created.
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a record or flushing failed.
    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush report: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;
