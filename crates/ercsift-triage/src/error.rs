//! Triage and storage error types.

use std::path::PathBuf;

use ercsift_explorer::ExplorerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("address {address:?} cannot be used as a file name")]
    InvalidAddress { address: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum TriageError {
    #[error(transparent)]
    Explorer(#[from] ExplorerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("storage task failed: {0}")]
    Task(String),
}
