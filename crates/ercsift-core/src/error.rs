//! Error types for registry construction and config loading.

use thiserror::Error;

/// Errors from building or loading a signature registry.
///
/// Every variant is fatal to a run: nothing downstream can classify without
/// a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Standard '{name}' is registered more than once")]
    DuplicateStandardName { name: String },

    #[error("Config parse error: {reason}")]
    ConfigParse { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigParse {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigParse {
            reason: e.to_string(),
        }
    }
}
