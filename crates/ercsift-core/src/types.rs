//! Per-contract records produced and consumed by the pipeline stages.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of leading bytecode characters kept for display.
pub const DEFAULT_PREVIEW_LEN: usize = 10;

/// Outcome of classifying one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub address: String,
    /// Full bytecode as supplied
    pub bytecode: String,
    /// Matched standard names, in registry order
    pub matched_standards: Vec<String>,
    /// Leading characters of `bytecode`, for display only
    pub bytecode_preview: String,
}

impl ClassificationResult {
    pub fn new(
        address: impl Into<String>,
        bytecode: impl Into<String>,
        matched_standards: Vec<String>,
        preview_len: usize,
    ) -> Self {
        let bytecode = bytecode.into();
        let bytecode_preview = bytecode.chars().take(preview_len).collect();
        Self {
            address: address.into(),
            bytecode,
            matched_standards,
            bytecode_preview,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matched_standards.iter().any(|m| m == name)
    }
}

/// Transaction activity of one address, as reported by the explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub address: String,
    pub transaction_count: u64,
    /// Unix timestamps (seconds), in the order the explorer returned them
    pub timestamps: Vec<i64>,
}

impl ActivityRecord {
    pub fn new(address: impl Into<String>, timestamps: Vec<i64>) -> Self {
        Self {
            address: address.into(),
            transaction_count: timestamps.len() as u64,
            timestamps,
        }
    }
}

/// Verified source persisted for a triaged contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceArtifact {
    pub address: String,
    #[serde(skip)]
    pub source_text: String,
    /// Path the source was written to; never reused by a later write
    pub stored_path: PathBuf,
}

impl SourceArtifact {
    /// File name component of `stored_path`.
    pub fn stored_filename(&self) -> Option<&str> {
        self.stored_path.file_name().and_then(|n| n.to_str())
    }
}
