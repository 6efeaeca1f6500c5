//! `SourceStore`: one `.sol` file per contract, never overwritten.
//!
//! Saving `0xabc` twice yields `0xabc.sol` then `0xabc_1.sol`. A name is
//! claimed by hard-linking a fully written temporary file into place; the
//! link fails if the target exists, so concurrent writers for the same
//! address each get their own name and no reader ever sees a partial file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct SourceStore {
    root: PathBuf,
}

impl SourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `source` verbatim under the first free name for `address`.
    pub fn save(&self, address: &str, source: &str) -> Result<PathBuf, StoreError> {
        validate_address(address)?;
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let tmp = self.root.join(format!(".{address}.{}.tmp", Uuid::new_v4().simple()));
        write_new(&tmp, source)?;

        let claimed = self.claim(&tmp, address);
        if let Err(e) = fs::remove_file(&tmp) {
            warn!(path = %tmp.display(), error = %e, "failed to remove temporary source file");
        }
        claimed
    }

    fn claim(&self, tmp: &Path, address: &str) -> Result<PathBuf, StoreError> {
        let mut suffix = 0u64;
        loop {
            let candidate = self.root.join(candidate_name(address, suffix));
            match fs::hard_link(tmp, &candidate) {
                Ok(()) => {
                    if suffix > 0 {
                        info!(
                            address,
                            path = %candidate.display(),
                            suffix,
                            "FilenameCollisionResolved"
                        );
                    }
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => return Err(StoreError::io(candidate, e)),
            }
        }
    }
}

fn candidate_name(address: &str, suffix: u64) -> String {
    if suffix == 0 {
        format!("{address}.sol")
    } else {
        format!("{address}_{suffix}.sol")
    }
}

fn write_new(path: &Path, content: &str) -> Result<(), StoreError> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| StoreError::io(path, e))
}

fn validate_address(address: &str) -> Result<(), StoreError> {
    let bad = address.is_empty()
        || address.starts_with('.')
        || address.chars().any(|c| matches!(c, '/' | '\\' | '\0' | ':'));
    if bad {
        return Err(StoreError::InvalidAddress {
            address: address.to_string(),
        });
    }
    Ok(())
}
