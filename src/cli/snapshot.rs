//! Recorded test snapshots: the identity, outcome and properties of one
//! finished test, as written by a host adapter for later rendering.
//!
//! ```yaml
//! identity:
//!   id: "0-1001"
//!   name: Fail_WithAttributes
//! outcome:
//!   status: Failed
//!   message: expected 2, got 3
//! properties:
//!   - key: Priority
//!     values: [1]
//!   - key: Category
//!     values: [Integration, Smoke]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::diagnostics::{Result, VerdictError};
use crate::record::{HostOutcome, TestIdentity};
use crate::store::PropertyBag;

const SNAPSHOT_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub identity: TestIdentity,
    pub outcome: HostOutcome,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl Snapshot {
    /// Parses a snapshot document. JSON is accepted as a subset of YAML.
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).map_err(|e| VerdictError::snapshot(path, e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| VerdictError::snapshot(path, e))?;
        Self::parse(path, &contents)
    }
}

/// Resolves `root` to the snapshot files it names.
///
/// A file is returned as is. A directory is walked recursively and its
/// snapshot files are returned sorted, so output order is deterministic.
pub fn discover_snapshot_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| VerdictError::snapshot(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_snapshot_file(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

fn is_snapshot_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SNAPSHOT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
