//! Consumer-facing package metadata
//!
//! The link-library list downstream consumers read back from a published
//! package. Finalized exactly once, after packaging; the persisted file is
//! the only state that outlives the orchestrator process.

use crate::{PackageError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Runtime library consumers must link when coverage instrumentation was on
pub const COVERAGE_RUNTIME_LIB: &str = "gcov";

/// Link requirements exported to downstream consumers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Link-library names, in link order
    pub libs: Vec<String>,
}

impl PackageInfo {
    /// Create empty package info
    pub fn new() -> Self {
        Self { libs: Vec::new() }
    }

    /// Seed the info with the packaged library's own link name
    pub fn for_library(name: impl Into<String>) -> Self {
        Self {
            libs: vec![name.into()],
        }
    }

    /// Append a link library
    pub fn push_lib(&mut self, name: impl Into<String>) {
        self.libs.push(name.into());
    }

    /// Append the coverage runtime when the coverage option was active
    ///
    /// Runs once, after packaging; without coverage the list is unchanged.
    pub fn finalize(mut self, coverage: bool) -> Self {
        if coverage {
            self.libs.push(COVERAGE_RUNTIME_LIB.to_string());
        }
        self
    }

    /// Persist as JSON for downstream consumers
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PackageError::io(path, e))?;
        Ok(())
    }

    /// Read persisted package info back
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PackageError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_without_coverage_is_unchanged() {
        let info = PackageInfo::for_library("sisl").finalize(false);
        assert_eq!(info.libs, vec!["sisl"]);
    }

    #[test]
    fn test_finalize_with_coverage_appends_runtime() {
        let info = PackageInfo::for_library("sisl").finalize(true);
        assert_eq!(info.libs, vec!["sisl", "gcov"]);
    }

    #[test]
    fn test_coverage_runtime_appended_last() {
        let mut info = PackageInfo::for_library("sisl");
        info.push_lib("sisl_metrics");
        let info = info.finalize(true);
        assert_eq!(info.libs.last().map(String::as_str), Some(COVERAGE_RUNTIME_LIB));
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiln-info.json");

        let info = PackageInfo::for_library("sisl").finalize(true);
        info.write_to(&path).unwrap();

        let restored = PackageInfo::from_file(&path).unwrap();
        assert_eq!(restored, info);
    }
}
