//! Package tree collection
//!
//! Applies a packaging plan to the build outputs, copying matched files into
//! the canonical package layout. Invoked only after the native build has
//! fully succeeded; the packager never invents files and treats zero-match
//! rules as no-ops.

use crate::rules::{PackagePlan, PackageRule};
use crate::{PackageError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of applying a packaging plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTree {
    /// Package root the files were collected into
    pub root: PathBuf,
    /// Destination-relative paths in copy order; a path may appear more
    /// than once when a later rule overwrote it
    pub files: Vec<PathBuf>,
}

impl PackageTree {
    /// Number of copies performed
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether the tree contains the given destination-relative path
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.iter().any(|f| f == path.as_ref())
    }
}

/// Copies build outputs into the canonical package layout
pub struct Packager {
    /// Root of the build tree the rules search under
    source_root: PathBuf,
    /// Package root the rules copy into
    dest_root: PathBuf,
    /// Verbose output
    verbose: bool,
}

impl Packager {
    /// Create a packager collecting from `source_root` into `dest_root`
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            verbose: false,
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Apply the plan's rules in declaration order
    ///
    /// A rule matching no files is a no-op. Later copies may overwrite
    /// earlier ones at the same destination path.
    pub fn collect(&self, plan: &PackagePlan) -> Result<PackageTree> {
        let mut files = Vec::new();

        for rule in plan.rules() {
            let copied = self.apply_rule(rule)?;
            if copied.is_empty() {
                if self.verbose {
                    println!("Nothing matched '{}', skipping", rule.pattern);
                }
                continue;
            }
            files.extend(copied);
        }

        Ok(PackageTree {
            root: self.dest_root.clone(),
            files,
        })
    }

    fn apply_rule(&self, rule: &PackageRule) -> Result<Vec<PathBuf>> {
        let search_root = match &rule.source_dir {
            Some(dir) => self.source_root.join(dir),
            None => self.source_root.clone(),
        };

        // A missing search root means the build produced nothing for this
        // file class; the rule is a no-op.
        if !search_root.exists() {
            return Ok(Vec::new());
        }

        let mut copied = Vec::new();

        for entry in WalkDir::new(&search_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            // The destination may live under the search root; never
            // re-collect already-packaged output.
            if entry.path().starts_with(&self.dest_root) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !rule.matches(&file_name) {
                continue;
            }

            let dest_rel = if rule.keep_path {
                let relative = match entry.path().strip_prefix(&search_root) {
                    Ok(relative) => relative,
                    Err(_) => continue,
                };
                rule.dest_dir.join(relative)
            } else {
                rule.dest_dir.join(entry.file_name())
            };

            let dest_path = self.dest_root.join(&dest_rel);
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent).map_err(|e| PackageError::io(parent, e))?;
            }
            fs::copy(entry.path(), &dest_path).map_err(|e| PackageError::io(&dest_path, e))?;

            if self.verbose {
                println!("Packaged {}", dest_rel.display());
            }
            copied.push(dest_rel);
        }

        Ok(copied)
    }
}
