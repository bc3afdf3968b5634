//! Kiln Packaging
//!
//! Declarative side of the orchestrator: the recipe (package identity plus
//! the ordered external requirement list), the packaging rules that collect
//! build outputs into the canonical `include/` + `lib/` tree, and the
//! consumer-facing link metadata emitted after a successful build.
//!
//! Nothing here resolves or fetches dependencies; the requirement list is
//! exported for an external package manager to satisfy before the build
//! runs.

pub mod info;
pub mod packager;
pub mod recipe;
pub mod rules;

pub use info::{PackageInfo, COVERAGE_RUNTIME_LIB};
pub use packager::{PackageTree, Packager};
pub use recipe::{Recipe, Requirement};
pub use rules::{PackagePlan, PackageRule};

use std::path::PathBuf;

/// Packaging errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Failed to parse recipe: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize recipe: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to serialize package info: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl PackageError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackageError>;
