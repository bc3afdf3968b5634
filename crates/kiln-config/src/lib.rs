//! Kiln Configuration
//!
//! Provides the invocation-time configuration for the build orchestrator:
//! - Platform settings (compiler identity, build type)
//! - The build option matrix with per-platform pruning
//! - Invocation files handed over by the wrapping tool (kiln.toml)
//!
//! Settings and resolved option values are fixed at invocation start and
//! never mutated afterwards.
//!
//! # Example
//!
//! ```
//! use kiln_config::{BuildType, Compiler, OptionMatrix, OptionName, PlatformSettings};
//!
//! let settings = PlatformSettings::new(Compiler::Gcc, BuildType::Release);
//! let options = OptionMatrix::new().resolve(&settings, &Default::default());
//! assert!(!options.enabled(OptionName::Coverage));
//! ```

pub mod invocation;
pub mod options;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invocation file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read invocation file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Unknown build option: {0}")]
    UnknownOption(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use invocation::Invocation;
pub use options::{OptionMatrix, OptionName, OptionSet};
pub use settings::{BuildType, Compiler, PlatformSettings};
