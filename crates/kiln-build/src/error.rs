/// Build orchestration error types
use crate::driver::BuildStep;
use kiln_config::ConfigError;
use kiln_package::PackageError;
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{step} step failed with exit code {exit_code}: {output}")]
    StepFailed {
        step: BuildStep,
        exit_code: i32,
        output: String,
    },

    #[error("Failed to launch {step} step: {error}")]
    StepSpawn { step: BuildStep, error: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Packaging error: {0}")]
    Package(#[from] PackageError),

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// Create a step failure with captured output
    pub fn step_failed(step: BuildStep, exit_code: i32, output: impl Into<String>) -> Self {
        Self::StepFailed {
            step,
            exit_code,
            output: output.into(),
        }
    }

    /// Create a step launch error
    pub fn step_spawn(step: BuildStep, error: impl ToString) -> Self {
        Self::StepSpawn {
            step,
            error: error.to_string(),
        }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// The failing step, when this error identifies one
    pub fn step(&self) -> Option<BuildStep> {
        match self {
            Self::StepFailed { step, .. } | Self::StepSpawn { step, .. } => Some(*step),
            _ => None,
        }
    }
}
