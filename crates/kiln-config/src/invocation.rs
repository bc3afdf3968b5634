//! Invocation files (kiln.toml)
//!
//! The wrapping tool hands the orchestrator its platform settings and
//! requested option values through a small TOML document; kiln owns no CLI
//! parsing of its own.
//!
//! ```toml
//! [platform]
//! compiler = "gcc"
//! build_type = "Release"
//!
//! [options]
//! coverage = true
//! ```

use crate::options::OptionName;
use crate::settings::PlatformSettings;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One build invocation as handed over by the wrapping tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Invocation {
    /// Target platform
    pub platform: PlatformSettings,

    /// Requested option values; unavailable options are pruned during
    /// resolution, missing ones take their defaults
    #[serde(default)]
    pub options: BTreeMap<OptionName, bool>,
}

impl Invocation {
    /// Create an invocation with no options requested
    pub fn new(platform: PlatformSettings) -> Self {
        Self {
            platform,
            options: BTreeMap::new(),
        }
    }

    /// Request an option value
    pub fn with_option(mut self, option: OptionName, value: bool) -> Self {
        self.options.insert(option, value);
        self
    }

    /// Parse an invocation from TOML
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load an invocation from a file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }
}
