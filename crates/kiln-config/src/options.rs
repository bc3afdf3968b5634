//! Build option matrix
//!
//! Declares the recognized boolean build options, their defaults, and their
//! per-platform availability. Pruning is a pure function over the platform
//! settings: an option pruned for a platform never receives a value and
//! cannot be read back from the resolved set.

use crate::settings::{Compiler, PlatformSettings};
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A recognized build option
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OptionName {
    /// Instrumented coverage build
    Coverage,
    /// Memory sanitizer instrumentation
    Sanitize,
}

impl OptionName {
    /// Parse option from its identifier
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "coverage" => Ok(Self::Coverage),
            "sanitize" => Ok(Self::Sanitize),
            other => Err(ConfigError::UnknownOption(other.to_string())),
        }
    }

    /// Get option name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Coverage => "coverage",
            Self::Sanitize => "sanitize",
        }
    }

    /// All declared options, in declaration order
    pub fn all() -> [OptionName; 2] {
        [Self::Coverage, Self::Sanitize]
    }

    /// Fixed default value for this option
    pub fn default_value(&self) -> bool {
        match self {
            Self::Coverage => false,
            Self::Sanitize => false,
        }
    }
}

impl std::fmt::Display for OptionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The declared option set and its platform pruning rules
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionMatrix;

impl OptionMatrix {
    /// Create the option matrix
    pub fn new() -> Self {
        Self
    }

    /// Options valid for the given platform
    ///
    /// Coverage instrumentation rides on gcc's gcov toolchain; the option
    /// disappears entirely under any other compiler.
    pub fn available(&self, settings: &PlatformSettings) -> BTreeSet<OptionName> {
        let mut available: BTreeSet<OptionName> = OptionName::all().into_iter().collect();
        if settings.compiler != Compiler::Gcc {
            available.remove(&OptionName::Coverage);
        }
        available
    }

    /// Resolve requested values against the platform
    ///
    /// Requested values for pruned options are dropped silently (a no-op,
    /// not an error). Available options absent from the request take their
    /// fixed defaults.
    pub fn resolve(
        &self,
        settings: &PlatformSettings,
        requested: &BTreeMap<OptionName, bool>,
    ) -> OptionSet {
        let mut values = BTreeMap::new();
        for option in self.available(settings) {
            let value = requested
                .get(&option)
                .copied()
                .unwrap_or_else(|| option.default_value());
            values.insert(option, value);
        }
        OptionSet { values }
    }
}

/// Resolved option values for one invocation
///
/// Holds only the options available on the target platform. A pruned option
/// is absent: [`get`](Self::get) returns `None` for it and
/// [`enabled`](Self::enabled) returns false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    values: BTreeMap<OptionName, bool>,
}

impl OptionSet {
    /// An option set with nothing available
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Whether the option is available on this platform
    pub fn contains(&self, option: OptionName) -> bool {
        self.values.contains_key(&option)
    }

    /// Value of an available option; `None` when pruned
    pub fn get(&self, option: OptionName) -> Option<bool> {
        self.values.get(&option).copied()
    }

    /// True only when the option is available AND set
    pub fn enabled(&self, option: OptionName) -> bool {
        self.get(option).unwrap_or(false)
    }

    /// Iterate over available options and their values
    pub fn iter(&self) -> impl Iterator<Item = (OptionName, bool)> + '_ {
        self.values.iter().map(|(option, value)| (*option, *value))
    }

    /// Number of available options
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no option is available
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for OptionSet {
    fn default() -> Self {
        Self::empty()
    }
}
