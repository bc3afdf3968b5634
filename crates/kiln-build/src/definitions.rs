//! Build definition translation
//!
//! Maps platform settings and resolved options onto the definition set the
//! native build system consumes, and selects the test target to invoke.
//! Translation is a pure function: identical inputs always yield identical
//! output, and options pruned for the platform leave the baseline untouched.

use kiln_config::{BuildType, OptionName, OptionSet, PlatformSettings};
use serde::{Deserialize, Serialize};

/// Definition key for the coverage instrumentation toggle
pub const COVERAGE_DEFINE: &str = "BUILD_COVERAGE";
/// Definition key for the memory sanitizer toggle
pub const SANITIZER_DEFINE: &str = "MEMORY_SANITIZER_ON";
/// Definition key for the explicit build type override
pub const BUILD_TYPE_DEFINE: &str = "CMAKE_BUILD_TYPE";
/// Name of the coverage aggregation test target
pub const COVERAGE_TEST_TARGET: &str = "coverage";

/// On/off state of a build definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    /// Whether the toggle is on
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Convert from a boolean option value
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }

    /// The form the native build system expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl std::fmt::Display for Toggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition set handed to the native build system
///
/// Every field has an explicit default: toggles start off and no build-type
/// override is set, so a definition is always defined even when no option
/// forces a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDefinitions {
    /// Coverage instrumentation toggle
    pub coverage: Toggle,
    /// Memory sanitizer toggle
    pub sanitizer: Toggle,
    /// Explicit build type, set only when the ambient default must be
    /// overridden
    pub build_type: Option<BuildType>,
}

impl Default for BuildDefinitions {
    fn default() -> Self {
        Self {
            coverage: Toggle::Off,
            sanitizer: Toggle::Off,
            build_type: None,
        }
    }
}

impl BuildDefinitions {
    /// Render ordered key/value pairs for the configure step
    pub fn defines(&self) -> Vec<(String, String)> {
        let mut defines = vec![
            (COVERAGE_DEFINE.to_string(), self.coverage.to_string()),
            (SANITIZER_DEFINE.to_string(), self.sanitizer.to_string()),
        ];
        if let Some(build_type) = self.build_type {
            defines.push((BUILD_TYPE_DEFINE.to_string(), build_type.name().to_string()));
        }
        defines
    }
}

/// Outcome of translating settings and options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedConfig {
    /// Definitions for the configure step
    pub definitions: BuildDefinitions,
    /// Named test target to invoke; the build's default target when absent
    pub test_target: Option<String>,
}

/// Translate settings and resolved options into build definitions
///
/// The option set must already be resolved against the platform: a pruned
/// option is absent there and therefore cannot raise its definition here.
pub fn translate(settings: &PlatformSettings, options: &OptionSet) -> TranslatedConfig {
    let mut definitions = BuildDefinitions::default();
    let mut test_target = None;

    if options.enabled(OptionName::Coverage) {
        definitions.coverage = Toggle::On;
        test_target = Some(COVERAGE_TEST_TARGET.to_string());
    }

    if options.enabled(OptionName::Sanitize) {
        definitions.sanitizer = Toggle::On;
    }

    if settings.build_type.is_debug() {
        definitions.build_type = Some(BuildType::Debug);
    }

    TranslatedConfig {
        definitions,
        test_target,
    }
}
