//! Platform settings
//!
//! The compiler identity and build type one orchestrator invocation targets.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Compiler identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Compiler {
    /// GNU compiler collection
    Gcc,
    /// LLVM clang
    Clang,
    /// Microsoft Visual C++
    Msvc,
    /// Any other compiler identifier
    Other(String),
}

impl Compiler {
    /// Parse compiler from an identifier string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "gcc" => Self::Gcc,
            "clang" => Self::Clang,
            "msvc" => Self::Msvc,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get compiler name
    pub fn name(&self) -> &str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::Msvc => "msvc",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Compilers travel as plain identifier strings in invocation files.
impl Serialize for Compiler {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Compiler {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Compiler::from_str(&s))
    }
}

/// Build type requested from the native build system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// Parse build type from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            "relwithdebinfo" => Ok(Self::RelWithDebInfo),
            "minsizerel" => Ok(Self::MinSizeRel),
            other => Err(ConfigError::InvalidValue {
                field: "build_type".to_string(),
                reason: format!("unrecognized build type '{}'", other),
            }),
        }
    }

    /// Get the name the native build system expects
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }

    /// Whether this is the debug variant
    pub fn is_debug(&self) -> bool {
        matches!(self, Self::Debug)
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for BuildType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for BuildType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BuildType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Platform description for one build invocation
///
/// Immutable once constructed; every downstream decision (option pruning,
/// definition translation) is a pure function of these two fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSettings {
    /// Compiler identity
    pub compiler: Compiler,
    /// Build type
    pub build_type: BuildType,
}

impl PlatformSettings {
    /// Create new platform settings
    pub fn new(compiler: Compiler, build_type: BuildType) -> Self {
        Self {
            compiler,
            build_type,
        }
    }
}
