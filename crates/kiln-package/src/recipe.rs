//! Recipe metadata and the external requirement list
//!
//! Purely declarative: package identity plus the ordered list of external
//! libraries an outside package manager must resolve before the build runs.
//! Requirement-name uniqueness is that resolver's concern, not ours.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// External library requirement, resolved by the package manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Library name
    pub name: String,
    /// Exact version to resolve
    pub version: String,
    /// Distribution channel (user/channel)
    pub channel: String,
}

impl Requirement {
    /// Create a new requirement
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            channel: channel.into(),
        }
    }

    /// Render the `name/version@channel` reference form the resolver expects
    pub fn reference(&self) -> String {
        format!("{}/{}@{}", self.name, self.version, self.channel)
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reference())
    }
}

/// Package recipe: identity, metadata, and requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Package name
    pub name: String,
    /// Package version
    pub version: semver::Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Patterns naming the source payload exported alongside the recipe
    #[serde(default)]
    pub export_sources: Vec<String>,
    /// External requirements, in declaration order
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

impl Recipe {
    /// Parse recipe from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load recipe from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Serialize to TOML string
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The shipped recipe for the sisl data-structures library
    pub fn builtin() -> Self {
        Self {
            name: "sisl".to_string(),
            version: semver::Version::new(0, 1, 7),
            description: Some("Sisl library for fast data structures, utilities".to_string()),
            license: Some("Proprietary".to_string()),
            url: Some("https://github.corp.ebay.com/Symbiosis/sisl".to_string()),
            export_sources: vec![
                "CMakeLists.txt".to_string(),
                "cmake/*".to_string(),
                "src/*".to_string(),
            ],
            requires: vec![
                Requirement::new("sds_logging", "3.4.2", "sds/testing"),
                Requirement::new("benchmark", "1.4.1", "oss/stable"),
                Requirement::new("boost_intrusive", "1.67.0", "bincrafters/stable"),
                Requirement::new("boost_dynamic_bitset", "1.67.0", "bincrafters/stable"),
                Requirement::new("boost_filesystem", "1.67.0", "bincrafters/stable"),
                Requirement::new("boost_preprocessor", "1.67.0", "bincrafters/stable"),
                Requirement::new("gtest", "1.8.1", "bincrafters/stable"),
                Requirement::new("evhtp", "1.2.16", "oss/stable"),
                Requirement::new("userspace-rcu", "0.10.1", "oss/stable"),
                Requirement::new("prometheus-cpp", "0.1.2", "oss/stable"),
                Requirement::new("jsonformoderncpp", "3.1.2", "vthiery/stable"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_reference() {
        let req = Requirement::new("gtest", "1.8.1", "bincrafters/stable");
        assert_eq!(req.reference(), "gtest/1.8.1@bincrafters/stable");
        assert_eq!(req.to_string(), "gtest/1.8.1@bincrafters/stable");
    }

    #[test]
    fn test_builtin_recipe_identity() {
        let recipe = Recipe::builtin();
        assert_eq!(recipe.name, "sisl");
        assert_eq!(recipe.version.to_string(), "0.1.7");
        assert_eq!(recipe.license.as_deref(), Some("Proprietary"));
    }

    #[test]
    fn test_builtin_recipe_requirements_ordered() {
        let recipe = Recipe::builtin();
        assert_eq!(recipe.requires.len(), 11);
        assert_eq!(recipe.requires[0].name, "sds_logging");
        assert_eq!(recipe.requires[10].name, "jsonformoderncpp");
        assert_eq!(
            recipe.requires[8].reference(),
            "userspace-rcu/0.10.1@oss/stable"
        );
    }

    #[test]
    fn test_builtin_export_sources() {
        let recipe = Recipe::builtin();
        assert_eq!(
            recipe.export_sources,
            vec!["CMakeLists.txt", "cmake/*", "src/*"]
        );
    }

    #[test]
    fn test_parse_minimal_recipe() {
        let toml = r#"
            name = "mylib"
            version = "1.0.0"
        "#;

        let recipe = Recipe::from_str(toml).unwrap();
        assert_eq!(recipe.name, "mylib");
        assert!(recipe.requires.is_empty());
    }

    #[test]
    fn test_parse_recipe_with_requirements() {
        let toml = r#"
            name = "mylib"
            version = "1.2.3"
            license = "MIT"

            [[requires]]
            name = "gtest"
            version = "1.8.1"
            channel = "bincrafters/stable"
        "#;

        let recipe = Recipe::from_str(toml).unwrap();
        assert_eq!(recipe.requires.len(), 1);
        assert_eq!(recipe.requires[0].reference(), "gtest/1.8.1@bincrafters/stable");
    }

    #[test]
    fn test_recipe_round_trip() {
        let recipe = Recipe::builtin();
        let rendered = recipe.to_string().unwrap();
        let reparsed = Recipe::from_str(&rendered).unwrap();
        assert_eq!(recipe, reparsed);
    }

    #[test]
    fn test_duplicate_requirement_names_accepted() {
        // Uniqueness is the external resolver's concern; declaration order
        // is preserved as-is.
        let toml = r#"
            name = "mylib"
            version = "1.0.0"

            [[requires]]
            name = "gtest"
            version = "1.8.1"
            channel = "bincrafters/stable"

            [[requires]]
            name = "gtest"
            version = "1.10.0"
            channel = "oss/stable"
        "#;

        let recipe = Recipe::from_str(toml).unwrap();
        assert_eq!(recipe.requires.len(), 2);
        assert_eq!(recipe.requires[0].version, "1.8.1");
        assert_eq!(recipe.requires[1].version, "1.10.0");
    }
}
