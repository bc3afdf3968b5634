//! Declarative package copy rules
//!
//! A packaging plan is a fixed, ordered list of copy rules applied after a
//! successful build. Rules never fail on zero matches; later rules may
//! overwrite earlier copies at the same destination path.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single copy instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRule {
    /// File-name glob (`*` and `?` wildcards), matched recursively under
    /// the rule's source root
    pub pattern: String,
    /// Subdirectory of the collection root to search; the root itself when
    /// absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    /// Destination directory, relative to the package root
    pub dest_dir: PathBuf,
    /// Preserve each match's relative path under the destination; flatten
    /// when false (collisions resolve last write wins)
    #[serde(default)]
    pub keep_path: bool,
}

impl PackageRule {
    /// Create a flattening rule rooted at the collection root
    pub fn new(pattern: impl Into<String>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            source_dir: None,
            dest_dir: dest_dir.into(),
            keep_path: false,
        }
    }

    /// Restrict matching to a subdirectory of the collection root
    pub fn with_source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(source_dir.into());
        self
    }

    /// Preserve relative paths under the destination
    pub fn with_keep_path(mut self, keep_path: bool) -> Self {
        self.keep_path = keep_path;
        self
    }

    /// Whether a file name matches this rule's pattern
    pub fn matches(&self, file_name: &str) -> bool {
        glob_match(&self.pattern, file_name)
    }
}

/// Ordered list of rules forming a packaging plan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackagePlan {
    rules: Vec<PackageRule>,
}

impl PackagePlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: PackageRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in application order
    pub fn rules(&self) -> &[PackageRule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the plan has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Canonical plan for a native library package
    ///
    /// Interface headers land under `include/` with their relative paths
    /// preserved; static archives, shared objects, import libraries and
    /// dynamic libraries are flattened into `lib/`.
    pub fn native_library() -> Self {
        Self::new()
            .with_rule(
                PackageRule::new("*.hpp", "include")
                    .with_source_dir("src")
                    .with_keep_path(true),
            )
            .with_rule(
                PackageRule::new("*.h", "include")
                    .with_source_dir("src")
                    .with_keep_path(true),
            )
            .with_rule(PackageRule::new("*.a", "lib"))
            .with_rule(PackageRule::new("*.lib", "lib"))
            .with_rule(PackageRule::new("*.so", "lib"))
            .with_rule(PackageRule::new("*.dll", "lib"))
            .with_rule(PackageRule::new("*.dylib", "lib"))
    }
}

/// Match a file name against a wildcard pattern
///
/// `*` matches any run of characters, `?` a single character. Matching is
/// case-sensitive and spans the whole name.
pub(crate) fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let mut p = 0;
    let mut n = 0;
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            mark = n;
            p += 1;
        } else if let Some(star_pos) = star {
            // Backtrack: let the last * swallow one more character
            p = star_pos + 1;
            mark += 1;
            n = mark;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }

    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match_extension() {
        assert!(glob_match("*.hpp", "metrics.hpp"));
        assert!(glob_match("*.hpp", "varlen_node.hpp"));
        assert!(!glob_match("*.hpp", "metrics.h"));
        assert!(!glob_match("*.h", "metrics.hpp"));
    }

    #[test]
    fn test_glob_match_literal_and_question_mark() {
        assert!(glob_match("libfoo.a", "libfoo.a"));
        assert!(!glob_match("libfoo.a", "libbar.a"));
        assert!(glob_match("lib?.so", "liba.so"));
        assert!(!glob_match("lib?.so", "libab.so"));
    }

    #[test]
    fn test_glob_match_multiple_stars() {
        assert!(glob_match("lib*metrics*.a", "libsisl_metrics_static.a"));
        assert!(!glob_match("lib*metrics*.a", "libsisl_btree.a"));
    }

    #[test]
    fn test_glob_match_whole_name() {
        // The suffix pattern must anchor at the end of the name
        assert!(!glob_match("*.so", "libfoo.so.1"));
        assert!(glob_match("*.so*", "libfoo.so.1"));
    }

    #[test]
    fn test_rule_matches() {
        let rule = PackageRule::new("*.a", "lib");
        assert!(rule.matches("libsisl.a"));
        assert!(!rule.matches("libsisl.so"));
    }

    #[test]
    fn test_native_library_plan_order() {
        let plan = PackagePlan::native_library();
        let patterns: Vec<&str> = plan.rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(
            patterns,
            vec!["*.hpp", "*.h", "*.a", "*.lib", "*.so", "*.dll", "*.dylib"]
        );
    }

    #[test]
    fn test_native_library_plan_header_rules_keep_path() {
        let plan = PackagePlan::native_library();
        for rule in plan.rules() {
            if rule.pattern == "*.hpp" || rule.pattern == "*.h" {
                assert!(rule.keep_path);
                assert_eq!(rule.source_dir.as_deref(), Some(std::path::Path::new("src")));
                assert_eq!(rule.dest_dir, PathBuf::from("include"));
            } else {
                assert!(!rule.keep_path);
                assert!(rule.source_dir.is_none());
                assert_eq!(rule.dest_dir, PathBuf::from("lib"));
            }
        }
    }
}
