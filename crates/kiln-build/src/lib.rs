//! Kiln build orchestration
//!
//! Turns a platform description and a handful of boolean build options into
//! a complete build-and-package run for a native library:
//! - Option-to-definition translation for the native build system
//! - configure/build/test sequencing against an opaque build capability
//! - Success-gated packaging into the canonical `include/` + `lib/` tree
//! - Consumer-facing link metadata emission

pub mod definitions;
pub mod driver;
pub mod error;
pub mod pipeline;

// Re-export main types
pub use definitions::{
    translate, BuildDefinitions, Toggle, TranslatedConfig, BUILD_TYPE_DEFINE, COVERAGE_DEFINE,
    COVERAGE_TEST_TARGET, SANITIZER_DEFINE,
};
pub use driver::{BuildStep, CmakeBuild, Driver, DriverStats, NativeBuild};
pub use error::{BuildError, BuildResult};
pub use pipeline::{Pipeline, PipelineReport, PipelineStats, PACKAGE_INFO_FILE};

// Re-export the configuration and packaging surface for convenience
pub use kiln_config::{
    BuildType, Compiler, Invocation, OptionMatrix, OptionName, OptionSet, PlatformSettings,
};
pub use kiln_package::{PackageInfo, PackagePlan, PackageRule, PackageTree, Packager, Recipe};
