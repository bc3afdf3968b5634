//! End-to-end orchestration
//!
//! Wires option pruning, definition translation, the native build driver,
//! and packaging into one sequential pipeline. The four phases run strictly
//! in order; packaging and metadata emission only happen after configure,
//! build, and test have all succeeded.

use crate::definitions::{translate, TranslatedConfig};
use crate::driver::{Driver, NativeBuild};
use crate::error::BuildResult;
use kiln_config::{Invocation, OptionMatrix, OptionName, PlatformSettings};
use kiln_package::{PackageInfo, PackagePlan, PackageTree, Packager, Recipe};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// File name of the persisted consumer metadata inside the package tree
pub const PACKAGE_INFO_FILE: &str = "kiln-info.json";

/// Timing and volume summary for one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    pub configure_time: Duration,
    pub build_time: Duration,
    pub test_time: Duration,
    pub package_time: Duration,
    pub total_time: Duration,
    /// Number of file copies the packaging plan performed
    pub files_packaged: usize,
}

/// Result of a successful pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    /// Definitions and test target the build ran with
    pub translated: TranslatedConfig,
    /// Collected package tree
    pub tree: PackageTree,
    /// Finalized consumer metadata
    pub info: PackageInfo,
    /// Run statistics
    pub stats: PipelineStats,
}

impl PipelineReport {
    /// Render the report as JSON for the invoking tool
    pub fn to_json(&self) -> BuildResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Orchestrates one build-and-package invocation
pub struct Pipeline<B: NativeBuild> {
    settings: PlatformSettings,
    requested: BTreeMap<OptionName, bool>,
    build: B,
    recipe: Recipe,
    plan: PackagePlan,
    source_root: PathBuf,
    dest_root: PathBuf,
    verbose: bool,
}

impl<B: NativeBuild> Pipeline<B> {
    /// Create a pipeline for the given platform over a native build
    /// capability
    pub fn new(settings: PlatformSettings, build: B) -> Self {
        Self {
            settings,
            requested: BTreeMap::new(),
            build,
            recipe: Recipe::builtin(),
            plan: PackagePlan::native_library(),
            source_root: PathBuf::from("."),
            dest_root: PathBuf::from("package"),
            verbose: false,
        }
    }

    /// Create a pipeline from a loaded invocation file
    pub fn from_invocation(invocation: &Invocation, build: B) -> Self {
        let mut pipeline = Self::new(invocation.platform.clone(), build);
        pipeline.requested = invocation.options.clone();
        pipeline
    }

    /// Request an option value
    pub fn with_option(mut self, option: OptionName, value: bool) -> Self {
        self.requested.insert(option, value);
        self
    }

    /// Set the recipe to build and package
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = recipe;
        self
    }

    /// Set the packaging plan
    pub fn with_plan(mut self, plan: PackagePlan) -> Self {
        self.plan = plan;
        self
    }

    /// Set the root the packaging rules search under
    pub fn with_source_root(mut self, source_root: impl Into<PathBuf>) -> Self {
        self.source_root = source_root.into();
        self
    }

    /// Set the package destination root
    pub fn with_dest_root(mut self, dest_root: impl Into<PathBuf>) -> Self {
        self.dest_root = dest_root.into();
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Borrow the underlying build capability
    pub fn native(&self) -> &B {
        &self.build
    }

    /// Run configure, build, and test, then package and finalize metadata
    ///
    /// Any step failure aborts immediately; nothing is written under the
    /// destination root unless all three build steps succeeded.
    pub fn run(&mut self) -> BuildResult<PipelineReport> {
        let start = Instant::now();

        let options = OptionMatrix::new().resolve(&self.settings, &self.requested);
        let translated = translate(&self.settings, &options);

        if self.verbose {
            println!(
                "Building {} v{} ({}, {})",
                self.recipe.name,
                self.recipe.version,
                self.settings.compiler.name(),
                self.settings.build_type.name()
            );
        }

        let mut driver = Driver::new(&mut self.build).with_verbose(self.verbose);
        let driver_stats =
            driver.run(&translated.definitions, translated.test_target.as_deref())?;

        let package_start = Instant::now();
        let packager =
            Packager::new(&self.source_root, &self.dest_root).with_verbose(self.verbose);
        let tree = packager.collect(&self.plan)?;

        let info = PackageInfo::for_library(&self.recipe.name)
            .finalize(options.enabled(OptionName::Coverage));
        std::fs::create_dir_all(&self.dest_root)
            .map_err(|e| crate::error::BuildError::io(&self.dest_root, e))?;
        info.write_to(&self.dest_root.join(PACKAGE_INFO_FILE))?;

        let mut stats = PipelineStats {
            configure_time: driver_stats.configure_time,
            build_time: driver_stats.build_time,
            test_time: driver_stats.test_time,
            package_time: package_start.elapsed(),
            total_time: Duration::ZERO,
            files_packaged: tree.len(),
        };
        stats.total_time = start.elapsed();

        if self.verbose {
            println!(
                "Packaged {} files in {:.2}s",
                stats.files_packaged,
                stats.total_time.as_secs_f64()
            );
        }

        Ok(PipelineReport {
            translated,
            tree,
            info,
            stats,
        })
    }
}
