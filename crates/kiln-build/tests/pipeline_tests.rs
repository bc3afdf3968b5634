//! Integration tests for the full build-and-package pipeline
//!
//! Drives the pipeline with a recording native build so step sequencing,
//! failure gating, and packaging can be asserted without a real toolchain.

use kiln_build::{
    BuildDefinitions, BuildError, BuildResult, BuildStep, BuildType, Compiler, Invocation,
    NativeBuild, OptionName, Pipeline, PlatformSettings, Toggle, PACKAGE_INFO_FILE,
};
use kiln_package::PackageInfo;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Native build double: records invocations, fails on demand
#[derive(Default)]
struct RecordingBuild {
    fail_on: Option<BuildStep>,
    steps: Vec<BuildStep>,
    configured: Option<BuildDefinitions>,
    test_target: Option<Option<String>>,
}

impl RecordingBuild {
    fn failing_at(step: BuildStep) -> Self {
        Self {
            fail_on: Some(step),
            ..Self::default()
        }
    }

    fn gate(&self, step: BuildStep) -> BuildResult<()> {
        if self.fail_on == Some(step) {
            return Err(BuildError::step_failed(step, 1, "injected failure"));
        }
        Ok(())
    }
}

impl NativeBuild for RecordingBuild {
    fn configure(&mut self, definitions: &BuildDefinitions) -> BuildResult<()> {
        self.steps.push(BuildStep::Configure);
        self.gate(BuildStep::Configure)?;
        self.configured = Some(definitions.clone());
        Ok(())
    }

    fn build(&mut self) -> BuildResult<()> {
        self.steps.push(BuildStep::Build);
        self.gate(BuildStep::Build)
    }

    fn test(&mut self, target: Option<&str>) -> BuildResult<()> {
        self.steps.push(BuildStep::Test);
        self.gate(BuildStep::Test)?;
        self.test_target = Some(target.map(str::to_string));
        Ok(())
    }
}

/// Create a fake build tree with headers and binaries already in place
fn create_build_tree(files: &[&str]) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, *file).unwrap();
    }
    let dest = root.join("package");
    (dir, root, dest)
}

fn gcc_release() -> PlatformSettings {
    PlatformSettings::new(Compiler::Gcc, BuildType::Release)
}

#[test]
fn test_full_run_with_coverage() {
    let (_tmp, root, dest) =
        create_build_tree(&["src/metrics/metrics.hpp", "src/btree/varlen_node.hpp", "libsisl.a"]);

    let mut pipeline = Pipeline::new(gcc_release(), RecordingBuild::default())
        .with_option(OptionName::Coverage, true)
        .with_source_root(&root)
        .with_dest_root(&dest);

    let report = pipeline.run().unwrap();

    // Definitions raised and the coverage target selected
    assert_eq!(report.translated.definitions.coverage, Toggle::On);
    assert_eq!(report.translated.definitions.sanitizer, Toggle::Off);
    assert_eq!(report.translated.test_target.as_deref(), Some("coverage"));

    // The native build saw exactly that configuration
    let native = pipeline.native();
    assert_eq!(
        native.steps,
        vec![BuildStep::Configure, BuildStep::Build, BuildStep::Test]
    );
    assert_eq!(
        native.configured.as_ref().unwrap().coverage,
        Toggle::On
    );
    assert_eq!(
        native.test_target.as_ref().unwrap().as_deref(),
        Some("coverage")
    );

    // Package tree collected with headers kept and binaries flattened
    assert!(dest.join("include/metrics/metrics.hpp").is_file());
    assert!(dest.join("include/btree/varlen_node.hpp").is_file());
    assert!(dest.join("lib/libsisl.a").is_file());
    assert_eq!(report.stats.files_packaged, 3);

    // Consumer metadata persisted with the coverage runtime appended
    let info = PackageInfo::from_file(&dest.join(PACKAGE_INFO_FILE)).unwrap();
    assert_eq!(info.libs, vec!["sisl", "gcov"]);
    assert_eq!(report.info, info);
}

#[test]
fn test_pruned_coverage_on_clang_debug() {
    let (_tmp, root, dest) = create_build_tree(&["src/api.hpp"]);

    let settings = PlatformSettings::new(Compiler::Clang, BuildType::Debug);
    let mut pipeline = Pipeline::new(settings, RecordingBuild::default())
        .with_option(OptionName::Coverage, true)
        .with_source_root(&root)
        .with_dest_root(&dest);

    let report = pipeline.run().unwrap();

    // Coverage was pruned: definition stays off, default test target runs,
    // but the Debug override is still forced
    assert_eq!(report.translated.definitions.coverage, Toggle::Off);
    assert_eq!(report.translated.definitions.build_type, Some(BuildType::Debug));
    assert_eq!(report.translated.test_target, None);
    assert_eq!(pipeline.native().test_target, Some(None));

    // No coverage runtime for consumers
    assert_eq!(report.info.libs, vec!["sisl"]);
}

#[test]
fn test_sanitize_and_coverage_together() {
    let (_tmp, root, dest) = create_build_tree(&["src/api.hpp"]);

    let mut pipeline = Pipeline::new(gcc_release(), RecordingBuild::default())
        .with_option(OptionName::Coverage, true)
        .with_option(OptionName::Sanitize, true)
        .with_source_root(&root)
        .with_dest_root(&dest);

    let report = pipeline.run().unwrap();
    assert_eq!(report.translated.definitions.coverage, Toggle::On);
    assert_eq!(report.translated.definitions.sanitizer, Toggle::On);
}

#[rstest]
#[case::configure(BuildStep::Configure, vec![BuildStep::Configure])]
#[case::build(BuildStep::Build, vec![BuildStep::Configure, BuildStep::Build])]
#[case::test(BuildStep::Test, vec![BuildStep::Configure, BuildStep::Build, BuildStep::Test])]
fn test_step_failure_aborts_before_packaging(
    #[case] fail_on: BuildStep,
    #[case] expected_steps: Vec<BuildStep>,
) {
    let (_tmp, root, dest) = create_build_tree(&["src/api.hpp", "libsisl.a"]);

    let mut pipeline = Pipeline::new(gcc_release(), RecordingBuild::failing_at(fail_on))
        .with_source_root(&root)
        .with_dest_root(&dest);

    let err = pipeline.run().unwrap_err();
    assert_eq!(err.step(), Some(fail_on));

    // Later steps never ran, and nothing was written to the destination
    assert_eq!(pipeline.native().steps, expected_steps);
    assert!(!dest.exists());
}

#[test]
fn test_pipeline_from_invocation_file() {
    let (_tmp, root, dest) = create_build_tree(&["src/api.hpp"]);

    let invocation = Invocation::from_str(
        r#"
[platform]
compiler = "gcc"
build_type = "Debug"

[options]
sanitize = true
"#,
    )
    .unwrap();

    let mut pipeline = Pipeline::from_invocation(&invocation, RecordingBuild::default())
        .with_source_root(&root)
        .with_dest_root(&dest);

    let report = pipeline.run().unwrap();
    assert_eq!(report.translated.definitions.sanitizer, Toggle::On);
    assert_eq!(report.translated.definitions.build_type, Some(BuildType::Debug));
    assert_eq!(report.translated.test_target, None);
}

#[test]
fn test_report_serializes_for_the_invoking_tool() {
    let (_tmp, root, dest) = create_build_tree(&["src/api.hpp"]);

    let mut pipeline = Pipeline::new(gcc_release(), RecordingBuild::default())
        .with_source_root(&root)
        .with_dest_root(&dest);

    let report = pipeline.run().unwrap();
    let json = report.to_json().unwrap();
    assert!(json.contains("files_packaged"));
    assert!(json.contains("BUILD_COVERAGE") || json.contains("coverage"));
}
