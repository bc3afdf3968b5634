//! Native build driver
//!
//! Sequences configure, build, and test against an opaque native build
//! capability. Each step hard-gates the next; any failure aborts the whole
//! operation with the failing step identified. No retries.

use crate::definitions::BuildDefinitions;
use crate::error::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Driver step identity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildStep {
    /// Generate the native build system from definitions
    Configure,
    /// Compile and link
    Build,
    /// Run the default or named test target
    Test,
}

impl BuildStep {
    /// Get step name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Test => "test",
        }
    }

    /// All steps in execution order
    pub fn all() -> [BuildStep; 3] {
        [Self::Configure, Self::Build, Self::Test]
    }
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Opaque configure/build/test capability of the native build system
///
/// Implementations own all build side effects; the driver only sequences
/// and forwards configuration.
pub trait NativeBuild {
    /// Generate build files from the definition set
    fn configure(&mut self, definitions: &BuildDefinitions) -> BuildResult<()>;

    /// Compile and link
    fn build(&mut self) -> BuildResult<()>;

    /// Run tests; the build's default test target when `target` is absent
    fn test(&mut self, target: Option<&str>) -> BuildResult<()>;
}

impl<B: NativeBuild> NativeBuild for &mut B {
    fn configure(&mut self, definitions: &BuildDefinitions) -> BuildResult<()> {
        (**self).configure(definitions)
    }

    fn build(&mut self) -> BuildResult<()> {
        (**self).build()
    }

    fn test(&mut self, target: Option<&str>) -> BuildResult<()> {
        (**self).test(target)
    }
}

/// Per-step timing for one driver run
#[derive(Debug, Clone, Default, Serialize)]
pub struct DriverStats {
    pub configure_time: Duration,
    pub build_time: Duration,
    pub test_time: Duration,
}

/// Sequences the three native build steps with hard gating
pub struct Driver<B: NativeBuild> {
    build: B,
    verbose: bool,
}

impl<B: NativeBuild> Driver<B> {
    /// Create a driver around a native build capability
    pub fn new(build: B) -> Self {
        Self {
            build,
            verbose: false,
        }
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

    /// Run configure, build, and test in order, stopping at the first
    /// failure
    pub fn run(
        &mut self,
        definitions: &BuildDefinitions,
        test_target: Option<&str>,
    ) -> BuildResult<DriverStats> {
        let mut stats = DriverStats::default();

        let start = Instant::now();
        self.build.configure(definitions)?;
        stats.configure_time = start.elapsed();
        if self.verbose {
            println!("Configured in {:.2}s", stats.configure_time.as_secs_f64());
        }

        let start = Instant::now();
        self.build.build()?;
        stats.build_time = start.elapsed();
        if self.verbose {
            println!("Built in {:.2}s", stats.build_time.as_secs_f64());
        }

        let start = Instant::now();
        self.build.test(test_target)?;
        stats.test_time = start.elapsed();
        if self.verbose {
            println!("Tested in {:.2}s", stats.test_time.as_secs_f64());
        }

        Ok(stats)
    }
}

/// CMake-backed native build
///
/// Spawns `cmake` (and `ctest` for the default test target) with captured
/// output; a nonzero exit maps to a step failure.
pub struct CmakeBuild {
    source_dir: PathBuf,
    build_dir: PathBuf,
    verbose: bool,
}

impl CmakeBuild {
    /// Create a CMake build over the given source and build trees
    pub fn new(source_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            verbose: false,
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn configure_args(&self, definitions: &BuildDefinitions) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
        ];
        for (key, value) in definitions.defines() {
            args.push(format!("-D{}={}", key, value));
        }
        args
    }

    fn build_args(&self) -> Vec<String> {
        vec!["--build".to_string(), self.build_dir.display().to_string()]
    }

    // Named targets are build-tree targets (the coverage aggregation
    // target), not ctest names.
    fn target_args(&self, target: &str) -> Vec<String> {
        vec![
            "--build".to_string(),
            self.build_dir.display().to_string(),
            "--target".to_string(),
            target.to_string(),
        ]
    }

    fn ctest_args(&self) -> Vec<String> {
        vec![
            "--test-dir".to_string(),
            self.build_dir.display().to_string(),
            "--output-on-failure".to_string(),
        ]
    }

    fn run_tool(&self, step: BuildStep, program: &str, args: &[String]) -> BuildResult<()> {
        if self.verbose {
            println!("Running {} step: {} {}", step.name(), program, args.join(" "));
        }

        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BuildError::step_spawn(step, e))?
            .wait_with_output()
            .map_err(|e| BuildError::step_spawn(step, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if self.verbose && !stdout.is_empty() {
            println!("{}", stdout);
        }
        if !stderr.is_empty() {
            eprintln!("{}", stderr);
        }

        if !output.status.success() {
            let mut combined = stdout;
            if !stderr.is_empty() {
                if !combined.is_empty() {
                    combined.push('\n');
                }
                combined.push_str(&stderr);
            }
            return Err(BuildError::step_failed(
                step,
                output.status.code().unwrap_or(1),
                combined,
            ));
        }

        Ok(())
    }
}

impl NativeBuild for CmakeBuild {
    fn configure(&mut self, definitions: &BuildDefinitions) -> BuildResult<()> {
        let args = self.configure_args(definitions);
        self.run_tool(BuildStep::Configure, "cmake", &args)
    }

    fn build(&mut self) -> BuildResult<()> {
        let args = self.build_args();
        self.run_tool(BuildStep::Build, "cmake", &args)
    }

    fn test(&mut self, target: Option<&str>) -> BuildResult<()> {
        match target {
            Some(target) => {
                let args = self.target_args(target);
                self.run_tool(BuildStep::Test, "cmake", &args)
            }
            None => {
                let args = self.ctest_args();
                self.run_tool(BuildStep::Test, "ctest", &args)
            }
        }
    }
}
