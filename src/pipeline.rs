//! Per-compiler configure → build → test pipeline
//!
//! ## Stages
//!
//! Each compiler gets its own output directory under the output root. Inside it the pipeline runs, strictly in
//! order and stopping at the first failure:
//!
//! 1. **Configure**: `cmake <project> -DCMAKE_CXX_COMPILER=<cxx> -DCMAKE_C_COMPILER=<cc> -DCMAKE_BUILD_TYPE=DEBUG`
//! 2. **Build**: `make`
//! 3. **Test**: `./test/test`
//!
//! ## Working directory
//!
//! The process working directory is never changed. Every [`Invocation`] carries the directory it must run in, so
//! runs for different compilers do not depend on shared process state.
//!
//! ## I/O boundary
//!
//! Process spawning sits behind the [`StageExecutor`] trait. [`ProcessExecutor`] is the real implementation;
//! tests substitute a recording fake.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::report::Reporter;
use crate::toolchain::{companion_compiler_os, output_dir_name};

/// One of the three external steps run per compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Configure,
    Build,
    Test,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 3] = [Stage::Configure, Stage::Build, Stage::Test];

    /// Name of the tool as shown in failure reports
    pub fn tool_label(self) -> &'static str {
        match self {
            Stage::Configure => "CMake",
            Stage::Build => "make",
            Stage::Test => "test",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configure => "configure",
            Stage::Build => "build",
            Stage::Test => "test",
        };
        f.write_str(name)
    }
}

/// Final state of one compiler's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(Stage),
}

impl Outcome {
    pub fn is_passed(self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// A single external process call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub stage: Stage,
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Directory the process runs in
    pub cwd: PathBuf,
}

impl Invocation {
    /// Shell-like rendering for logs
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Build the configure invocation for one compiler.
pub fn configure_invocation(
    config: &HarnessConfig,
    project: &Path,
    compiler: &OsStr,
    build_dir: &Path,
) -> Invocation {
    let mut cxx = OsString::from("-DCMAKE_CXX_COMPILER=");
    cxx.push(compiler);
    let mut cc = OsString::from("-DCMAKE_C_COMPILER=");
    cc.push(companion_compiler_os(compiler));
    let mut build_type = OsString::from("-DCMAKE_BUILD_TYPE=");
    build_type.push(&config.build_type);

    Invocation {
        stage: Stage::Configure,
        program: OsString::from(&config.configure_tool),
        args: vec![project.as_os_str().to_owned(), cxx, cc, build_type],
        cwd: build_dir.to_path_buf(),
    }
}

/// Build the build-tool invocation (no arguments).
pub fn build_invocation(config: &HarnessConfig, build_dir: &Path) -> Invocation {
    Invocation {
        stage: Stage::Build,
        program: OsString::from(&config.build_tool),
        args: Vec::new(),
        cwd: build_dir.to_path_buf(),
    }
}

/// Build the test invocation. A relative test executable is anchored at the build directory.
pub fn test_invocation(config: &HarnessConfig, build_dir: &Path) -> Invocation {
    let program = if config.test_executable.is_relative() {
        build_dir.join(&config.test_executable)
    } else {
        config.test_executable.clone()
    };
    Invocation {
        stage: Stage::Test,
        program: program.into_os_string(),
        args: Vec::new(),
        cwd: build_dir.to_path_buf(),
    }
}

/// Runs external stage processes.
pub trait StageExecutor {
    /// Run the invocation to completion and report whether it exited zero.
    ///
    /// A process that cannot be started counts as a failure.
    fn execute(&mut self, invocation: &Invocation) -> bool;
}

/// Spawns real processes with inherited stdio and waits for them, with no timeout.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl StageExecutor for ProcessExecutor {
    fn execute(&mut self, invocation: &Invocation) -> bool {
        tracing::debug!(
            stage = %invocation.stage,
            cwd = %invocation.cwd.display(),
            command = %invocation.command_line(),
            "spawning"
        );
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(status) => {
                tracing::debug!(stage = %invocation.stage, code = ?status.code(), "exited");
                status.success()
            }
            Err(e) => {
                tracing::warn!(
                    stage = %invocation.stage,
                    program = %invocation.program.to_string_lossy(),
                    error = %e,
                    "failed to start"
                );
                false
            }
        }
    }
}

/// Create `dir`, treating an existing directory as success.
fn ensure_dir(dir: &Path) -> Result<(), HarnessError> {
    fs::create_dir_all(dir).map_err(|source| HarnessError::CreateOutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Run the configure → build → test pipeline for one compiler.
///
/// `project` and `output_root` should be absolute. The compiler's build directory is
/// `output_root/<last path component of compiler>`, or `output_root` itself when the identifier has no last
/// component. Stage failures come back as `Ok(Outcome::Failed(_))` after being reported; only failing to create
/// the build directory is `Err`.
pub fn run_compiler(
    config: &HarnessConfig,
    project: &Path,
    compiler: &OsStr,
    output_root: &Path,
    executor: &mut dyn StageExecutor,
    reporter: &mut dyn Reporter,
) -> Result<Outcome, HarnessError> {
    let name = compiler.to_string_lossy();
    reporter.on_compiler_start(&name);

    let build_dir = match output_dir_name(compiler) {
        Some(dir_name) => output_root.join(dir_name),
        None => {
            tracing::warn!(compiler = %name, "no file name in compiler path, building in the output root");
            output_root.to_path_buf()
        }
    };
    ensure_dir(&build_dir)?;

    let span = tracing::info_span!("compiler", compiler = %name, build_dir = %build_dir.display());
    let _enter = span.enter();

    for stage in Stage::ALL {
        let invocation = match stage {
            Stage::Configure => configure_invocation(config, project, compiler, &build_dir),
            Stage::Build => build_invocation(config, &build_dir),
            Stage::Test => test_invocation(config, &build_dir),
        };
        tracing::info!(%stage, "running stage");
        if !executor.execute(&invocation) {
            tracing::info!(%stage, "stage failed");
            reporter.on_stage_failed(&name, stage);
            return Ok(Outcome::Failed(stage));
        }
    }

    reporter.on_compiler_passed(&name);
    Ok(Outcome::Passed)
}
