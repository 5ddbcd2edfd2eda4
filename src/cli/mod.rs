//! CLI module for the toolchain harness
//!
//! ## Usage
//!
//! `harness <project_dir> [compiler ...]`
//!
//! Each compiler is built and tested in `./<basename of compiler>`, relative to the directory the harness was
//! started in, one after the other in the order given.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.
//!
//! A compiler whose configure, build or test stage fails is reported and skipped; the exit status stays 0. Exit
//! status 1 means the harness itself could not do its job (missing project argument, unusable output directory).

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::process;

use clap::Parser;

use crate::config::{
    DEFAULT_BUILD_TOOL, DEFAULT_BUILD_TYPE, DEFAULT_CONFIGURE_TOOL, DEFAULT_TEST_EXECUTABLE, HarnessConfig,
};
use crate::error::HarnessError;
use crate::pipeline::{Outcome, ProcessExecutor, StageExecutor, run_compiler};
use crate::report::{ConsoleReporter, Reporter};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        CliError::failure(format!("Error: {}", err))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Printed when the project argument is missing
pub const USAGE: &str = "usage: harness <project_dir> [compiler ...]\nfirst argument: path containing CMakeLists.txt";

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Build and test a CMake project once per C++ compiler
#[derive(Parser, Debug)]
#[command(name = "harness")]
#[command(version = VERSION)]
#[command(about = "Build and test a CMake project once per C++ compiler", long_about = None)]
pub struct Cli {
    /// Directory containing CMakeLists.txt
    #[arg(value_name = "PROJECT_DIR")]
    pub project: Option<PathBuf>,

    /// C++ compilers to test, by name or path
    #[arg(value_name = "COMPILER")]
    pub compilers: Vec<OsString>,

    /// Build-configuration tool
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_CONFIGURE_TOOL)]
    pub configure_tool: String,

    /// Build tool, run without arguments in each build directory
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_BUILD_TOOL)]
    pub build_tool: String,

    /// Test executable, relative to each build directory
    #[arg(long, value_name = "PATH", default_value = DEFAULT_TEST_EXECUTABLE)]
    pub test_exe: PathBuf,

    /// Value for CMAKE_BUILD_TYPE
    #[arg(long, value_name = "TYPE", default_value = DEFAULT_BUILD_TYPE)]
    pub build_type: String,
}

impl Cli {
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::new()
            .with_configure_tool(&self.configure_tool)
            .with_build_tool(&self.build_tool)
            .with_test_executable(&self.test_exe)
            .with_build_type(&self.build_type)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let Some(project) = cli.project.as_deref() else {
        println!("{}", USAGE);
        return Err(CliError::new("", ExitCode::FAILURE));
    };

    // Captured once, before any compiler runs, so every build directory is a sibling under it
    let output_root = env::current_dir().map_err(HarnessError::CurrentDir)?;
    let project = resolve_project(project, &output_root);
    let config = cli.config();

    tracing::debug!(
        project = %project.display(),
        output_root = %output_root.display(),
        compilers = cli.compilers.len(),
        "starting run"
    );

    let mut executor = ProcessExecutor;
    let mut reporter = ConsoleReporter::stdout();
    run_all(
        &config,
        &project,
        &cli.compilers,
        &output_root,
        &mut executor,
        &mut reporter,
    )?;

    Ok(ExitCode::SUCCESS)
}

/// Make `project` absolute against `cwd`, removing `.` and `..` components lexically.
pub fn resolve_project(project: &Path, cwd: &Path) -> PathBuf {
    let joined = cwd.join(project);

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Run every compiler in order, returning each compiler's outcome.
///
/// Stage failures never stop the loop. Only a fatal [`HarnessError`] does.
pub fn run_all<C: AsRef<OsStr>>(
    config: &HarnessConfig,
    project: &Path,
    compilers: &[C],
    output_root: &Path,
    executor: &mut dyn StageExecutor,
    reporter: &mut dyn Reporter,
) -> Result<Vec<(OsString, Outcome)>, HarnessError> {
    let mut outcomes = Vec::with_capacity(compilers.len());
    for compiler in compilers {
        let compiler = compiler.as_ref();
        let outcome = run_compiler(config, project, compiler, output_root, executor, reporter)?;
        outcomes.push((compiler.to_owned(), outcome));
    }

    let failed = outcomes.iter().filter(|(_, o)| !o.is_passed()).count();
    tracing::info!(total = outcomes.len(), failed, "run complete");
    Ok(outcomes)
}

// ============================================================================
// Tests
// ============================================================================
