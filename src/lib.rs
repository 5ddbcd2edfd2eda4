#![forbid(unsafe_code)]
//! Multi-toolchain build-and-test harness
//!
//! Given a CMake project with a test executable, this crate configures, builds and runs the tests once per supplied
//! C++ compiler, each in its own output directory, and reports which compilers failed at which stage. One
//! compiler failing never stops the others from being tried.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `pipeline` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod toolchain;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use pipeline::{Invocation, Outcome, ProcessExecutor, Stage, StageExecutor, run_compiler};
pub use report::{ConsoleReporter, Reporter};
pub use toolchain::{companion_compiler, companion_compiler_os, output_dir_name};
