//! Progress reporting for harness runs
//!
//! The pipeline reports through the `Reporter` trait rather than printing directly, so the same run can be
//! rendered to the console or recorded in tests.

use std::io::{self, Write};

use crate::pipeline::Stage;

/// Trait for reporting per-compiler progress.
pub trait Reporter {
    /// Called before a compiler's pipeline starts
    fn on_compiler_start(&mut self, compiler: &str);

    /// Called when a stage exits non-zero (or could not be started); no further stages run for this compiler
    fn on_stage_failed(&mut self, compiler: &str, stage: Stage);

    /// Called when all three stages succeeded
    fn on_compiler_passed(&mut self, _compiler: &str) {}
}

/// Plain-text reporter writing one line per event.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleReporter {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        // A closed stdout must not abort the remaining compilers
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::debug!(error = %e, "failed to write report line");
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_compiler_start(&mut self, compiler: &str) {
        self.line(format_args!("Testing compiler {}", compiler));
    }

    fn on_stage_failed(&mut self, compiler: &str, stage: Stage) {
        self.line(format_args!("{} : {} failed", compiler, stage.tool_label()));
    }

    fn on_compiler_passed(&mut self, compiler: &str) {
        self.line(format_args!("{} : passed", compiler));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rendered(reporter: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_console_lines() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.on_compiler_start("g++-12");
        reporter.on_stage_failed("g++-12", Stage::Configure);
        reporter.on_compiler_start("clang++");
        reporter.on_stage_failed("clang++", Stage::Build);
        reporter.on_compiler_start("icpx");
        reporter.on_stage_failed("icpx", Stage::Test);
        reporter.on_compiler_start("g++");
        reporter.on_compiler_passed("g++");

        insta::assert_snapshot!(rendered(reporter), @r"
        Testing compiler g++-12
        g++-12 : CMake failed
        Testing compiler clang++
        clang++ : make failed
        Testing compiler icpx
        icpx : test failed
        Testing compiler g++
        g++ : passed
        ");
    }
}
