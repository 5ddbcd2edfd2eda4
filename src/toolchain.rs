//! Compiler identifier helpers
//!
//! Compiler identifiers are opaque strings (a bare name looked up on `PATH` or a path to an executable). The only
//! things this crate derives from them are the matching C compiler and the name of the per-compiler output
//! directory.

use std::ffi::{OsStr, OsString};
use std::path::Path;

const CLANG_CXX: &str = "clang++";
const CLANG_C: &str = "clang";
const GNU_CXX: &str = "g++";
const GNU_C: &str = "gcc";

/// Derive the C compiler that ships alongside a C++ compiler.
///
/// `clang++` becomes `clang` and `g++` becomes `gcc`, anywhere in the identifier, so
/// `/usr/bin/g++-12` maps to `/usr/bin/gcc-12`. Names matching neither marker are returned unchanged: the
/// compiler is assumed to drive both languages. Nothing checks that the result exists.
pub fn companion_compiler(cxx_compiler: &str) -> String {
    // clang++ goes first; it contains "g++" and must not become "clangcc"
    cxx_compiler.replace(CLANG_CXX, CLANG_C).replace(GNU_CXX, GNU_C)
}

/// [`companion_compiler`] for identifiers taken straight from the command line.
///
/// Identifiers that are not valid UTF-8 pass through unchanged.
pub fn companion_compiler_os(cxx_compiler: &OsStr) -> OsString {
    match cxx_compiler.to_str() {
        Some(name) => OsString::from(companion_compiler(name)),
        None => cxx_compiler.to_owned(),
    }
}

/// Name of the output directory for a compiler: the final component of its path.
///
/// Returns `None` when the identifier has no final component (empty, `/`, or ending in `..`).
pub fn output_dir_name<S: AsRef<OsStr> + ?Sized>(compiler: &S) -> Option<&OsStr> {
    Path::new(compiler).file_name()
}
