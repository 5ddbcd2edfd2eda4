//! Black-box tests for the `harness` binary
//!
//! Every test runs the binary inside a fresh temp directory, which becomes the output root.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const MISSING_TOOL: &str = "harness-test-no-such-configure-tool";

fn harness_in(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("harness");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read output root")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn no_arguments_is_a_usage_error() {
    let tmp = TempDir::new().expect("temp dir");
    harness_in(tmp.path())
        .assert()
        .failure()
        .code(1)
        .stdout(contains("CMakeLists.txt"))
        .stderr(predicate::str::is_empty());
    assert!(entries(tmp.path()).is_empty());
}

#[test]
fn project_without_compilers_does_nothing() {
    let tmp = TempDir::new().expect("temp dir");
    harness_in(tmp.path())
        .arg("project")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(entries(tmp.path()).is_empty());
}

#[test]
fn failing_compilers_still_exit_zero() {
    let tmp = TempDir::new().expect("temp dir");
    harness_in(tmp.path())
        .args(["--configure-tool", MISSING_TOOL, "project", "/usr/bin/g++-12", "clang++"])
        .assert()
        .success()
        .stdout(contains("Testing compiler /usr/bin/g++-12"))
        .stdout(contains("/usr/bin/g++-12 : CMake failed"))
        .stdout(contains("Testing compiler clang++"))
        .stdout(contains("clang++ : CMake failed"))
        .stdout(contains("make failed").not());
    assert_eq!(entries(tmp.path()), vec!["clang++", "g++-12"]);
}

#[test]
fn rerun_reuses_output_directories() {
    let tmp = TempDir::new().expect("temp dir");
    for _ in 0..2 {
        harness_in(tmp.path())
            .args(["--configure-tool", MISSING_TOOL, "project", "g++"])
            .assert()
            .success()
            .stdout(contains("g++ : CMake failed"));
    }
    assert_eq!(entries(tmp.path()), vec!["g++"]);
}

#[test]
fn componentless_compiler_builds_in_output_root_and_run_continues() {
    let tmp = TempDir::new().expect("temp dir");
    harness_in(tmp.path())
        .args(["--configure-tool", MISSING_TOOL, "project", "tools/..", "g++"])
        .assert()
        .success()
        .stdout(contains("tools/.. : CMake failed"))
        .stdout(contains("Testing compiler g++"))
        .stdout(contains("g++ : CMake failed"));
    assert_eq!(entries(tmp.path()), vec!["g++"]);
}

#[test]
fn output_dir_blocked_by_file_is_fatal() {
    let tmp = TempDir::new().expect("temp dir");
    fs::write(tmp.path().join("g++"), "in the way").expect("write blocker");
    harness_in(tmp.path())
        .args(["--configure-tool", MISSING_TOOL, "project", "g++"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("cannot create output directory"));
}

#[cfg(unix)]
mod with_stub_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().expect("script parent")).expect("create script dir");
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    }

    #[test]
    fn missing_test_executable_is_a_test_failure() {
        let tmp = TempDir::new().expect("temp dir");
        harness_in(tmp.path())
            .args(["--configure-tool", "true", "--build-tool", "true", "project", "g++"])
            .assert()
            .success()
            .stdout(contains("g++ : test failed"))
            .stdout(contains("CMake failed").not())
            .stdout(contains("make failed").not());
    }

    #[test]
    fn build_failure_skips_tests() {
        let tmp = TempDir::new().expect("temp dir");
        let marker = tmp.path().join("g++").join("test-ran");
        write_script(
            &tmp.path().join("g++").join("test").join("test"),
            &format!("touch '{}'", marker.display()),
        );

        harness_in(tmp.path())
            .args(["--configure-tool", "true", "--build-tool", "false", "project", "g++"])
            .assert()
            .success()
            .stdout(contains("g++ : make failed"))
            .stdout(contains("test failed").not());
        assert!(!marker.exists());
    }

    #[test]
    fn passing_and_failing_compilers_in_one_run() {
        let tmp = TempDir::new().expect("temp dir");
        let configure = tmp.path().join("fake-cmake");
        // Fails for any compiler path containing "broken"
        write_script(
            &configure,
            "case \"$2\" in *broken*) exit 1 ;; esac\n[ \"$4\" = \"-DCMAKE_BUILD_TYPE=DEBUG\" ] || exit 1",
        );
        write_script(&tmp.path().join("g++").join("test").join("test"), "pwd > ran-in");

        harness_in(tmp.path())
            .arg("--configure-tool")
            .arg(&configure)
            .args(["--build-tool", "true", "project", "/opt/broken/clang++", "g++"])
            .assert()
            .success()
            .stdout(contains("/opt/broken/clang++ : CMake failed"))
            .stdout(contains("g++ : passed"));

        let ran_in = fs::read_to_string(tmp.path().join("g++").join("ran-in")).expect("test ran");
        let expected = fs::canonicalize(tmp.path().join("g++")).expect("canonical build dir");
        assert_eq!(fs::canonicalize(ran_in.trim()).expect("canonical pwd"), expected);
        assert_eq!(entries(tmp.path()), vec!["clang++", "fake-cmake", "g++"]);
    }
}
