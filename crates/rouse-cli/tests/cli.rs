//! Integration tests for the `rouse` binary entry point.
//!
//! Verifies manifest checking, activation-order output, and the exit
//! statuses reported for configuration and I/O failures.

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

/// Writes `contents` to a `units.toml` inside a fresh temporary directory.
///
/// The directory is returned alongside the path so it outlives the command.
fn manifest_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = match TempDir::new() {
        Ok(dir) => dir,
        Err(error) => panic!("failed to create temp dir: {error}"),
    };
    let path = dir.path().join("units.toml");
    if let Err(error) = fs::write(&path, contents) {
        panic!("failed to write manifest: {error}");
    }
    (dir, path)
}

#[test]
fn check_accepts_a_well_formed_manifest() {
    let (_dir, path) = manifest_file(
        "[[unit]]\n\
         name = \"theme\"\n\
         priority = 1000\n\
         \n\
         [[unit]]\n\
         name = \"finder\"\n\
         cmd = [\"Finder\"]\n",
    );
    let mut command = cargo_bin_cmd!("rouse");
    command.arg("check").arg(path);
    command
        .assert()
        .success()
        .stdout(contains("manifest OK: 2 unit(s), 1 eager at startup"));
}

#[test]
fn check_rejects_an_unknown_dependency() {
    let (_dir, path) = manifest_file(
        "[[unit]]\n\
         name = \"finder\"\n\
         cmd = [\"Finder\"]\n\
         dependencies = [\"plenary\"]\n",
    );
    let mut command = cargo_bin_cmd!("rouse");
    command.arg("check").arg(path);
    command
        .assert()
        .code(1)
        .stderr(contains("depends on unknown unit plenary"));
}

#[test]
fn check_rejects_a_dependency_cycle() {
    let (_dir, path) = manifest_file(
        "[[unit]]\n\
         name = \"alpha\"\n\
         dependencies = [\"beta\"]\n\
         \n\
         [[unit]]\n\
         name = \"beta\"\n\
         dependencies = [\"alpha\"]\n",
    );
    let mut command = cargo_bin_cmd!("rouse");
    command.arg("check").arg(path);
    command
        .assert()
        .code(1)
        .stderr(contains("dependency cycle detected"));
}

#[test]
fn check_reports_bad_key_notation() {
    let (_dir, path) = manifest_file(
        "[[unit]]\n\
         name = \"finder\"\n\
         keys = [{ sequence = \"<leader\" }]\n",
    );
    let mut command = cargo_bin_cmd!("rouse");
    command.arg("check").arg(path);
    command
        .assert()
        .code(1)
        .stderr(contains("invalid key notation for unit 'finder'"));
}

#[test]
fn missing_manifests_exit_with_the_io_status() {
    let dir = match TempDir::new() {
        Ok(dir) => dir,
        Err(error) => panic!("failed to create temp dir: {error}"),
    };
    let path = dir.path().join("absent.toml");
    let mut command = cargo_bin_cmd!("rouse");
    command.arg("check").arg(path);
    command
        .assert()
        .code(2)
        .stderr(contains("failed to read manifest"));
}

#[test]
fn order_lists_startup_then_triggers() {
    let (_dir, path) = manifest_file(
        "[[unit]]\n\
         name = \"theme\"\n\
         priority = 1000\n\
         \n\
         [[unit]]\n\
         name = \"finder\"\n\
         cmd = [\"Finder\"]\n",
    );
    let mut command = cargo_bin_cmd!("rouse");
    command.arg("order").arg(path);
    command
        .assert()
        .success()
        .stdout(contains("startup: theme"))
        .stdout(contains("command Finder: finder"));
}

#[test]
fn order_renders_json_on_request() {
    let (_dir, path) = manifest_file(
        "[[unit]]\n\
         name = \"theme\"\n\
         priority = 1000\n",
    );
    let mut command = cargo_bin_cmd!("rouse");
    command.arg("order").arg(path).arg("--format").arg("json");
    command
        .assert()
        .success()
        .stdout(contains("\"startup\""))
        .stdout(contains("\"theme\""));
}
