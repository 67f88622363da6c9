// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Launch harness: find the built executable and run it.

#![allow(dead_code)]

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Executable under test
pub const BINARY_NAME: &str = "one-note-midi";

/// Build flavor, fixed when the test binary is compiled
#[cfg(debug_assertions)]
pub const FLAVOR: &str = "debug";
#[cfg(not(debug_assertions))]
pub const FLAVOR: &str = "release";

/// Resolve the executable from the test-run directory.
///
/// Ascends two levels from `run_dir` (`target/<flavor>/deps`) and appends
/// the flavor segment and the executable file name. The path is not
/// checked for existence.
pub fn resolve_binary(run_dir: &Path, flavor: &str) -> PathBuf {
    let project_dir = run_dir
        .parent()
        .and_then(Path::parent)
        .unwrap_or(run_dir);

    project_dir
        .join(flavor)
        .join(format!("{}{}", BINARY_NAME, env::consts::EXE_SUFFIX))
}

/// Directory holding the running test executable
pub fn test_run_dir() -> PathBuf {
    let exe = env::current_exe().expect("current test executable");
    exe.parent().expect("test executable directory").to_path_buf()
}

/// Path of the executable for this test run
pub fn binary_path() -> PathBuf {
    resolve_binary(&test_run_dir(), FLAVOR)
}

/// Command for the executable, isolated from the caller's environment:
/// silent output backend, no config file, no log filter.
pub fn command(cwd: &Path) -> Command {
    let mut cmd = Command::new(binary_path());
    cmd.current_dir(cwd)
        .env("ONE_NOTE_MIDI_BACKEND", "null")
        .env_remove("ONE_NOTE_MIDI_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Run with a whitespace-separated argument string and wait for exit.
pub fn launch(args: &str) -> Output {
    let dir = tempfile::tempdir().expect("tempdir");
    launch_in(dir.path(), args)
}

/// Same as [`launch`] in a chosen working directory.
pub fn launch_in(cwd: &Path, args: &str) -> Output {
    command(cwd)
        .args(args.split_whitespace())
        .output()
        .expect("start one-note-midi")
}

/// Launch and assert the exit code.
pub fn assert_exit_code(args: &str, expected: i32) -> Output {
    let output = launch(args);
    assert_eq!(
        output.status.code(),
        Some(expected),
        "args {:?}\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
