// SPDX-License-Identifier: MIT

//! Specs for the flag surface shared by every command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

const SSH_EMPTY: &str = "#!/bin/sh
exit 0
";

const MUTAGEN_OK: &str = "#!/bin/sh
exit 0
";

struct TestEnv {
    temp: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("bin")).unwrap();
        fs::create_dir_all(temp.path().join("xdg/sinc")).unwrap();
        fs::write(
            temp.path().join("xdg/sinc/config.json"),
            r#"{"vps":{"hostname":"vps.test","user":"dev"}}"#,
        )
        .unwrap();
        TestEnv { temp }
    }

    fn stub(&self, name: &str, body: &str) {
        let path = self.temp.path().join("bin").join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn bin_dir(&self) -> PathBuf {
        self.temp.path().join("bin")
    }

    fn sinc(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("sinc");
        cmd.env("PATH", self.bin_dir())
            .env("XDG_CONFIG_HOME", self.temp.path().join("xdg"))
            .env("HOME", self.temp.path())
            .current_dir(self.temp.path());
        cmd
    }
}

#[test]
fn help_describes_every_command() {
    let env = TestEnv::new();
    env.sinc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("kill"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("pull"));
}

#[test]
fn version_prints_the_binary_name() {
    let env = TestEnv::new();
    env.sinc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sinc"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let env = TestEnv::new();
    env.sinc().arg("frobnicate").assert().failure().code(2);
}

#[test]
fn quiet_suppresses_prose() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_EMPTY);
    env.stub("mutagen", MUTAGEN_OK);

    env.sinc()
        .args(["list", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn json_mode_keeps_stdout_machine_readable() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_EMPTY);
    env.stub("mutagen", MUTAGEN_OK);

    let output = env.sinc().args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(parsed.is_object());
    }
    // Prose stays on stderr.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No active sessions"));
}

#[test]
fn errors_are_printed_even_when_quiet() {
    let env = TestEnv::new();
    fs::write(env.temp.path().join("xdg/sinc/config.json"), "{oops").unwrap();

    env.sinc()
        .args(["list", "-q"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("error:"));
}
