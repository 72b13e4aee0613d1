// SPDX-License-Identifier: MIT

//! Specs for `sinc push` and `sinc pull`.

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

/// mutagen whose sessions are all in the steady watching state.
const MUTAGEN_WATCHING: &str = "#!/bin/sh
case \"$*\" in
  version*) exit 0 ;;
  sync\\ list*) printf '{\"sessions\":[{\"status\":\"Watching for changes\"}]}\\n'; exit 0 ;;
  *) exit 0 ;;
esac
";

/// mutagen with no sync sessions at all.
const MUTAGEN_NO_SESSIONS: &str = "#!/bin/sh
case \"$*\" in
  version*) exit 0 ;;
  sync\\ list*) printf '{\"sessions\":[]}\\n'; exit 0 ;;
  *) exit 0 ;;
esac
";

struct TestEnv {
    temp: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("bin")).unwrap();
        fs::create_dir_all(temp.path().join("project")).unwrap();
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
            .current_dir(self.temp.path().join("project"));
        cmd
    }
}

#[test]
fn push_requires_confirmation() {
    let env = TestEnv::new();
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .arg("push")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("overwrite remote files"))
        .stderr(predicate::str::contains("confirmation required"))
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn pull_requires_confirmation() {
    let env = TestEnv::new();
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .arg("pull")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("overwrite local files"));
}

#[test]
fn push_without_a_sync_session_is_refused() {
    let env = TestEnv::new();
    env.stub("mutagen", MUTAGEN_NO_SESSIONS);

    env.sinc()
        .args(["push", "--yes"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no sync session"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn push_without_the_engine_is_unavailable() {
    let env = TestEnv::new();
    // No mutagen on PATH.

    env.sinc()
        .args(["push", "--yes"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("mutagen"));
}

#[test]
fn confirmed_push_completes() {
    let env = TestEnv::new();
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .args(["push", "--yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Push complete"));
}

#[test]
fn confirmed_pull_completes() {
    let env = TestEnv::new();
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .args(["pull", "--yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Pull complete"));
}

#[test]
fn json_events_bracket_the_force() {
    let env = TestEnv::new();
    env.stub("mutagen", MUTAGEN_WATCHING);

    let output = env
        .sinc()
        .args(["push", "--yes", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events[0]["event"], "sync-force");
    assert_eq!(events[0]["direction"], "local-to-remote");
    let last = events.last().unwrap();
    assert_eq!(last["event"], "sync-force-complete");
}
