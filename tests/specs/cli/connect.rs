// SPDX-License-Identifier: MIT

//! Specs for the default `sinc` connect flow.
//!
//! The remote side is simulated with stub `ssh` and `mutagen` scripts on
//! a private PATH, so every run is hermetic and deterministic.

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

/// ssh that accepts everything but reports no tmux session.
const SSH_NO_SESSION: &str = "#!/bin/sh
case \"$*\" in
  *has-session*) exit 1 ;;
  *) exit 0 ;;
esac
";

/// ssh that accepts everything and reports an existing tmux session.
const SSH_WITH_SESSION: &str = "#!/bin/sh
exit 0
";

/// mutagen with an existing session already in its steady state.
const MUTAGEN_WATCHING: &str = "#!/bin/sh
case \"$*\" in
  version*) exit 0 ;;
  sync\\ list*) printf '{\"sessions\":[{\"status\":\"Watching for changes\"}]}\\n'; exit 0 ;;
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
        let env = TestEnv { temp };
        env.config(r#"{"vps":{"hostname":"vps.test","user":"dev"}}"#);
        env
    }

    fn config(&self, json: &str) {
        fs::write(self.temp.path().join("xdg/sinc/config.json"), json).unwrap();
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
fn existing_session_without_resume_is_refused() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_WITH_SESSION);
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("-r"));
}

#[test]
fn resume_without_session_is_refused() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_NO_SESSION);
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .arg("-r")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn unreachable_host_maps_to_connect_exit_code() {
    let env = TestEnv::new();
    env.stub(
        "ssh",
        "#!/bin/sh
echo 'ssh: connect to host vps.test port 22: Connection timed out' >&2
exit 255
",
    );
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("connection timed out"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn missing_sync_engine_is_unavailable() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_NO_SESSION);
    // No mutagen stub on PATH at all.

    env.sinc()
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("mutagen"));
}

#[test]
fn sync_disabled_connects_without_the_engine() {
    let env = TestEnv::new();
    env.config(r#"{"vps":{"hostname":"vps.test","user":"dev"},"sync":{"mode":"none"}}"#);
    env.stub("ssh", SSH_NO_SESSION);

    env.sinc()
        .assert()
        .success()
        .stderr(predicate::str::contains("Connected to vps.test"));
}

#[test]
fn connect_with_sync_runs_end_to_end() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_NO_SESSION);
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .assert()
        .success()
        .stderr(predicate::str::contains("Connected to vps.test"))
        .stderr(predicate::str::contains("File sync active"))
        .stderr(predicate::str::contains("Sync complete"));
}

#[test]
fn broken_config_maps_to_config_exit_code() {
    let env = TestEnv::new();
    env.config("{not json");
    env.stub("ssh", SSH_NO_SESSION);
    env.stub("mutagen", MUTAGEN_WATCHING);

    env.sinc()
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("config error"));
}
