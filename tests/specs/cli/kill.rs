// SPDX-License-Identifier: MIT

//! Specs for `sinc kill`.

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

const SSH_KILL_OK: &str = "#!/bin/sh
exit 0
";

const SSH_KILL_FAILS: &str = "#!/bin/sh
case \"$*\" in
  *kill-session*) echo \"can't find session\" >&2; exit 1 ;;
  *) exit 0 ;;
esac
";

/// mutagen where lifecycle operations succeed.
const MUTAGEN_OK: &str = "#!/bin/sh
exit 0
";

/// mutagen where everything but `version` fails.
const MUTAGEN_NOTHING_TO_TERMINATE: &str = "#!/bin/sh
case \"$*\" in
  version*) exit 0 ;;
  *) echo 'unable to locate requested sessions' >&2; exit 1 ;;
esac
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
fn kills_an_existing_session() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_KILL_OK);
    env.stub("mutagen", MUTAGEN_OK);

    env.sinc()
        .args(["kill", "sinc-app-abc123"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Session sinc-app-abc123 terminated"));
}

#[test]
fn terminating_only_the_sync_half_still_succeeds() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_KILL_FAILS);
    env.stub("mutagen", MUTAGEN_OK);

    env.sinc()
        .args(["kill", "sinc-app-abc123"])
        .assert()
        .success()
        .stderr(predicate::str::contains("terminated"));
}

#[test]
fn unknown_session_is_an_error() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_KILL_FAILS);
    env.stub("mutagen", MUTAGEN_NOTHING_TO_TERMINATE);

    env.sinc()
        .args(["kill", "sinc-gone-000000"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn json_event_reports_both_halves() {
    let env = TestEnv::new();
    env.stub("ssh", SSH_KILL_FAILS);
    env.stub("mutagen", MUTAGEN_OK);

    let output = env
        .sinc()
        .args(["kill", "sinc-app-abc123", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let event: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(event["event"], "session-kill");
    assert_eq!(event["terminated"], true);
    assert_eq!(event["tmux"], false);
    assert_eq!(event["sync"], true);
}
