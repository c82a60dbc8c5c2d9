//! Shared test utilities for E2E tests.
//!
//! Remotes are bare repositories on the local filesystem, laid out as
//! `{temp}/remotes/{user}/{repo}.git` so that `GH_URL=file://{temp}/remotes`
//! resolves them the same way a hosting service would.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_remote(0, "0.1", "0.1");
//!     fixture.command().assert().success();
//! }
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::cargo::cargo_bin_cmd;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::TestFixture;
    #[allow(unused_imports)]
    pub use super::{values_yaml, USER};
}

/// Owner segment used for every fixture remote.
pub const USER: &str = "octo";

/// Repository name prefix used for every fixture remote.
pub const BASE_REPO_NAME: &str = "svc";

/// Variables the binary reads, cleared so the host environment cannot leak in.
const RELEASE_VARS: &[&str] = &[
    "GH_TOKEN",
    "GH_USER",
    "GH_URL",
    "BASE_REPO_NAME",
    "FROM_INDEX",
    "TO_INDEX",
    "COMMIT_DELAY_SEC",
    "REPO_DELAY_SEC",
    "CYCLE_DELAY_SEC",
    "MAX_CYCLES",
    "GIT_COMMIT_NAME",
    "GIT_COMMIT_EMAIL",
    "LOG_LEVEL",
    "WORK_DIR",
];

/// A minimal values document with the given tag.
pub fn values_yaml(tag: &str) -> String {
    format!("replicaCount: 1\nimage:\n  repository: nginx\n  tag: \"{}\"\n", tag)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=Fixture", "-c", "user.email=fixture@example.com"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A temporary directory holding bare remotes and the work directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new fixture with no remotes.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a remote `{BASE_REPO_NAME}-{index}` with the given dev and prod tags.
    pub fn with_remote(self, index: u32, dev_tag: &str, prod_tag: &str) -> Self {
        self.with_remote_files(
            index,
            &[
                ("dev/values.yaml", values_yaml(dev_tag).as_str()),
                ("prod/values.yaml", values_yaml(prod_tag).as_str()),
            ],
        )
    }

    /// Add a remote `{BASE_REPO_NAME}-{index}` seeded with arbitrary files.
    pub fn with_remote_files(self, index: u32, files: &[(&str, &str)]) -> Self {
        let repo = format!("{}-{}", BASE_REPO_NAME, index);
        let seed = self.temp_dir.path().join("seeds").join(&repo);
        fs::create_dir_all(&seed).expect("Failed to create seed directory");
        git(&seed, &["init", "--quiet"]);
        for (path, content) in files {
            let target = seed.join(path);
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(&target, content).expect("Failed to write seed file");
        }
        git(&seed, &["add", "."]);
        git(&seed, &["commit", "--quiet", "-m", "initial"]);

        let bare = self.remote_path(index);
        fs::create_dir_all(bare.parent().unwrap()).unwrap();
        git(
            self.temp_dir.path(),
            &["clone", "--quiet", "--bare", seed.to_str().unwrap(), bare.to_str().unwrap()],
        );
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `GH_URL` value pointing at the fixture remotes.
    pub fn base_url(&self) -> String {
        format!("file://{}", self.path().join("remotes").display())
    }

    pub fn work_dir(&self) -> PathBuf {
        self.path().join("work")
    }

    pub fn remote_path(&self, index: u32) -> PathBuf {
        self.path()
            .join("remotes")
            .join(USER)
            .join(format!("{}-{}.git", BASE_REPO_NAME, index))
    }

    /// Content of `path` at the tip of remote `index`.
    pub fn remote_file(&self, index: u32, path: &str) -> String {
        git(&self.remote_path(index), &["show", &format!("HEAD:{}", path)])
    }

    /// Commit subjects of remote `index`, newest first.
    pub fn remote_log(&self, index: u32) -> Vec<String> {
        git(&self.remote_path(index), &["log", "--format=%s"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Commit subjects touching `path` in remote `index`, newest first.
    pub fn remote_log_for(&self, index: u32, path: &str) -> Vec<String> {
        git(&self.remote_path(index), &["log", "--format=%s", "--", path])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// The `release-sim` binary wired to this fixture with zero delays.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = self.command_with_default_work_dir();
        cmd.arg("--work-dir").arg(self.work_dir());
        cmd
    }

    /// Like [`TestFixture::command`], but the binary falls back to its default
    /// `repositories` work directory under the fixture root.
    pub fn command_with_default_work_dir(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("release-sim");
        for var in RELEASE_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.path())
            .env("GH_USER", USER)
            .env("GH_URL", self.base_url())
            .env("BASE_REPO_NAME", BASE_REPO_NAME)
            .env("COMMIT_DELAY_SEC", "0")
            .env("REPO_DELAY_SEC", "0")
            .env("GIT_COMMIT_NAME", "Release Bot")
            .env("GIT_COMMIT_EMAIL", "bot@example.com");
        cmd
    }
}
