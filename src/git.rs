//! Version control operations.
//!
//! The release loop talks to version control through the [`Vcs`] trait.
//! [`GitCli`] implements it with the system `git` binary, which picks up
//! credential helpers and `~/.gitconfig` the same way an interactive shell
//! would.

use std::fs;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};
use crate::remote::{redact, redact_text};

/// Author identity passed to `git commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// The version control operations one release needs.
pub trait Vcs {
    /// Clone `url` into `target_dir`, replacing anything already there.
    fn clone_repo(&mut self, url: &str, target_dir: &Path) -> Result<()>;

    /// Stage `path`, relative to `repo_dir`, in the working copy at `repo_dir`.
    fn add(&mut self, repo_dir: &Path, path: &Path) -> Result<()>;

    /// Commit staged changes with `message`.
    fn commit(&mut self, repo_dir: &Path, message: &str) -> Result<()>;

    /// Push the current branch to `origin`.
    fn push(&mut self, repo_dir: &Path) -> Result<()>;
}

/// [`Vcs`] backed by the `git` command line.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    identity: Option<CommitIdentity>,
}

impl GitCli {
    pub fn new(identity: Option<CommitIdentity>) -> Self {
        Self { identity }
    }

    fn run(&self, repo_dir: &Path, args: &[&str]) -> Result<String> {
        let command = args.join(" ");
        debug!("git -C {} {}", repo_dir.display(), command);

        let output = Command::new("git")
            .arg("-C")
            .arg(repo_dir)
            .args(args)
            .output()
            .map_err(|e| Error::GitCommand {
                command: command.clone(),
                repo: repo_dir.display().to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            // Push and fetch errors can echo the credential URL of origin
            let stderr = redact_text(String::from_utf8_lossy(&output.stderr).trim());
            return Err(Error::GitCommand {
                command,
                repo: repo_dir.display().to_string(),
                stderr: if stderr.is_empty() {
                    format!("exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Vcs for GitCli {
    fn clone_repo(&mut self, url: &str, target_dir: &Path) -> Result<()> {
        // git won't clone into an existing non-empty dir
        if target_dir.exists() {
            fs::remove_dir_all(target_dir)?;
        }
        if let Some(parent) = target_dir.parent() {
            fs::create_dir_all(parent)?;
        }

        let shown_url = redact(url);
        debug!("git clone {} {}", shown_url, target_dir.display());

        let output = Command::new("git")
            .arg("clone")
            .arg(url)
            .arg(target_dir)
            .output()
            .map_err(|e| Error::GitClone {
                url: shown_url.clone(),
                message: e.to_string(),
                hint: Some("Make sure git is installed and on PATH".to_string()),
            })?;

        if !output.status.success() {
            // Git may echo the remote URL back, token included
            let stderr =
                redact_text(&String::from_utf8_lossy(&output.stderr).replace(url, &shown_url));
            let hint = if stderr.contains("Authentication failed")
                || stderr.contains("Permission denied")
                || stderr.contains("Could not read from remote repository")
            {
                Some("Check that GH_TOKEN is valid and can access the repository".to_string())
            } else if stderr.contains("not found") || stderr.contains("does not exist") {
                Some("Check GH_USER, BASE_REPO_NAME and the index range".to_string())
            } else {
                None
            };

            return Err(Error::GitClone {
                url: shown_url,
                message: stderr.trim().to_string(),
                hint,
            });
        }

        Ok(())
    }

    fn add(&mut self, repo_dir: &Path, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(repo_dir, &["add", "--", &path])?;
        Ok(())
    }

    fn commit(&mut self, repo_dir: &Path, message: &str) -> Result<()> {
        match &self.identity {
            Some(identity) => {
                let name = format!("user.name={}", identity.name);
                let email = format!("user.email={}", identity.email);
                self.run(
                    repo_dir,
                    &["-c", &name, "-c", &email, "commit", "--message", message],
                )?;
            }
            None => {
                self.run(repo_dir, &["commit", "--message", message])?;
            }
        }
        Ok(())
    }

    fn push(&mut self, repo_dir: &Path) -> Result<()> {
        self.run(repo_dir, &["push", "origin"])?;
        Ok(())
    }
}
