//! # Release Loop
//!
//! This module drives a release run across the configured repositories. For
//! every index in the range it:
//!
//! 1. clones `{base_repo_name}-{index}` into the work directory,
//! 2. advances `dev/values.yaml` and pushes the change,
//! 3. waits `commit_delay`,
//! 4. advances `prod/values.yaml` and pushes the change,
//! 5. deletes the clone.
//!
//! Repositories are separated by `repo_delay`. When `cycle_delay` is set the
//! whole range is run again after that wait, until the process is stopped or
//! `max_cycles` is reached.
//!
//! Everything is sequential and the first error ends the run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::config::Settings;
use crate::error::Result;
use crate::git::Vcs;
use crate::remote::{clone_url, repo_name};
use crate::values::advance_image_tag;

/// File name of the values document inside each environment folder.
pub const VALUES_FILE: &str = "values.yaml";

/// Commit message recorded for a new tag.
pub fn commit_message(tag: &str) -> String {
    format!("new tag - {}", tag)
}

/// Remove and recreate the directory that holds clones.
pub fn reset_work_dir(path: &Path) -> Result<()> {
    if path.exists() {
        debug!("Removing {}", path.display());
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Timed waits between release steps.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// [`Sleeper`] that blocks the current thread.
#[derive(Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Environment folders inside each deployment repository, in release order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn folder(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    /// Path of this environment's values file relative to the repository root.
    pub fn relative_values_path(self) -> PathBuf {
        Path::new(self.folder()).join(VALUES_FILE)
    }

    /// Path of this environment's values file inside `repo_dir`.
    pub fn values_path(self, repo_dir: &Path) -> PathBuf {
        repo_dir.join(self.relative_values_path())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

/// Steps of the release loop, logged as they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Cloning,
    UpdatingDev,
    Waiting,
    UpdatingProd,
    CleaningUp,
    BetweenRepos,
    CycleWait,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Cloning => "cloning",
            Stage::UpdatingDev => "updating-dev",
            Stage::Waiting => "waiting",
            Stage::UpdatingProd => "updating-prod",
            Stage::CleaningUp => "cleaning-up",
            Stage::BetweenRepos => "between-repos",
            Stage::CycleWait => "cycle-wait",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u32,
    pub repositories: u32,
}

/// Runs release cycles with a version control backend and a sleeper.
pub struct Releaser<V, S> {
    settings: Settings,
    work_dir: PathBuf,
    vcs: V,
    sleeper: S,
}

impl<V: Vcs, S: Sleeper> Releaser<V, S> {
    pub fn new(settings: Settings, work_dir: impl Into<PathBuf>, vcs: V, sleeper: S) -> Self {
        Self {
            settings,
            work_dir: work_dir.into(),
            vcs,
            sleeper,
        }
    }

    #[cfg(test)]
    fn vcs(&self) -> &V {
        &self.vcs
    }

    #[cfg(test)]
    fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Run cycles until the range is done, or forever when cycling is enabled.
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        enter(Stage::Idle, "release");

        if self.settings.indices().is_empty() {
            info!(
                "Nothing to do: FROM_INDEX {} is after TO_INDEX {}",
                self.settings.from_index, self.settings.to_index
            );
            enter(Stage::Done, "release");
            return Ok(summary);
        }

        loop {
            summary.repositories += self.run_cycle()?;
            summary.cycles += 1;
            info!("Cycle {} finished", summary.cycles);

            if !self.settings.is_cyclic() {
                break;
            }
            if self
                .settings
                .max_cycles
                .is_some_and(|max| summary.cycles >= max)
            {
                info!("Reached MAX_CYCLES ({})", summary.cycles);
                break;
            }

            self.pause(Stage::CycleWait, self.settings.cycle_delay);
        }

        enter(Stage::Done, "release");
        Ok(summary)
    }

    /// One pass over the index range. Returns the number of repositories released.
    pub fn run_cycle(&mut self) -> Result<u32> {
        let mut released = 0;
        for index in self.settings.indices() {
            if released > 0 {
                self.pause(Stage::BetweenRepos, self.settings.repo_delay);
            }
            self.release_repository(index)?;
            released += 1;
        }
        Ok(released)
    }

    /// Clone, update dev, wait, update prod and clean up for one repository.
    pub fn release_repository(&mut self, index: u32) -> Result<()> {
        let name = repo_name(&self.settings.base_repo_name, index);
        let repo_dir = self.work_dir.join(&name);
        info!("Releasing {}", name);

        enter(Stage::Cloning, &name);
        let url = clone_url(
            &self.settings.base_url,
            &self.settings.user,
            self.settings.token.as_deref(),
            &name,
        )?;
        self.vcs.clone_repo(&url, &repo_dir)?;

        enter(Stage::UpdatingDev, &name);
        self.update_environment(&repo_dir, Environment::Dev)?;

        self.pause(Stage::Waiting, self.settings.commit_delay);

        enter(Stage::UpdatingProd, &name);
        self.update_environment(&repo_dir, Environment::Prod)?;

        enter(Stage::CleaningUp, &name);
        fs::remove_dir_all(&repo_dir)?;

        info!("Released {}", name);
        Ok(())
    }

    /// Advance the tag in one environment's values file, then commit and push it.
    pub fn update_environment(&mut self, repo_dir: &Path, env: Environment) -> Result<String> {
        let values_path = env.values_path(repo_dir);
        let change = advance_image_tag(&values_path)?;
        info!("{}", commit_message(&change.next));
        debug!("{}: {} -> {}", env, change.previous, change.next);

        self.vcs.add(repo_dir, &env.relative_values_path())?;
        self.vcs.commit(repo_dir, &commit_message(&change.next))?;
        self.vcs.push(repo_dir)?;

        Ok(change.next)
    }

    fn pause(&mut self, stage: Stage, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        debug!("{}: sleeping {:?}", stage, duration);
        self.sleeper.sleep(duration);
    }
}

fn enter(stage: Stage, repo: &str) {
    debug!("{}: {}", repo, stage);
}
