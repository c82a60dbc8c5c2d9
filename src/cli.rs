//! CLI argument parsing and run setup

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use release_sim::config::Settings;
use release_sim::git::GitCli;
use release_sim::release::{reset_work_dir, Releaser, ThreadSleeper};

/// Release Simulator - cycle image tags across deployment repositories
///
/// Release settings are read from the environment: GH_TOKEN, GH_USER, GH_URL,
/// BASE_REPO_NAME, FROM_INDEX, TO_INDEX, COMMIT_DELAY_SEC, REPO_DELAY_SEC,
/// CYCLE_DELAY_SEC, MAX_CYCLES, GIT_COMMIT_NAME and GIT_COMMIT_EMAIL.
#[derive(Parser, Debug)]
#[command(name = "release-sim")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        value_name = "LEVEL",
        env = "LOG_LEVEL",
        default_value = "info",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,

    /// Directory that holds the clones. It is emptied at startup.
    #[arg(long, value_name = "DIR", env = "WORK_DIR", default_value = "repositories")]
    work_dir: PathBuf,
}

impl Cli {
    /// Execute the release run
    pub fn execute(self) -> Result<()> {
        let level = self.log_level.parse().unwrap_or(LevelFilter::Info);
        env_logger::Builder::new()
            .filter_level(level)
            .format_target(false)
            .init();

        let settings = Settings::from_env().context("Failed to load settings")?;
        info!("{:?}", settings);

        // Clones are addressed from the current directory, not from inside a clone
        let work_dir = std::path::absolute(&self.work_dir).with_context(|| {
            format!("Failed to resolve work directory {}", self.work_dir.display())
        })?;
        reset_work_dir(&work_dir).with_context(|| {
            format!("Failed to prepare work directory {}", work_dir.display())
        })?;

        let vcs = GitCli::new(settings.commit_identity.clone());
        let mut releaser = Releaser::new(settings, &work_dir, vcs, ThreadSleeper);
        let summary = releaser.run()?;

        info!(
            "Done: {} repositories released over {} cycle(s)",
            summary.repositories, summary.cycles
        );
        Ok(())
    }
}
