//! # Release Settings
//!
//! This module loads the settings that drive a release run. Everything comes
//! from environment variables; there is no configuration file.
//!
//! ## Variables
//!
//! | Variable           | Meaning                              | Default              |
//! |--------------------|--------------------------------------|----------------------|
//! | `GH_TOKEN`         | access token embedded in clone URLs  | none                 |
//! | `GH_USER`          | owner segment of repository paths    | required             |
//! | `GH_URL`           | remote host base URL                 | `https://github.com` |
//! | `BASE_REPO_NAME`   | repository name prefix               | required             |
//! | `FROM_INDEX`       | first repository index (inclusive)   | `0`                  |
//! | `TO_INDEX`         | last repository index (inclusive)    | `0`                  |
//! | `COMMIT_DELAY_SEC` | wait between dev and prod updates    | `60`                 |
//! | `REPO_DELAY_SEC`   | wait between repositories            | `60`                 |
//! | `CYCLE_DELAY_SEC`  | wait between cycles, `0` disables    | `0`                  |
//! | `MAX_CYCLES`       | bound on cycles                      | unbounded            |
//! | `GIT_COMMIT_NAME`  | commit author name                   | git's own config     |
//! | `GIT_COMMIT_EMAIL` | commit author email                  | git's own config     |
//!
//! Empty values count as unset.

use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::git::CommitIdentity;

pub const GH_TOKEN: &str = "GH_TOKEN";
pub const GH_USER: &str = "GH_USER";
pub const GH_URL: &str = "GH_URL";
pub const BASE_REPO_NAME: &str = "BASE_REPO_NAME";
pub const FROM_INDEX: &str = "FROM_INDEX";
pub const TO_INDEX: &str = "TO_INDEX";
pub const COMMIT_DELAY_SEC: &str = "COMMIT_DELAY_SEC";
pub const REPO_DELAY_SEC: &str = "REPO_DELAY_SEC";
pub const CYCLE_DELAY_SEC: &str = "CYCLE_DELAY_SEC";
pub const MAX_CYCLES: &str = "MAX_CYCLES";
pub const GIT_COMMIT_NAME: &str = "GIT_COMMIT_NAME";
pub const GIT_COMMIT_EMAIL: &str = "GIT_COMMIT_EMAIL";

/// Remote host used when `GH_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://github.com";
const DEFAULT_COMMIT_DELAY_SECS: u64 = 60;
const DEFAULT_REPO_DELAY_SECS: u64 = 60;

/// Settings for one release run, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Access token placed in the clone URL. `None` clones without credentials.
    pub token: Option<String>,
    pub user: String,
    pub base_url: String,
    pub base_repo_name: String,
    pub from_index: u32,
    pub to_index: u32,
    /// Wait between the dev and prod update of one repository.
    pub commit_delay: Duration,
    /// Wait between two repositories of the same cycle.
    pub repo_delay: Duration,
    /// Wait between cycles. Zero runs a single cycle.
    pub cycle_delay: Duration,
    /// Upper bound on cycles when cycling is enabled.
    pub max_cycles: Option<u32>,
    pub commit_identity: Option<CommitIdentity>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let commit_identity = match (get(GIT_COMMIT_NAME), get(GIT_COMMIT_EMAIL)) {
            (Some(name), Some(email)) => Some(CommitIdentity { name, email }),
            (None, None) => None,
            _ => {
                return Err(Error::Config {
                    message: format!(
                        "{} and {} must be set together",
                        GIT_COMMIT_NAME, GIT_COMMIT_EMAIL
                    ),
                    hint: None,
                })
            }
        };

        Ok(Self {
            token: get(GH_TOKEN),
            user: required(GH_USER, get(GH_USER))?,
            base_url: get(GH_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            base_repo_name: required(BASE_REPO_NAME, get(BASE_REPO_NAME))?,
            from_index: number(FROM_INDEX, get(FROM_INDEX))?.unwrap_or(0),
            to_index: number(TO_INDEX, get(TO_INDEX))?.unwrap_or(0),
            commit_delay: seconds(COMMIT_DELAY_SEC, get(COMMIT_DELAY_SEC), DEFAULT_COMMIT_DELAY_SECS)?,
            repo_delay: seconds(REPO_DELAY_SEC, get(REPO_DELAY_SEC), DEFAULT_REPO_DELAY_SECS)?,
            cycle_delay: seconds(CYCLE_DELAY_SEC, get(CYCLE_DELAY_SEC), 0)?,
            max_cycles: number(MAX_CYCLES, get(MAX_CYCLES))?,
            commit_identity,
        })
    }

    /// The repository indices of one cycle. Empty when `from_index > to_index`.
    pub fn indices(&self) -> RangeInclusive<u32> {
        self.from_index..=self.to_index
    }

    /// Whether the range is re-run after a cycle delay.
    pub fn is_cyclic(&self) -> bool {
        !self.cycle_delay.is_zero()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("user", &self.user)
            .field("base_url", &self.base_url)
            .field("base_repo_name", &self.base_repo_name)
            .field("from_index", &self.from_index)
            .field("to_index", &self.to_index)
            .field("commit_delay", &self.commit_delay)
            .field("repo_delay", &self.repo_delay)
            .field("cycle_delay", &self.cycle_delay)
            .field("max_cycles", &self.max_cycles)
            .field("commit_identity", &self.commit_identity)
            .finish()
    }
}

fn required(key: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::Config {
        message: format!("{} is not set", key),
        hint: Some(format!("export {}=<value>", key)),
    })
}

fn number<T: std::str::FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| Error::Config {
                message: format!("{} is not a valid number: '{}'", key, raw),
                hint: Some("Use a non-negative integer".to_string()),
            })
        })
        .transpose()
}

fn seconds(key: &str, value: Option<String>, default: u64) -> Result<Duration> {
    Ok(Duration::from_secs(number(key, value)?.unwrap_or(default)))
}
