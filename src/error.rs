//! # Error Handling
//!
//! This module defines the centralized error type for `release-sim`. It uses
//! the `thiserror` library to describe every failure the release loop can
//! hit, with enough context to tell which repository or file was involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes: configuration problems,
//!   git clone and command failures, values file problems, and wrapped
//!   I/O, YAML and URL errors.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors are recovered from. The binary reports the first one
//! and exits, which also ends an infinite cycle.
//!
//! URLs stored in errors are always redacted first, so an access token never
//! reaches stderr.

use thiserror::Error;

/// Main error type for release-sim operations
#[derive(Error, Debug)]
pub enum Error {
    /// An environment variable was missing or could not be parsed.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the setting
        hint: Option<String>,
    },

    /// Cloning a repository failed.
    #[error("Git clone error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// A git command inside a working copy failed.
    #[error("Git command failed in {repo}: {command} - {stderr}")]
    GitCommand {
        command: String,
        repo: String,
        stderr: String,
    },

    /// The values file does not have the expected `image.tag` shape.
    #[error("Values file error in {path}: {message}")]
    ValuesFile { path: String, message: String },

    /// The token could not be embedded into the remote URL.
    #[error("Cannot add credentials to {url}: {message}")]
    Credentials { url: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
