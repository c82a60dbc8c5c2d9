//! # Release Simulator Library
//!
//! This library simulates a stream of releases across a numbered set of
//! deployment repositories. Each release advances the container image tag in a
//! repository's `dev/values.yaml`, pushes it, waits, then does the same for
//! `prod/values.yaml`. It backs the `release-sim` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use release_sim::remote::{clone_url, repo_name};
//! use release_sim::tag::next_tag;
//!
//! assert_eq!(next_tag("0.1"), "0.2");
//! assert_eq!(next_tag("0.3"), "0.1");
//!
//! let name = repo_name("svc", 7);
//! let url = clone_url("https://github.com", "octo", None, &name).unwrap();
//! assert_eq!(url, "https://github.com/octo/svc-7.git");
//! ```
//!
//! ## Core Concepts
//!
//! - **Settings (`config`)**: Everything is read from environment variables
//!   once at startup.
//! - **Remotes (`remote`)**: Repository names and credential-bearing clone URLs.
//! - **Tags (`tag`)**: The fixed `0.1 -> 0.2 -> 0.3 -> 0.1` rotation.
//! - **Values files (`values`)**: Reading and rewriting `image.tag`.
//! - **Version control (`git`)**: The `Vcs` trait and its `git` CLI backend.
//! - **Release loop (`release`)**: Clone, update, wait, update, clean up, over
//!   the whole index range, optionally cycling forever.

pub mod config;
pub mod error;
pub mod git;
pub mod release;
pub mod remote;
pub mod tag;
pub mod values;
