//! prbuilder - turn uncommitted workspace changes into a GitHub pull request
//!
//! Each run closes the PRs an earlier run left open (recognized by a
//! provenance signature in the body), checks the working tree for changes,
//! and when there is something worth sending commits it to a fresh branch,
//! pushes that branch to the acting user's fork and opens a signed PR.

pub mod auth;
pub mod branch;
pub mod builder;
pub mod cleanup;
pub mod config;
pub mod detect;
pub mod error;
pub mod platform;
pub mod publish;
pub mod repo;
pub mod signature;
pub mod types;

pub use builder::PrBuilder;
pub use error::{Error, Result};
