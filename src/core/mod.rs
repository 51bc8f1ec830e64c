//! Core plumbing for cargo-impact
//!
//! - **config**: impact.toml parsing
//! - **context**: repository context built once per invocation
//! - **error**: error types with contextual help messages
//! - **vcs**: changed-file discovery (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
