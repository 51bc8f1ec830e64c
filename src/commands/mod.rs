//! CLI commands for cargo-impact
//!
//! - **affected**: list packages affected by the changes in a revision range
//!
//! Commands take `&RepoContext` so the repository is discovered once.

pub mod affected;

pub use affected::{AffectedOptions, run_affected};
