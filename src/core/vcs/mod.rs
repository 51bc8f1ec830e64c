pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::ImpactResult;
use std::path::{Path, PathBuf};

/// Source of changed paths between two revisions.
///
/// The impact analysis never talks to git directly; anything that can name a
/// repository root and list changed files can drive it.
pub trait ChangeSource {
  /// Repository root (absolute)
  fn root(&self) -> &Path;

  /// Absolute paths of files changed in `range` (e.g. `main..HEAD`)
  fn changed_files(&self, range: &str) -> ImpactResult<Vec<PathBuf>>;
}
