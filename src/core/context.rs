//! Repository context - build once, pass to the command
//!
//! Everything the analysis reads from the environment is gathered here in one
//! place: working directory, git root, config file and cargo metadata.

use crate::cargo::metadata::WorkspaceMetadata;
use crate::core::config::ImpactConfig;
use crate::core::error::ImpactResult;
use crate::core::vcs::{ChangeSource, SystemGit};
use std::path::{Path, PathBuf};

pub struct RepoContext {
  /// Directory the tool was invoked from
  pub cwd: PathBuf,

  /// Git access (root discovery + diff)
  pub git: SystemGit,

  /// impact.toml, or defaults
  pub config: ImpactConfig,

  /// Cargo metadata for the workspace containing `cwd`
  pub metadata: WorkspaceMetadata,
}

impl RepoContext {
  /// Discover the repository from `cwd`.
  ///
  /// Order matters for diagnostics: a missing git checkout is reported before
  /// any cargo failure.
  pub fn build(cwd: &Path) -> ImpactResult<Self> {
    let git = SystemGit::open(cwd)?;
    let config = ImpactConfig::load(git.root())?;
    let metadata = WorkspaceMetadata::load(cwd)?;

    Ok(Self {
      cwd: cwd.to_path_buf(),
      git,
      config,
      metadata,
    })
  }

  /// Repository root (absolute)
  pub fn repo_root(&self) -> &Path {
    self.git.root()
  }
}
