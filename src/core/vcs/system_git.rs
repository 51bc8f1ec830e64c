//! System git backend - no git crate, just the git binary on PATH
//!
//! cargo-impact needs exactly two things from git: the worktree root and the
//! list of paths changed in a revision range. Both are one subprocess call.

use super::ChangeSource;
use crate::core::error::{GitError, ImpactError, ImpactResult, ResultExt};
use crate::utils::join_git_path;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// Directory git was opened from
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  ///
  /// This performs ONE subprocess call to discover the worktree root.
  pub fn open(path: &Path) -> ImpactResult<Self> {
    let output = isolated_git(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ImpactError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ImpactError::Git(GitError::CommandFailed {
        command: "git rev-parse --show-toplevel".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Git command bound to the directory the repository was opened from
  pub(crate) fn git_cmd(&self) -> Command {
    isolated_git(&self.repo_path)
  }
}

/// Create a safe git command with isolated environment
///
/// - Sets working directory to `dir`
/// - Clears environment variables (`GIT_DIR`, `GIT_WORK_TREE` and friends
///   would otherwise redirect root discovery and diff to another repository)
/// - Whitelists only PATH and HOME
/// - Adds safe configuration overrides
fn isolated_git(dir: &Path) -> Command {
  let mut cmd = Command::new("git");

  cmd.arg("-C").arg(dir);

  // Isolated environment (don't trust global config)
  cmd.env_clear();
  if let Ok(path) = std::env::var("PATH") {
    cmd.env("PATH", path);
  }
  if let Ok(home) = std::env::var("HOME") {
    cmd.env("HOME", home);
  }

  cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

  cmd
}

impl ChangeSource for SystemGit {
  fn root(&self) -> &Path {
    &self.work_tree
  }

  /// Paths come back relative to the worktree root, NUL-separated so that
  /// names containing newlines or quotes survive intact. Renames are split
  /// into delete + add so the package that lost the file is reported too.
  fn changed_files(&self, range: &str) -> ImpactResult<Vec<PathBuf>> {
    let output = self
      .git_cmd()
      .args(["diff", "--name-only", "--no-renames", "-z", range, "--"])
      .output()
      .context("Failed to execute git diff")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ImpactError::Git(GitError::CommandFailed {
        command: format!("git diff --name-only {}", range),
        stderr: stderr.trim().to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_name_only(&stdout, &self.work_tree))
  }
}

/// Split `git diff --name-only -z` output and anchor each entry at `root`.
fn parse_name_only(raw: &str, root: &Path) -> Vec<PathBuf> {
  raw
    .split('\0')
    .filter(|entry| !entry.is_empty())
    .map(|entry| join_git_path(root, entry))
    .collect()
}
