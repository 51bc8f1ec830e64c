//! Utility functions for cross-platform path handling

use std::path::{Component, Path, PathBuf};

/// Normalize a path for prefix comparisons against package roots.
///
/// Files listed by `git diff` may have been deleted in the target revision,
/// so plain `canonicalize()` is not enough. The longest existing ancestor is
/// canonicalized (resolving symlinks such as macOS `/tmp -> /private/tmp`) and
/// the remaining, non-existent components are appended lexically.
pub fn normalize_path(path: &Path) -> PathBuf {
  let lexical = lexical_clean(path);

  let mut existing = lexical.as_path();
  let mut missing: Vec<&std::ffi::OsStr> = Vec::new();

  loop {
    if let Ok(canonical) = existing.canonicalize() {
      let mut result = canonical;
      for component in missing.iter().rev() {
        result.push(component);
      }
      return result;
    }

    match (existing.file_name(), existing.parent()) {
      (Some(name), Some(parent)) => {
        missing.push(name);
        existing = parent;
      }
      _ => return lexical.clone(),
    }
  }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !out.pop() {
          out.push(component);
        }
      }
      other => out.push(other),
    }
  }
  out
}

/// Join a path printed by git (always forward slashes) onto a root directory.
pub fn join_git_path(root: &Path, git_path: &str) -> PathBuf {
  let mut joined = root.to_path_buf();
  for part in git_path.split('/').filter(|p| !p.is_empty()) {
    joined.push(part);
  }
  joined
}
