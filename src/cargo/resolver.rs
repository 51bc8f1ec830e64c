//! File -> owning package resolution

use super::metadata::{WorkspaceMetadata, is_standard, package_dir, package_name};
use crate::graph::unit::{ResolveError, ResolvedUnit, UnitResolver};
use crate::utils::normalize_path;
use std::path::{Path, PathBuf};

/// A package root directory and what owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRoot {
  pub id: String,
  pub dir: PathBuf,
  pub is_standard: bool,
}

/// Maps files to packages by directory prefix.
///
/// Roots are kept deepest-first so a package nested inside another package's
/// directory (e.g. a workspace root package with members under `crates/`)
/// wins for its own files.
pub struct CargoUnitResolver {
  roots: Vec<UnitRoot>,
}

impl CargoUnitResolver {
  /// Index every package cargo reported, members and dependencies alike.
  pub fn new(metadata: &WorkspaceMetadata) -> Self {
    let roots = metadata
      .packages()
      .iter()
      .map(|pkg| UnitRoot {
        id: package_name(pkg),
        dir: normalize_path(&package_dir(pkg)),
        is_standard: is_standard(pkg),
      })
      .collect();
    Self::from_roots(roots)
  }

  pub fn from_roots(mut roots: Vec<UnitRoot>) -> Self {
    roots.sort_by_key(|root| std::cmp::Reverse(root.dir.components().count()));
    Self { roots }
  }
}

impl UnitResolver for CargoUnitResolver {
  fn resolve(&self, file: &Path, cwd: &Path) -> Result<ResolvedUnit, ResolveError> {
    let absolute = if file.is_absolute() {
      file.to_path_buf()
    } else {
      cwd.join(file)
    };
    let normalized = normalize_path(&absolute);

    self
      .roots
      .iter()
      .find(|root| normalized.starts_with(&root.dir))
      .map(|root| ResolvedUnit {
        id: root.id.clone(),
        dir: root.dir.clone(),
        is_standard: root.is_standard,
      })
      .ok_or(ResolveError::NotFound { path: absolute })
  }
}
