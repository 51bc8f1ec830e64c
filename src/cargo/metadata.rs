use crate::core::error::{ImpactResult, ResultExt};
use cargo_metadata::{MetadataCommand, Node, Package, PackageId};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Workspace introspection using cargo_metadata
pub struct WorkspaceMetadata {
  metadata: cargo_metadata::Metadata,
}

impl WorkspaceMetadata {
  /// Load metadata for the workspace containing `dir`, with the full
  /// dependency resolution (the scanner needs resolved edges).
  pub fn load(dir: &Path) -> ImpactResult<Self> {
    let metadata = MetadataCommand::new()
      .current_dir(dir)
      .exec()
      .with_context(|| format!("Failed to load cargo metadata in {}", dir.display()))?;
    Ok(Self { metadata })
  }

  /// Every package cargo knows about: members, path dependencies, registry and git packages
  pub fn packages(&self) -> &[Package] {
    &self.metadata.packages
  }

  /// Workspace members, in cargo's member order
  pub fn list_crates(&self) -> Vec<&Package> {
    self.metadata.workspace_packages()
  }

  /// Every package built from local sources: members first, in member order,
  /// then path dependencies outside the membership (excluded directories,
  /// crates beside the workspace) in metadata order.
  pub fn local_packages(&self) -> Vec<&Package> {
    let members: HashSet<&PackageId> = self.metadata.workspace_members.iter().collect();
    let mut packages = self.list_crates();
    packages.extend(
      self
        .metadata
        .packages
        .iter()
        .filter(|pkg| !is_standard(pkg) && !members.contains(&pkg.id)),
    );
    packages
  }

  /// Resolved dependency nodes by package id (empty if cargo skipped resolution)
  pub fn resolve_nodes(&self) -> HashMap<&PackageId, &Node> {
    self
      .metadata
      .resolve
      .iter()
      .flat_map(|resolve| resolve.nodes.iter())
      .map(|node| (&node.id, node))
      .collect()
  }

  /// Packages by id
  pub fn packages_by_id(&self) -> HashMap<&PackageId, &Package> {
    self.metadata.packages.iter().map(|pkg| (&pkg.id, pkg)).collect()
  }

  pub fn workspace_root(&self) -> &Path {
    self.metadata.workspace_root.as_std_path()
  }
}

/// Unit identifier for a package
pub fn package_name(package: &Package) -> String {
  package.name.as_ref().to_string()
}

/// Package root: the directory holding its Cargo.toml
pub fn package_dir(package: &Package) -> PathBuf {
  package
    .manifest_path
    .parent()
    .map(|dir| dir.as_std_path().to_path_buf())
    .unwrap_or_else(|| package.manifest_path.as_std_path().to_path_buf())
}

/// Registry and git packages are immutable third-party code
pub fn is_standard(package: &Package) -> bool {
  package.source.is_some()
}
