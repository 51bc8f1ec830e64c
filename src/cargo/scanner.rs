//! Workspace scan: every local package and the local packages it depends on
//!
//! Local means built from a path: workspace members plus path dependencies
//! that live outside the membership. Edges come from cargo's resolved
//! dependency graph rather than from the manifests, so renamed, optional and
//! target-specific dependencies are reported exactly as cargo will build
//! them. Import order is the order of the resolve node's `deps`, which cargo
//! emits sorted by package id.
//!
//! Edges to registry and git packages are not recorded. Those can never be
//! seeds, and a registry crate sharing its name with a local package would
//! otherwise hand its importers to the local one.

use super::metadata::{WorkspaceMetadata, is_standard, package_dir, package_name};
use crate::graph::unit::{ScanError, ScanErrorKind, ScannedUnit, UnitScanner};
use cargo_metadata::{DependencyKind, Node, NodeDep, Package, PackageId};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

pub struct CargoScanner<'a> {
  metadata: &'a WorkspaceMetadata,
  dev_dependencies: bool,
}

impl<'a> CargoScanner<'a> {
  pub fn new(metadata: &'a WorkspaceMetadata) -> Self {
    Self {
      metadata,
      dev_dependencies: true,
    }
  }

  /// Whether edges that exist only as dev-dependencies count as imports
  pub fn dev_dependencies(mut self, enabled: bool) -> Self {
    self.dev_dependencies = enabled;
    self
  }

  fn scan_package(
    &self,
    package: &Package,
    packages: &HashMap<&PackageId, &Package>,
    nodes: &HashMap<&PackageId, &Node>,
  ) -> Result<ScannedUnit, ScanError> {
    let id = package_name(package);
    let dir = package_dir(package);
    let fail = |kind: ScanErrorKind| ScanError::new(id.clone(), dir.clone(), kind);

    let sources = package
      .targets
      .iter()
      .filter(|target| !target.is_custom_build())
      .map(|target| target.src_path.as_std_path());
    check_sources(sources).map_err(fail)?;

    let node = nodes.get(&package.id).ok_or_else(|| fail(ScanErrorKind::Unresolved))?;

    let mut imports = Vec::with_capacity(node.deps.len());
    for dep in &node.deps {
      if !self.dev_dependencies && is_dev_only(dep) {
        continue;
      }
      let dependency = packages.get(&dep.pkg).ok_or_else(|| {
        fail(ScanErrorKind::MissingDependency {
          dependency: dep.pkg.repr.clone(),
        })
      })?;
      if is_standard(dependency) {
        continue;
      }
      imports.push(package_name(dependency));
    }

    Ok(ScannedUnit { id, dir, imports })
  }
}

impl UnitScanner for CargoScanner<'_> {
  /// Packages are checked in parallel; `collect` keeps the listing order.
  fn scan(&self) -> Vec<Result<ScannedUnit, ScanError>> {
    let packages = self.metadata.packages_by_id();
    let nodes = self.metadata.resolve_nodes();

    self
      .metadata
      .local_packages()
      .par_iter()
      .map(|package| self.scan_package(package, &packages, &nodes))
      .collect()
  }
}

/// Old cargo versions leave `dep_kinds` empty; treat that as a normal edge.
fn is_dev_only(dep: &NodeDep) -> bool {
  !dep.dep_kinds.is_empty()
    && dep
      .dep_kinds
      .iter()
      .all(|info| info.kind == DependencyKind::Development)
}

/// A package is compilable if at least one target's root source file exists.
///
/// Missing files are expected (a target deleted in the working tree); any
/// other I/O failure means we cannot tell, and is reported.
fn check_sources<'p>(sources: impl Iterator<Item = &'p Path>) -> Result<(), ScanErrorKind> {
  let mut found = false;

  for path in sources {
    match fs::metadata(path) {
      Ok(_) => found = true,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => {
        return Err(ScanErrorKind::Io {
          path: path.to_path_buf(),
          message: e.to_string(),
        });
      }
    }
  }

  if found { Ok(()) } else { Err(ScanErrorKind::NoSources) }
}
