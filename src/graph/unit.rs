//! Build units and the collaborators that discover them
//!
//! The impact engine only needs two questions answered about the repository:
//! "which unit owns this file?" ([`UnitResolver`]) and "what does every unit
//! import?" ([`UnitScanner`]). The Cargo implementations live in
//! [`crate::cargo`]; tests plug in fixed fakes.

use std::fmt;
use std::path::{Path, PathBuf};

/// The unit owning a changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUnit {
  /// Unit identifier (package name)
  pub id: String,
  /// Unit root directory
  pub dir: PathBuf,
  /// Immutable distribution code (registry/git package); never analyzed
  pub is_standard: bool,
}

/// A unit and the identifiers it directly imports, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedUnit {
  pub id: String,
  pub dir: PathBuf,
  pub imports: Vec<String>,
}

/// Per-file resolution failure. Logged and skipped by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
  /// No unit root contains the file
  NotFound { path: PathBuf },
}

impl fmt::Display for ResolveError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResolveError::NotFound { path } => write!(f, "no package contains {}", path.display()),
    }
  }
}

impl std::error::Error for ResolveError {}

/// Why a single unit could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
  /// Nothing to compile; skipped silently
  NoSources,
  /// The unit is missing from the dependency resolution
  Unresolved,
  /// A resolved dependency does not name a known unit
  MissingDependency { dependency: String },
  /// A source file could not be inspected
  Io { path: PathBuf, message: String },
}

/// Scan failure tagged with the unit it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
  pub unit: String,
  pub dir: PathBuf,
  pub kind: ScanErrorKind,
}

impl ScanError {
  pub fn new(unit: impl Into<String>, dir: impl Into<PathBuf>, kind: ScanErrorKind) -> Self {
    Self {
      unit: unit.into(),
      dir: dir.into(),
      kind,
    }
  }

  /// "No compilable sources" is a skip, not a failure.
  pub fn is_no_sources(&self) -> bool {
    matches!(self.kind, ScanErrorKind::NoSources)
  }
}

impl fmt::Display for ScanError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      ScanErrorKind::NoSources => write!(f, "package {} has no compilable sources", self.unit),
      ScanErrorKind::Unresolved => {
        write!(f, "package {} is missing from the dependency resolution", self.unit)
      }
      ScanErrorKind::MissingDependency { dependency } => {
        write!(f, "package {} depends on unknown package id {}", self.unit, dependency)
      }
      ScanErrorKind::Io { path, message } => {
        write!(f, "package {}: cannot read {}: {}", self.unit, path.display(), message)
      }
    }
  }
}

impl std::error::Error for ScanError {}

/// Maps a file to the unit that owns it.
pub trait UnitResolver {
  /// `file` may be relative, in which case it is taken relative to `cwd`.
  fn resolve(&self, file: &Path, cwd: &Path) -> Result<ResolvedUnit, ResolveError>;
}

/// Enumerates every unit in the repository with its imports.
///
/// Implementations must return entries and import lists in a deterministic
/// order; output order of the whole tool depends on it.
pub trait UnitScanner {
  fn scan(&self) -> Vec<Result<ScannedUnit, ScanError>>;
}
