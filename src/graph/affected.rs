//! Affected package analysis
//!
//! Given a set of changed files, determine:
//! - Which packages directly contain those files (the seeds)
//! - Which packages transitively depend on the seeds
//!
//! The closure is computed in rounds over the [`ReverseIndex`]: every round
//! looks up the importers of the previous round's additions and appends the
//! ones not seen yet. Output order is fully determined by the seed order and
//! the scanner's edge order; nothing is sorted.

use super::ignore::IgnoreFilter;
use super::reverse_index::ReverseIndex;
use super::unit::{ResolveError, ScanError, ScannedUnit, UnitResolver, UnitScanner};
use crate::core::error::{ImpactError, ImpactResult};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One entry of the affected set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedUnit {
  pub name: String,
  /// 0 for seeds, n for units added in closure round n
  pub round: usize,
  /// The unit whose importer list introduced this one (None for seeds)
  pub via: Option<String>,
}

/// Seeds closed under "is imported by", in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AffectedSet {
  units: Vec<AffectedUnit>,
  seed_count: usize,
  rounds: usize,
}

impl AffectedSet {
  pub fn units(&self) -> &[AffectedUnit] {
    &self.units
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.units.iter().map(|u| u.name.as_str())
  }

  /// Units directly containing changed files
  pub fn seeds(&self) -> &[AffectedUnit] {
    &self.units[..self.seed_count]
  }

  /// Units reached only through the reverse index
  pub fn dependents(&self) -> &[AffectedUnit] {
    &self.units[self.seed_count..]
  }

  pub fn len(&self) -> usize {
    self.units.len()
  }

  pub fn is_empty(&self) -> bool {
    self.units.is_empty()
  }

  /// Number of closure rounds that added something
  pub fn rounds(&self) -> usize {
    self.rounds
  }
}

/// Close `seeds` over the reverse index.
///
/// Seeds are taken as given (already stripped of standard and ignored units)
/// apart from deduplication. Importers matching `filter` are skipped, which
/// also cuts propagation through them. Cycles terminate because a unit is
/// never added twice.
///
/// # Performance
/// O(V + E): each unit enters the set once and its importer list is read once.
pub fn close(seeds: &[String], index: &ReverseIndex, filter: &IgnoreFilter) -> AffectedSet {
  let mut seen: HashSet<String> = HashSet::new();
  let mut units: Vec<AffectedUnit> = Vec::new();

  for seed in seeds {
    if seen.insert(seed.clone()) {
      units.push(AffectedUnit {
        name: seed.clone(),
        round: 0,
        via: None,
      });
    }
  }
  let seed_count = units.len();

  // Importers of older members were staged in an earlier round, so only the
  // previous round's additions can contribute anything new.
  let mut frontier = 0..units.len();
  let mut round = 0;

  loop {
    let mut staged: Vec<AffectedUnit> = Vec::new();

    for parent in &units[frontier.clone()] {
      for importer in index.importers_of(&parent.name) {
        if filter.is_ignored(importer) || seen.contains(importer) {
          continue;
        }
        seen.insert(importer.clone());
        staged.push(AffectedUnit {
          name: importer.clone(),
          round: round + 1,
          via: Some(parent.name.clone()),
        });
      }
    }

    if staged.is_empty() {
      break;
    }

    round += 1;
    let start = units.len();
    units.extend(staged);
    frontier = start..units.len();
  }

  AffectedSet {
    units,
    seed_count,
    rounds: round,
  }
}

/// Why a changed file did not produce a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  /// Path matches an ignore pattern (not reported)
  Ignored,
  /// No package owns the file
  Unresolved(ResolveError),
  /// File belongs to a registry/git package
  Standard { unit: String },
  /// Owning package name matches an ignore pattern
  IgnoredUnit { unit: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
  pub path: PathBuf,
  pub reason: SkipReason,
}

/// Seed set plus the files that did not contribute to it.
#[derive(Debug, Clone, Default)]
pub struct SeedSelection {
  pub seeds: Vec<String>,
  pub skipped: Vec<SkippedFile>,
}

/// Map changed files to the deduplicated seed set, in file order.
///
/// Resolution failures are per-file and never abort the run.
pub fn select_seeds(
  changed_files: &[PathBuf],
  cwd: &Path,
  resolver: &dyn UnitResolver,
  filter: &IgnoreFilter,
) -> SeedSelection {
  let mut selection = SeedSelection::default();
  let mut seen = HashSet::new();

  for file in changed_files {
    let skip = |reason: SkipReason| SkippedFile {
      path: file.clone(),
      reason,
    };

    if filter.is_path_ignored(file) {
      selection.skipped.push(skip(SkipReason::Ignored));
      continue;
    }

    let unit = match resolver.resolve(file, cwd) {
      Ok(unit) => unit,
      Err(e) => {
        selection.skipped.push(skip(SkipReason::Unresolved(e)));
        continue;
      }
    };

    if unit.is_standard {
      selection.skipped.push(skip(SkipReason::Standard { unit: unit.id }));
      continue;
    }

    if filter.is_ignored(&unit.id) || filter.is_path_ignored(&unit.dir) {
      selection.skipped.push(skip(SkipReason::IgnoredUnit { unit: unit.id }));
      continue;
    }

    if seen.insert(unit.id.clone()) {
      selection.seeds.push(unit.id);
    }
  }

  selection
}

/// Split scanner output into usable units and hard failures.
///
/// Units without sources are dropped silently. Ignored units are dropped
/// together with any error they reported; their edges never reach the graph.
pub fn collect_units(
  results: Vec<Result<ScannedUnit, ScanError>>,
  filter: &IgnoreFilter,
) -> (Vec<ScannedUnit>, Vec<ScanError>) {
  let mut units = Vec::with_capacity(results.len());
  let mut errors = Vec::new();

  for result in results {
    match result {
      Ok(unit) => units.push(unit),
      Err(e) if e.is_no_sources() => {}
      Err(e) if filter.is_ignored(&e.unit) || filter.is_path_ignored(&e.dir) => {}
      Err(e) => errors.push(e),
    }
  }

  (units, errors)
}

/// Complete affected analysis.
#[derive(Debug, Clone)]
pub struct AffectedAnalysis {
  /// Files that changed
  pub changed_files: Vec<PathBuf>,

  /// Files that did not map to a seed, and why
  pub skipped: Vec<SkippedFile>,

  /// Units that made it into the reverse index
  pub scanned_units: usize,

  /// Dependency edges between those units
  pub dependency_edges: usize,

  /// Impact set
  pub impact: AffectedSet,
}

/// Analyze which packages are affected by file changes.
///
/// Algorithm:
/// 1. Map files -> owning units (seeds), logging files that do not map
/// 2. Scan every unit; abort on any hard scan error
/// 3. Build the reverse index from the retained units
/// 4. Close the seeds over the index
///
/// A scan error is fatal because an incomplete graph silently under-reports
/// affected units, while an unresolvable file only loses that one file.
pub fn analyze(
  changed_files: &[PathBuf],
  cwd: &Path,
  resolver: &dyn UnitResolver,
  scanner: &dyn UnitScanner,
  filter: &IgnoreFilter,
) -> ImpactResult<AffectedAnalysis> {
  let selection = select_seeds(changed_files, cwd, resolver, filter);
  for skipped in &selection.skipped {
    report_skip(skipped);
  }

  let (units, errors) = collect_units(scanner.scan(), filter);
  if !errors.is_empty() {
    for e in &errors {
      eprintln!("Could not read package {}: {}", e.unit, e);
    }
    return Err(ImpactError::ScanIncomplete { failed: errors.len() });
  }

  let index = ReverseIndex::build(&units, filter);
  let impact = close(&selection.seeds, &index, filter);

  Ok(AffectedAnalysis {
    changed_files: changed_files.to_vec(),
    skipped: selection.skipped,
    scanned_units: index.unit_count(),
    dependency_edges: index.edge_count(),
    impact,
  })
}

fn report_skip(skipped: &SkippedFile) {
  match &skipped.reason {
    SkipReason::Ignored | SkipReason::IgnoredUnit { .. } => {}
    SkipReason::Unresolved(e) => {
      eprintln!("Error finding package for file {}: {}", skipped.path.display(), e);
    }
    SkipReason::Standard { unit } => {
      eprintln!("Ignoring standard package file {} ({})", skipped.path.display(), unit);
    }
  }
}
