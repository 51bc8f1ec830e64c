//! Reverse-dependency index: unit -> units that import it

use super::ignore::IgnoreFilter;
use super::unit::ScannedUnit;
use std::collections::HashMap;

/// Import edges inverted, built once per run from the scanned units.
///
/// Importer lists keep the order in which edges were recorded: scanner order
/// of the importing units, then each unit's import order.
#[derive(Debug, Default, Clone)]
pub struct ReverseIndex {
  importers: HashMap<String, Vec<String>>,
  units: usize,
  edges: usize,
}

impl ReverseIndex {
  /// Single pass over all units, O(edges).
  ///
  /// Units whose name or directory matches the filter are dropped before
  /// indexing, so they can never be reached as importers.
  pub fn build<'a>(units: impl IntoIterator<Item = &'a ScannedUnit>, filter: &IgnoreFilter) -> Self {
    let mut index = Self::default();

    for unit in units {
      if filter.is_ignored(&unit.id) || filter.is_path_ignored(&unit.dir) {
        continue;
      }
      index.units += 1;

      for import in &unit.imports {
        index.importers.entry(import.clone()).or_default().push(unit.id.clone());
        index.edges += 1;
      }
    }

    index
  }

  /// Direct importers of `id`. Unknown ids have no importers.
  pub fn importers_of(&self, id: &str) -> &[String] {
    self.importers.get(id).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Number of units that made it into the index
  pub fn unit_count(&self) -> usize {
    self.units
  }

  pub fn edge_count(&self) -> usize {
    self.edges
  }
}
