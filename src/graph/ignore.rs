//! Substring-based ignore filter
//!
//! One filter value is built at startup and handed to every stage that needs
//! it: changed-file resolution, package scanning and closure propagation all
//! apply the same rule.

use std::path::Path;

/// Default pattern: local checkout-staging directories created by CI runners.
pub const DEFAULT_IGNORE_PATTERN: &str = ".checkout_git";

/// Predicate over package names and paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreFilter {
  patterns: Vec<String>,
}

impl IgnoreFilter {
  /// Build a filter from a pattern list. Empty patterns are dropped, since an
  /// empty substring would match everything.
  pub fn new<I, S>(patterns: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      patterns: patterns
        .into_iter()
        .map(|p| -> String { p.into() })
        .filter(|p| !p.is_empty())
        .collect(),
    }
  }

  /// Parse a comma-separated pattern list (`--ignore-dirs`). `""` disables ignoring.
  pub fn parse(list: &str) -> Self {
    Self::new(list.split(','))
  }

  /// A filter that ignores nothing.
  #[cfg(test)]
  pub fn none() -> Self {
    Self { patterns: Vec::new() }
  }

  /// True iff `identifier` contains any configured pattern.
  pub fn is_ignored(&self, identifier: &str) -> bool {
    self.patterns.iter().any(|p| identifier.contains(p.as_str()))
  }

  /// Same rule, applied to the lossy string form of a path.
  pub fn is_path_ignored(&self, path: &Path) -> bool {
    !self.patterns.is_empty() && self.is_ignored(&path.to_string_lossy())
  }

  pub fn patterns(&self) -> &[String] {
    &self.patterns
  }
}

impl Default for IgnoreFilter {
  fn default() -> Self {
    Self::new([DEFAULT_IGNORE_PATTERN])
  }
}
