use crate::core::error::{ConfigError, ImpactError, ImpactResult, ResultExt};
use crate::graph::ignore::DEFAULT_IGNORE_PATTERN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for cargo-impact
/// Searched in order: impact.toml, .impact.toml, .cargo/impact.toml, .config/impact.toml
///
/// # Example
///
/// ```toml
/// [ignore]
/// patterns = [".checkout_git", "third_party/"]
///
/// [scan]
/// dev-dependencies = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactConfig {
  #[serde(default)]
  pub ignore: IgnoreConfig,
  #[serde(default)]
  pub scan: ScanConfig,
}

/// Substring patterns excluded from the analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
  /// Matched against changed file paths, package directories and package names
  #[serde(default = "default_ignore_patterns")]
  pub patterns: Vec<String>,
}

fn default_ignore_patterns() -> Vec<String> {
  vec![DEFAULT_IGNORE_PATTERN.to_string()]
}

impl Default for IgnoreConfig {
  fn default() -> Self {
    Self {
      patterns: default_ignore_patterns(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ScanConfig {
  /// Treat dev-dependency edges as imports (default: true)
  #[serde(default = "default_true")]
  pub dev_dependencies: bool,
}

fn default_true() -> bool {
  true
}

impl Default for ScanConfig {
  fn default() -> Self {
    Self { dev_dependencies: true }
  }
}

impl ImpactConfig {
  /// Find config file in search order: impact.toml, .impact.toml, .cargo/impact.toml, .config/impact.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("impact.toml"),
      path.join(".impact.toml"),
      path.join(".cargo").join("impact.toml"),
      path.join(".config").join("impact.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the repository root.
  ///
  /// A missing file is not an error: defaults apply. A file that exists but
  /// does not parse is.
  pub fn load(path: &Path) -> ImpactResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

    Self::parse(&content).map_err(|e| {
      ImpactError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })
  }

  fn parse(content: &str) -> Result<Self, toml_edit::de::Error> {
    toml_edit::de::from_str(content)
  }
}
