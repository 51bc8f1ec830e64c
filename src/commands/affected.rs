//! `cargo impact <RANGE>` - list the packages affected by a revision range
//!
//! This command:
//! - asks git which files changed in the range
//! - maps those files to their owning workspace packages
//! - scans the workspace and closes the changed packages over their dependents
//! - prints the result for CI scripts to consume

use crate::cargo::{CargoScanner, CargoUnitResolver};
use crate::core::context::RepoContext;
use crate::core::error::{ConfigError, ImpactError, ImpactResult};
use crate::core::vcs::ChangeSource;
use crate::graph::{AffectedAnalysis, IgnoreFilter};
use serde_json::json;
use std::io::{self, Write};

/// Output format for the affected command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  /// One package name per line, nothing when unaffected
  Names,
  Json,
}

impl OutputFormat {
  pub fn from_str(s: &str) -> ImpactResult<Self> {
    match s.to_lowercase().as_str() {
      "names" | "names-only" => Ok(Self::Names),
      "json" => Ok(Self::Json),
      _ => Err(ImpactError::Config(ConfigError::UnknownFormat { value: s.to_string() })),
    }
  }
}

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct AffectedOptions {
  /// Revision range handed to `git diff`
  pub range: String,
  /// `--ignore-dirs`; None means "use the config file"
  pub ignore_dirs: Option<String>,
  pub format: String,
  pub no_dev_deps: bool,
}

/// Run the affected command
pub fn run_affected(ctx: &RepoContext, opts: AffectedOptions) -> ImpactResult<()> {
  let output_format = OutputFormat::from_str(&opts.format)?;
  let filter = ignore_filter(ctx, opts.ignore_dirs.as_deref());
  let dev_dependencies = ctx.config.scan.dev_dependencies && !opts.no_dev_deps;

  let changed_files = ctx.git.changed_files(&opts.range)?;

  let resolver = CargoUnitResolver::new(&ctx.metadata);
  let scanner = CargoScanner::new(&ctx.metadata).dev_dependencies(dev_dependencies);

  let analysis = crate::graph::affected::analyze(&changed_files, &ctx.cwd, &resolver, &scanner, &filter)?;

  display_results(ctx, &opts.range, &filter, &analysis, output_format)
}

/// CLI flag beats config file beats the built-in default.
fn ignore_filter(ctx: &RepoContext, cli: Option<&str>) -> IgnoreFilter {
  match cli {
    Some(list) => IgnoreFilter::parse(list),
    None => IgnoreFilter::new(ctx.config.ignore.patterns.iter().cloned()),
  }
}

/// Display affected analysis results
fn display_results(
  ctx: &RepoContext,
  range: &str,
  filter: &IgnoreFilter,
  analysis: &AffectedAnalysis,
  format: OutputFormat,
) -> ImpactResult<()> {
  let stdout = io::stdout();
  let mut out = stdout.lock();

  match format {
    OutputFormat::Names => write_names(&mut out, analysis)?,
    OutputFormat::Json => write_json(&mut out, ctx, range, filter, analysis)?,
  }

  out.flush()?;
  Ok(())
}

/// Newline-separated names in closure order. No output at all when empty.
fn write_names(out: &mut impl Write, analysis: &AffectedAnalysis) -> io::Result<()> {
  for name in analysis.impact.names() {
    writeln!(out, "{}", name)?;
  }
  Ok(())
}

fn write_json(
  out: &mut impl Write,
  ctx: &RepoContext,
  range: &str,
  filter: &IgnoreFilter,
  analysis: &AffectedAnalysis,
) -> ImpactResult<()> {
  let root = ctx.repo_root();
  let changed: Vec<String> = analysis
    .changed_files
    .iter()
    .map(|p| p.strip_prefix(root).unwrap_or(p).display().to_string())
    .collect();
  let seeds: Vec<&str> = analysis.impact.seeds().iter().map(|u| u.name.as_str()).collect();

  let output = json!({
      "range": range,
      "ignore_patterns": filter.patterns(),
      "workspace_root": ctx.metadata.workspace_root().display().to_string(),
      "changed_files": changed,
      "seeds": seeds,
      "affected": analysis.impact.units(),
      "summary": {
          "changed_files_count": analysis.changed_files.len(),
          "skipped_files_count": analysis.skipped.len(),
          "scanned_packages": analysis.scanned_units,
          "dependency_edges": analysis.dependency_edges,
          "seed_count": seeds.len(),
          "dependents_count": analysis.impact.dependents().len(),
          "affected_count": analysis.impact.len(),
          "rounds": analysis.impact.rounds()
      }
  });

  writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
  Ok(())
}
