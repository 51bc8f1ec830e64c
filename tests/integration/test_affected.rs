//! Integration tests for `cargo impact <RANGE>`

use crate::helpers::{TestWorkspace, git, run_cargo_impact, run_cargo_impact_with_env, run_ok, stdout_lines};
use anyhow::Result;

/// lib-b and lib-d depend on lib-a, lib-c depends on lib-b
fn diamond_workspace() -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("lib-a", &[])?;
  ws.add_crate("lib-b", &["lib-a"])?;
  ws.add_crate("lib-c", &["lib-b"])?;
  ws.add_crate("lib-d", &["lib-a"])?;
  ws.commit("Add crates")?;
  ws.mark_base()?;
  Ok(ws)
}

#[test]
fn test_change_propagates_to_dependents_in_rounds() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.modify_file("lib-a", "src/lib.rs", "pub fn name() -> &'static str { \"changed\" }\n")?;
  ws.commit("Modify lib-a")?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;

  // seed, then round 1 (lib-b, lib-d), then round 2 (lib-c)
  assert_eq!(stdout_lines(&output), vec!["lib-a", "lib-b", "lib-d", "lib-c"]);
  Ok(())
}

#[test]
fn test_leaf_change_affects_only_itself() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.modify_file("lib-c", "README.md", "# lib-c\n\nUpdated.\n")?;
  ws.commit("Modify lib-c docs")?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;

  assert_eq!(stdout_lines(&output), vec!["lib-c"]);
  Ok(())
}

#[test]
fn test_several_seeds_are_listed_once() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.modify_file("lib-b", "src/lib.rs", "pub fn name() -> &'static str { \"b\" }\n")?;
  ws.modify_file("lib-c", "src/lib.rs", "pub fn name() -> &'static str { \"c\" }\n")?;
  ws.commit("Modify lib-b and lib-c")?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;

  assert_eq!(stdout_lines(&output), vec!["lib-b", "lib-c"]);
  Ok(())
}

#[test]
fn test_no_changes_prints_nothing() -> Result<()> {
  let ws = diamond_workspace()?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;

  assert!(output.stdout.is_empty());
  Ok(())
}

#[test]
fn test_file_outside_packages_is_skipped() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.write_file("README.md", "# test workspace\n\nMore docs.\n")?;
  ws.commit("Touch root README")?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(output.stdout.is_empty());
  assert!(
    stderr.contains("Error finding package for file"),
    "expected a skip diagnostic, got: {}",
    stderr
  );
  Ok(())
}

#[test]
fn test_ignore_dirs_removes_package_and_its_edges() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.modify_file("lib-a", "src/lib.rs", "pub fn name() -> &'static str { \"changed\" }\n")?;
  ws.commit("Modify lib-a")?;

  let output = run_ok(&ws.path, &["--ignore-dirs", "lib-b", "base..HEAD"])?;

  // lib-c is only reachable through lib-b
  assert_eq!(stdout_lines(&output), vec!["lib-a", "lib-d"]);
  Ok(())
}

#[test]
fn test_ignored_file_does_not_seed() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.write_file("crates/lib-a/generated/schema.json", "{}\n")?;
  ws.commit("Add generated file")?;

  let output = run_ok(&ws.path, &["--ignore-dirs", "generated", "base..HEAD"])?;

  assert!(output.stdout.is_empty());
  Ok(())
}

#[test]
fn test_config_file_ignore_patterns() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("lib-a", &[])?;
  ws.add_crate("lib-b", &["lib-a"])?;
  ws.write_file("impact.toml", "[ignore]\npatterns = [\"lib-b\"]\n")?;
  ws.commit("Add crates and config")?;
  ws.mark_base()?;

  ws.modify_file("lib-a", "src/lib.rs", "pub fn name() -> &'static str { \"changed\" }\n")?;
  ws.commit("Modify lib-a")?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;
  assert_eq!(stdout_lines(&output), vec!["lib-a"]);

  // the flag wins over the file; "" turns ignoring off entirely
  let output = run_ok(&ws.path, &["--ignore-dirs", "", "base..HEAD"])?;
  assert_eq!(stdout_lines(&output), vec!["lib-a", "lib-b"]);
  Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.write_file("impact.toml", "[ignore]\npaterns = []\n")?;

  let output = run_cargo_impact(&ws.path, &["base..HEAD"])?;

  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_runs_from_package_subdirectory() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.modify_file("lib-b", "src/lib.rs", "pub fn name() -> &'static str { \"b\" }\n")?;
  ws.commit("Modify lib-b")?;

  let output = run_ok(&ws.path.join("crates/lib-d"), &["base..HEAD"])?;

  assert_eq!(stdout_lines(&output), vec!["lib-b", "lib-c"]);
  Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.modify_file("lib-b", "README.md", "# lib-b\n\nUpdated.\n")?;
  ws.commit("Modify lib-b docs")?;

  let output = run_ok(&ws.path, &["--format", "json", "base..HEAD"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["range"], "base..HEAD");
  assert_eq!(json["seeds"], serde_json::json!(["lib-b"]));
  assert_eq!(json["changed_files"], serde_json::json!(["crates/lib-b/README.md"]));
  assert_eq!(json["affected"][1]["name"], "lib-c");
  assert_eq!(json["affected"][1]["round"], 1);
  assert_eq!(json["affected"][1]["via"], "lib-b");
  assert_eq!(json["summary"]["affected_count"], 2);
  Ok(())
}

#[test]
fn test_unknown_format_fails() -> Result<()> {
  let ws = diamond_workspace()?;

  let output = run_cargo_impact(&ws.path, &["--format", "yaml", "base..HEAD"])?;

  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_missing_range_is_usage_error() -> Result<()> {
  let ws = diamond_workspace()?;

  let output = run_cargo_impact(&ws.path, &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());
  Ok(())
}

#[test]
fn test_two_ranges_is_usage_error() -> Result<()> {
  let ws = diamond_workspace()?;

  let output = run_cargo_impact(&ws.path, &["base..HEAD", "HEAD~1..HEAD"])?;

  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_bad_range_fails() -> Result<()> {
  let ws = diamond_workspace()?;

  let output = run_cargo_impact(&ws.path, &["no-such-branch..HEAD"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());
  Ok(())
}

#[test]
fn test_outside_git_repository_fails() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_cargo_impact(dir.path(), &["main..HEAD"])?;

  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_help_exits_successfully() -> Result<()> {
  let ws = diamond_workspace()?;

  let output = run_cargo_impact(&ws.path, &["--help"])?;

  assert!(output.status.success());
  assert!(String::from_utf8_lossy(&output.stdout).contains("RANGE"));
  Ok(())
}

#[test]
fn test_deleted_file_still_seeds_its_package() -> Result<()> {
  let ws = diamond_workspace()?;
  std::fs::remove_file(ws.path.join("crates/lib-d/README.md"))?;
  git(&ws.path, &["add", "-A"])?;
  git(&ws.path, &["commit", "-m", "Remove lib-d README"])?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;

  assert_eq!(stdout_lines(&output), vec!["lib-d"]);
  Ok(())
}

#[test]
fn test_change_propagates_through_excluded_path_packages() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file(
    "Cargo.toml",
    r#"[workspace]
members = ["crates/*"]
exclude = ["shared"]
resolver = "2"

[workspace.package]
edition = "2021"
license = "MIT"
"#,
  )?;
  ws.add_package("shared/core", "shared-core", &[])?;
  ws.add_package("shared/util", "shared-util", &[("shared-core", "../core")])?;
  ws.add_package("crates/app", "app", &[("shared-util", "../../shared/util")])?;
  ws.commit("Add app on top of excluded shared crates")?;
  ws.mark_base()?;

  ws.write_file("shared/core/src/lib.rs", "pub fn name() -> &'static str { \"changed\" }\n")?;
  ws.commit("Modify shared-core")?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;

  assert_eq!(stdout_lines(&output), vec!["shared-core", "shared-util", "app"]);
  Ok(())
}

#[test]
fn test_inherited_git_dir_does_not_redirect_the_diff() -> Result<()> {
  let ws = diamond_workspace()?;
  ws.modify_file("lib-b", "src/lib.rs", "pub fn name() -> &'static str { \"b\" }\n")?;
  ws.commit("Modify lib-b")?;

  let other = TestWorkspace::new()?;
  let other_git_dir = other.path.join(".git");
  let output = run_cargo_impact_with_env(&ws.path, &["base..HEAD"], &[("GIT_DIR", other_git_dir.as_path())])?;

  assert!(
    output.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  assert_eq!(stdout_lines(&output), vec!["lib-b", "lib-c"]);
  Ok(())
}

#[test]
fn test_git_dependency_sharing_a_local_name_is_not_an_edge() -> Result<()> {
  let upstream = TestWorkspace::new()?;
  upstream.add_package("crates/util", "util", &[])?;
  upstream.commit("Add upstream util")?;

  let ws = TestWorkspace::new()?;
  ws.add_crate("util", &[])?;
  ws.add_crate("app", &[])?;
  let url = format!("file://{}", upstream.path.display());
  ws.write_file(
    "crates/app/Cargo.toml",
    &format!(
      r#"[package]
name = "app"
version = "0.1.0"
edition.workspace = true
license.workspace = true

[dependencies]
util = {{ git = "{}" }}
"#,
      url
    ),
  )?;
  ws.commit("Add local util and app on upstream util")?;
  ws.mark_base()?;

  ws.modify_file("util", "src/lib.rs", "pub fn name() -> &'static str { \"changed\" }\n")?;
  ws.commit("Modify local util")?;

  let output = run_ok(&ws.path, &["base..HEAD"])?;

  // app imports the upstream util, not the local one
  assert_eq!(stdout_lines(&output), vec!["util"]);
  Ok(())
}
