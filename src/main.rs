mod cargo;
mod commands;
mod core;
mod graph;
mod utils;

use clap::{Args, Parser};
use commands::AffectedOptions;
use core::error::{ExitCode, ImpactError, print_error};

/// List the packages affected by a range of commits
#[derive(Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = get_styles())]
enum CargoCli {
  Impact(ImpactCli),
}

#[derive(Args)]
#[command(version, about, long_about = None)]
#[command(after_help = "Prints affected package names to stdout, one per line, seeds first.")]
struct ImpactCli {
  /// Revision range understood by `git diff`, e.g. origin/main..HEAD
  range: String,

  /// Comma-separated substrings; matching paths and packages are ignored ("" disables)
  #[arg(long, value_name = "PATTERNS")]
  ignore_dirs: Option<String>,

  /// Output format: names (default), json
  #[arg(long, default_value = "names")]
  format: String,

  /// Do not follow dev-dependency edges
  #[arg(long)]
  no_dev_deps: bool,
}

fn get_styles() -> clap::builder::Styles {
  let header = anstyle::Style::new()
    .bold()
    .underline()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));

  clap::builder::Styles::styled()
    .usage(header)
    .header(header)
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let CargoCli::Impact(cli) = match CargoCli::try_parse() {
    Ok(cli) => cli,
    Err(err) => usage_error(err),
  };

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(ImpactError::message(format!("Failed to get current directory: {}", e))),
  };

  // Git root, config and cargo metadata are loaded once, up front
  let ctx = match core::context::RepoContext::build(&cwd) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = commands::run_affected(
    &ctx,
    AffectedOptions {
      range: cli.range,
      ignore_dirs: cli.ignore_dirs,
      format: cli.format,
      no_dev_deps: cli.no_dev_deps,
    },
  );

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Help and version go to stdout with exit 0; anything else is a usage error.
fn usage_error(err: clap::Error) -> ! {
  if !err.use_stderr() {
    err.exit();
  }
  let _ = err.print();
  std::process::exit(ExitCode::Failure.as_i32());
}

fn handle_error(err: ImpactError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
