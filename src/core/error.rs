//! Error types for cargo-impact with contextual messages and exit codes
//!
//! Every fatal condition ends up as an [`ImpactError`]. Per-file resolution
//! failures and per-package scan failures have their own types
//! ([`crate::graph::unit::ResolveError`], [`crate::graph::unit::ScanError`])
//! because the driver handles them item by item instead of bailing out.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cargo-impact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Usage, environment, config or scan failure
  Failure = 1,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for cargo-impact
#[derive(Debug)]
pub enum ImpactError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// One or more packages could not be scanned; the graph would be incomplete
  ScanIncomplete { failed: usize },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ImpactError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ImpactError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ImpactError::Message { message, context, help } => ImpactError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ImpactError::Io(e) => ImpactError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  ///
  /// CI callers only distinguish "ran" from "did not run", so every fatal
  /// error maps to the same code.
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ImpactError::Config(_)
      | ImpactError::Git(_)
      | ImpactError::ScanIncomplete { .. }
      | ImpactError::Io(_)
      | ImpactError::Message { .. } => ExitCode::Failure,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ImpactError::Config(e) => e.help_message(),
      ImpactError::Git(e) => e.help_message(),
      ImpactError::ScanIncomplete { .. } => Some(
        "Fix the packages reported above; a partial graph would under-report affected packages.".to_string(),
      ),
      ImpactError::Message { help, .. } => help.clone(),
      ImpactError::Io(_) => None,
    }
  }
}

impl fmt::Display for ImpactError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ImpactError::Config(e) => write!(f, "{}", e),
      ImpactError::Git(e) => write!(f, "{}", e),
      ImpactError::ScanIncomplete { failed } => {
        write!(f, "Package scan incomplete ({} failed), aborting", failed)
      }
      ImpactError::Io(e) => write!(f, "I/O error: {}", e),
      ImpactError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ImpactError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ImpactError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ImpactError {
  fn from(err: io::Error) -> Self {
    ImpactError::Io(err)
  }
}

impl From<String> for ImpactError {
  fn from(msg: String) -> Self {
    ImpactError::message(msg)
  }
}

impl From<&str> for ImpactError {
  fn from(msg: &str) -> Self {
    ImpactError::message(msg)
  }
}

impl From<cargo_metadata::Error> for ImpactError {
  fn from(err: cargo_metadata::Error) -> Self {
    ImpactError::message(format!("Cargo metadata error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ImpactError {
  fn from(err: toml_edit::de::Error) -> Self {
    ImpactError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ImpactError {
  fn from(err: serde_json::Error) -> Self {
    ImpactError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file exists but does not parse
  Invalid { path: PathBuf, reason: String },

  /// Unknown `--format` value
  UnknownFormat { value: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => {
        Some("Expected `[ignore] patterns = [..]` and `[scan] dev-dependencies = <bool>`.".to_string())
      }
      ConfigError::UnknownFormat { .. } => Some("Valid formats: names, json".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::UnknownFormat { value } => write!(f, "Unknown format '{}'", value),
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { command, .. } if command.starts_with("git diff") => {
        Some("Check that both ends of the range exist locally (CI clones are often shallow).".to_string())
      }
      GitError::RepoNotFound { .. } => Some("Run cargo-impact from inside a git checkout.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for cargo-impact
pub type ImpactResult<T> = Result<T, ImpactError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ImpactResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ImpactResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ImpactError>,
{
  fn context(self, ctx: impl Into<String>) -> ImpactResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ImpactResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with help text
pub fn print_error(error: &ImpactError) {
  eprintln!("error: {}", error);

  if let Some(help) = error.help_message() {
    eprintln!("help: {}", help);
  }
}
