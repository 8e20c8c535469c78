//! Error types for the packhorse pipeline
//!
//! Every fatal condition funnels into [`PackError`]; `main` renders it with
//! [`print_error`] and exits with the variant's [`ExitCode`]. The only
//! non-fatal paths in the tool (staging exclusions, changelog extraction)
//! never construct these types at all.

use std::fmt;
use std::path::PathBuf;

pub type PackResult<T> = Result<T, PackError>;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  Success,
  Failure,
  Validation,
}

impl ExitCode {
  pub fn as_i32(self) -> i32 {
    match self {
      Self::Success => 0,
      Self::Failure => 1,
      Self::Validation => 2,
    }
  }
}

/// Configuration document errors
#[derive(Debug)]
pub enum ConfigError {
  Invalid { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Invalid { path, message } => {
        write!(f, "invalid configuration in {}: {}", path.display(), message)
      }
    }
  }
}

/// Manifest document errors
#[derive(Debug)]
pub enum ManifestError {
  NotFound { root: PathBuf },
  Unreadable { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotFound { root } => {
        write!(f, "no .toc manifest found in {}", root.display())
      }
      Self::Unreadable { path, source } => {
        write!(f, "failed to read manifest {}: {}", path.display(), source)
      }
    }
  }
}

/// Top-level error for all packhorse operations
#[derive(Debug)]
pub enum PackError {
  /// Missing credential or other pre-build requirement
  Precondition { message: String, help: Option<String> },
  /// Configuration document could not be parsed
  Config(ConfigError),
  /// Manifest missing or unreadable
  Manifest(ManifestError),
  /// A required include rule matched nothing
  MissingAsset { pattern: String, kind: String },
  /// Archive construction failed; any partial output is invalid
  Archive { message: String },
  /// Network-layer failure during upload (no retry)
  Transport(reqwest::Error),
  /// The host rejected the upload with a non-2xx status
  UploadRejected { status: u16, message: String },
  /// Filesystem error outside the archive step
  Io(std::io::Error),
  /// General error, optionally with a help hint
  Message { message: String, help: Option<String> },
}

impl PackError {
  /// Create a plain message error
  pub fn message(message: impl Into<String>) -> Self {
    Self::Message {
      message: message.into(),
      help: None,
    }
  }

  /// Create a message error with a help hint shown below it
  pub fn with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
    Self::Message {
      message: message.into(),
      help: Some(help.into()),
    }
  }

  /// Create a precondition failure with a help hint
  pub fn precondition(message: impl Into<String>, help: impl Into<String>) -> Self {
    Self::Precondition {
      message: message.into(),
      help: Some(help.into()),
    }
  }

  /// Help text to print below the error, if any
  pub fn help(&self) -> Option<&str> {
    match self {
      Self::Precondition { help, .. } | Self::Message { help, .. } => help.as_deref(),
      _ => None,
    }
  }

  /// Exit code for this error at the CLI boundary
  pub fn exit_code(&self) -> ExitCode {
    match self {
      Self::Precondition { .. } | Self::Config(_) => ExitCode::Validation,
      _ => ExitCode::Failure,
    }
  }
}

impl fmt::Display for PackError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Precondition { message, .. } => write!(f, "{}", message),
      Self::Config(err) => write!(f, "{}", err),
      Self::Manifest(err) => write!(f, "{}", err),
      Self::MissingAsset { pattern, kind } => {
        write!(f, "required {} not found: {}", kind, pattern)
      }
      Self::Archive { message } => write!(f, "archive creation failed: {}", message),
      Self::Transport(err) => write!(f, "upload request failed: {}", err),
      Self::UploadRejected { status, message } => {
        write!(f, "upload rejected: HTTP {} - {}", status, message)
      }
      Self::Io(err) => write!(f, "{}", err),
      Self::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for PackError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Manifest(ManifestError::Unreadable { source, .. }) => Some(source),
      Self::Transport(err) => Some(err),
      Self::Io(err) => Some(err),
      _ => None,
    }
  }
}

impl From<ConfigError> for PackError {
  fn from(err: ConfigError) -> Self {
    Self::Config(err)
  }
}

impl From<ManifestError> for PackError {
  fn from(err: ManifestError) -> Self {
    Self::Manifest(err)
  }
}

impl From<std::io::Error> for PackError {
  fn from(err: std::io::Error) -> Self {
    Self::Io(err)
  }
}

impl From<reqwest::Error> for PackError {
  fn from(err: reqwest::Error) -> Self {
    Self::Transport(err)
  }
}

/// Print an error (and its help hint) to stderr
pub fn print_error(err: &PackError) {
  eprintln!("❌ {}", err);
  if let Some(help) = err.help() {
    eprintln!("💡 {}", help);
  }
}

/// Extension trait for attaching context to fallible operations
pub trait ResultExt<T> {
  fn context(self, message: impl Into<String>) -> PackResult<T>;
  fn with_context<F: FnOnce() -> String>(self, f: F) -> PackResult<T>;
}

impl<T, E: fmt::Display> ResultExt<T> for Result<T, E> {
  fn context(self, message: impl Into<String>) -> PackResult<T> {
    self.map_err(|e| PackError::message(format!("{}: {}", message.into(), e)))
  }

  fn with_context<F: FnOnce() -> String>(self, f: F) -> PackResult<T> {
    self.map_err(|e| PackError::message(format!("{}: {}", f(), e)))
  }
}
