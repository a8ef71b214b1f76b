//! Error type shared by the configuration loader and the build orchestrator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the library. The tag resolver never returns these; it degrades to
/// defaults instead.
#[derive(Debug, Error)]
pub enum DistAssetsError {
  /// A file could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Read {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
  /// A file or directory could not be written.
  #[error("failed to write {}: {source}", path.display())]
  Write {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
  /// A JSON document on disk did not parse.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// The bundler configuration could not be serialised.
  #[error("failed to serialise bundler configuration: {0}")]
  Serialize(#[from] serde_json::Error),
  /// A mode string did not name a known deployment mode.
  #[error("unknown deployment mode `{0}` (expected production, development or debug)")]
  InvalidMode(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DistAssetsError>;
