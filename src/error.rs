//! Error types shared by the audit pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type AuditResult<T> = Result<T, AuditError>;

/// Failures that can surface while loading records, selections or writing reports.
///
/// Record-level variants are normally absorbed into the report as parse failures; they
/// only propagate when a caller asks for a single record directly.
#[derive(Debug, Error)]
pub enum AuditError {
  /// Failed to read a content record from disk.
  #[error("failed to read {}: {source}", path.display())]
  RecordRead {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The content record is not a JSON object.
  #[error("failed to parse {}: {source}", path.display())]
  RecordParse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// Failed to read the slug selection file.
  #[error("failed to read {}: {source}", path.display())]
  SelectionRead {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse the slug selection file.
  #[error("failed to parse {}: {source}", path.display())]
  SelectionParse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// Failed to serialise the report or a rewritten record.
  #[error("failed to serialise {what}: {source}")]
  Serialize {
    /// Human readable name of the value being serialised.
    what: &'static str,
    /// Source serialisation error.
    source: serde_json::Error,
  },
  /// Failed to write an output file.
  #[error("failed to write {}: {source}", path.display())]
  Write {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
}
