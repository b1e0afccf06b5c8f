//! Resolved filesystem layout shared by every stage of an audit run.

use std::path::{Path, PathBuf};

/// Fully resolved description of where posts, assets and outputs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLayout {
  /// Directory holding one subdirectory of JSON posts per locale.
  pub content_root: PathBuf,
  /// Directory holding optimized assets.
  pub optimized_dir: PathBuf,
  /// Directory holding legacy assets.
  pub images_dir: PathBuf,
  /// Locales scanned, in report order.
  pub locales: Vec<String>,
  /// Locale every other locale is diffed against.
  pub baseline_locale: String,
  /// Destination of the JSON report.
  pub report_path: PathBuf,
  /// Path fragment marking a legacy reference.
  pub legacy_marker: String,
  /// Path fragment marking a reference to the optimized folder.
  pub preferred_marker: String,
  /// Optional slug selection file.
  pub selection_path: PathBuf,
}

impl AuditLayout {
  /// Directory holding the posts of one locale.
  pub fn locale_dir(&self, locale: &str) -> PathBuf {
    self.content_root.join(locale)
  }

  /// Returns `true` when an authored path points into the legacy folder only.
  pub fn is_legacy_reference(&self, authored_path: &str) -> bool {
    authored_path.contains(&self.legacy_marker) && !authored_path.contains(&self.preferred_marker)
  }

  /// Public URL of a file inside the optimized folder, e.g. `/optimized/hero.webp`.
  pub fn preferred_url(&self, file_name: &str) -> String {
    format!("/{}/{}", self.preferred_marker.trim_matches('/'), file_name)
  }

  /// Path of the report file relative to `root` when possible, for display.
  pub fn display_report_path(&self, root: &Path) -> String {
    self
      .report_path
      .strip_prefix(root)
      .unwrap_or(&self.report_path)
      .to_string_lossy()
      .replace('\\', "/")
  }
}
