//! Project configuration loader describing where posts and assets live.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::project::AuditLayout;
use crate::selection::DEFAULT_SELECTION_FILE;

/// File name searched for in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "audit.config.json";

/// Discoverable project configuration describing filesystem layout and output paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
  /// Directory holding one subdirectory of JSON posts per locale.
  pub content_root: String,
  /// Directory holding optimized assets.
  pub optimized_dir: String,
  /// Directory holding legacy, pre-optimization assets.
  pub images_dir: String,
  /// Locale subdirectories scanned, in report order.
  pub locales: Vec<String>,
  /// Locale treated as the source of truth for cross-locale comparison.
  pub baseline_locale: String,
  /// File the JSON report is written to.
  pub report_file: String,
  /// Path fragment marking a reference authored against the legacy folder.
  pub legacy_marker: String,
  /// Path fragment marking a reference authored against the optimized folder.
  pub preferred_marker: String,
  /// Optional JSON file restricting which slugs are audited.
  pub selection_file: String,
}

impl Default for AuditConfig {
  fn default() -> Self {
    Self {
      content_root: "content/blog".into(),
      optimized_dir: "public/optimized".into(),
      images_dir: "public/images".into(),
      locales: vec!["en".into(), "fr".into(), "zh".into(), "es".into()],
      baseline_locale: "en".into(),
      report_file: "blog_image_audit_report.json".into(),
      legacy_marker: "/images/".into(),
      preferred_marker: "/optimized/".into(),
      selection_file: DEFAULT_SELECTION_FILE.into(),
    }
  }
}

impl AuditConfig {
  /// Attempt to load configuration from the provided project root.
  ///
  /// A missing file silently yields the defaults. A file that exists but fails to parse
  /// is reported and also falls back to the defaults so the audit can still run.
  pub fn discover(project_root: &Path) -> Self {
    let candidate = project_root.join(DEFAULT_CONFIG_FILE);
    if !candidate.is_file() {
      return Self::default();
    }

    match Self::from_path(&candidate) {
      Some(config) => config,
      None => {
        warn!(path = %candidate.display(), "ignoring unreadable audit configuration");
        Self::default()
      }
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Resolve every configured path against the project root.
  pub fn into_layout(self, project_root: &Path) -> AuditLayout {
    let mut locales = Vec::with_capacity(self.locales.len());
    for locale in self.locales {
      let trimmed = locale.trim().to_string();
      if !trimmed.is_empty() && !locales.contains(&trimmed) {
        locales.push(trimmed);
      }
    }

    if !locales.contains(&self.baseline_locale) {
      warn!(
        baseline = %self.baseline_locale,
        "baseline locale is not among the scanned locales; no cross-locale diff will be produced"
      );
    }

    AuditLayout {
      content_root: project_root.join(&self.content_root),
      optimized_dir: project_root.join(&self.optimized_dir),
      images_dir: project_root.join(&self.images_dir),
      locales,
      baseline_locale: self.baseline_locale,
      report_path: project_root.join(&self.report_file),
      legacy_marker: self.legacy_marker,
      preferred_marker: self.preferred_marker,
      selection_path: project_root.join(&self.selection_file),
    }
  }
}
