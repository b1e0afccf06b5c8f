//! Machine-readable audit report written next to the project.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::audit::AuditOutcome;
use crate::error::{AuditError, AuditResult};
use crate::models::{
  AssetPool, ImageReference, Mismatch, ParseFailure, RemediationMapping, ResolutionTier,
};
use crate::report::remediation::recommended_mappings;

/// Headline counts of the audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
  /// Distinct basenames referenced by any post.
  pub total_references: usize,
  /// Distinct basenames resolved in the optimized folder.
  pub in_optimized: usize,
  /// Distinct basenames resolved in the legacy folder only.
  pub in_images: usize,
  /// Distinct basenames that matched nothing.
  pub missing: usize,
  /// Distinct authored paths pointing into the legacy folder.
  pub legacy_references: usize,
  /// Posts with at least one diverging locale.
  pub mismatched_posts: usize,
  /// Posts that could not be loaded.
  pub parse_errors: usize,
  /// Posts that were loaded and scanned.
  pub records_scanned: usize,
}

/// Values keyed by locale, serialised as a JSON object in locale order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocaleMap<T>(pub Vec<(String, T)>);

impl<T> LocaleMap<T> {
  /// Look up the value stored for a locale.
  pub fn get(&self, locale: &str) -> Option<&T> {
    self
      .0
      .iter()
      .find(|(key, _)| key == locale)
      .map(|(_, value)| value)
  }
}

impl<T: Serialize> Serialize for LocaleMap<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (locale, value) in &self.0 {
      map.serialize_entry(locale, value)?;
    }
    map.end()
  }
}

/// Complete JSON artifact mirroring the console report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
  /// Headline counts.
  pub summary: ReportSummary,
  /// Distinct basenames per resolution tier.
  pub resolution: BTreeMap<ResolutionTier, usize>,
  /// Distinct basenames per locale, sorted.
  pub by_locale: LocaleMap<Vec<String>>,
  /// Basenames that matched nothing, sorted.
  pub missing: Vec<String>,
  /// Authored legacy paths, sorted.
  pub legacy_references: Vec<String>,
  /// Per slug, the locales diverging from the baseline.
  pub mismatches: BTreeMap<String, Vec<Mismatch>>,
  /// Posts present in several locales but not in the baseline.
  pub slugs_without_baseline: Vec<String>,
  /// Per slug, the references of every locale.
  pub golden_standard: BTreeMap<String, LocaleMap<Vec<ImageReference>>>,
  /// Suggested fixes for legacy references, most urgent first.
  pub recommended_mappings: Vec<RemediationMapping>,
  /// Posts that could not be loaded.
  pub parse_errors: Vec<ParseFailure>,
}

impl AuditReport {
  /// Assemble the report from a finished run.
  pub fn from_outcome(outcome: &AuditOutcome) -> Self {
    let accumulator = &outcome.accumulator;
    let missing: Vec<String> = accumulator.missing().into_iter().map(str::to_string).collect();

    let summary = ReportSummary {
      total_references: accumulator.all_references.len(),
      in_optimized: accumulator.resolved_in(AssetPool::Optimized).len(),
      in_images: accumulator.resolved_in(AssetPool::Legacy).len(),
      missing: missing.len(),
      legacy_references: accumulator.legacy_references.len(),
      mismatched_posts: outcome.comparison.mismatches.len(),
      parse_errors: accumulator.parse_failures.len(),
      records_scanned: accumulator.records_scanned,
    };

    let by_locale = LocaleMap(
      outcome
        .layout
        .locales
        .iter()
        .map(|locale| {
          let names = accumulator
            .by_locale
            .get(locale)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default();
          (locale.clone(), names)
        })
        .collect(),
    );

    let golden_standard = accumulator
      .by_post
      .iter()
      .map(|(slug, locales)| {
        let entries = locales
          .iter()
          .map(|entry| (entry.locale.clone(), entry.references.clone()))
          .collect();
        (slug.clone(), LocaleMap(entries))
      })
      .collect();

    Self {
      summary,
      resolution: accumulator.tier_counts(),
      by_locale,
      missing,
      legacy_references: accumulator.legacy_references.iter().cloned().collect(),
      mismatches: outcome.comparison.mismatches.clone(),
      slugs_without_baseline: outcome.comparison.slugs_without_baseline.clone(),
      golden_standard,
      recommended_mappings: recommended_mappings(outcome),
      parse_errors: accumulator.parse_failures.clone(),
    }
  }

  /// Report serialised as prettified JSON.
  pub fn to_json(&self) -> AuditResult<String> {
    serde_json::to_string_pretty(self).map_err(|source| AuditError::Serialize {
      what: "audit report",
      source,
    })
  }
}

/// Write the report as prettified JSON, creating parent directories as needed.
pub fn write_report(path: &Path, report: &AuditReport) -> AuditResult<()> {
  let json = report.to_json()?;
  if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|source| AuditError::Write {
      path: parent.to_path_buf(),
      source,
    })?;
  }
  fs::write(path, format!("{json}\n")).map_err(|source| AuditError::Write {
    path: path.to_path_buf(),
    source,
  })
}
