//! Human-readable report printed at the end of an audit run.

use std::collections::BTreeMap;

use crate::assets::image_extension;
use crate::audit::AuditOutcome;
use crate::models::AssetPool;
use crate::report::artifact::AuditReport;

const RULE_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 50;

fn section(lines: &mut Vec<String>, title: &str) {
  lines.push(String::new());
  lines.push(title.to_string());
  lines.push("-".repeat(SECTION_WIDTH));
}

/// Render every report section in a fixed order.
///
/// Sections: summary, per-locale counts, parse errors, missing images by extension,
/// legacy references, cross-locale mismatches, baseline references per post, recommended
/// mappings and the priority fix list. Empty sections are omitted except the last three.
pub fn render_console_report(outcome: &AuditOutcome, report: &AuditReport) -> String {
  let layout = &outcome.layout;
  let baseline = layout.baseline_locale.to_uppercase();
  let optimized = layout.preferred_url("");
  let legacy = format!("/{}/", layout.legacy_marker.trim_matches('/'));
  let summary = &report.summary;
  let mut lines = vec![
    "=".repeat(RULE_WIDTH),
    "📊 COMPREHENSIVE BLOG IMAGE AUDIT REPORT".to_string(),
    "=".repeat(RULE_WIDTH),
  ];

  section(&mut lines, "📈 SUMMARY STATISTICS");
  lines.push(format!("Total unique image references: {}", summary.total_references));
  lines.push(format!("  ✅ Found in {optimized}: {}", summary.in_optimized));
  lines.push(format!("  ⚠️  Found in {legacy}: {}", summary.in_images));
  lines.push(format!("  🚨 Missing entirely: {}", summary.missing));
  lines.push(format!("  📂 Legacy {legacy} references: {}", summary.legacy_references));
  lines.push(format!(
    "  🌍 Posts with cross-locale mismatches: {}",
    summary.mismatched_posts
  ));
  lines.push(format!("  ❌ JSON parse errors: {}", summary.parse_errors));
  lines.push(format!("  📝 Posts scanned: {}", summary.records_scanned));

  section(&mut lines, "📊 REFERENCES BY LOCALE");
  for (locale, names) in &report.by_locale.0 {
    lines.push(format!("  {}: {} unique images", locale.to_uppercase(), names.len()));
  }

  if !report.parse_errors.is_empty() {
    section(&mut lines, "❌ JSON PARSE ERRORS (Could not process these files)");
    for failure in &report.parse_errors {
      lines.push(format!("  - {}", failure.file));
      lines.push(format!("    {}", failure.error));
    }
  }

  if !report.missing.is_empty() {
    section(&mut lines, "🚨 MISSING IMAGES (Critical - need to be created)");
    lines.push(format!("Total: {}", report.missing.len()));

    let mut by_extension: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for name in &report.missing {
      let extension = image_extension(name).unwrap_or("unknown").to_string();
      by_extension.entry(extension).or_default().push(name);
    }
    for (extension, names) in by_extension {
      lines.push(String::new());
      lines.push(format!("{} files ({}):", extension.to_uppercase(), names.len()));
      lines.extend(names.iter().map(|name| format!("  - {name}")));
    }
  }

  if !report.legacy_references.is_empty() {
    section(
      &mut lines,
      &format!("⚠️  LEGACY {legacy} REFERENCES (Should migrate to {optimized})"),
    );
    lines.push(format!("Total: {}", report.legacy_references.len()));
    lines.push(String::new());
    for path in &report.legacy_references {
      let resolution = outcome.resolve_path(path);
      lines.push(format!("  {path}"));
      lines.push(match (resolution.pool(), resolution.file()) {
        (Some(AssetPool::Optimized), Some(file)) => format!("    → {}", layout.preferred_url(file)),
        (Some(AssetPool::Legacy), _) => format!("    ⚠️  Only exists in {legacy}"),
        _ => "    🚨 MISSING!".to_string(),
      });
    }
  }

  if !report.mismatches.is_empty() || !report.slugs_without_baseline.is_empty() {
    section(
      &mut lines,
      &format!("🌍 CROSS-LOCALE MISMATCHES ({baseline} = Golden Standard)"),
    );
    for (slug, mismatches) in &report.mismatches {
      let baseline_names: Vec<String> = report
        .golden_standard
        .get(slug)
        .and_then(|locales| locales.get(&layout.baseline_locale))
        .map(|references| references.iter().map(|reference| reference.basename()).collect())
        .unwrap_or_default();
      let listed = if baseline_names.is_empty() {
        "(none)".to_string()
      } else {
        baseline_names.join(", ")
      };

      lines.push(String::new());
      lines.push(format!("📄 {slug}"));
      lines.push(format!("   {baseline}: {listed}"));
      for mismatch in mismatches {
        lines.push(format!("   {}:", mismatch.locale.to_uppercase()));
        if !mismatch.missing.is_empty() {
          lines.push(format!("     Missing: {}", mismatch.missing.join(", ")));
        }
        if !mismatch.extra.is_empty() {
          lines.push(format!("     Extra: {}", mismatch.extra.join(", ")));
        }
      }
    }

    if !report.slugs_without_baseline.is_empty() {
      lines.push(String::new());
      lines.push(format!(
        "ℹ️  Not compared (no {baseline} version): {}",
        report.slugs_without_baseline.join(", ")
      ));
    }
  }

  section(
    &mut lines,
    &format!("👑 GOLDEN STANDARD ({baseline} Version Image Mapping)"),
  );
  lines.push(format!("{baseline} version images by post:"));
  lines.push(String::new());
  for (slug, locales) in &report.golden_standard {
    let Some(references) = locales.get(&layout.baseline_locale) else {
      continue;
    };
    if references.is_empty() {
      continue;
    }
    lines.push(format!("{slug}:"));
    for reference in references {
      let status = outcome.resolve_path(&reference.path).icon();
      lines.push(format!("  {status} [{}] {}", reference.kind, reference.path));
    }
  }

  section(&mut lines, "📝 RECOMMENDED LEGACY TO OPTIMIZED MAPPINGS");
  for mapping in &report.recommended_mappings {
    lines.push(String::new());
    lines.push(format!("[{}] {}", mapping.priority, mapping.from));
    let target = mapping
      .to
      .as_deref()
      .or(mapping.note.as_deref())
      .unwrap_or_default();
    lines.push(format!("    → {target}"));
  }

  section(&mut lines, "🔧 PRIORITY FIX LIST");
  lines.push(format!("1. CRITICAL: Create {} missing images", summary.missing));
  lines.push(format!(
    "2. HIGH: Migrate {} legacy references to {optimized}",
    summary.legacy_references
  ));
  lines.push(format!(
    "3. MEDIUM: Optimize {} images still in {legacy}",
    summary.in_images
  ));
  lines.push(format!(
    "4. LOW: Fix {} cross-locale mismatches",
    summary.mismatched_posts
  ));

  lines.join("\n")
}

/// Closing banner, noting where the JSON report went or why it could not be written.
pub fn render_footer(saved_to: Result<&str, &str>) -> String {
  let saved = match saved_to {
    Ok(path) => format!("💾 Detailed JSON report saved to: {path}"),
    Err(error) => format!("❌ Could not save JSON report: {error}"),
  };
  [
    String::new(),
    saved,
    String::new(),
    "=".repeat(RULE_WIDTH),
    "✅ Audit complete!".to_string(),
    "=".repeat(RULE_WIDTH),
  ]
  .join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assets::AssetPools;
  use crate::audit::ContentAuditor;
  use crate::config::AuditConfig;
  use crate::selection::AllRecords;
  use std::collections::BTreeSet;
  use std::fs;
  use std::path::Path;
  use tempfile::tempdir;

  fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
  }

  fn render(root: &Path, optimized: &[&str], legacy: &[&str]) -> String {
    let layout = AuditConfig::default().into_layout(root);
    let pools = AssetPools::new(
      optimized.iter().map(|name| name.to_string()).collect::<BTreeSet<_>>(),
      legacy.iter().map(|name| name.to_string()).collect::<BTreeSet<_>>(),
    );
    let outcome = ContentAuditor::new(&layout).run_with_pools(pools, &AllRecords);
    let report = AuditReport::from_outcome(&outcome);
    render_console_report(&outcome, &report)
  }

  fn position(text: &str, needle: &str) -> usize {
    text
      .find(needle)
      .unwrap_or_else(|| panic!("missing `{needle}` in report:\n{text}"))
  }

  #[test]
  fn sections_appear_in_fixed_order() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(
      root,
      "content/blog/en/ammonia.json",
      r#"{"featuredImage": {"url": "/optimized/ammonia-hero.webp"},
          "content": "<img src=\"/images/old-cat.jpg\">"}"#,
    );
    write(
      root,
      "content/blog/fr/ammonia.json",
      r#"{"featuredImage": {"url": "/images/ammonia-hero-fr.webp"}}"#,
    );
    write(root, "content/blog/zh/broken.json", "not json");

    let text = render(root, &["ammonia-hero.webp", "old-cat.webp"], &[]);

    let order = [
      "📈 SUMMARY STATISTICS",
      "📊 REFERENCES BY LOCALE",
      "❌ JSON PARSE ERRORS",
      "🚨 MISSING IMAGES",
      "⚠️  LEGACY /images/ REFERENCES",
      "🌍 CROSS-LOCALE MISMATCHES (EN = Golden Standard)",
      "👑 GOLDEN STANDARD",
      "📝 RECOMMENDED LEGACY TO OPTIMIZED MAPPINGS",
      "🔧 PRIORITY FIX LIST",
    ];
    let positions: Vec<usize> = order.iter().map(|title| position(&text, title)).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{text}");

    assert!(text.contains(".WEBP files (1):\n  - ammonia-hero-fr.webp"));
    assert!(text.contains("  /images/old-cat.jpg\n    → /optimized/old-cat.webp"));
    assert!(text.contains("   FR:\n     Missing: ammonia-hero.webp, old-cat.jpg\n     Extra: ammonia-hero-fr.webp"));
    assert!(text.contains("  ✅ [featured] /optimized/ammonia-hero.webp"));
    assert!(text.contains("[CRITICAL] /images/ammonia-hero-fr.webp\n    → Create missing image"));
    assert!(text.contains("[HIGH] /images/old-cat.jpg\n    → /optimized/old-cat.webp"));
    assert!(text.contains("1. CRITICAL: Create 1 missing images"));
  }

  #[test]
  fn omits_optional_sections_for_a_clean_run() {
    let dir = tempdir().unwrap();
    write(
      dir.path(),
      "content/blog/en/odor.json",
      r#"{"featuredImage": {"url": "/optimized/odor.webp"}}"#,
    );

    let text = render(dir.path(), &["odor.webp"], &[]);
    assert!(!text.contains("JSON PARSE ERRORS"));
    assert!(!text.contains("MISSING IMAGES"));
    assert!(!text.contains("CROSS-LOCALE MISMATCHES"));
    assert!(text.contains("odor:\n  ✅ [featured] /optimized/odor.webp"));
    assert!(text.contains("  EN: 1 unique images\n  FR: 0 unique images"));
  }

  #[test]
  fn calls_out_posts_without_baseline() {
    let dir = tempdir().unwrap();
    write(dir.path(), "content/blog/fr/litter.json", "{}");
    write(dir.path(), "content/blog/es/litter.json", "{}");

    let text = render(dir.path(), &[], &[]);
    assert!(text.contains("Not compared (no EN version): litter"));
  }

  #[test]
  fn footer_reports_save_outcome() {
    assert!(render_footer(Ok("report.json")).contains("saved to: report.json"));
    assert!(render_footer(Err("disk full")).contains("Could not save JSON report: disk full"));
  }
}
