use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use blog_image_audit::assets::{AssetPools, image_stem, list_asset_files};
use blog_image_audit::models::ResolutionTier;
use blog_image_audit::{AllRecords, AuditConfig, AuditReport, ContentAuditor, RecordSelection};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, contents: &str) {
  let path = root.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, contents).unwrap();
}

#[test]
fn ammonia_scenario_resolves_and_diffs_against_baseline() {
  let dir = tempdir().unwrap();
  let root = dir.path();
  write(root, "public/optimized/ammonia-hero.webp", "x");
  write(
    root,
    "content/blog/en/ammonia.json",
    r#"{"featuredImage": {"url": "/optimized/ammonia-hero.webp"}}"#,
  );
  write(
    root,
    "content/blog/fr/ammonia.json",
    r#"{"featuredImage": {"url": "/images/ammonia-hero-fr.webp"}}"#,
  );

  let layout = AuditConfig::default().into_layout(root);
  let outcome = ContentAuditor::new(&layout).run(&AllRecords);

  assert_eq!(
    outcome.resolve_path("/optimized/ammonia-hero.webp").tier(),
    ResolutionTier::ExactOptimized
  );
  assert_eq!(
    outcome.resolve_path("/images/ammonia-hero-fr.webp").tier(),
    ResolutionTier::Missing
  );

  let mismatches = &outcome.comparison.mismatches["ammonia"];
  assert_eq!(mismatches.len(), 1);
  assert_eq!(mismatches[0].locale, "fr");
  assert_eq!(mismatches[0].missing, vec!["ammonia-hero.webp".to_string()]);
  assert_eq!(mismatches[0].extra, vec!["ammonia-hero-fr.webp".to_string()]);
}

#[test]
fn malformed_post_is_reported_once_and_excluded_from_counts() {
  let dir = tempdir().unwrap();
  let root = dir.path();
  write(root, "content/blog/en/one.json", r#"{"seo": {"ogImage": "/optimized/one.png"}}"#);
  write(root, "content/blog/en/two.json", r#"{"author": {"avatar": "/optimized/two.png"}}"#);
  write(
    root,
    "content/blog/en/three.json",
    r#"{"content": "<p>x</p><IMG alt='' SRC='/optimized/three.png'>"}"#,
  );
  write(root, "content/blog/en/broken.json", r#"{"featuredImage": {"url": "/optimized/bad.png"}"#);

  let layout = AuditConfig::default().into_layout(root);
  let outcome = ContentAuditor::new(&layout).run_with_pools(AssetPools::default(), &AllRecords);
  let report = AuditReport::from_outcome(&outcome);

  assert_eq!(report.parse_errors.len(), 1);
  assert_eq!(report.parse_errors[0].slug, "broken");
  assert_eq!(report.summary.records_scanned, 3);
  assert_eq!(report.summary.total_references, 3);
  assert!(!report.golden_standard.contains_key("broken"));
  assert!(!outcome.accumulator.all_references.contains("bad.png"));
}

#[test]
fn missing_list_is_exactly_what_no_pool_can_serve() {
  let dir = tempdir().unwrap();
  let root = dir.path();
  write(root, "public/optimized/hero.webp", "x");
  write(root, "public/optimized/.DS_Store", "x");
  write(root, "public/images/legacy.jpg", "x");
  write(root, "public/images/_draft.png", "x");
  write(
    root,
    "content/blog/en/cats.json",
    r#"{
      "featuredImage": {"url": "/images/hero.png"},
      "content": "<img src=\"/images/legacy.png\"><img src=\"/images/_draft.png\"><img src=\"/images/absent.gif\">"
    }"#,
  );

  let layout = AuditConfig::default().into_layout(root);
  let outcome = ContentAuditor::new(&layout).run(&AllRecords);
  let report = AuditReport::from_outcome(&outcome);
  assert_eq!(report.missing, vec!["_draft.png".to_string(), "absent.gif".to_string()]);

  let optimized = list_asset_files(&layout.optimized_dir);
  let legacy = list_asset_files(&layout.images_dir);
  let stems: BTreeSet<&str> = optimized.iter().chain(&legacy).map(|name| image_stem(name)).collect();
  let served = |name: &str| {
    optimized.contains(name) || legacy.contains(name) || stems.contains(image_stem(name))
  };

  for name in &outcome.accumulator.all_references {
    assert_eq!(report.missing.contains(name), !served(name), "{name}");
  }
}

#[test]
fn slug_selection_limits_the_audit() {
  let dir = tempdir().unwrap();
  let root = dir.path();
  write(root, "content/blog/en/ammonia.json", r#"{"seo": {"ogImage": "/optimized/a.png"}}"#);
  write(root, "content/blog/en/odor.json", r#"{"seo": {"ogImage": "/optimized/b.png"}}"#);
  write(root, "audit.local.json", r#"{"exclude": ["odor"]}"#);

  let layout = AuditConfig::discover(root).into_layout(root);
  let selection = RecordSelection::load_from_path(&layout.selection_path).unwrap();
  let outcome = ContentAuditor::new(&layout).run_with_pools(AssetPools::default(), &selection);

  assert_eq!(
    outcome.accumulator.by_post.keys().cloned().collect::<Vec<_>>(),
    vec!["ammonia".to_string()]
  );
}
