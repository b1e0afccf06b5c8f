//! Audit orchestrator: lists assets, loads posts, resolves references and diffs locales.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use crate::assets::AssetPools;
use crate::locales::{LocaleComparison, LocaleReferences, compare_locales};
use crate::models::{AssetPool, ContentRecord, ParseFailure, Resolution, ResolutionTier};
use crate::project::AuditLayout;
use crate::records::{extract_references, load_locale_records};
use crate::selection::RecordInclusion;

/// State gathered while processing posts. Owned by a single run.
#[derive(Debug, Clone, Default)]
pub struct AuditAccumulator {
  /// Posts that decoded successfully.
  pub records_scanned: usize,
  /// Every distinct basename referenced by any post.
  pub all_references: BTreeSet<String>,
  /// Distinct basenames per locale.
  pub by_locale: BTreeMap<String, BTreeSet<String>>,
  /// Per slug, the references of each locale in processing order.
  pub by_post: BTreeMap<String, Vec<LocaleReferences>>,
  /// Resolution of every distinct basename.
  pub resolutions: BTreeMap<String, Resolution>,
  /// Authored paths pointing into the legacy folder.
  pub legacy_references: BTreeSet<String>,
  /// Posts that could not be read or decoded.
  pub parse_failures: Vec<ParseFailure>,
}

impl AuditAccumulator {
  /// Fold one post's references into the accumulator.
  pub fn add_record(&mut self, record: &ContentRecord, pools: &AssetPools, layout: &AuditLayout) {
    let references = extract_references(record);
    self.records_scanned += 1;

    let locale_names = self.by_locale.entry(record.locale.clone()).or_default();
    for reference in &references {
      let basename = reference.basename();
      locale_names.insert(basename.clone());
      self.all_references.insert(basename.clone());

      if layout.is_legacy_reference(&reference.path) {
        self.legacy_references.insert(reference.path.clone());
      }

      if !self.resolutions.contains_key(&basename) {
        let resolution = pools.resolve(&basename);
        self.resolutions.insert(basename, resolution);
      }
    }

    self
      .by_post
      .entry(record.slug.clone())
      .or_default()
      .push(LocaleReferences {
        locale: record.locale.clone(),
        references,
      });
  }

  /// Record a post that could not be loaded. It contributes nothing else.
  pub fn add_failure(&mut self, failure: ParseFailure) {
    self.parse_failures.push(failure);
  }

  /// Basenames resolved into the given pool (exact or stem).
  pub fn resolved_in(&self, pool: AssetPool) -> BTreeSet<&str> {
    self
      .resolutions
      .iter()
      .filter(|(_, resolution)| resolution.pool() == Some(pool))
      .map(|(basename, _)| basename.as_str())
      .collect()
  }

  /// Basenames that matched nothing, sorted.
  pub fn missing(&self) -> Vec<&str> {
    self
      .resolutions
      .iter()
      .filter(|(_, resolution)| matches!(resolution, Resolution::Missing))
      .map(|(basename, _)| basename.as_str())
      .collect()
  }

  /// Number of distinct basenames per resolution tier, every tier present.
  pub fn tier_counts(&self) -> BTreeMap<ResolutionTier, usize> {
    let mut counts: BTreeMap<ResolutionTier, usize> =
      ResolutionTier::ALL.iter().map(|tier| (*tier, 0)).collect();
    for resolution in self.resolutions.values() {
      *counts.entry(resolution.tier()).or_default() += 1;
    }
    counts
  }
}

/// Everything the report stage needs from a finished run.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
  /// Layout the run used.
  pub layout: AuditLayout,
  /// Asset folders as listed at the start of the run.
  pub pools: AssetPools,
  /// Accumulated per-post state.
  pub accumulator: AuditAccumulator,
  /// Baseline comparison.
  pub comparison: LocaleComparison,
}

impl AuditOutcome {
  /// Resolve an authored path against the pools captured for this run.
  pub fn resolve_path(&self, authored_path: &str) -> Resolution {
    let basename = crate::assets::image_basename(authored_path);
    match self.accumulator.resolutions.get(&basename) {
      Some(resolution) => resolution.clone(),
      None => self.pools.resolve(&basename),
    }
  }
}

/// High-level helper running a complete audit for one layout.
pub struct ContentAuditor<'a> {
  layout: &'a AuditLayout,
}

impl<'a> ContentAuditor<'a> {
  /// Create an auditor for the provided layout.
  pub fn new(layout: &'a AuditLayout) -> Self {
    Self { layout }
  }

  /// List the asset folders once and index them.
  pub fn load_pools(&self) -> AssetPools {
    let pools = AssetPools::load(&self.layout.optimized_dir, &self.layout.images_dir);
    info!(
      dir = %self.layout.optimized_dir.display(),
      files = pools.optimized().len(),
      "listed optimized assets"
    );
    info!(
      dir = %self.layout.images_dir.display(),
      files = pools.legacy().len(),
      "listed legacy assets"
    );
    pools
  }

  /// Run the audit over every configured locale. Never fails: unreadable inputs are
  /// folded into the outcome.
  pub fn run<S: RecordInclusion>(&self, selection: &S) -> AuditOutcome {
    let pools = self.load_pools();
    self.run_with_pools(pools, selection)
  }

  /// Run the audit against pools that were listed beforehand.
  pub fn run_with_pools<S: RecordInclusion>(&self, pools: AssetPools, selection: &S) -> AuditOutcome {
    let mut accumulator = AuditAccumulator::default();

    for locale in &self.layout.locales {
      accumulator.by_locale.entry(locale.clone()).or_default();
      let batch = load_locale_records(self.layout, locale, selection);
      for record in &batch.records {
        accumulator.add_record(record, &pools, self.layout);
      }
      for failure in batch.failures {
        accumulator.add_failure(failure);
      }
    }

    info!("detecting cross-locale mismatches");
    let comparison = compare_locales(&accumulator.by_post, &self.layout.baseline_locale);
    if !comparison.slugs_without_baseline.is_empty() {
      warn!(
        posts = comparison.slugs_without_baseline.len(),
        baseline = %self.layout.baseline_locale,
        "posts without a baseline version were not compared"
      );
    }

    AuditOutcome {
      layout: self.layout.clone(),
      pools,
      accumulator,
      comparison,
    }
  }
}
