use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::listing::list_asset_files;
use super::names::image_stem;
use crate::models::{AssetPool, Resolution};

/// Snapshot of both asset folders, indexed for exact and stem lookups.
#[derive(Debug, Clone, Default)]
pub struct AssetPools {
  optimized: BTreeSet<String>,
  legacy: BTreeSet<String>,
  optimized_stems: BTreeMap<String, String>,
  legacy_stems: BTreeMap<String, String>,
}

impl AssetPools {
  /// Build pools from already listed, lower-cased file names.
  pub fn new(optimized: BTreeSet<String>, legacy: BTreeSet<String>) -> Self {
    let optimized_stems = index_stems(&optimized);
    let legacy_stems = index_stems(&legacy);
    Self {
      optimized,
      legacy,
      optimized_stems,
      legacy_stems,
    }
  }

  /// List both folders once and index them.
  pub fn load(optimized_dir: &Path, legacy_dir: &Path) -> Self {
    Self::new(list_asset_files(optimized_dir), list_asset_files(legacy_dir))
  }

  /// File names in the optimized folder.
  pub fn optimized(&self) -> &BTreeSet<String> {
    &self.optimized
  }

  /// File names in the legacy folder.
  pub fn legacy(&self) -> &BTreeSet<String> {
    &self.legacy
  }

  /// Resolve a lower-cased basename, trying exact names before stems and the optimized
  /// folder before the legacy one.
  pub fn resolve(&self, basename: &str) -> Resolution {
    if self.optimized.contains(basename) {
      return Resolution::Exact {
        pool: AssetPool::Optimized,
        file: basename.to_string(),
      };
    }
    if self.legacy.contains(basename) {
      return Resolution::Exact {
        pool: AssetPool::Legacy,
        file: basename.to_string(),
      };
    }

    let stem = image_stem(basename);
    if let Some(file) = self.optimized_stems.get(stem) {
      return Resolution::Stem {
        pool: AssetPool::Optimized,
        file: file.clone(),
      };
    }
    if let Some(file) = self.legacy_stems.get(stem) {
      return Resolution::Stem {
        pool: AssetPool::Legacy,
        file: file.clone(),
      };
    }

    Resolution::Missing
  }
}

/// Map each stem to the first file name (in sorted order) carrying it.
fn index_stems(files: &BTreeSet<String>) -> BTreeMap<String, String> {
  let mut stems = BTreeMap::new();
  for file in files {
    stems
      .entry(image_stem(file).to_string())
      .or_insert_with(|| file.clone());
  }
  stems
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::ResolutionTier;
  use pretty_assertions::assert_eq;

  fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
  }

  #[test]
  fn exact_optimized_beats_stem_match_in_same_pool() {
    let pools = AssetPools::new(set(&["hero.avif", "hero.webp"]), set(&[]));
    let resolution = pools.resolve("hero.webp");
    assert_eq!(resolution.tier(), ResolutionTier::ExactOptimized);
    assert_eq!(resolution.file(), Some("hero.webp"));
  }

  #[test]
  fn exact_legacy_beats_stem_optimized() {
    let pools = AssetPools::new(set(&["hero.webp"]), set(&["hero.jpg"]));
    assert_eq!(pools.resolve("hero.jpg").tier(), ResolutionTier::ExactLegacy);
  }

  #[test]
  fn falls_back_to_stem_matches_in_priority_order() {
    let pools = AssetPools::new(set(&["cat.avif", "cat.webp"]), set(&["dog.png"]));

    let cat = pools.resolve("cat.jpg");
    assert_eq!(cat.tier(), ResolutionTier::StemOptimized);
    assert_eq!(cat.file(), Some("cat.avif"));

    let dog = pools.resolve("dog.jpg");
    assert_eq!(dog.tier(), ResolutionTier::StemLegacy);
    assert_eq!(dog.file(), Some("dog.png"));

    assert_eq!(pools.resolve("bird.jpg"), Resolution::Missing);
  }

  #[test]
  fn extensionless_references_match_by_stem() {
    let pools = AssetPools::new(set(&["logo.svg"]), set(&[]));
    assert_eq!(pools.resolve("logo").tier(), ResolutionTier::StemOptimized);
  }
}
