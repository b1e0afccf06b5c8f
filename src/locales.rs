//! Cross-locale comparison of image references against the baseline locale.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::{ImageReference, Mismatch};

/// References one locale declares for a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleReferences {
  /// Locale code.
  pub locale: String,
  /// References in extraction order.
  pub references: Vec<ImageReference>,
}

impl LocaleReferences {
  /// Distinct basenames of the references.
  pub fn basenames(&self) -> BTreeSet<String> {
    self.references.iter().map(ImageReference::basename).collect()
  }
}

/// Result of diffing every multi-locale post against the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleComparison {
  /// Per slug, one entry for each locale that diverges from the baseline.
  pub mismatches: BTreeMap<String, Vec<Mismatch>>,
  /// Posts present in several locales but not in the baseline, so never diffed.
  pub slugs_without_baseline: Vec<String>,
}

/// Diff each non-baseline locale of every post against the baseline locale.
///
/// The comparison is one-directional: two non-baseline locales are never compared with
/// each other, and posts that exist in a single locale are skipped.
pub fn compare_locales(
  by_post: &BTreeMap<String, Vec<LocaleReferences>>,
  baseline_locale: &str,
) -> LocaleComparison {
  let mut comparison = LocaleComparison::default();

  for (slug, locales) in by_post {
    if locales.len() < 2 {
      continue;
    }

    let Some(baseline) = locales.iter().find(|entry| entry.locale == baseline_locale) else {
      comparison.slugs_without_baseline.push(slug.clone());
      continue;
    };
    let baseline_names = baseline.basenames();

    let mismatches: Vec<Mismatch> = locales
      .iter()
      .filter(|entry| entry.locale != baseline_locale)
      .filter_map(|entry| {
        let names = entry.basenames();
        let missing: Vec<String> = baseline_names.difference(&names).cloned().collect();
        let extra: Vec<String> = names.difference(&baseline_names).cloned().collect();
        (!missing.is_empty() || !extra.is_empty()).then(|| Mismatch {
          locale: entry.locale.clone(),
          missing,
          extra,
        })
      })
      .collect();

    if !mismatches.is_empty() {
      comparison.mismatches.insert(slug.clone(), mismatches);
    }
  }

  comparison
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::ImageKind;
  use pretty_assertions::assert_eq;

  fn entry(locale: &str, paths: &[&str]) -> LocaleReferences {
    LocaleReferences {
      locale: locale.to_string(),
      references: paths
        .iter()
        .map(|path| ImageReference::new(ImageKind::Content, *path))
        .collect(),
    }
  }

  fn posts(entries: Vec<(&str, Vec<LocaleReferences>)>) -> BTreeMap<String, Vec<LocaleReferences>> {
    entries
      .into_iter()
      .map(|(slug, locales)| (slug.to_string(), locales))
      .collect()
  }

  #[test]
  fn single_locale_posts_are_never_mismatched() {
    let by_post = posts(vec![
      ("only-en", vec![entry("en", &["/optimized/a.webp"])]),
      ("only-fr", vec![entry("fr", &["/images/b.jpg"])]),
    ]);

    assert_eq!(compare_locales(&by_post, "en"), LocaleComparison::default());
  }

  #[test]
  fn identical_basenames_produce_no_entry() {
    let by_post = posts(vec![(
      "odor",
      vec![
        entry("en", &["/optimized/A.webp", "/optimized/b.webp"]),
        entry("fr", &["/images/b.webp", "a.webp"]),
      ],
    )]);

    assert!(compare_locales(&by_post, "en").mismatches.is_empty());
  }

  #[test]
  fn reports_missing_and_extra_relative_to_baseline() {
    let by_post = posts(vec![(
      "ammonia",
      vec![
        entry("en", &["/optimized/ammonia-hero.webp"]),
        entry("fr", &["/images/ammonia-hero-fr.webp"]),
        entry("zh", &["/optimized/ammonia-hero.webp"]),
      ],
    )]);

    let comparison = compare_locales(&by_post, "en");
    assert_eq!(
      comparison.mismatches.get("ammonia"),
      Some(&vec![Mismatch {
        locale: "fr".into(),
        missing: vec!["ammonia-hero.webp".into()],
        extra: vec!["ammonia-hero-fr.webp".into()],
      }])
    );
  }

  #[test]
  fn never_diffs_non_baseline_locales_against_each_other() {
    let by_post = posts(vec![(
      "litter",
      vec![entry("fr", &["/a.png"]), entry("es", &["/b.png"])],
    )]);

    let comparison = compare_locales(&by_post, "en");
    assert!(comparison.mismatches.is_empty());
    assert_eq!(comparison.slugs_without_baseline, vec!["litter".to_string()]);
  }
}
