//! Helpers used to filter which posts take part in an audit.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AuditError, AuditResult};

/// Trait describing selection filters for audited posts.
pub trait RecordInclusion {
  /// Returns `true` when the post with this slug should be audited.
  fn is_included(&self, slug: &str) -> bool;
}

/// Selection that lets every post through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllRecords;

impl RecordInclusion for AllRecords {
  fn is_included(&self, _slug: &str) -> bool {
    true
  }
}

/// Default selection file name searched for in the project root.
pub const DEFAULT_SELECTION_FILE: &str = "audit.local.json";

/// Configuration file layout for selecting which posts to audit.
#[derive(Debug, Default, Deserialize)]
struct RecordSelectionFile {
  #[serde(default)]
  include: Vec<String>,
  #[serde(default)]
  exclude: Vec<String>,
}

/// Include/exclude rules over post slugs.
///
/// A rule matches a slug exactly, or as a prefix when it ends with `*`.
#[derive(Debug, Clone, Default)]
pub struct RecordSelection {
  include: Option<BTreeSet<String>>,
  exclude: BTreeSet<String>,
}

impl RecordSelection {
  /// Load rules from the selection file if present.
  pub fn load_from_path(path: impl AsRef<Path>) -> AuditResult<Self> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        return Ok(Self::default());
      }
      Err(err) => {
        return Err(AuditError::SelectionRead {
          path: path.to_path_buf(),
          source: err,
        });
      }
    };

    let file: RecordSelectionFile =
      serde_json::from_str(&contents).map_err(|err| AuditError::SelectionParse {
        path: path.to_path_buf(),
        source: err,
      })?;
    Ok(Self::from(file))
  }

  /// Restrict the selection further to the given slugs, replacing any include list.
  pub fn restrict_to(mut self, slugs: impl IntoIterator<Item = String>) -> Self {
    let slugs = normalise_list(slugs);
    if !slugs.is_empty() {
      self.include = Some(slugs);
    }
    self
  }

  /// Determine whether a post should be audited.
  pub fn is_included(&self, slug: &str) -> bool {
    if self.exclude.iter().any(|rule| rule_matches(rule, slug)) {
      return false;
    }

    match &self.include {
      Some(include) => include.iter().any(|rule| rule_matches(rule, slug)),
      None => true,
    }
  }

  /// Returns true when no filtering rules are active.
  pub fn is_unfiltered(&self) -> bool {
    self.include.is_none() && self.exclude.is_empty()
  }
}

impl RecordInclusion for RecordSelection {
  fn is_included(&self, slug: &str) -> bool {
    RecordSelection::is_included(self, slug)
  }
}

impl From<RecordSelectionFile> for RecordSelection {
  fn from(file: RecordSelectionFile) -> Self {
    let include = normalise_list(file.include);
    let exclude = normalise_list(file.exclude);

    Self {
      include: (!include.is_empty()).then_some(include),
      exclude,
    }
  }
}

/// Trim values, strip a trailing `.json` and drop empty entries.
fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| {
      let trimmed = value.trim();
      trimmed.strip_suffix(".json").unwrap_or(trimmed).to_string()
    })
    .filter(|value| !value.is_empty())
    .collect()
}

fn rule_matches(rule: &str, slug: &str) -> bool {
  match rule.strip_suffix('*') {
    Some(prefix) => slug.starts_with(prefix),
    None => slug == rule,
  }
}
