use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::Error as _;
use tracing::{debug, info, warn};

use crate::error::{AuditError, AuditResult};
use crate::models::{ContentRecord, ParseFailure, PostDocument};
use crate::project::AuditLayout;
use crate::selection::RecordInclusion;

const RECORD_EXTENSION: &str = ".json";

/// Posts loaded from one locale directory.
#[derive(Debug, Clone, Default)]
pub struct LocaleBatch {
  /// Locale the batch was loaded for.
  pub locale: String,
  /// Whether the locale directory exists.
  pub found: bool,
  /// Posts that decoded successfully, sorted by slug.
  pub records: Vec<ContentRecord>,
  /// Posts that could not be read or decoded.
  pub failures: Vec<ParseFailure>,
}

/// Read a post as raw JSON, requiring an object at the top level.
pub fn read_post_value(path: &Path) -> AuditResult<serde_json::Value> {
  let content = fs::read_to_string(path).map_err(|source| AuditError::RecordRead {
    path: path.to_path_buf(),
    source,
  })?;
  let parse_error = |source| AuditError::RecordParse {
    path: path.to_path_buf(),
    source,
  };

  let value: serde_json::Value = serde_json::from_str(&content).map_err(parse_error)?;
  if !value.is_object() {
    return Err(parse_error(serde_json::Error::custom(
      "expected a JSON object at the top level",
    )));
  }
  Ok(value)
}

/// Decode the fields the audit reads from an already parsed post.
pub fn decode_post(path: &Path, value: &serde_json::Value) -> AuditResult<PostDocument> {
  PostDocument::deserialize(value).map_err(|source| AuditError::RecordParse {
    path: path.to_path_buf(),
    source,
  })
}

/// Read and decode a single post.
pub fn load_record(path: &Path, slug: &str, locale: &str) -> AuditResult<ContentRecord> {
  let value = read_post_value(path)?;
  let document = decode_post(path, &value)?;

  Ok(ContentRecord {
    slug: slug.to_string(),
    locale: locale.to_string(),
    path: path.to_path_buf(),
    document,
  })
}

/// `(slug, path)` of every `*.json` file directly inside `dir`, sorted by slug.
///
/// Only failing to open `dir` is an error. Entries that cannot be read are skipped.
pub fn list_record_files(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
  let mut files = Vec::new();
  for entry in fs::read_dir(dir)?.flatten() {
    let path = entry.path();
    let file_name = entry.file_name().to_string_lossy().to_string();
    let Some(slug) = file_name.strip_suffix(RECORD_EXTENSION) else {
      continue;
    };
    if slug.is_empty() || !path.is_file() {
      continue;
    }
    files.push((slug.to_string(), path));
  }
  files.sort();
  Ok(files)
}

/// Load every selected post of one locale.
///
/// A missing directory yields an empty batch with `found == false`. A post that fails
/// to load becomes a [`ParseFailure`] and the remaining posts are still loaded.
pub fn load_locale_records<S: RecordInclusion>(
  layout: &AuditLayout,
  locale: &str,
  selection: &S,
) -> LocaleBatch {
  let dir = layout.locale_dir(locale);
  let mut batch = LocaleBatch {
    locale: locale.to_string(),
    ..LocaleBatch::default()
  };

  let files = match list_record_files(&dir) {
    Ok(files) => files,
    Err(err) => {
      warn!(dir = %dir.display(), error = %err, "locale directory not found");
      return batch;
    }
  };
  batch.found = true;

  let selected: Vec<_> = files
    .into_iter()
    .filter(|(slug, _)| selection.is_included(slug))
    .collect();
  info!(locale, posts = selected.len(), "processing posts");

  for (slug, path) in selected {
    match load_record(&path, &slug, locale) {
      Ok(record) => {
        debug!(locale, slug = %record.slug, "loaded post");
        batch.records.push(record);
      }
      Err(err) => {
        warn!(%err, "skipping unreadable post");
        batch.failures.push(ParseFailure {
          file: path.to_string_lossy().replace('\\', "/"),
          slug,
          locale: locale.to_string(),
          error: err.to_string(),
        });
      }
    }
  }

  batch
}
