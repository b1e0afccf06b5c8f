//! Rewrite legacy image paths in posts to the optimized files they resolve to.
//!
//! Only references whose file already exists in the optimized folder (same name or same
//! stem) are rewritten. Everything else in the post, including key order, is kept.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::assets::{AssetPools, image_basename};
use crate::error::{AuditError, AuditResult};
use crate::models::{ImageKind, PostDocument, RemediationPriority};
use crate::project::AuditLayout;
use crate::records::{decode_post, list_record_files, read_post_value};
use crate::report::remediation::mapping_for;
use crate::selection::RecordInclusion;

/// Options for a remap run.
#[derive(Debug, Clone, Default)]
pub struct RemapOptions {
  /// Report changes without writing files.
  pub dry_run: bool,
  /// Restrict the run to one locale instead of every configured locale.
  pub locale: Option<String>,
}

/// One path rewrite inside a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
  /// Field the path was found in.
  pub kind: ImageKind,
  /// Legacy path as authored.
  pub from: String,
  /// Replacement path.
  pub to: String,
}

/// Rewrites applied, or planned, for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRemap {
  /// Post that was changed.
  pub file: PathBuf,
  /// Individual rewrites.
  pub changes: Vec<PathChange>,
}

/// Totals of a remap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapSummary {
  /// Posts inspected.
  pub files_checked: usize,
  /// Posts written, or that would be written in a dry run.
  pub files_updated: usize,
  /// Paths rewritten across all posts.
  pub paths_rewritten: usize,
  /// Posts that could not be read, decoded or written.
  pub errors: usize,
  /// Per-post details.
  pub files: Vec<FileRemap>,
}

/// Rewrites for every legacy reference of a post that has an optimized counterpart.
///
/// Each distinct path is listed once even when several `<img>` tags share it.
pub fn plan_changes(document: &PostDocument, layout: &AuditLayout, pools: &AssetPools) -> Vec<PathChange> {
  let mut changes: Vec<PathChange> = Vec::new();

  for reference in document.image_references() {
    if !layout.is_legacy_reference(&reference.path) {
      continue;
    }
    if changes
      .iter()
      .any(|change| change.kind == reference.kind && change.from == reference.path)
    {
      continue;
    }

    let resolution = pools.resolve(&image_basename(&reference.path));
    let mapping = mapping_for(layout, &reference.path, &resolution);
    if mapping.priority != RemediationPriority::High {
      continue;
    }
    if let Some(to) = mapping.to.filter(|to| *to != reference.path) {
      changes.push(PathChange {
        kind: reference.kind,
        from: reference.path,
        to,
      });
    }
  }

  changes
}

fn field_pointer(kind: ImageKind) -> Option<&'static str> {
  match kind {
    ImageKind::Featured => Some("/featuredImage/url"),
    ImageKind::OgImage => Some("/seo/ogImage"),
    ImageKind::Avatar => Some("/author/avatar"),
    ImageKind::Content => None,
  }
}

/// Rewrite the `src` of every `<img>` tag pointing at `from`, matching tag and attribute
/// names case-insensitively. Returns `None` when no tag matched.
fn replace_img_source(html: &str, from: &str, to: &str) -> Option<String> {
  let pattern = format!(r#"(?i)(<img[^>]+src=["']){}(["'])"#, regex::escape(from));
  let regex = match Regex::new(&pattern) {
    Ok(regex) => regex,
    Err(err) => {
      warn!(path = %from, error = %err, "cannot build img pattern");
      return None;
    }
  };

  match regex.replace_all(html, |captures: &Captures<'_>| {
    format!("{}{to}{}", &captures[1], &captures[2])
  }) {
    Cow::Owned(updated) => Some(updated),
    Cow::Borrowed(_) => None,
  }
}

/// Apply planned rewrites to a parsed post. Returns the rewrites that landed.
pub fn apply_changes(post: &mut Value, changes: Vec<PathChange>) -> Vec<PathChange> {
  let mut applied = Vec::with_capacity(changes.len());

  for change in changes {
    let landed = match field_pointer(change.kind) {
      Some(pointer) => match post.pointer_mut(pointer) {
        Some(slot) if slot.as_str() == Some(change.from.as_str()) => {
          *slot = Value::String(change.to.clone());
          true
        }
        _ => false,
      },
      None => match post.get_mut("content") {
        Some(Value::String(content)) => {
          match replace_img_source(content, &change.from, &change.to) {
            Some(updated) => {
              *content = updated;
              true
            }
            None => false,
          }
        }
        _ => false,
      },
    };

    if landed {
      applied.push(change);
    } else {
      debug!(kind = %change.kind, path = %change.from, "planned rewrite did not apply");
    }
  }

  applied
}

fn remap_file(
  path: &Path,
  layout: &AuditLayout,
  pools: &AssetPools,
  dry_run: bool,
) -> AuditResult<Option<FileRemap>> {
  let mut post = read_post_value(path)?;
  let document = decode_post(path, &post)?;
  let changes = plan_changes(&document, layout, pools);
  if changes.is_empty() {
    return Ok(None);
  }

  let changes = apply_changes(&mut post, changes);
  if changes.is_empty() {
    return Ok(None);
  }

  if !dry_run {
    let json = serde_json::to_string_pretty(&post).map_err(|source| AuditError::Serialize {
      what: "rewritten post",
      source,
    })?;
    fs::write(path, format!("{json}\n")).map_err(|source| AuditError::Write {
      path: path.to_path_buf(),
      source,
    })?;
  }

  Ok(Some(FileRemap {
    file: path.to_path_buf(),
    changes,
  }))
}

/// Rewrite legacy references in every selected post.
///
/// Failures on individual posts are counted and logged; the run always completes.
pub fn remap_legacy_references<S: RecordInclusion>(
  layout: &AuditLayout,
  pools: &AssetPools,
  selection: &S,
  options: &RemapOptions,
) -> RemapSummary {
  let locales: Vec<String> = match &options.locale {
    Some(locale) => vec![locale.clone()],
    None => layout.locales.clone(),
  };
  let mut summary = RemapSummary::default();

  for locale in &locales {
    let dir = layout.locale_dir(locale);
    let files = match list_record_files(&dir) {
      Ok(files) => files,
      Err(err) => {
        warn!(dir = %dir.display(), error = %err, "locale directory not found");
        continue;
      }
    };
    info!(locale = %locale, posts = files.len(), "remapping legacy references");

    for (slug, path) in files {
      if !selection.is_included(&slug) {
        continue;
      }
      summary.files_checked += 1;

      match remap_file(&path, layout, pools, options.dry_run) {
        Ok(Some(remap)) => {
          summary.files_updated += 1;
          summary.paths_rewritten += remap.changes.len();
          summary.files.push(remap);
        }
        Ok(None) => debug!(locale = %locale, slug = %slug, "no legacy paths to rewrite"),
        Err(err) => {
          warn!(%err, "skipping post");
          summary.errors += 1;
        }
      }
    }
  }

  summary
}

/// Human-readable summary of a remap run.
pub fn render_remap_summary(summary: &RemapSummary, layout: &AuditLayout, dry_run: bool) -> String {
  let mut lines = vec!["=".repeat(80), "BLOG IMAGE PATH REMAP".to_string(), "=".repeat(80)];
  if dry_run {
    lines.push("🔍 DRY RUN MODE - No files will be modified".to_string());
  }

  for remap in &summary.files {
    let shown = remap
      .file
      .strip_prefix(&layout.content_root)
      .unwrap_or(&remap.file)
      .to_string_lossy()
      .replace('\\', "/");
    lines.push(String::new());
    lines.push(if dry_run {
      format!("  [DRY-RUN] Would update {shown}:")
    } else {
      format!("  ✅ Fixed {shown}:")
    });
    for change in &remap.changes {
      lines.push(format!("     {}:", change.kind));
      lines.push(format!("       {}", change.from));
      lines.push(format!("       → {}", change.to));
    }
  }

  lines.push(String::new());
  lines.push(format!("Files checked: {}", summary.files_checked));
  lines.push(format!(
    "Files {}: {}",
    if dry_run { "to update" } else { "updated" },
    summary.files_updated
  ));
  lines.push(format!("Paths rewritten: {}", summary.paths_rewritten));
  lines.push(format!("Errors: {}", summary.errors));
  lines.join("\n")
}
