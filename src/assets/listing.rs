use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;

/// List the lower-cased names of regular files directly inside `dir`.
///
/// Dotfiles and `_`-prefixed files are skipped and subdirectories are not entered. A
/// directory that is missing or unreadable yields an empty set so the audit degrades to
/// more missing images instead of failing.
pub fn list_asset_files(dir: &Path) -> BTreeSet<String> {
  let mut files = BTreeSet::new();

  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(err) => {
      debug!(dir = %dir.display(), error = %err, "asset directory unavailable");
      return files;
    }
  };

  for entry in entries.flatten() {
    let file_name = entry.file_name();
    let name = file_name.to_string_lossy();
    if name.starts_with('.') || name.starts_with('_') {
      continue;
    }

    // Follows symlinks so linked assets count as present.
    if fs::metadata(entry.path()).is_ok_and(|metadata| metadata.is_file()) {
      files.insert(name.to_lowercase());
    }
  }

  files
}
