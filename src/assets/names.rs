/// Lower-cased final path segment of an authored image path.
///
/// Only `/` separates segments, so query strings and backslashes stay part of the name.
/// Trailing slashes are ignored.
pub fn image_basename(path: &str) -> String {
  let trimmed = path.trim_end_matches('/');
  trimmed
    .rsplit('/')
    .next()
    .unwrap_or(trimmed)
    .to_lowercase()
}

/// File name with its final extension removed.
///
/// A trailing dot is kept, and so is a name that consists of nothing after the dot,
/// which means `hero.` stays `hero.` while `.webp` becomes the empty stem.
pub fn image_stem(name: &str) -> &str {
  match name.rfind('.') {
    Some(index) if index + 1 < name.len() => &name[..index],
    _ => name,
  }
}

/// Extension including the leading dot, or `None` when the name has none.
///
/// A leading dot does not start an extension, so `.hidden` has none.
pub fn image_extension(name: &str) -> Option<&str> {
  match name.rfind('.') {
    Some(0) | None => None,
    Some(index) => Some(&name[index..]),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_directories_and_lowercases() {
    assert_eq!(image_basename("/optimized/Ammonia-Hero.WEBP"), "ammonia-hero.webp");
    assert_eq!(image_basename("hero.jpg"), "hero.jpg");
    assert_eq!(image_basename("https://cdn.example.com/a/b.png"), "b.png");
    assert_eq!(image_basename("/images/blog/"), "blog");
  }

  #[test]
  fn removes_only_the_final_extension() {
    assert_eq!(image_stem("hero.min.webp"), "hero.min");
    assert_eq!(image_stem("hero"), "hero");
    assert_eq!(image_stem("hero."), "hero.");
    assert_eq!(image_stem(".webp"), "");
  }

  #[test]
  fn extracts_extensions() {
    assert_eq!(image_extension("hero.min.webp"), Some(".webp"));
    assert_eq!(image_extension("hero."), Some("."));
    assert_eq!(image_extension("hero"), None);
    assert_eq!(image_extension(".hidden"), None);
  }
}
