use std::sync::OnceLock;

use regex::Regex;

use crate::models::{ContentRecord, ImageKind, ImageReference, PostDocument};

fn img_src_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["'][^>]*>"#).expect("invalid img regex")
  })
}

/// `src` values of every `<img>` tag in an HTML fragment, in document order.
///
/// This is a regex scan rather than an HTML parse: tags split across unusual markup or
/// `src` values containing quotes are not recognised.
pub fn img_sources(html: &str) -> impl Iterator<Item = &str> {
  img_src_pattern()
    .captures_iter(html)
    .filter_map(|captures| captures.get(1))
    .map(|source| source.as_str())
}

impl PostDocument {
  /// Image references in this post: featured image, Open Graph image, author avatar, then
  /// every `<img>` in the body. Empty values are skipped.
  pub fn image_references(&self) -> impl Iterator<Item = ImageReference> + '_ {
    let singular = [
      (
        ImageKind::Featured,
        self.featured_image.as_ref().and_then(|image| image.url.as_deref()),
      ),
      (
        ImageKind::OgImage,
        self.seo.as_ref().and_then(|seo| seo.og_image.as_deref()),
      ),
      (
        ImageKind::Avatar,
        self.author.as_ref().and_then(|author| author.avatar.as_deref()),
      ),
    ];

    let inline = self
      .content
      .as_deref()
      .into_iter()
      .flat_map(img_sources)
      .map(|source| ImageReference::new(ImageKind::Content, source));

    singular
      .into_iter()
      .filter_map(|(kind, path)| {
        path
          .filter(|path| !path.is_empty())
          .map(|path| ImageReference::new(kind, path))
      })
      .chain(inline)
  }
}

/// Collect every image reference of a loaded post.
pub fn extract_references(record: &ContentRecord) -> Vec<ImageReference> {
  record.document.image_references().collect()
}
