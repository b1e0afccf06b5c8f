//! Data structures produced while auditing blog image references.

use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::assets::image_basename;

/// Role an image plays inside a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageKind {
  /// `featuredImage.url`
  Featured,
  /// `seo.ogImage`
  OgImage,
  /// `author.avatar`
  Avatar,
  /// `<img>` tag inside the post body.
  Content,
}

impl ImageKind {
  /// Label used in reports and the JSON artifact.
  pub fn label(self) -> &'static str {
    match self {
      Self::Featured => "featured",
      Self::OgImage => "ogImage",
      Self::Avatar => "avatar",
      Self::Content => "content",
    }
  }
}

impl fmt::Display for ImageKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// An image path extracted from a post, exactly as authored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageReference {
  /// Role of the image within the post.
  #[serde(rename = "type")]
  pub kind: ImageKind,
  /// Raw path as written by the author.
  pub path: String,
}

impl ImageReference {
  /// Create a reference of the given kind.
  pub fn new(kind: ImageKind, path: impl Into<String>) -> Self {
    Self {
      kind,
      path: path.into(),
    }
  }

  /// Lower-cased file name without any directory prefix.
  pub fn basename(&self) -> String {
    image_basename(&self.path)
  }
}

/// `featuredImage` object of a post.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FeaturedImageField {
  /// Image URL.
  #[serde(default, deserialize_with = "lenient")]
  pub url: Option<String>,
}

/// `seo` object of a post.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoField {
  /// Open Graph preview image.
  #[serde(default, deserialize_with = "lenient")]
  pub og_image: Option<String>,
}

/// `author` object of a post.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthorField {
  /// Author portrait.
  #[serde(default, deserialize_with = "lenient")]
  pub avatar: Option<String>,
}

/// The subset of a post's JSON the audit reads. Every other key is ignored.
///
/// Fields holding an unexpected JSON type decode as `None` rather than failing the post.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
  /// Hero image block.
  #[serde(default, deserialize_with = "lenient")]
  pub featured_image: Option<FeaturedImageField>,
  /// Search metadata block.
  #[serde(default, deserialize_with = "lenient")]
  pub seo: Option<SeoField>,
  /// Author block.
  #[serde(default, deserialize_with = "lenient")]
  pub author: Option<AuthorField>,
  /// HTML body of the post.
  #[serde(default, deserialize_with = "lenient")]
  pub content: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = serde_json::Value::deserialize(deserializer)?;
  Ok(serde_json::from_value(value).ok())
}

/// One localized post loaded from disk.
#[derive(Debug, Clone)]
pub struct ContentRecord {
  /// File name without the `.json` suffix.
  pub slug: String,
  /// Locale directory the post was found in.
  pub locale: String,
  /// Location of the source file.
  pub path: PathBuf,
  /// Decoded fields.
  pub document: PostDocument,
}

/// A post that could not be read or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
  /// Path of the offending file.
  pub file: String,
  /// Slug derived from the file name.
  pub slug: String,
  /// Locale directory the file was found in.
  pub locale: String,
  /// Error message.
  pub error: String,
}

/// Asset folder a reference resolved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssetPool {
  /// `public/optimized`
  #[serde(rename = "optimized")]
  Optimized,
  /// `public/images`
  #[serde(rename = "images")]
  Legacy,
}

/// Resolution tiers in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionTier {
  /// Same file name in the optimized folder.
  ExactOptimized,
  /// Same file name in the legacy folder.
  ExactLegacy,
  /// Same stem, different extension, in the optimized folder.
  StemOptimized,
  /// Same stem, different extension, in the legacy folder.
  StemLegacy,
  /// Nothing matched.
  Missing,
}

impl ResolutionTier {
  /// Every tier, highest priority first.
  pub const ALL: [ResolutionTier; 5] = [
    Self::ExactOptimized,
    Self::ExactLegacy,
    Self::StemOptimized,
    Self::StemLegacy,
    Self::Missing,
  ];
}

/// Outcome of matching one basename against the asset pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// Found under the same name in a pool.
  Exact {
    /// Pool holding the file.
    pool: AssetPool,
    /// Matched file name.
    file: String,
  },
  /// Found under the same stem with another extension.
  Stem {
    /// Pool holding the file.
    pool: AssetPool,
    /// Matched file name.
    file: String,
  },
  /// No file matched.
  Missing,
}

impl Resolution {
  /// Tier this resolution belongs to.
  pub fn tier(&self) -> ResolutionTier {
    match self {
      Self::Exact {
        pool: AssetPool::Optimized,
        ..
      } => ResolutionTier::ExactOptimized,
      Self::Exact {
        pool: AssetPool::Legacy,
        ..
      } => ResolutionTier::ExactLegacy,
      Self::Stem {
        pool: AssetPool::Optimized,
        ..
      } => ResolutionTier::StemOptimized,
      Self::Stem {
        pool: AssetPool::Legacy,
        ..
      } => ResolutionTier::StemLegacy,
      Self::Missing => ResolutionTier::Missing,
    }
  }

  /// Pool the reference resolved into, if any.
  pub fn pool(&self) -> Option<AssetPool> {
    match self {
      Self::Exact { pool, .. } | Self::Stem { pool, .. } => Some(*pool),
      Self::Missing => None,
    }
  }

  /// File name that satisfied the reference, if any.
  pub fn file(&self) -> Option<&str> {
    match self {
      Self::Exact { file, .. } | Self::Stem { file, .. } => Some(file),
      Self::Missing => None,
    }
  }

  /// Status marker used in the console report.
  pub fn icon(&self) -> &'static str {
    match self.pool() {
      Some(AssetPool::Optimized) => "✅",
      Some(AssetPool::Legacy) => "⚠️ ",
      None => "🚨",
    }
  }
}

/// Divergence of one locale from the baseline for a single slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
  /// Locale being compared.
  pub locale: String,
  /// Baseline basenames absent from this locale.
  pub missing: Vec<String>,
  /// Basenames of this locale absent from the baseline.
  pub extra: Vec<String>,
}

/// Urgency of a remediation step. Sorts most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RemediationPriority {
  /// The image does not exist anywhere.
  Critical,
  /// An optimized replacement already exists.
  High,
  /// The image only exists in the legacy folder.
  Medium,
}

impl fmt::Display for RemediationPriority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Critical => "CRITICAL",
      Self::High => "HIGH",
      Self::Medium => "MEDIUM",
    })
  }
}

/// Suggested fix for one legacy reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationMapping {
  /// Legacy path as authored.
  pub from: String,
  /// Replacement path when an optimized file exists.
  pub to: Option<String>,
  /// Urgency of the fix.
  pub priority: RemediationPriority,
  /// Explanation when no replacement exists.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}
