//! Suggested fixes for references that still point at the legacy folder.

use crate::audit::AuditOutcome;
use crate::models::{AssetPool, RemediationMapping, RemediationPriority, Resolution};
use crate::project::AuditLayout;

/// Suggest a fix for one legacy path given how its basename resolved.
pub fn mapping_for(layout: &AuditLayout, from: &str, resolution: &Resolution) -> RemediationMapping {
  match (resolution.pool(), resolution.file()) {
    (Some(AssetPool::Optimized), Some(file)) => RemediationMapping {
      from: from.to_string(),
      to: Some(layout.preferred_url(file)),
      priority: RemediationPriority::High,
      note: None,
    },
    (Some(AssetPool::Legacy), _) => RemediationMapping {
      from: from.to_string(),
      to: None,
      priority: RemediationPriority::Medium,
      note: Some("Needs optimization".into()),
    },
    _ => RemediationMapping {
      from: from.to_string(),
      to: None,
      priority: RemediationPriority::Critical,
      note: Some("Create missing image".into()),
    },
  }
}

/// One mapping per legacy reference, most urgent first and alphabetical within a priority.
pub fn recommended_mappings(outcome: &AuditOutcome) -> Vec<RemediationMapping> {
  let mut mappings: Vec<RemediationMapping> = outcome
    .accumulator
    .legacy_references
    .iter()
    .map(|path| mapping_for(&outcome.layout, path, &outcome.resolve_path(path)))
    .collect();
  mappings.sort_by_key(|mapping| mapping.priority);
  mappings
}
