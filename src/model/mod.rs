//! Input value types supplied by the upstream enrichment pipeline.

pub mod alert;
pub mod event;

pub use alert::{Alert, TechniqueMapping};
pub use event::{AssetInfo, EnrichmentData, Event};

/// Treat an absent or empty enrichment string as "not present".
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
