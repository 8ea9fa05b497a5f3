use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A detection-rule alert with its declared taxonomy data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub mitre_attack: TechniqueMapping,
}

/// Deduplicated ATT&CK identifiers. Sets are ordered so serialized output is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechniqueMapping {
    pub tactics: BTreeSet<String>,
    pub techniques: BTreeSet<String>,
    pub sub_techniques: BTreeSet<String>,
}

impl TechniqueMapping {
    pub fn is_empty(&self) -> bool {
        self.tactics.is_empty() && self.techniques.is_empty() && self.sub_techniques.is_empty()
    }

    /// Union `other` into `self`.
    pub fn merge(&mut self, other: &TechniqueMapping) {
        self.tactics.extend(other.tactics.iter().cloned());
        self.techniques.extend(other.techniques.iter().cloned());
        self.sub_techniques.extend(other.sub_techniques.iter().cloned());
    }
}
