//! ATT&CK mapping from declared alert data plus field-based heuristics.

use std::fmt;

use tracing::debug;

use crate::model::{Alert, Event, TechniqueMapping};

const EXFIL_BYTES_THRESHOLD: u64 = 10 * 1024 * 1024;

/// One field-based inference rule: when `matches` holds for an event, its
/// technique and tactic are added to the mapping.
#[derive(Clone, Copy)]
pub struct HeuristicRule {
    pub name: &'static str,
    pub technique: &'static str,
    pub tactic: &'static str,
    pub matches: fn(&Event) -> bool,
}

impl fmt::Debug for HeuristicRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeuristicRule")
            .field("name", &self.name)
            .field("technique", &self.technique)
            .field("tactic", &self.tactic)
            .finish_non_exhaustive()
    }
}

/// Rules are evaluated in order and are not exclusive.
pub const HEURISTIC_RULES: &[HeuristicRule] = &[
    HeuristicRule {
        name: "ssh",
        technique: "T1021.004",
        tactic: "TA0007",
        matches: |e| e.dest_port == 22,
    },
    HeuristicRule {
        name: "rdp",
        technique: "T1021.001",
        tactic: "TA0007",
        matches: |e| e.dest_port == 3389,
    },
    HeuristicRule {
        name: "dns",
        technique: "T1071.004",
        tactic: "TA0011",
        matches: |e| e.dest_port == 53,
    },
    HeuristicRule {
        name: "tcp-syn-scan",
        technique: "T1046",
        tactic: "TA0043",
        matches: |e| e.is_tcp_syn(),
    },
    HeuristicRule {
        name: "large-upload",
        technique: "T1041",
        tactic: "TA0010",
        matches: |e| e.bytes_sent > EXFIL_BYTES_THRESHOLD,
    },
];

/// Combines alert-declared taxonomy data with [`HEURISTIC_RULES`].
#[derive(Debug, Clone, Copy)]
pub struct TechniqueMapper {
    rules: &'static [HeuristicRule],
}

impl Default for TechniqueMapper {
    fn default() -> Self {
        Self::new(HEURISTIC_RULES)
    }
}

impl TechniqueMapper {
    pub fn new(rules: &'static [HeuristicRule]) -> Self {
        Self { rules }
    }

    pub fn map_to_mitre_attack(&self, events: &[Event], alerts: &[Alert]) -> TechniqueMapping {
        let mut mapping = TechniqueMapping::default();

        for alert in alerts {
            mapping.merge(&alert.mitre_attack);
        }

        // Heuristics never populate sub-techniques.
        for event in events {
            for rule in self.rules.iter().filter(|r| (r.matches)(event)) {
                mapping.techniques.insert(rule.technique.to_string());
                mapping.tactics.insert(rule.tactic.to_string());
            }
        }

        debug!(
            tactics = mapping.tactics.len(),
            techniques = mapping.techniques.len(),
            "mapped events to ATT&CK"
        );
        mapping
    }
}
