use std::collections::HashMap;

/// Weight for a criticality label not listed in the table.
pub const DEFAULT_CRITICALITY_WEIGHT: f64 = 0.2;

/// Severity for a technique not listed in the table.
pub const DEFAULT_TECHNIQUE_SEVERITY: f64 = 50.0;

/// Risk for an absent or unlisted country.
pub const DEFAULT_COUNTRY_RISK: f64 = 20.0;

const CRITICALITY_WEIGHTS: &[(&str, f64)] = &[
    ("critical", 1.0),
    ("high", 0.8),
    ("medium", 0.6),
    ("low", 0.4),
    ("unknown", 0.2),
];

const TECHNIQUE_SEVERITIES: &[(&str, f64)] = &[
    ("T1055", 90.0),     // Process Injection
    ("T1059", 85.0),     // Command and Scripting Interpreter
    ("T1071", 80.0),     // Application Layer Protocol
    ("T1110", 75.0),     // Brute Force
    ("T1021", 70.0),     // Remote Services
    ("T1046", 60.0),     // Network Service Discovery
    ("T1041", 85.0),     // Exfiltration Over C2 Channel
    ("T1074", 80.0),     // Data Staged
    ("T1001", 75.0),     // Data Obfuscation
    ("T1071.004", 70.0), // DNS
    ("T1110.001", 75.0), // Password Guessing
    ("T1021.004", 70.0), // SSH
];

const COUNTRY_RISKS: &[(&str, f64)] = &[
    ("China", 80.0),
    ("Russia", 75.0),
    ("North Korea", 90.0),
    ("Iran", 70.0),
    ("Unknown", 60.0),
];

/// Read-only lookup tables, built once and shared for the engine's lifetime.
#[derive(Debug, Clone)]
pub struct ScoreTables {
    criticality: HashMap<&'static str, f64>,
    technique_severity: HashMap<&'static str, f64>,
    country_risk: HashMap<&'static str, f64>,
}

impl Default for ScoreTables {
    fn default() -> Self {
        Self {
            criticality: CRITICALITY_WEIGHTS.iter().copied().collect(),
            technique_severity: TECHNIQUE_SEVERITIES.iter().copied().collect(),
            country_risk: COUNTRY_RISKS.iter().copied().collect(),
        }
    }
}

impl ScoreTables {
    pub fn criticality_weight(&self, label: &str) -> f64 {
        self.criticality
            .get(label)
            .copied()
            .unwrap_or(DEFAULT_CRITICALITY_WEIGHT)
    }

    pub fn technique_severity(&self, technique: &str) -> f64 {
        self.technique_severity
            .get(technique)
            .copied()
            .unwrap_or(DEFAULT_TECHNIQUE_SEVERITY)
    }

    /// Absent countries take the default like unlisted ones.
    pub fn country_risk(&self, country: Option<&str>) -> f64 {
        country
            .and_then(|c| self.country_risk.get(c).copied())
            .unwrap_or(DEFAULT_COUNTRY_RISK)
    }
}
