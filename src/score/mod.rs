//! Risk scoring: six sub-scores, a data-quality confidence factor, and
//! severity banding of the final score.

pub mod tables;

pub use tables::ScoreTables;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::correlate::elapsed_secs;
use crate::model::{Alert, Event};

const MIB: u64 = 1024 * 1024;

/// Occurrences of one technique beyond this count add nothing.
const TECHNIQUE_OCCURRENCE_CAP: usize = 5;

/// Sub-score weights; they sum to 1.0.
const THREAT_WEIGHT: f64 = 0.25;
const ASSET_WEIGHT: f64 = 0.20;
const TEMPORAL_WEIGHT: f64 = 0.15;
const VOLUME_WEIGHT: f64 = 0.15;
const TECHNIQUE_WEIGHT: f64 = 0.15;
const GEO_WEIGHT: f64 = 0.10;

/// Every component of a risk score, each sub-score roughly in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub threat_intel: f64,
    pub asset_criticality: f64,
    pub temporal: f64,
    pub volume: f64,
    pub technique_severity: f64,
    pub geographic: f64,
    /// Weighted sum before the confidence factor.
    pub raw_score: f64,
    pub confidence: f64,
    pub final_score: f64,
}

/// Computes a 0-100 risk score over a batch of events and related alerts.
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    tables: ScoreTables,
}

impl ScoreCalculator {
    pub fn new(tables: ScoreTables) -> Self {
        Self { tables }
    }

    pub fn risk_score(&self, events: &[Event], alerts: &[Alert]) -> f64 {
        self.breakdown(events, alerts).final_score
    }

    pub fn breakdown(&self, events: &[Event], alerts: &[Alert]) -> ScoreBreakdown {
        let threat_intel = self.threat_intel_score(events);
        let asset_criticality = self.asset_criticality_score(events);
        let temporal = self.temporal_score(events);
        let volume = self.volume_score(events);
        let technique_severity = self.technique_severity_score(alerts);
        let geographic = self.geographic_score(events);

        let raw_score = threat_intel * THREAT_WEIGHT
            + asset_criticality * ASSET_WEIGHT
            + temporal * TEMPORAL_WEIGHT
            + volume * VOLUME_WEIGHT
            + technique_severity * TECHNIQUE_WEIGHT
            + geographic * GEO_WEIGHT;

        let confidence = self.confidence_factor(events);
        let final_score = (raw_score * confidence).clamp(0.0, 100.0);

        ScoreBreakdown {
            threat_intel,
            asset_criticality,
            temporal,
            volume,
            technique_severity,
            geographic,
            raw_score,
            confidence,
            final_score,
        }
    }

    /// Mean risk over every present reputation, where reputation `r` maps
    /// to `max(0, (100 - r) / 2)`.
    pub fn threat_intel_score(&self, events: &[Event]) -> f64 {
        let mut total = 0.0;
        let mut present = 0usize;
        for reputation in events.iter().flat_map(|e| e.enrichment.reputations()) {
            total += ((100.0 - f64::from(reputation)) / 2.0).max(0.0);
            present += 1;
        }
        total / present.max(1) as f64
    }

    /// Highest criticality weight seen on either side of any event, times 100.
    pub fn asset_criticality_score(&self, events: &[Event]) -> f64 {
        events
            .iter()
            .flat_map(|e| {
                [
                    e.enrichment.source_asset.criticality(),
                    e.enrichment.dest_asset.criticality(),
                ]
            })
            .flatten()
            .map(|label| self.tables.criticality_weight(label))
            .fold(0.0, f64::max)
            * 100.0
    }

    /// Burst score: short gaps between consecutive events earn points,
    /// normalised by event count.
    pub fn temporal_score(&self, events: &[Event]) -> f64 {
        if events.len() < 2 {
            return 0.0;
        }

        let mut sorted: Vec<&Event> = events.iter().collect();
        sorted.sort_by_key(|e| e.timestamp);

        let points: f64 = sorted
            .windows(2)
            .map(|pair| match elapsed_secs(pair[0], pair[1]) {
                s if s < 60.0 => 20.0,
                s if s < 300.0 => 10.0,
                s if s < 1800.0 => 5.0,
                _ => 0.0,
            })
            .sum();

        (points / events.len() as f64).min(100.0)
    }

    pub fn volume_score(&self, events: &[Event]) -> f64 {
        let total_bytes = events
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.total_bytes()));

        let volume = match total_bytes {
            b if b > 100 * MIB => 30.0,
            b if b > 10 * MIB => 20.0,
            b if b > MIB => 10.0,
            _ => 0.0,
        };
        let frequency = match events.len() {
            n if n > 1000 => 30.0,
            n if n > 100 => 20.0,
            n if n > 10 => 10.0,
            _ => 0.0,
        };

        f64::min(volume + frequency, 100.0)
    }

    /// Severity of declared techniques, each capped at five occurrences,
    /// averaged over the number of alerts.
    pub fn technique_severity_score(&self, alerts: &[Alert]) -> f64 {
        if alerts.is_empty() {
            return 0.0;
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for technique in alerts.iter().flat_map(|a| &a.mitre_attack.techniques) {
            *counts.entry(technique.as_str()).or_default() += 1;
        }

        let total: f64 = counts
            .iter()
            .map(|(technique, &count)| {
                self.tables.technique_severity(technique)
                    * count.min(TECHNIQUE_OCCURRENCE_CAP) as f64
            })
            .sum();

        (total / alerts.len() as f64).min(100.0)
    }

    /// Highest country risk seen on either side of any event.
    pub fn geographic_score(&self, events: &[Event]) -> f64 {
        events
            .iter()
            .flat_map(|e| [e.enrichment.source_country(), e.enrichment.dest_country()])
            .map(|country| self.tables.country_risk(country))
            .fold(0.0, f64::max)
    }

    /// Share of present enrichment indicators (two reputations, two
    /// countries) across all events.
    pub fn confidence_factor(&self, events: &[Event]) -> f64 {
        if events.is_empty() {
            return 0.0;
        }
        let present: usize = events
            .iter()
            .map(|e| e.enrichment.quality_indicators())
            .sum();
        present as f64 / (4 * events.len()) as f64
    }
}

/// Severity band of a final risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn from_risk_score(score: f64) -> Self {
        if score >= 85.0 {
            Severity::Critical
        } else if score >= 70.0 {
            Severity::High
        } else if score >= 40.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.pad(s)
    }
}
