//! threatcorr -- correlation, risk scoring and ATT&CK mapping for
//! network-flow threat detection.
//!
//! The engine consumes already-enriched [`Event`] and [`Alert`] snapshots and
//! produces correlation groups, a 0-100 risk score and a technique mapping.
//! It performs no I/O of its own; [`batch`] and [`config`] cover the file
//! boundary used by the CLI.

pub mod batch;
pub mod config;
pub mod correlate;
pub mod engine;
pub mod mitre;
pub mod model;
pub mod score;

pub use batch::{Batch, BatchError};
pub use correlate::{CorrelationGroup, DEFAULT_TIME_WINDOW_SECS};
pub use engine::{assess_batches, Assessment, CorrelationEngine};
pub use model::{Alert, AssetInfo, EnrichmentData, Event, TechniqueMapping};
pub use score::{ScoreBreakdown, Severity};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};

    use crate::model::{Alert, EnrichmentData, Event, TechniqueMapping};

    /// A TCP/443 flow `offset_secs` after a fixed base time, no enrichment.
    pub fn event_at(id: &str, offset_secs: i64) -> Event {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Event {
            id: id.to_string(),
            timestamp: base + Duration::seconds(offset_secs),
            source_ip: "10.0.0.5".parse().unwrap(),
            dest_ip: "203.0.113.9".parse().unwrap(),
            source_port: 50123,
            dest_port: 443,
            protocol: 6,
            bytes_sent: 0,
            bytes_received: 0,
            packets_sent: 0,
            packets_received: 0,
            tcp_flags: 0,
            enrichment: EnrichmentData::default(),
        }
    }

    /// Like [`event_at`] with all four confidence indicators present.
    pub fn fully_enriched(id: &str, offset_secs: i64) -> Event {
        let mut e = event_at(id, offset_secs);
        e.enrichment.source_reputation = Some(50);
        e.enrichment.dest_reputation = Some(50);
        e.enrichment.source_country = Some("Germany".to_string());
        e.enrichment.dest_country = Some("Germany".to_string());
        e
    }

    pub fn alert_with(id: &str, techniques: &[&str]) -> Alert {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Alert {
            id: id.to_string(),
            timestamp: base,
            mitre_attack: TechniqueMapping {
                techniques: techniques.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
        }
    }
}
