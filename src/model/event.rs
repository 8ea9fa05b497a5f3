use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::present;

/// IANA protocol number for TCP.
pub const PROTO_TCP: u8 = 6;

/// SYN bit of the TCP flags bitmask.
pub const TCP_FLAG_SYN: u8 = 0x02;

/// A single network-flow record, already enriched upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source_ip: IpAddr,
    pub dest_ip: IpAddr,
    pub source_port: u16,
    pub dest_port: u16,
    pub protocol: u8,
    #[serde(default)]
    pub bytes_sent: u64,
    #[serde(default)]
    pub bytes_received: u64,
    #[serde(default)]
    pub packets_sent: u64,
    #[serde(default)]
    pub packets_received: u64,
    #[serde(default)]
    pub tcp_flags: u8,
    #[serde(default)]
    pub enrichment: EnrichmentData,
}

impl Event {
    pub fn total_bytes(&self) -> u64 {
        self.bytes_sent.saturating_add(self.bytes_received)
    }

    pub fn is_tcp_syn(&self) -> bool {
        self.protocol == PROTO_TCP && self.tcp_flags & TCP_FLAG_SYN != 0
    }
}

/// Contextual metadata resolved by the enrichment pipeline.
///
/// Every field may be missing; consumers must branch on presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentData {
    pub source_asset: AssetInfo,
    pub dest_asset: AssetInfo,
    pub source_country: Option<String>,
    pub dest_country: Option<String>,
    /// Reputation in [-100, 100]; -100 is malicious, 100 trusted.
    pub source_reputation: Option<i32>,
    pub dest_reputation: Option<i32>,
}

impl EnrichmentData {
    pub fn source_country(&self) -> Option<&str> {
        present(&self.source_country)
    }

    pub fn dest_country(&self) -> Option<&str> {
        present(&self.dest_country)
    }

    /// Reputations that are present, source first.
    pub fn reputations(&self) -> impl Iterator<Item = i32> {
        self.source_reputation.into_iter().chain(self.dest_reputation)
    }

    /// Number of present data-quality indicators (0..=4).
    pub fn quality_indicators(&self) -> usize {
        [
            self.source_reputation.is_some(),
            self.dest_reputation.is_some(),
            self.source_country().is_some(),
            self.dest_country().is_some(),
        ]
        .iter()
        .filter(|&&p| p)
        .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetInfo {
    pub hostname: Option<String>,
    /// One of `critical`, `high`, `medium`, `low`, `unknown`.
    pub criticality: Option<String>,
}

impl AssetInfo {
    pub fn hostname(&self) -> Option<&str> {
        present(&self.hostname)
    }

    pub fn criticality(&self) -> Option<&str> {
        present(&self.criticality)
    }
}
