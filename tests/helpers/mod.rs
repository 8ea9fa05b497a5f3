#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use threatcorr::{Alert, EnrichmentData, Event, TechniqueMapping};

pub fn event(id: &str, offset_secs: i64, src: &str, dst: &str, dest_port: u16, protocol: u8) -> Event {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    Event {
        id: id.to_string(),
        timestamp: base + Duration::seconds(offset_secs),
        source_ip: src.parse().unwrap(),
        dest_ip: dst.parse().unwrap(),
        source_port: 40000,
        dest_port,
        protocol,
        bytes_sent: 0,
        bytes_received: 0,
        packets_sent: 1,
        packets_received: 1,
        tcp_flags: 0,
        enrichment: EnrichmentData::default(),
    }
}

pub fn alert(id: &str, techniques: &[&str]) -> Alert {
    Alert {
        id: id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
        mitre_attack: TechniqueMapping {
            techniques: techniques.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        },
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
