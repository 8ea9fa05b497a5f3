//! Property tests for the engine's output bounds.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use threatcorr::correlate::SimilarityMatcher;
use threatcorr::{Alert, AssetInfo, CorrelationEngine, EnrichmentData, Event, TechniqueMapping};

fn arb_country() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        prop::sample::select(vec!["China", "Russia", "Iran", "Canada", "Unknown", ""])
            .prop_map(String::from),
    )
}

fn arb_asset() -> impl Strategy<Value = AssetInfo> {
    (
        prop::option::of(prop::sample::select(vec!["ws-01", "ws-02", "db-01"]).prop_map(String::from)),
        prop::option::of(
            prop::sample::select(vec!["critical", "high", "medium", "low", "unknown", "odd"])
                .prop_map(String::from),
        ),
    )
        .prop_map(|(hostname, criticality)| AssetInfo {
            hostname,
            criticality,
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    (
        0i64..20_000,
        0u8..4,
        0u8..4,
        prop::sample::select(vec![22u16, 53, 443, 3389]),
        prop::sample::select(vec![1u8, 6, 17]),
        0u64..200_000_000,
        any::<u8>(),
        (arb_asset(), arb_country(), arb_country()),
        (
            prop::option::of(-100i32..=100),
            prop::option::of(-100i32..=100),
        ),
    )
        .prop_map(
            |(offset, src, dst, dest_port, protocol, bytes_sent, tcp_flags, (asset, sc, dc), (sr, dr))| {
                let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
                Event {
                    id: format!("evt-{}", offset),
                    timestamp: base + Duration::seconds(offset),
                    source_ip: format!("10.0.0.{}", src).parse().unwrap(),
                    dest_ip: format!("192.0.2.{}", dst).parse().unwrap(),
                    source_port: 40000,
                    dest_port,
                    protocol,
                    bytes_sent,
                    bytes_received: 0,
                    packets_sent: 1,
                    packets_received: 1,
                    tcp_flags,
                    enrichment: EnrichmentData {
                        source_asset: asset,
                        dest_asset: AssetInfo::default(),
                        source_country: sc,
                        dest_country: dc,
                        source_reputation: sr,
                        dest_reputation: dr,
                    },
                }
            },
        )
}

fn arb_alert() -> impl Strategy<Value = Alert> {
    prop::collection::btree_set(
        prop::sample::select(vec!["T1055", "T1059", "T1046", "T1041", "T9999"]).prop_map(String::from),
        0..4,
    )
    .prop_map(|techniques| Alert {
        id: "alert".to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        mitre_attack: TechniqueMapping {
            techniques,
            ..Default::default()
        },
    })
}

proptest! {
    #[test]
    fn risk_score_is_bounded(
        events in prop::collection::vec(arb_event(), 0..40),
        alerts in prop::collection::vec(arb_alert(), 0..10),
    ) {
        let score = CorrelationEngine::new().compute_risk_score(&events, &alerts);
        prop_assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn similarity_is_bounded(a in arb_event(), b in arb_event()) {
        let s = SimilarityMatcher.similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
        prop_assert_eq!(s, SimilarityMatcher.similarity(&b, &a));
    }

    #[test]
    fn groups_have_at_least_two_events(
        events in prop::collection::vec(arb_event(), 0..60),
        window in 0u64..7200,
    ) {
        let engine = CorrelationEngine::new();
        let groups = engine.correlate_events(&events, window);
        let mut seen = 0;
        for g in &groups {
            prop_assert!(g.len() >= 2);
            prop_assert!((0.0..=1.0).contains(&g.correlation_score()));
            seen += g.len();
        }
        prop_assert!(seen <= events.len());
        prop_assert_eq!(groups, engine.correlate_events(&events, window));
    }

    #[test]
    fn confidence_is_a_fraction(events in prop::collection::vec(arb_event(), 0..40)) {
        let breakdown = CorrelationEngine::new().score_breakdown(&events, &[]);
        prop_assert!((0.0..=1.0).contains(&breakdown.confidence));
    }
}
