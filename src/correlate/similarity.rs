use crate::model::Event;

const SOURCE_IP_WEIGHT: f64 = 0.3;
const DEST_IP_WEIGHT: f64 = 0.3;
const DEST_PORT_WEIGHT: f64 = 0.2;
const PROTOCOL_WEIGHT: f64 = 0.1;
const HOSTNAME_WEIGHT: f64 = 0.1;

/// Full weight budget. Indicators that cannot be compared still count here.
const WEIGHT_BUDGET: f64 = 1.0;

/// Pairwise event comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityMatcher;

impl SimilarityMatcher {
    /// Weighted indicator match in [0, 1].
    pub fn similarity(&self, a: &Event, b: &Event) -> f64 {
        let mut score = 0.0;

        if a.source_ip == b.source_ip {
            score += SOURCE_IP_WEIGHT;
        }
        if a.dest_ip == b.dest_ip {
            score += DEST_IP_WEIGHT;
        }
        if a.dest_port == b.dest_port {
            score += DEST_PORT_WEIGHT;
        }
        if a.protocol == b.protocol {
            score += PROTOCOL_WEIGHT;
        }
        // Missing hostnames never match.
        if let (Some(ha), Some(hb)) = (
            a.enrichment.source_asset.hostname(),
            b.enrichment.source_asset.hostname(),
        ) {
            if ha == hb {
                score += HOSTNAME_WEIGHT;
            }
        }

        (score / WEIGHT_BUDGET).clamp(0.0, 1.0)
    }

    /// Mean similarity over every unordered pair. 0 for fewer than two events.
    pub fn mean_pairwise(&self, events: &[Event]) -> f64 {
        if events.len() < 2 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut comparisons = 0usize;
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                total += self.similarity(a, b);
                comparisons += 1;
            }
        }
        total / comparisons.max(1) as f64
    }
}
