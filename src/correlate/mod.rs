//! Temporal/similarity grouping of flow events.

pub mod similarity;

pub use similarity::SimilarityMatcher;

use serde::Serialize;
use tracing::debug;

use crate::model::Event;

/// Default correlation window in seconds.
pub const DEFAULT_TIME_WINDOW_SECS: u64 = 3600;

/// Adjacent events must be strictly more similar than this to chain.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// A sealed group of at least two related events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationGroup {
    events: Vec<Event>,
    correlation_score: f64,
}

impl CorrelationGroup {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Mean pairwise similarity across every pair of members, in [0, 1].
    pub fn correlation_score(&self) -> f64 {
        self.correlation_score
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Single-pass chain clustering over a time-ordered event sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clusterer {
    matcher: SimilarityMatcher,
}

impl Clusterer {
    pub fn new(matcher: SimilarityMatcher) -> Self {
        Self { matcher }
    }

    /// Group events that chain within `time_window_secs` of their predecessor
    /// and exceed the similarity threshold against it.
    pub fn correlate_events(&self, events: &[Event], time_window_secs: u64) -> Vec<CorrelationGroup> {
        if events.len() < 2 {
            return Vec::new();
        }

        let mut sorted: Vec<&Event> = events.iter().collect();
        sorted.sort_by_key(|e| e.timestamp);

        let window = time_window_secs as f64;
        let mut groups = Vec::new();
        let mut open: Vec<&Event> = vec![sorted[0]];

        for pair in sorted.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            let elapsed = elapsed_secs(previous, current);

            let chained =
                elapsed <= window && self.matcher.similarity(current, previous) > SIMILARITY_THRESHOLD;

            if chained {
                open.push(current);
            } else {
                self.seal(&mut groups, std::mem::replace(&mut open, vec![current]));
            }
        }
        self.seal(&mut groups, open);

        debug!(
            events = events.len(),
            groups = groups.len(),
            time_window_secs,
            "correlated events"
        );
        groups
    }

    fn seal(&self, groups: &mut Vec<CorrelationGroup>, members: Vec<&Event>) {
        if members.len() < 2 {
            return;
        }
        let events: Vec<Event> = members.into_iter().cloned().collect();
        let correlation_score = self.matcher.mean_pairwise(&events);
        groups.push(CorrelationGroup {
            events,
            correlation_score,
        });
    }
}

/// Fractional seconds from `earlier` to `later`, at nanosecond precision
/// unless the gap overflows an `i64` of nanoseconds.
pub(crate) fn elapsed_secs(earlier: &Event, later: &Event) -> f64 {
    let delta = later.timestamp - earlier.timestamp;
    delta
        .num_nanoseconds()
        .map(|n| n as f64 / 1e9)
        .unwrap_or_else(|| delta.num_milliseconds() as f64 / 1e3)
}
