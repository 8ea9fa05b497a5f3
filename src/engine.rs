//! Facade composing clustering, scoring and ATT&CK mapping.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::batch::Batch;
use crate::correlate::{Clusterer, CorrelationGroup, SimilarityMatcher};
use crate::mitre::TechniqueMapper;
use crate::model::{Alert, Event, TechniqueMapping};
use crate::score::{ScoreBreakdown, ScoreCalculator, ScoreTables, Severity};

/// Stateless apart from its read-only lookup tables; safe to share across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct CorrelationEngine {
    clusterer: Clusterer,
    calculator: ScoreCalculator,
    mapper: TechniqueMapper,
}

/// Output for one correlation group, handed to the persistence layer.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub id: Uuid,
    pub assessed_at: DateTime<Utc>,
    pub event_ids: Vec<String>,
    pub correlation_score: f64,
    pub risk_score: f64,
    pub severity: Severity,
    pub mitre_attack: TechniqueMapping,
}

impl CorrelationEngine {
    pub fn new() -> Self {
        Self {
            clusterer: Clusterer::new(SimilarityMatcher),
            calculator: ScoreCalculator::new(ScoreTables::default()),
            mapper: TechniqueMapper::default(),
        }
    }

    pub fn correlate_events(&self, events: &[Event], time_window_secs: u64) -> Vec<CorrelationGroup> {
        self.clusterer.correlate_events(events, time_window_secs)
    }

    pub fn compute_risk_score(&self, events: &[Event], alerts: &[Alert]) -> f64 {
        self.calculator.risk_score(events, alerts)
    }

    pub fn score_breakdown(&self, events: &[Event], alerts: &[Alert]) -> ScoreBreakdown {
        self.calculator.breakdown(events, alerts)
    }

    pub fn map_to_mitre_attack(&self, events: &[Event], alerts: &[Alert]) -> TechniqueMapping {
        self.mapper.map_to_mitre_attack(events, alerts)
    }

    /// Score and map a single group against its related alerts.
    pub fn assess_group(&self, group: &CorrelationGroup, alerts: &[Alert]) -> Assessment {
        let breakdown = self.calculator.breakdown(group.events(), alerts);
        let mitre_attack = self.mapper.map_to_mitre_attack(group.events(), alerts);
        let severity = Severity::from_risk_score(breakdown.final_score);

        debug!(
            events = group.len(),
            correlation_score = group.correlation_score(),
            risk_score = breakdown.final_score,
            confidence = breakdown.confidence,
            %severity,
            "assessed correlation group"
        );

        Assessment {
            id: Uuid::new_v4(),
            assessed_at: Utc::now(),
            event_ids: group.events().iter().map(|e| e.id.clone()).collect(),
            correlation_score: group.correlation_score(),
            risk_score: breakdown.final_score,
            severity,
            mitre_attack,
        }
    }

    /// Correlate a batch and assess every resulting group. Every group is
    /// scored against the whole alert list.
    pub fn assess_events(
        &self,
        events: &[Event],
        alerts: &[Alert],
        time_window_secs: u64,
    ) -> Vec<Assessment> {
        let groups = self.correlate_events(events, time_window_secs);
        let assessments: Vec<Assessment> = groups
            .iter()
            .map(|group| self.assess_group(group, alerts))
            .collect();

        info!(
            events = events.len(),
            alerts = alerts.len(),
            groups = assessments.len(),
            "batch assessed"
        );
        assessments
    }
}

/// Assess independent batches in parallel on the blocking pool. Results are
/// returned in batch order.
pub async fn assess_batches(
    engine: Arc<CorrelationEngine>,
    batches: Vec<Batch>,
    time_window_secs: u64,
) -> Result<Vec<Vec<Assessment>>> {
    let handles: Vec<_> = batches
        .into_iter()
        .map(|batch| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || {
                engine.assess_events(&batch.events, &batch.alerts, time_window_secs)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    Ok(results)
}
