//! Loading event/alert batches handed over by the enrichment pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::{Alert, Event};

const REPUTATION_RANGE: std::ops::RangeInclusive<i32> = -100..=100;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read batch file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed batch: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("event {event_id}: reputation {score} outside [-100, 100]")]
    ReputationOutOfRange { event_id: String, score: i32 },
}

/// A snapshot of events and their related alerts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Batch {
    pub events: Vec<Event>,
    pub alerts: Vec<Alert>,
}

impl Batch {
    pub fn load(path: &Path) -> Result<Self, BatchError> {
        let content = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let batch = Self::parse(&content)?;
        info!(
            path = %path.display(),
            events = batch.events.len(),
            alerts = batch.alerts.len(),
            "loaded batch"
        );
        Ok(batch)
    }

    pub fn parse(json: &str) -> Result<Self, BatchError> {
        let batch: Self = serde_json::from_str(json)?;
        batch.validate()?;
        Ok(batch)
    }

    /// Reject reputations outside the documented range.
    pub fn validate(&self) -> Result<(), BatchError> {
        for event in &self.events {
            if let Some(score) = event
                .enrichment
                .reputations()
                .find(|r| !REPUTATION_RANGE.contains(r))
            {
                return Err(BatchError::ReputationOutOfRange {
                    event_id: event.id.clone(),
                    score,
                });
            }
        }
        Ok(())
    }
}
