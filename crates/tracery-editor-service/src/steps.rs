//! Step status aggregation for run review.
//!
//! The backend reports the steps of a task run as flat records with an
//! order and a retry index. This module turns them into the ordered,
//! labeled entries the run review panel renders, with retries listed
//! right after the attempt they repeat.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Execution status of a single step, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Created,
    Running,
    Completed,
    Failed,
    Canceled,
}

impl StepStatus {
    /// Whether the step has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }

    /// The marker the run review panel shows for this status.
    pub fn marker(&self) -> StepMarker {
        match self {
            Self::Completed => StepMarker::Success,
            Self::Failed => StepMarker::Failure,
            Self::Created | Self::Running | Self::Canceled => StepMarker::Pending,
        }
    }
}

/// Visual marker next to a step entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepMarker {
    Success,
    Failure,
    Pending,
}

/// One step of a task run, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_id: String,
    /// Zero-based position within the run.
    pub order: u32,
    /// Zero-based retry counter; 0 is the original attempt.
    pub retry_index: u32,
    pub status: StepStatus,
    pub created_at: DateTime<Utc>,
}

/// A step entry ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDisplayEntry {
    pub step_id: String,
    pub label: String,
    pub marker: StepMarker,
    pub is_retry: bool,
}

impl StepDisplayEntry {
    fn from_record(record: &StepRecord) -> Self {
        let label = if record.retry_index > 0 {
            format!("Step {} ( Retry {} )", record.order + 1, record.retry_index)
        } else {
            format!("Step {}", record.order + 1)
        };
        Self {
            step_id: record.step_id.clone(),
            label,
            marker: record.status.marker(),
            is_retry: record.retry_index > 0,
        }
    }
}

/// Order step records for display and attach labels.
///
/// Records are sorted by `(order, retry_index)` so retries follow the
/// attempt they repeat. Input order does not matter.
pub fn aggregate_steps(mut steps: Vec<StepRecord>) -> Vec<StepDisplayEntry> {
    steps.sort_by_key(|s| (s.order, s.retry_index));
    steps.iter().map(StepDisplayEntry::from_record).collect()
}

/// Keep only the newest attempt of each step, ordered by step.
pub fn latest_attempts_only(steps: &[StepRecord]) -> Vec<StepRecord> {
    let mut latest: HashMap<u32, &StepRecord> = HashMap::new();
    for step in steps {
        match latest.get(&step.order) {
            Some(existing) if existing.retry_index >= step.retry_index => {}
            _ => {
                latest.insert(step.order, step);
            }
        }
    }

    let mut result: Vec<StepRecord> = latest.into_values().cloned().collect();
    result.sort_by_key(|s| s.order);
    result
}
