//! Event payloads broadcast to subscribers while a run is live.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ApplicationNumber, OutcomeRecord, ProgressReport, ResultStore, RunPhase};

/// Immutable snapshot of a run, published after every state change.
///
/// Readers never see the runner's internal state directly; they only ever
/// observe these snapshots, so no locking is needed on the read side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    /// Identifier of the run the snapshot belongs to, absent before the
    /// first `start()`.
    pub run_id: Option<Uuid>,
    pub phase: RunPhase,
    pub progress: ProgressReport,
    pub results: ResultStore,
}

impl RunSnapshot {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            run_id: None,
            phase: RunPhase::Idle,
            progress: ProgressReport::compute(0, 0, 0, 0),
            results: ResultStore::new(),
        }
    }
}

/// Atomic run event, one per observable state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    Started {
        run_id: Uuid,
        total: usize,
        timestamp: DateTime<Utc>,
    },
    /// One application's fetch settled and its record was appended.
    ItemSettled {
        run_id: Uuid,
        application_number: ApplicationNumber,
        record: OutcomeRecord,
        progress: ProgressReport,
        timestamp: DateTime<Utc>,
    },
    /// The run reached a terminal phase.
    Finished {
        run_id: Uuid,
        phase: RunPhase,
        progress: ProgressReport,
        timestamp: DateTime<Utc>,
    },
}
