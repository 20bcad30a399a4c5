//! Run lifecycle phases and derived progress reporting.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of one batch run.
///
/// Exactly one run is live per runner; `Running` is entered from any other
/// phase by `start()` and left through exactly one of the three terminal
/// phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Idle,
    Running,
    Completed,
    Stopped,
    Failed,
}

impl RunPhase {
    /// Whether this phase ends a run (or no run has started yet).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Counters for the live (or most recent) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub phase: RunPhase,
    pub total: usize,
    pub processed: usize,
}

impl RunStatus {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            phase: RunPhase::Idle,
            total: 0,
            processed: 0,
        }
    }

    #[must_use]
    pub fn running(total: usize) -> Self {
        Self {
            phase: RunPhase::Running,
            total,
            processed: 0,
        }
    }
}

impl Default for RunStatus {
    fn default() -> Self {
        Self::idle()
    }
}

/// Pure derived view of run progress, recomputed on every settled item.
///
/// Holds no state of its own; it is a function of the four counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub processed: usize,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// `round(processed / total * 100)`, 0 when the total is 0.
    pub percentage: u8,
}

impl ProgressReport {
    #[must_use]
    pub fn compute(processed: usize, total: usize, successful: usize, failed: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((processed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            processed,
            total,
            successful,
            failed,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_yields_zero_percentage() {
        let report = ProgressReport::compute(0, 0, 0, 0);
        assert_eq!(report.percentage, 0);
    }

    #[test]
    fn full_progress_yields_one_hundred() {
        let report = ProgressReport::compute(42, 42, 40, 2);
        assert_eq!(report.percentage, 100);
    }

    #[test]
    fn partial_progress_rounds_to_nearest() {
        assert_eq!(ProgressReport::compute(1, 3, 1, 0).percentage, 33);
        assert_eq!(ProgressReport::compute(2, 3, 2, 0).percentage, 67);
    }

    #[test]
    fn running_phase_is_not_terminal() {
        assert!(!RunPhase::Running.is_terminal());
        assert!(RunPhase::Idle.is_terminal());
        assert!(RunPhase::Stopped.is_terminal());
    }
}
