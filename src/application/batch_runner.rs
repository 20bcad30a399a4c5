//! Sequential batch processing state machine.
//!
//! One `BatchRunner` drives at most one live run at a time: it owns the
//! result store and the run counters, fetches each application strictly in
//! input order, and publishes immutable snapshots plus atomic events after
//! every state change. Cancellation is cooperative and checked only
//! between items, so an in-flight fetch always settles naturally.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::fetcher::StatusFetcher;
use crate::domain::{
    ApplicationNumber, OutcomeRecord, ProgressReport, ResultStore, RunPhase, RunStatus,
};
use crate::events::{RunEvent, RunSnapshot};

/// Capacity of the run event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Tunables for the batch runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerConfig {
    /// Courtesy delay between consecutive fetches, in milliseconds.
    /// The upstream registry is rate limited; keep this above zero when
    /// talking to the real service.
    pub request_delay_ms: u64,
}

/// State shared between the runner handle and the spawned run loop.
///
/// The run loop is the only writer while a run is live; `start()` and
/// `stop()` touch the state only at the run boundaries.
struct RunnerShared {
    fetcher: Arc<dyn StatusFetcher>,
    config: RunnerConfig,
    status: RwLock<RunStatus>,
    results: RwLock<ResultStore>,
    run_id: RwLock<Option<Uuid>>,
    cancel: RwLock<CancellationToken>,
    snapshot_tx: watch::Sender<RunSnapshot>,
    event_tx: broadcast::Sender<RunEvent>,
}

impl RunnerShared {
    async fn progress(&self) -> ProgressReport {
        let status = *self.status.read().await;
        let results = self.results.read().await;
        ProgressReport::compute(
            status.processed,
            status.total,
            results.success_count(),
            results.failure_count(),
        )
    }

    async fn publish_snapshot(&self) {
        let status = *self.status.read().await;
        let run_id = *self.run_id.read().await;
        let results = self.results.read().await.clone();
        let progress = ProgressReport::compute(
            status.processed,
            status.total,
            results.success_count(),
            results.failure_count(),
        );
        self.snapshot_tx.send_replace(RunSnapshot {
            run_id,
            phase: status.phase,
            progress,
            results,
        });
    }

    /// Appends a settled record, bumps the processed counter and notifies
    /// subscribers. This is the only write path while the loop is live.
    async fn settle_item(
        &self,
        run_id: Uuid,
        application_number: ApplicationNumber,
        record: OutcomeRecord,
    ) {
        {
            let mut results = self.results.write().await;
            results.append(record.clone());
        }
        {
            let mut status = self.status.write().await;
            status.processed += 1;
        }
        let progress = self.progress().await;
        debug!(
            %run_id,
            %application_number,
            processed = progress.processed,
            total = progress.total,
            "item settled"
        );
        // Event first: the published snapshot doubles as the "this item is
        // done" signal, so the event must already be buffered when a
        // snapshot watcher wakes up.
        let _ = self.event_tx.send(RunEvent::ItemSettled {
            run_id,
            application_number,
            record,
            progress,
            timestamp: Utc::now(),
        });
        self.publish_snapshot().await;
    }

    /// Moves the run into a terminal phase, once. Later calls for the same
    /// run are ignored, so the defect watcher cannot overwrite a phase the
    /// loop already set.
    async fn finish(&self, run_id: Uuid, phase: RunPhase) {
        {
            let mut status = self.status.write().await;
            if status.phase != RunPhase::Running {
                return;
            }
            status.phase = phase;
        }
        let progress = self.progress().await;
        info!(
            %run_id,
            ?phase,
            processed = progress.processed,
            successful = progress.successful,
            failed = progress.failed,
            "batch run finished"
        );
        let _ = self.event_tx.send(RunEvent::Finished {
            run_id,
            phase,
            progress,
            timestamp: Utc::now(),
        });
        self.publish_snapshot().await;
    }
}

/// Handle to the batch processing pipeline.
///
/// Cheap to share: all methods take `&self` and the heavy state lives
/// behind an `Arc`.
pub struct BatchRunner {
    shared: Arc<RunnerShared>,
    snapshot_rx: watch::Receiver<RunSnapshot>,
}

impl BatchRunner {
    #[must_use]
    pub fn new(fetcher: Arc<dyn StatusFetcher>, config: RunnerConfig) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(RunSnapshot::idle());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(RunnerShared {
                fetcher,
                config,
                status: RwLock::new(RunStatus::idle()),
                results: RwLock::new(ResultStore::new()),
                run_id: RwLock::new(None),
                cancel: RwLock::new(CancellationToken::new()),
                snapshot_tx,
                event_tx,
            }),
            snapshot_rx,
        }
    }

    /// Starts a run over the given applications.
    ///
    /// An empty batch is a no-op, and so is a start while another run is
    /// live (idempotent UI buttons over errors). Otherwise the previous
    /// run's results are cleared and the sequential loop is spawned onto
    /// the runtime; this method returns as soon as the loop is scheduled.
    pub async fn start(&self, applications: Vec<ApplicationNumber>) {
        if applications.is_empty() {
            debug!("empty batch, nothing to start");
            return;
        }
        let total = applications.len();
        let run_id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        {
            // The fresh token and run id are installed under the same lock
            // that flips the phase, so a stop() that observes `Running`
            // always cancels this run's token, never the previous run's.
            let mut status = self.shared.status.write().await;
            if status.phase == RunPhase::Running {
                warn!("a run is already in progress, ignoring start request");
                return;
            }
            *status = RunStatus::running(total);
            *self.shared.run_id.write().await = Some(run_id);
            *self.shared.cancel.write().await = cancel.clone();
            self.shared.results.write().await.clear();
        }

        info!(%run_id, total, "starting batch run");
        self.shared.publish_snapshot().await;
        let _ = self.shared.event_tx.send(RunEvent::Started {
            run_id,
            total,
            timestamp: Utc::now(),
        });

        let loop_shared = Arc::clone(&self.shared);
        let handle =
            tokio::spawn(async move { run_loop(loop_shared, run_id, applications, cancel).await });

        // Defect watcher: a panic escaping the loop is the one fatal path.
        let watcher_shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            if handle.await.is_err() {
                error!(%run_id, "run loop aborted unexpectedly");
                watcher_shared.finish(run_id, RunPhase::Failed).await;
            }
        });
    }

    /// Requests cancellation of the live run.
    ///
    /// Idempotent; a no-op when nothing is running. The in-flight fetch
    /// settles naturally before the run halts, so observable latency is
    /// bounded by that fetch's duration.
    pub async fn stop(&self) {
        {
            let status = self.shared.status.read().await;
            if status.phase != RunPhase::Running {
                debug!("stop requested while no run is live, ignoring");
                return;
            }
        }
        self.shared.cancel.read().await.cancel();
        info!("stop requested, halting after the in-flight fetch settles");
    }

    /// Latest published snapshot. Never blocks.
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        self.shared.snapshot_tx.borrow().clone()
    }

    /// Subscribes to atomic run events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Watch channel carrying every published snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<RunSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Waits until the current run (if any) reaches a terminal phase.
    pub async fn wait_until_finished(&self) {
        let mut rx = self.snapshot_rx.clone();
        loop {
            if rx.borrow_and_update().phase.is_terminal() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// The sequential run loop: one fetch in flight at a time, input order
/// preserved, cancellation observed at the iteration boundary only.
async fn run_loop(
    shared: Arc<RunnerShared>,
    run_id: Uuid,
    applications: Vec<ApplicationNumber>,
    cancel: CancellationToken,
) {
    let delay = Duration::from_millis(shared.config.request_delay_ms);
    for (index, application_number) in applications.into_iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if cancel.is_cancelled() {
            info!(%run_id, "cancellation observed, halting before the next fetch");
            shared.finish(run_id, RunPhase::Stopped).await;
            return;
        }

        debug!(%run_id, %application_number, "fetching status");
        let record = match shared.fetcher.fetch(&application_number).await {
            Ok(details) => OutcomeRecord::Success {
                application_number: application_number.clone(),
                details,
            },
            Err(err) => {
                debug!(%run_id, %application_number, error = %err, "fetch failed");
                OutcomeRecord::Failure {
                    application_number: application_number.clone(),
                    reason: err.to_string(),
                }
            }
        };
        shared.settle_item(run_id, application_number, record).await;
    }
    shared.finish(run_id, RunPhase::Completed).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fetcher::FetchError;
    use crate::domain::ApplicationDetails;
    use async_trait::async_trait;

    struct AlwaysSucceeds;

    #[async_trait]
    impl StatusFetcher for AlwaysSucceeds {
        async fn fetch(
            &self,
            _application_number: &ApplicationNumber,
        ) -> Result<ApplicationDetails, FetchError> {
            Ok(ApplicationDetails::default())
        }
    }

    fn numbers(raws: &[&str]) -> Vec<ApplicationNumber> {
        raws.iter()
            .map(|r| ApplicationNumber::parse(r).unwrap())
            .collect()
    }

    fn runner() -> BatchRunner {
        BatchRunner::new(Arc::new(AlwaysSucceeds), RunnerConfig::default())
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let runner = runner();
        runner.start(Vec::new()).await;

        let snapshot = runner.snapshot();
        assert_eq!(snapshot.phase, RunPhase::Idle);
        assert!(snapshot.results.is_empty());
        assert!(snapshot.run_id.is_none());
    }

    #[tokio::test]
    async fn stop_without_a_run_is_a_no_op() {
        let runner = runner();
        runner.stop().await;
        assert_eq!(runner.snapshot().phase, RunPhase::Idle);
    }

    #[tokio::test]
    async fn completed_run_processes_everything_in_order() {
        let runner = runner();
        let input = numbers(&["20231234567", "20231234568", "20231234569"]);
        runner.start(input.clone()).await;
        runner.wait_until_finished().await;

        let snapshot = runner.snapshot();
        assert_eq!(snapshot.phase, RunPhase::Completed);
        assert_eq!(snapshot.progress.processed, 3);
        assert_eq!(snapshot.progress.total, 3);
        assert_eq!(snapshot.progress.percentage, 100);
        for (i, record) in snapshot.results.all().iter().enumerate() {
            assert_eq!(record.application_number(), &input[i]);
        }
    }

    #[tokio::test]
    async fn a_new_start_clears_the_previous_results() {
        let runner = runner();
        runner.start(numbers(&["20231234567", "20231234568"])).await;
        runner.wait_until_finished().await;
        assert_eq!(runner.snapshot().results.len(), 2);

        runner.start(numbers(&["20231234569"])).await;
        runner.wait_until_finished().await;

        let snapshot = runner.snapshot();
        assert_eq!(snapshot.phase, RunPhase::Completed);
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(
            snapshot.results.all()[0].application_number().as_str(),
            "20231234569"
        );
    }
}
