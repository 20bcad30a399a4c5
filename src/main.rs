//! Headless driver: import a spreadsheet of application numbers, run the
//! batch against the simulated registry, export results and errors.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use patent_status_checker::application::BatchRunner;
use patent_status_checker::domain::validate_batch;
use patent_status_checker::events::RunEvent;
use patent_status_checker::infrastructure::{
    config::AppConfig, export_errors, export_results, import_application_numbers,
    logging::init_logging_with_config, SimulatedStatusFetcher,
};

const CONFIG_PATH: &str = "patent-status-checker.json";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: patent-status-checker <input.xlsx> [results.xlsx] [errors.xlsx]");
    };
    let results_path = args
        .next()
        .map_or_else(|| PathBuf::from("patent_application_status_results.xlsx"), PathBuf::from);
    let errors_path = args
        .next()
        .map_or_else(|| PathBuf::from("patent_application_status_errors.xlsx"), PathBuf::from);

    let config = AppConfig::load(CONFIG_PATH).await?;
    init_logging_with_config(&config.logging)?;

    let candidates = import_application_numbers(&input)
        .with_context(|| format!("failed to import {}", input.display()))?;
    let applications = validate_batch(&candidates).context("batch rejected")?;
    info!(count = applications.len(), "batch accepted");

    let fetcher = Arc::new(SimulatedStatusFetcher::new(config.simulation.clone()));
    let runner = BatchRunner::new(fetcher, config.batch.runner_config());

    // Log progress as items settle, the way the UI would render it.
    let mut events = runner.subscribe();
    let reporter = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let RunEvent::ItemSettled {
                application_number,
                progress,
                record,
                ..
            } = event
            {
                info!(
                    %application_number,
                    success = record.is_success(),
                    "{}/{} ({}%)",
                    progress.processed,
                    progress.total,
                    progress.percentage,
                );
            }
        }
    });

    runner.start(applications).await;
    runner.wait_until_finished().await;
    reporter.abort();

    let snapshot = runner.snapshot();
    info!(
        phase = ?snapshot.phase,
        successful = snapshot.progress.successful,
        failed = snapshot.progress.failed,
        "run finished"
    );

    export_results(&snapshot.results, &results_path)
        .with_context(|| format!("failed to export {}", results_path.display()))?;
    if !export_errors(&snapshot.results, &errors_path)? {
        warn!("no failures, skipping error export");
    }

    Ok(())
}
