//! Infrastructure: configuration, logging, the simulated fetcher and
//! spreadsheet import/export.

pub mod config;
pub mod logging;
pub mod simulated_fetcher;
pub mod spreadsheet;

pub use config::{AppConfig, LoggingConfig, SimulationConfig};
pub use simulated_fetcher::SimulatedStatusFetcher;
pub use spreadsheet::{
    export_errors, export_results, import_application_numbers, SpreadsheetError,
};
