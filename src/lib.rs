//! Patent Application Status Checker
//!
//! Batch pipeline for checking the status of Indian patent applications:
//! a spreadsheet of application numbers goes in, each number is fetched
//! sequentially through an injected [`StatusFetcher`], progress is
//! published as immutable snapshots, and the partitioned results come
//! back out as spreadsheets. The shipped fetcher is a simulation; the
//! real registry transport plugs in behind the same trait.
//!
//! [`StatusFetcher`]: application::StatusFetcher

pub mod application;
pub mod domain;
pub mod events;
pub mod infrastructure;

pub use application::{BatchRunner, FetchError, RunnerConfig, StatusFetcher};
pub use domain::{
    validate_batch, ApplicationDetails, ApplicationNumber, BatchValidationError, OutcomeRecord,
    ProgressReport, ResultStore, RunPhase,
};
pub use events::{RunEvent, RunSnapshot};
