//! Application layer: the batch runner state machine and the fetcher seam
//! it drives.

pub mod batch_runner;
pub mod fetcher;

pub use batch_runner::{BatchRunner, RunnerConfig};
pub use fetcher::{FetchError, StatusFetcher};
