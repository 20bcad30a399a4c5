//! Domain model for the batch status checker.
//!
//! Pure data types with no I/O: validated application numbers, per-item
//! outcome records, the ordered result store, and progress reporting.

pub mod application;
pub mod progress;
pub mod record;

pub use application::{
    validate_batch, ApplicationNumber, BatchValidationError, InvalidApplicationNumber,
    MAX_BATCH_SIZE,
};
pub use progress::{ProgressReport, RunPhase, RunStatus};
pub use record::{ApplicationDetails, OutcomeRecord, ResultStore};
