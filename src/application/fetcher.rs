//! The injected capability that resolves one application number to a
//! status record.

use async_trait::async_trait;

use crate::domain::{ApplicationDetails, ApplicationNumber};

/// Why a single fetch failed.
///
/// These are per-item failures: the runner records them and moves on, it
/// never aborts the run for one of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("application not found in the registry")]
    NotFound,

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream response could not be parsed: {0}")]
    Parse(String),

    #[error("fetch timed out")]
    Timeout,
}

/// Capability that fetches the status record for one application.
///
/// Contract: every call must eventually settle, and the runner calls it at
/// most once per application number within one run. Implementations own
/// their transport timeouts; the runner imposes none of its own.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch(
        &self,
        application_number: &ApplicationNumber,
    ) -> Result<ApplicationDetails, FetchError>;
}
