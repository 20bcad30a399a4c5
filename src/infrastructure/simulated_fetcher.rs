//! Simulated status fetcher.
//!
//! Stands in for the real patent registry: sleeps for a random delay
//! within the configured range, fails a configured fraction of calls, and
//! fabricates plausible record fields from the application number. The
//! real transport, captcha flow included, lives behind the same
//! [`StatusFetcher`] trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::application::fetcher::{FetchError, StatusFetcher};
use crate::domain::{ApplicationDetails, ApplicationNumber};
use crate::infrastructure::config::SimulationConfig;

const APPLICATION_TYPES: [&str; 3] = ["Provisional", "Non-Provisional", "Design"];
const INVENTION_FIELDS: [&str; 4] = ["Chemistry", "Mechanical", "Electrical", "Biotechnology"];
const APPLICATION_STATUSES: [&str; 5] = ["Filed", "Published", "Examined", "Granted", "Rejected"];

/// Mock [`StatusFetcher`] driven by `fastrand`.
#[derive(Debug, Clone)]
pub struct SimulatedStatusFetcher {
    config: SimulationConfig,
}

impl SimulatedStatusFetcher {
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    fn random_delay(&self) -> Duration {
        let min = self.config.min_delay_ms.min(self.config.max_delay_ms);
        let max = self.config.max_delay_ms.max(self.config.min_delay_ms);
        Duration::from_millis(fastrand::u64(min..=max))
    }

    fn mock_details(application_number: &ApplicationNumber) -> ApplicationDetails {
        // Suffix keeps fabricated fields recognizably tied to the input.
        let suffix = &application_number.as_str()[application_number.as_str().len() - 4..];
        ApplicationDetails {
            applicant_name: Some(format!("Applicant {suffix}")),
            application_type: Some(pick(&APPLICATION_TYPES).to_string()),
            date_of_filing: Some(format!(
                "{:02}/{:02}/202{}",
                fastrand::u32(1..=28),
                fastrand::u32(1..=12),
                fastrand::u32(0..=4),
            )),
            title_of_invention: Some(format!("Invention Title {suffix}")),
            field_of_invention: Some(pick(&INVENTION_FIELDS).to_string()),
            application_status: Some(pick(&APPLICATION_STATUSES).to_string()),
            ..ApplicationDetails::default()
        }
    }
}

fn pick<'a>(choices: &'a [&'a str]) -> &'a str {
    choices[fastrand::usize(0..choices.len())]
}

#[async_trait]
impl StatusFetcher for SimulatedStatusFetcher {
    async fn fetch(
        &self,
        application_number: &ApplicationNumber,
    ) -> Result<ApplicationDetails, FetchError> {
        tokio::time::sleep(self.random_delay()).await;

        if fastrand::f64() < self.config.failure_rate {
            return Err(FetchError::NotFound);
        }
        Ok(Self::mock_details(application_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_config(failure_rate: f64) -> SimulationConfig {
        SimulationConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
            failure_rate,
        }
    }

    #[tokio::test]
    async fn zero_failure_rate_always_succeeds() {
        let fetcher = SimulatedStatusFetcher::new(instant_config(0.0));
        let number = ApplicationNumber::parse("20231234567").unwrap();

        let details = fetcher.fetch(&number).await.unwrap();
        assert_eq!(details.applicant_name.as_deref(), Some("Applicant 4567"));
        assert!(details.application_status.is_some());
    }

    #[tokio::test]
    async fn full_failure_rate_always_fails() {
        let fetcher = SimulatedStatusFetcher::new(instant_config(1.0));
        let number = ApplicationNumber::parse("20231234567").unwrap();

        assert_eq!(fetcher.fetch(&number).await, Err(FetchError::NotFound));
    }
}
