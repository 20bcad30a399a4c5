//! Per-application outcome records and the ordered result store.

use serde::{Deserialize, Serialize};

use crate::domain::application::ApplicationNumber;

/// Status record attributes returned by the patent office for one
/// application. Every field is optional; absent attributes stay `None`
/// and export as blank cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetails {
    pub applicant_name: Option<String>,
    pub application_type: Option<String>,
    pub date_of_filing: Option<String>,
    pub title_of_invention: Option<String>,
    pub field_of_invention: Option<String>,
    pub email_as_per_record: Option<String>,
    pub additional_email_as_per_record: Option<String>,
    pub email_updated_online: Option<String>,
    pub pct_international_application_number: Option<String>,
    pub pct_international_filing_date: Option<String>,
    pub priority_date: Option<String>,
    pub request_for_examination_date: Option<String>,
    pub publication_date: Option<String>,
    pub application_status: Option<String>,
}

/// Column labels used by the spreadsheet export, in export order.
pub const DETAIL_FIELD_LABELS: [&str; 14] = [
    "Applicant Name",
    "Application Type",
    "Date of Filing",
    "Title of Invention",
    "Field of Invention",
    "Email (As Per Record)",
    "Additional Email (As Per Record)",
    "Email (Updated Online)",
    "PCT International Application Number",
    "PCT International Filing Date",
    "Priority Date",
    "Request for Examination Date",
    "Publication Date (U/S 11A)",
    "Application Status",
];

impl ApplicationDetails {
    /// Field values in the same order as [`DETAIL_FIELD_LABELS`].
    #[must_use]
    pub fn field_values(&self) -> [Option<&str>; 14] {
        [
            self.applicant_name.as_deref(),
            self.application_type.as_deref(),
            self.date_of_filing.as_deref(),
            self.title_of_invention.as_deref(),
            self.field_of_invention.as_deref(),
            self.email_as_per_record.as_deref(),
            self.additional_email_as_per_record.as_deref(),
            self.email_updated_online.as_deref(),
            self.pct_international_application_number.as_deref(),
            self.pct_international_filing_date.as_deref(),
            self.priority_date.as_deref(),
            self.request_for_examination_date.as_deref(),
            self.publication_date.as_deref(),
            self.application_status.as_deref(),
        ]
    }
}

/// Settled outcome for one application. Created the instant the fetch
/// settles and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OutcomeRecord {
    Success {
        application_number: ApplicationNumber,
        details: ApplicationDetails,
    },
    Failure {
        application_number: ApplicationNumber,
        reason: String,
    },
}

impl OutcomeRecord {
    #[must_use]
    pub fn application_number(&self) -> &ApplicationNumber {
        match self {
            Self::Success {
                application_number, ..
            }
            | Self::Failure {
                application_number, ..
            } => application_number,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Ordered collection of settled outcomes for one run.
///
/// Append-only while a run is live; records are only ever removed by a
/// whole-store [`clear`](Self::clear) when the next run starts. The runner
/// is the single writer; everyone else reads snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStore {
    records: Vec<OutcomeRecord>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: OutcomeRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// All settled records, in completion order.
    #[must_use]
    pub fn all(&self) -> &[OutcomeRecord] {
        &self.records
    }

    /// Successful records only, relative order preserved.
    #[must_use]
    pub fn successes(&self) -> Vec<OutcomeRecord> {
        self.records
            .iter()
            .filter(|r| r.is_success())
            .cloned()
            .collect()
    }

    /// Failed records only, relative order preserved.
    #[must_use]
    pub fn failures(&self) -> Vec<OutcomeRecord> {
        self.records
            .iter()
            .filter(|r| !r.is_success())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.records.len() - self.success_count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
