//! Spreadsheet import and export.
//!
//! Import reads the first column of the first worksheet; export writes the
//! result store back out with one record per row and a field-name header.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::domain::record::DETAIL_FIELD_LABELS;
use crate::domain::{OutcomeRecord, ResultStore};

/// Sheet name used by both exports.
const EXPORT_SHEET_NAME: &str = "Application Statuses";

#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("failed to read spreadsheet: {0}")]
    Read(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

/// Extracts candidate application numbers from the first column of the
/// first worksheet: cells are stringified, trimmed, and empty rows are
/// dropped. No format validation happens here; that is the batch
/// validator's job.
pub fn import_application_numbers(
    path: impl AsRef<Path>,
) -> Result<Vec<String>, SpreadsheetError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;

    let mut candidates = Vec::new();
    for row in range.rows() {
        let Some(cell) = row.first() else { continue };
        let value = match cell {
            Data::String(s) => s.trim().to_string(),
            // Excel stores bare numbers as floats; 11-digit application
            // numbers are still exact in an f64.
            Data::Float(f) => format!("{f:.0}"),
            Data::Int(i) => i.to_string(),
            _ => continue,
        };
        if !value.is_empty() {
            candidates.push(value);
        }
    }

    info!(
        path = %path.display(),
        rows = candidates.len(),
        "imported application numbers"
    );
    Ok(candidates)
}

/// Writes every record to an `.xlsx` file: header row first, then one row
/// per record in completion order. Success rows flatten the detail fields
/// into named columns; failure rows carry the number and the reason only.
pub fn export_results(
    store: &ResultStore,
    path: impl AsRef<Path>,
) -> Result<(), SpreadsheetError> {
    let path = path.as_ref();
    write_records(store.all(), path)?;
    info!(path = %path.display(), rows = store.len(), "exported results");
    Ok(())
}

/// Writes the failed records only. Skipped entirely (and returns `false`)
/// when the run produced no failures.
pub fn export_errors(
    store: &ResultStore,
    path: impl AsRef<Path>,
) -> Result<bool, SpreadsheetError> {
    let failures = store.failures();
    if failures.is_empty() {
        return Ok(false);
    }
    let path = path.as_ref();
    write_records(&failures, path)?;
    info!(path = %path.display(), rows = failures.len(), "exported errors");
    Ok(true)
}

fn write_records(records: &[OutcomeRecord], path: &Path) -> Result<(), SpreadsheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    worksheet.write_string(0, 0, "Application Number")?;
    for (col, label) in DETAIL_FIELD_LABELS.iter().enumerate() {
        worksheet.write_string(0, (col + 1) as u16, *label)?;
    }
    let error_col = (DETAIL_FIELD_LABELS.len() + 1) as u16;
    worksheet.write_string(0, error_col, "Error")?;

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet.write_string(row, 0, record.application_number().as_str())?;
        match record {
            OutcomeRecord::Success { details, .. } => {
                for (col, value) in details.field_values().iter().enumerate() {
                    if let Some(value) = value {
                        worksheet.write_string(row, (col + 1) as u16, *value)?;
                    }
                }
            }
            OutcomeRecord::Failure { reason, .. } => {
                worksheet.write_string(row, error_col, reason)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationDetails, ApplicationNumber};

    fn number(raw: &str) -> ApplicationNumber {
        ApplicationNumber::parse(raw).unwrap()
    }

    fn sample_store() -> ResultStore {
        let mut store = ResultStore::new();
        store.append(OutcomeRecord::Success {
            application_number: number("20231234567"),
            details: ApplicationDetails {
                applicant_name: Some("ACME Labs".to_string()),
                application_status: Some("Granted".to_string()),
                ..ApplicationDetails::default()
            },
        });
        store.append(OutcomeRecord::Failure {
            application_number: number("20231234568"),
            reason: "application not found in the registry".to_string(),
        });
        store
    }

    #[test]
    fn exported_file_imports_back_with_header_and_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xlsx");

        export_results(&sample_store(), &path).unwrap();

        // First column comes back as header + one cell per record.
        let candidates = import_application_numbers(&path).unwrap();
        assert_eq!(
            candidates,
            vec![
                "Application Number".to_string(),
                "20231234567".to_string(),
                "20231234568".to_string(),
            ]
        );
    }

    #[test]
    fn error_export_is_skipped_when_there_are_no_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.xlsx");

        let mut store = ResultStore::new();
        store.append(OutcomeRecord::Success {
            application_number: number("20231234567"),
            details: ApplicationDetails::default(),
        });

        assert!(!export_errors(&store, &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn error_export_contains_only_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.xlsx");

        assert!(export_errors(&sample_store(), &path).unwrap());

        let candidates = import_application_numbers(&path).unwrap();
        assert_eq!(
            candidates,
            vec![
                "Application Number".to_string(),
                "20231234568".to_string(),
            ]
        );
    }
}
