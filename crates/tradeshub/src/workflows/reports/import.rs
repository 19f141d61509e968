use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::content_filter::{filter_report_content, FilterIssue, ReportContent};

/// Errors surfaced while reading a legacy report export.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to open report export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse report export: {0}")]
    Csv(#[from] csv::Error),
}

/// Screening outcome for one row of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenedRow {
    /// 1-based data row, not counting the header.
    pub row: usize,
    pub is_valid: bool,
    pub issues: Vec<FilterIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(alias = "workDescription", alias = "Work Description")]
    work_description: String,
    #[serde(alias = "locationArea", alias = "Location Area")]
    location_area: String,
    #[serde(
        default,
        alias = "communicationSummary",
        alias = "Communication Summary",
        deserialize_with = "empty_string_as_none"
    )]
    communication_summary: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Run every row of a CSV export through the content filter.
pub fn screen_csv<R: Read>(reader: R) -> Result<Vec<ScreenedRow>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut screened = Vec::new();

    for (index, row) in csv_reader.deserialize::<ExportRow>().enumerate() {
        let row = row?;
        let content = ReportContent {
            work_description: row.work_description,
            location_area: row.location_area,
            communication_summary: row.communication_summary,
        };
        let result = filter_report_content(&content);
        let message = result.error_message();

        screened.push(ScreenedRow {
            row: index + 1,
            is_valid: result.is_valid,
            issues: result.issues,
            message,
        });
    }

    Ok(screened)
}

pub fn screen_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<ScreenedRow>, ImportError> {
    let file = File::open(path)?;
    screen_csv(file)
}
