use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};

use super::domain::{ComplaintRecord, ComplaintStatus, RecordError, StatusUpdate};
use crate::workflows::complaint::ComplaintId;

/// Builds complaint records from a CSV ledger export.
///
/// Each row is one timeline entry; rows sharing a `Complaint ID` are grouped
/// into one record in file order, and the first row supplies the subject,
/// department, location and filing date.
pub struct ComplaintLedgerImporter;

impl ComplaintLedgerImporter {
    pub fn from_path(path: &Path) -> Result<Vec<ComplaintRecord>, LedgerImportError> {
        let file = File::open(path).map_err(|source| LedgerImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ComplaintRecord>, LedgerImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records: Vec<ComplaintRecord> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (index, row) in csv_reader.deserialize::<LedgerRow>().enumerate() {
            let row = row?;
            let line = index + 2;

            let filed_on = parse_date(&row.filed_on).ok_or_else(|| LedgerImportError::InvalidDate {
                line,
                value: row.filed_on.clone(),
            })?;
            let update_date = match row.update_date.as_deref() {
                Some(value) => parse_date(value).ok_or_else(|| LedgerImportError::InvalidDate {
                    line,
                    value: value.to_string(),
                })?,
                None => filed_on,
            };
            let update_time = match row.update_time.as_deref() {
                Some(value) => parse_time(value).ok_or_else(|| LedgerImportError::InvalidTime {
                    line,
                    value: value.to_string(),
                })?,
                None => NaiveTime::MIN,
            };
            let status = ComplaintStatus::from_label(&row.status).ok_or_else(|| {
                LedgerImportError::UnknownStatus {
                    line,
                    value: row.status.clone(),
                }
            })?;

            let position = *positions.entry(row.complaint_id.clone()).or_insert_with(|| {
                records.push(ComplaintRecord::new(
                    ComplaintId(row.complaint_id.clone()),
                    row.subject.clone(),
                    row.department.clone(),
                    row.location.clone().unwrap_or_default(),
                    filed_on,
                ));
                records.len() - 1
            });

            let update = StatusUpdate::new(
                update_date.and_time(update_time),
                status,
                row.detail.unwrap_or_default(),
            );
            records[position]
                .append_update(update)
                .map_err(|source| LedgerImportError::OutOfOrder { line, source })?;
        }

        Ok(records)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerImportError {
    #[error("could not open ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ledger: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: unrecognised date '{value}'")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: unrecognised time '{value}'")]
    InvalidTime { line: usize, value: String },
    #[error("line {line}: unknown status '{value}'")]
    UnknownStatus { line: usize, value: String },
    #[error("line {line}: {source}")]
    OutOfOrder {
        line: usize,
        #[source]
        source: RecordError,
    },
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    #[serde(rename = "Complaint ID")]
    complaint_id: String,
    #[serde(rename = "Subject")]
    subject: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Location", default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(rename = "Filed On")]
    filed_on: String,
    #[serde(rename = "Update Date", default, deserialize_with = "empty_string_as_none")]
    update_date: Option<String>,
    #[serde(rename = "Update Time", default, deserialize_with = "empty_string_as_none")]
    update_time: Option<String>,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Detail", default, deserialize_with = "empty_string_as_none")]
    detail: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    ["%Y-%m-%d", "%d-%b-%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim().to_ascii_uppercase();
    ["%H:%M", "%H:%M:%S", "%I:%M %p"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ledger_dates_and_clock_times() {
        assert_eq!(
            parse_date("05-Oct-2023"),
            NaiveDate::from_ymd_opt(2023, 10, 5)
        );
        assert_eq!(
            parse_date("2023-10-05"),
            NaiveDate::from_ymd_opt(2023, 10, 5)
        );
        assert_eq!(parse_time("2:15 pm"), NaiveTime::from_hms_opt(14, 15, 0));
        assert_eq!(parse_time("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert!(parse_date("yesterday").is_none());
    }
}
