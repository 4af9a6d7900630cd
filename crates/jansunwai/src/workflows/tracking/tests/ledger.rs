use super::common::*;

use chrono::NaiveDate;

use crate::workflows::tracking::{ComplaintLedgerImporter, ComplaintStatus, LedgerImportError};

#[test]
fn importer_groups_rows_by_complaint_in_file_order() {
    let records = ComplaintLedgerImporter::from_reader(LEDGER.as_bytes()).expect("ledger imports");
    assert_eq!(records.len(), 2);

    let streetlight = &records[0];
    assert_eq!(streetlight.id.as_str(), "JS-20240102-4821");
    assert_eq!(streetlight.location, "Ward 4, Lucknow");
    assert_eq!(streetlight.updates().len(), 3);
    assert_eq!(streetlight.status(), ComplaintStatus::Resolved);
    assert_eq!(streetlight.updates()[1].recorded_at, at(3, 11, 40));
    assert_eq!(streetlight.updates()[2].recorded_at, at(6, 16, 5));

    let garbage = &records[1];
    assert_eq!(
        garbage.filed_on,
        NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date")
    );
    assert_eq!(garbage.location, "");
    assert_eq!(garbage.updates()[0].recorded_at, at(5, 0, 0));
    assert_eq!(garbage.updates()[0].detail, "");
}

#[test]
fn importer_reports_the_offending_line() {
    let csv = "Complaint ID,Subject,Department,Filed On,Status\n\
JS-1,Leak,Water,2024-01-02,Registered\n\
JS-2,Leak,Water,2024-01-02,Teleported\n";
    let error = ComplaintLedgerImporter::from_reader(csv.as_bytes()).expect_err("unknown status");
    match error {
        LedgerImportError::UnknownStatus { line, value } => {
            assert_eq!(line, 3);
            assert_eq!(value, "Teleported");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn importer_rejects_backdated_updates() {
    let csv = "Complaint ID,Subject,Department,Filed On,Update Date,Status\n\
JS-1,Leak,Water,2024-01-02,2024-01-05,Registered\n\
JS-1,Leak,Water,2024-01-02,2024-01-03,Under Review\n";
    let error = ComplaintLedgerImporter::from_reader(csv.as_bytes()).expect_err("out of order");
    assert!(matches!(error, LedgerImportError::OutOfOrder { line: 3, .. }));
}

#[test]
fn importer_rejects_unparseable_dates() {
    let csv = "Complaint ID,Subject,Department,Filed On,Status\n\
JS-1,Leak,Water,someday,Registered\n";
    let error = ComplaintLedgerImporter::from_reader(csv.as_bytes()).expect_err("bad date");
    assert!(matches!(error, LedgerImportError::InvalidDate { line: 2, .. }));
}
