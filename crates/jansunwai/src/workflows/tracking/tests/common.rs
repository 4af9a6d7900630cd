use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::TrackingMode;
use crate::localization::{InMemoryPreferenceStore, LocalizationStore};
use crate::workflows::complaint::ComplaintId;
use crate::workflows::tracking::{
    ComplaintDirectory, ComplaintRecord, ComplaintStatus, DirectoryError,
    InMemoryComplaintDirectory, StatusUpdate, TrackingService,
};

pub(super) const LEDGER: &str = "\
Complaint ID,Subject,Department,Location,Filed On,Update Date,Update Time,Status,Detail
JS-20240102-4821,Streetlight not working,Electricity,\"Ward 4, Lucknow\",2024-01-02,2024-01-02,09:15,Complaint Registered,Registered online
JS-20240102-4821,Streetlight not working,Electricity,\"Ward 4, Lucknow\",2024-01-02,2024-01-03,11:40 AM,Assigned to Department,Forwarded to the electricity board
JS-20240105-1377,Garbage pile near school,Sanitation,,05-Jan-2024,,,Registered,
JS-20240102-4821,Streetlight not working,Electricity,\"Ward 4, Lucknow\",2024-01-02,2024-01-06,4:05 PM,Resolved,Lamp replaced
";

pub(super) fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

pub(super) fn record(id: &str) -> ComplaintRecord {
    let mut record = ComplaintRecord::new(
        ComplaintId(id.to_string()),
        "Water logging on main road",
        "Public Works Department",
        "Hazratganj, Lucknow",
        at(2, 0, 0).date(),
    );
    record
        .append_update(StatusUpdate::new(
            at(2, 10, 0),
            ComplaintStatus::Registered,
            "Registered online",
        ))
        .expect("first update");
    record
}

pub(super) fn localization() -> Arc<LocalizationStore> {
    Arc::new(LocalizationStore::load(Arc::new(
        InMemoryPreferenceStore::default(),
    )))
}

pub(super) fn build_service(
    mode: TrackingMode,
    records: Vec<ComplaintRecord>,
) -> (
    TrackingService<InMemoryComplaintDirectory>,
    Arc<InMemoryComplaintDirectory>,
) {
    let directory = Arc::new(InMemoryComplaintDirectory::seeded(records));
    let service = TrackingService::new(mode, directory.clone(), localization());
    (service, directory)
}

pub(super) struct UnavailableDirectory;

impl ComplaintDirectory for UnavailableDirectory {
    fn register(&self, _record: ComplaintRecord) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ComplaintRecord) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ComplaintId) -> Result<Option<ComplaintRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ComplaintRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
