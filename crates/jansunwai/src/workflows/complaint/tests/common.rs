use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::localization::{InMemoryPreferenceStore, LocalizationStore};
use crate::workflows::complaint::{
    ComplaintId, ComplaintIdGenerator, ComplaintService, Coordinate, Department, FormState,
    OneTimeCode, OtpGateway, OtpGatewayError, OtpVerifier, SessionCollaborators,
    SubmissionSession, WellFormedCodeVerifier, WorkflowTiming,
};
use crate::workflows::tracking::{
    ComplaintDirectory, ComplaintRecord, DirectoryError, InMemoryComplaintDirectory,
};

pub(super) const RESERVED_ID: &str = "JS-20240101-4242";
pub(super) const FRESH_ID: &str = "JS-20240101-5151";
pub(super) const ISSUED_CODE: &str = "246810";

pub(super) fn valid_form() -> FormState {
    let mut form = FormState::default();
    form.department = Some(Department::Water);
    form.subject = "Leak".to_string();
    form.description = "Main pipe leaking near the market".to_string();
    form.applicant_name = "Asha Verma".to_string();
    form.set_mobile_number("9876543210");
    form.location.coordinate = Some(Coordinate {
        latitude: 26.8467,
        longitude: 80.9462,
    });
    form
}

#[derive(Default)]
pub(super) struct CountingIds {
    calls: AtomicUsize,
}

impl CountingIds {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ComplaintIdGenerator for CountingIds {
    fn next_id(&self) -> ComplaintId {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ComplaintId(RESERVED_ID.to_string())
    }
}

/// Hands out [`RESERVED_ID`] while colliding, then [`FRESH_ID`].
pub(super) struct CollidingIds {
    collisions_left: AtomicUsize,
    stuck: AtomicBool,
    calls: AtomicUsize,
}

impl CollidingIds {
    pub(super) fn times(collisions: usize) -> Self {
        Self {
            collisions_left: AtomicUsize::new(collisions),
            stuck: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Keeps returning the taken id until [`release`](Self::release).
    pub(super) fn stuck() -> Self {
        let ids = Self::times(0);
        ids.stuck.store(true, Ordering::SeqCst);
        ids
    }

    pub(super) fn release(&self) {
        self.stuck.store(false, Ordering::SeqCst);
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ComplaintIdGenerator for CollidingIds {
    fn next_id(&self) -> ComplaintId {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let colliding = self.stuck.load(Ordering::SeqCst)
            || self
                .collisions_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
        if colliding {
            ComplaintId(RESERVED_ID.to_string())
        } else {
            ComplaintId(FRESH_ID.to_string())
        }
    }
}

/// Directory that already holds a complaint filed under [`RESERVED_ID`].
pub(super) fn directory_holding_reserved_id() -> Arc<InMemoryComplaintDirectory> {
    let filed_at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("valid date")
        .and_hms_opt(9, 0, 0)
        .expect("valid time");
    let mut earlier = valid_form();
    earlier.subject = "Earlier complaint".to_string();
    Arc::new(InMemoryComplaintDirectory::seeded([ComplaintRecord::registered(
        ComplaintId(RESERVED_ID.to_string()),
        &earlier,
        filed_at,
    )]))
}

pub(super) struct FixedGateway;

impl OtpGateway for FixedGateway {
    fn dispatch(&self, _mobile_number: &str) -> Result<OneTimeCode, OtpGatewayError> {
        Ok(OneTimeCode::new(ISSUED_CODE))
    }
}

pub(super) struct OfflineGateway;

impl OtpGateway for OfflineGateway {
    fn dispatch(&self, _mobile_number: &str) -> Result<OneTimeCode, OtpGatewayError> {
        Err(OtpGatewayError::Unavailable("sms provider timeout".to_string()))
    }
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

pub(super) struct Harness {
    pub(super) ids: Arc<CountingIds>,
    pub(super) directory: Arc<InMemoryComplaintDirectory>,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self {
            ids: Arc::new(CountingIds::default()),
            directory: Arc::new(InMemoryComplaintDirectory::default()),
        }
    }

    pub(super) fn collaborators(
        &self,
        gateway: Arc<dyn OtpGateway>,
        verifier: Arc<dyn OtpVerifier>,
    ) -> SessionCollaborators {
        SessionCollaborators {
            ids: self.ids.clone(),
            gateway,
            verifier,
            directory: self.directory.clone(),
        }
    }

    pub(super) fn session(&self) -> SubmissionSession {
        SubmissionSession::open(
            self.collaborators(Arc::new(FixedGateway), Arc::new(WellFormedCodeVerifier)),
            WorkflowTiming::default(),
        )
    }

    pub(super) fn service(&self) -> ComplaintService<InMemoryComplaintDirectory> {
        ComplaintService::with_collaborators(
            self.directory.clone(),
            localization(),
            self.ids.clone(),
            Arc::new(FixedGateway),
            Arc::new(WellFormedCodeVerifier),
            WorkflowTiming::default(),
        )
    }
}

pub(super) fn localization() -> Arc<LocalizationStore> {
    Arc::new(LocalizationStore::load(Arc::new(
        InMemoryPreferenceStore::default(),
    )))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
