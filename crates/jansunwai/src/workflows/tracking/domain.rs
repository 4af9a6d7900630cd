use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::localization::LocalizationKey;
use crate::workflows::complaint::{ComplaintId, Department, FormState, LocationMethod};

/// Identifier of the fixed record the prototype tracker always answers with.
pub const MOCK_COMPLAINT_ID: &str = "JSCMP-2023-12345";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Registered,
    AssignedToDepartment,
    UnderReview,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Registered => "Complaint Registered",
            Self::AssignedToDepartment => "Assigned to Department",
            Self::UnderReview => "Under Review",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }

    pub const fn label_key(self) -> LocalizationKey {
        match self {
            Self::Registered => LocalizationKey::StatusRegistered,
            Self::AssignedToDepartment => LocalizationKey::StatusAssignedToDepartment,
            Self::UnderReview => LocalizationKey::StatusUnderReview,
            Self::InProgress => LocalizationKey::StatusInProgress,
            Self::Resolved => LocalizationKey::StatusResolved,
        }
    }

    /// Parses the labels used in exported ledgers, case-insensitively.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "complaint registered" | "registered" => Some(Self::Registered),
            "assigned to department" | "assigned" => Some(Self::AssignedToDepartment),
            "under review" => Some(Self::UnderReview),
            "in progress" => Some(Self::InProgress),
            "resolved" | "closed" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// Dashboard view over the citizen's complaints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintFilter {
    #[default]
    All,
    Pending,
    Resolved,
}

impl ComplaintFilter {
    pub const fn matches(self, status: ComplaintStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !matches!(status, ComplaintStatus::Resolved),
            Self::Resolved => matches!(status, ComplaintStatus::Resolved),
        }
    }

    pub const fn title_key(self) -> LocalizationKey {
        match self {
            Self::All => LocalizationKey::AllComplaints,
            Self::Pending => LocalizationKey::PendingComplaints,
            Self::Resolved => LocalizationKey::ResolvedComplaints,
        }
    }
}

/// Totals shown on the dashboard stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
}

impl StatusCounts {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a ComplaintRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut counts, record| {
                counts.total += 1;
                if ComplaintFilter::Resolved.matches(record.status()) {
                    counts.resolved += 1;
                } else {
                    counts.pending += 1;
                }
                counts
            })
    }

    pub const fn for_filter(&self, filter: ComplaintFilter) -> usize {
        match filter {
            ComplaintFilter::All => self.total,
            ComplaintFilter::Pending => self.pending,
            ComplaintFilter::Resolved => self.resolved,
        }
    }
}

/// One entry of a complaint's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub recorded_at: NaiveDateTime,
    pub status: ComplaintStatus,
    pub detail: String,
}

impl StatusUpdate {
    pub fn new(recorded_at: NaiveDateTime, status: ComplaintStatus, detail: impl Into<String>) -> Self {
        Self {
            recorded_at,
            status,
            detail: detail.into(),
        }
    }
}

/// Timeline entries may only be appended in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("update at {attempted} is earlier than the latest update at {latest}")]
    OutOfOrder {
        latest: NaiveDateTime,
        attempted: NaiveDateTime,
    },
}

/// Everything the tracker shows about one complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub id: ComplaintId,
    pub subject: String,
    pub department: String,
    pub location: String,
    pub filed_on: NaiveDate,
    status: ComplaintStatus,
    updates: Vec<StatusUpdate>,
    feedback: Vec<Feedback>,
    escalations: Vec<Escalation>,
}

impl ComplaintRecord {
    pub fn new(
        id: ComplaintId,
        subject: impl Into<String>,
        department: impl Into<String>,
        location: impl Into<String>,
        filed_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            subject: subject.into(),
            department: department.into(),
            location: location.into(),
            filed_on,
            status: ComplaintStatus::Registered,
            updates: Vec::new(),
            feedback: Vec::new(),
            escalations: Vec::new(),
        }
    }

    /// Record created when a verified submission is accepted.
    pub fn registered(id: ComplaintId, form: &FormState, registered_at: NaiveDateTime) -> Self {
        let department = form
            .department
            .map_or(Department::NotSure.label(), Department::label);
        let mut record = Self::new(
            id,
            form.subject.trim(),
            department,
            describe_location(form),
            registered_at.date(),
        );
        record.updates.push(StatusUpdate::new(
            registered_at,
            ComplaintStatus::Registered,
            "Your complaint has been successfully registered in our system.",
        ));
        record
    }

    /// The fixed record served by the prototype tracker.
    pub fn mock() -> Self {
        let on = |day: u32, hour: u32, minute: u32| {
            NaiveDate::from_ymd_opt(2023, 10, day)
                .and_then(|date| date.and_hms_opt(hour, minute, 0))
                .unwrap_or_default()
        };

        let mut record = Self::new(
            ComplaintId(MOCK_COMPLAINT_ID.to_string()),
            "Road repair in sector 15",
            "Public Works Department",
            "Sector 15, Near Central Park",
            on(5, 0, 0).date(),
        );
        record.updates = vec![
            StatusUpdate::new(
                on(5, 10, 30),
                ComplaintStatus::Registered,
                "Your complaint has been successfully registered in our system.",
            ),
            StatusUpdate::new(
                on(6, 14, 15),
                ComplaintStatus::AssignedToDepartment,
                "Your complaint has been assigned to the Public Works Department.",
            ),
            StatusUpdate::new(
                on(8, 11, 45),
                ComplaintStatus::UnderReview,
                "A team has been dispatched to inspect the reported issue.",
            ),
        ];
        record.status = ComplaintStatus::InProgress;
        record
    }

    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    pub fn updates(&self) -> &[StatusUpdate] {
        &self.updates
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn escalations(&self) -> &[Escalation] {
        &self.escalations
    }

    /// Appends to the timeline and makes the update's status current.
    pub fn append_update(&mut self, update: StatusUpdate) -> Result<(), RecordError> {
        if let Some(latest) = self.updates.last() {
            if update.recorded_at < latest.recorded_at {
                return Err(RecordError::OutOfOrder {
                    latest: latest.recorded_at,
                    attempted: update.recorded_at,
                });
            }
        }
        self.status = update.status;
        self.updates.push(update);
        Ok(())
    }

    pub fn add_feedback(&mut self, feedback: Feedback) {
        self.feedback.push(feedback);
    }

    pub fn add_escalation(&mut self, escalation: Escalation) {
        self.escalations.push(escalation);
    }
}

fn describe_location(form: &FormState) -> String {
    match form.location.method {
        LocationMethod::Map => form
            .location
            .coordinate
            .map(|point| format!("{:.5}, {:.5}", point.latitude, point.longitude))
            .unwrap_or_default(),
        LocationMethod::Manual => {
            let area = &form.location.area;
            [
                &area.village_panchayat,
                &area.block,
                &area.thana,
                &area.tehsil,
                &area.district,
            ]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackError {
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(u8),
    #[error("an escalation needs a reason")]
    EmptyEscalationReason,
}

impl FeedbackError {
    pub const fn message_key(&self) -> LocalizationKey {
        match self {
            Self::RatingOutOfRange(_) => LocalizationKey::InvalidRating,
            Self::EmptyEscalationReason => LocalizationKey::EscalationReasonRequired,
        }
    }
}

/// Satisfaction score from one (very dissatisfied) to five (very satisfied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FeedbackRating(u8);

impl FeedbackRating {
    pub fn value(self) -> u8 {
        self.0
    }

    pub const fn label_key(self) -> LocalizationKey {
        match self.0 {
            1 => LocalizationKey::VeryDissatisfied,
            2 => LocalizationKey::Dissatisfied,
            3 => LocalizationKey::Neutral,
            4 => LocalizationKey::Satisfied,
            _ => LocalizationKey::VerySatisfied,
        }
    }
}

impl TryFrom<u8> for FeedbackRating {
    type Error = FeedbackError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FeedbackError::RatingOutOfRange(value))
        }
    }
}

impl From<FeedbackRating> for u8 {
    fn from(rating: FeedbackRating) -> Self {
        rating.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: FeedbackRating,
    pub comment: Option<String>,
    pub submitted_at: NaiveDateTime,
}

impl Feedback {
    pub fn new(rating: FeedbackRating, comment: Option<String>, submitted_at: NaiveDateTime) -> Self {
        let comment = comment
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Self {
            rating,
            comment,
            submitted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    pub reason: String,
    pub submitted_at: NaiveDateTime,
}

impl Escalation {
    pub fn new(reason: &str, submitted_at: NaiveDateTime) -> Result<Self, FeedbackError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(FeedbackError::EmptyEscalationReason);
        }
        Ok(Self {
            reason: reason.to_string(),
            submitted_at,
        })
    }
}
