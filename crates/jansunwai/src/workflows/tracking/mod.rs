//! Complaint tracking: lookup by id, the status timeline, feedback and
//! escalation, and seeding the directory from a CSV ledger.

pub mod directory;
pub mod domain;
pub mod import;
pub mod lookup;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use directory::{ComplaintDirectory, DirectoryError, InMemoryComplaintDirectory};
pub use domain::{
    ComplaintFilter, ComplaintRecord, ComplaintStatus, Escalation, Feedback, FeedbackError,
    FeedbackRating, RecordError, StatusCounts, StatusUpdate, MOCK_COMPLAINT_ID,
};
pub use import::{ComplaintLedgerImporter, LedgerImportError};
pub use lookup::{DirectoryTrackingLookup, MockTrackingLookup, TrackingError, TrackingLookup};
pub use router::tracking_router;
pub use service::{ComplaintDashboard, TrackingService, TrackingServiceError};
