use std::sync::Arc;

use chrono::Local;
use tracing::info;

use super::directory::{ComplaintDirectory, DirectoryError};
use super::domain::{
    ComplaintFilter, ComplaintRecord, Escalation, Feedback, FeedbackError, FeedbackRating,
    StatusCounts,
};
use super::lookup::{DirectoryTrackingLookup, MockTrackingLookup, TrackingError, TrackingLookup};
use crate::config::TrackingMode;
use crate::localization::LocalizationStore;

/// Filtered complaint list with the totals for every filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintDashboard {
    pub filter: ComplaintFilter,
    pub counts: StatusCounts,
    pub complaints: Vec<ComplaintRecord>,
}

/// Complaint tracking plus the follow-up actions a citizen can take on a
/// tracked complaint.
pub struct TrackingService<D> {
    lookup: Arc<dyn TrackingLookup>,
    directory: Arc<D>,
    localization: Arc<LocalizationStore>,
}

impl<D> TrackingService<D>
where
    D: ComplaintDirectory + 'static,
{
    pub fn new(mode: TrackingMode, directory: Arc<D>, localization: Arc<LocalizationStore>) -> Self {
        let lookup: Arc<dyn TrackingLookup> = match mode {
            TrackingMode::Mock => Arc::new(MockTrackingLookup),
            TrackingMode::Directory => Arc::new(DirectoryTrackingLookup::new(directory.clone())),
        };
        Self::with_lookup(lookup, directory, localization)
    }

    pub fn with_lookup(
        lookup: Arc<dyn TrackingLookup>,
        directory: Arc<D>,
        localization: Arc<LocalizationStore>,
    ) -> Self {
        Self {
            lookup,
            directory,
            localization,
        }
    }

    pub fn localization(&self) -> &LocalizationStore {
        &self.localization
    }

    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    pub fn track(&self, identifier: &str) -> Result<ComplaintRecord, TrackingServiceError> {
        Ok(self.lookup.lookup(identifier)?)
    }

    pub fn dashboard(
        &self,
        filter: ComplaintFilter,
    ) -> Result<ComplaintDashboard, TrackingServiceError> {
        let records = self.directory.list()?;
        let counts = StatusCounts::tally(&records);
        let complaints: Vec<_> = records
            .into_iter()
            .filter(|record| filter.matches(record.status()))
            .collect();
        info!(?filter, shown = complaints.len(), total = counts.total, "complaint dashboard listed");
        Ok(ComplaintDashboard {
            filter,
            counts,
            complaints,
        })
    }

    pub fn submit_feedback(
        &self,
        identifier: &str,
        rating: u8,
        comment: Option<String>,
    ) -> Result<Feedback, TrackingServiceError> {
        let rating = FeedbackRating::try_from(rating)?;
        let mut record = self.writable_record(identifier)?;
        let feedback = Feedback::new(rating, comment, Local::now().naive_local());
        record.add_feedback(feedback.clone());
        info!(complaint_id = %record.id, rating = rating.value(), "feedback recorded");
        self.store(record)?;
        Ok(feedback)
    }

    pub fn escalate(
        &self,
        identifier: &str,
        reason: &str,
    ) -> Result<Escalation, TrackingServiceError> {
        let escalation = Escalation::new(reason, Local::now().naive_local())?;
        let mut record = self.writable_record(identifier)?;
        record.add_escalation(escalation.clone());
        info!(complaint_id = %record.id, "complaint escalated");
        self.store(record)?;
        Ok(escalation)
    }

    /// Record a follow-up is applied to. A copy already in the directory wins
    /// over what the lookup served, so writes against the mock record build
    /// on each other.
    fn writable_record(&self, identifier: &str) -> Result<ComplaintRecord, TrackingServiceError> {
        let record = self.lookup.lookup(identifier)?;
        Ok(self.directory.fetch(&record.id)?.unwrap_or(record))
    }

    /// Writes back a looked-up record. Records served by the mock tracker are
    /// not in the directory yet and get registered on first write.
    fn store(&self, record: ComplaintRecord) -> Result<(), DirectoryError> {
        match self.directory.update(record.clone()) {
            Err(DirectoryError::NotFound(_)) => self.directory.register(record),
            other => other,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrackingServiceError {
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
