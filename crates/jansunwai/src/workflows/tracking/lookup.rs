use std::sync::Arc;

use tracing::{info, warn};

use super::directory::{ComplaintDirectory, DirectoryError};
use super::domain::ComplaintRecord;
use crate::localization::LocalizationKey;
use crate::workflows::complaint::ComplaintId;

/// Answers "where is my complaint?" for a citizen-supplied identifier.
pub trait TrackingLookup: Send + Sync {
    fn lookup(&self, identifier: &str) -> Result<ComplaintRecord, TrackingError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("a complaint id is required")]
    EmptyIdentifier,
    #[error("no complaint found for {0}")]
    NotFound(String),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl TrackingError {
    /// Message shown to the citizen, when there is one.
    pub const fn message_key(&self) -> Option<LocalizationKey> {
        match self {
            Self::EmptyIdentifier => Some(LocalizationKey::ComplaintIdRequired),
            Self::NotFound(_) => Some(LocalizationKey::ComplaintNotFound),
            Self::Directory(_) => None,
        }
    }
}

fn normalize(identifier: &str) -> Result<&str, TrackingError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        Err(TrackingError::EmptyIdentifier)
    } else {
        Ok(trimmed)
    }
}

/// Prototype tracker: every non-empty id resolves to the same fixed record.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockTrackingLookup;

impl TrackingLookup for MockTrackingLookup {
    fn lookup(&self, identifier: &str) -> Result<ComplaintRecord, TrackingError> {
        let requested = normalize(identifier)?;
        info!(requested, "serving mock complaint record");
        Ok(ComplaintRecord::mock())
    }
}

/// Keyed lookup against a [`ComplaintDirectory`].
pub struct DirectoryTrackingLookup<D> {
    directory: Arc<D>,
}

impl<D> DirectoryTrackingLookup<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

impl<D> TrackingLookup for DirectoryTrackingLookup<D>
where
    D: ComplaintDirectory,
{
    fn lookup(&self, identifier: &str) -> Result<ComplaintRecord, TrackingError> {
        let requested = normalize(identifier)?;
        match self.directory.fetch(&ComplaintId(requested.to_string()))? {
            Some(record) => {
                info!(complaint_id = %record.id, "complaint found");
                Ok(record)
            }
            None => {
                warn!(requested, "complaint not found");
                Err(TrackingError::NotFound(requested.to_string()))
            }
        }
    }
}
