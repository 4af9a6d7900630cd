use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use super::domain::{ComplaintRecord, StatusCounts};
use crate::workflows::complaint::ComplaintId;

/// Persistent store of complaint records keyed by id.
pub trait ComplaintDirectory: Send + Sync {
    /// Inserts a new record; an existing id is a conflict.
    fn register(&self, record: ComplaintRecord) -> Result<(), DirectoryError>;
    /// Replaces an existing record.
    fn update(&self, record: ComplaintRecord) -> Result<(), DirectoryError>;
    fn fetch(&self, id: &ComplaintId) -> Result<Option<ComplaintRecord>, DirectoryError>;
    /// Every record, most recently filed first.
    fn list(&self) -> Result<Vec<ComplaintRecord>, DirectoryError>;

    fn count_by_status(&self) -> Result<StatusCounts, DirectoryError> {
        Ok(StatusCounts::tally(&self.list()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("complaint {0} is already registered")]
    Conflict(ComplaintId),
    #[error("complaint {0} not found")]
    NotFound(ComplaintId),
    #[error("complaint directory unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryComplaintDirectory {
    records: Arc<Mutex<HashMap<ComplaintId, ComplaintRecord>>>,
}

impl InMemoryComplaintDirectory {
    /// Directory pre-filled with imported records. Later duplicates win.
    pub fn seeded(records: impl IntoIterator<Item = ComplaintRecord>) -> Self {
        let records: HashMap<_, _> = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        info!(count = records.len(), "complaint directory seeded");
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ComplaintId, ComplaintRecord>>, DirectoryError>
    {
        self.records
            .lock()
            .map_err(|_| DirectoryError::Unavailable("directory mutex poisoned".to_string()))
    }
}

impl ComplaintDirectory for InMemoryComplaintDirectory {
    fn register(&self, record: ComplaintRecord) -> Result<(), DirectoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.id) {
            return Err(DirectoryError::Conflict(record.id));
        }
        info!(complaint_id = %record.id, "complaint registered");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn update(&self, record: ComplaintRecord) -> Result<(), DirectoryError> {
        let mut guard = self.guard()?;
        match guard.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(DirectoryError::NotFound(record.id)),
        }
    }

    fn fetch(&self, id: &ComplaintId) -> Result<Option<ComplaintRecord>, DirectoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ComplaintRecord>, DirectoryError> {
        let mut records: Vec<_> = self.guard()?.values().cloned().collect();
        records.sort_by(|a, b| b.filed_on.cmp(&a.filed_on).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(records)
    }
}
