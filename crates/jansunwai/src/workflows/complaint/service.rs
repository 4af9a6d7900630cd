use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use super::identifier::{ComplaintIdGenerator, RandomComplaintIdGenerator};
use super::otp::{OtpGateway, OtpVerifier, SimulatedOtpGateway};
use super::session::{SessionCollaborators, SessionError, SessionId, SubmissionSession, WorkflowTiming};
use crate::config::WorkflowConfig;
use crate::localization::LocalizationStore;
use crate::workflows::tracking::ComplaintDirectory;

/// Registry of open submission sessions and the collaborators they share.
pub struct ComplaintService<D> {
    directory: Arc<D>,
    localization: Arc<LocalizationStore>,
    ids: Arc<dyn ComplaintIdGenerator>,
    gateway: Arc<dyn OtpGateway>,
    verifier: Arc<dyn OtpVerifier>,
    timing: WorkflowTiming,
    sessions: Mutex<HashMap<SessionId, Arc<SubmissionSession>>>,
}

impl<D> ComplaintService<D>
where
    D: ComplaintDirectory + 'static,
{
    pub fn new(
        directory: Arc<D>,
        localization: Arc<LocalizationStore>,
        config: &WorkflowConfig,
    ) -> Self {
        Self::with_collaborators(
            directory,
            localization,
            Arc::new(RandomComplaintIdGenerator::new(
                config.complaint_id_prefix.clone(),
            )),
            Arc::new(SimulatedOtpGateway),
            config.otp_policy.verifier(),
            config.timing,
        )
    }

    pub fn with_collaborators(
        directory: Arc<D>,
        localization: Arc<LocalizationStore>,
        ids: Arc<dyn ComplaintIdGenerator>,
        gateway: Arc<dyn OtpGateway>,
        verifier: Arc<dyn OtpVerifier>,
        timing: WorkflowTiming,
    ) -> Self {
        Self {
            directory,
            localization,
            ids,
            gateway,
            verifier,
            timing,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn localization(&self) -> &LocalizationStore {
        &self.localization
    }

    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    /// Starts a fresh submission with an empty form.
    pub fn open(&self) -> Arc<SubmissionSession> {
        let directory: Arc<dyn ComplaintDirectory> = self.directory.clone();
        let session = Arc::new(SubmissionSession::open(
            SessionCollaborators {
                ids: self.ids.clone(),
                gateway: self.gateway.clone(),
                verifier: self.verifier.clone(),
                directory,
            },
            self.timing,
        ));
        let open = {
            let mut sessions = self.sessions();
            sessions.insert(session.id().clone(), session.clone());
            sessions.len()
        };
        info!(session = %session.id(), open, "submission session opened");
        session
    }

    pub fn session(&self, id: &SessionId) -> Result<Arc<SubmissionSession>, SessionError> {
        self.sessions()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))
    }

    /// Removes the session and cancels everything it still has running.
    pub fn close(&self, id: &SessionId) -> Result<(), SessionError> {
        let session = self
            .sessions()
            .remove(id)
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))?;
        session.shutdown();
        Ok(())
    }

    /// Closes out a registered submission. The session leaves the registry
    /// once the citizen has seen the confirmation.
    pub fn acknowledge(&self, id: &SessionId) -> Result<Arc<SubmissionSession>, SessionError> {
        let session = self.session(id)?;
        session.acknowledge()?;
        self.evict(&session, "acknowledged");
        Ok(session)
    }

    /// Abandons a submission from any phase and forgets the session.
    pub fn cancel(&self, id: &SessionId) -> Result<Arc<SubmissionSession>, SessionError> {
        let session = self.session(id)?;
        session.cancel();
        self.evict(&session, "cancelled");
        Ok(session)
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions().len()
    }

    fn evict(&self, session: &SubmissionSession, reason: &'static str) {
        let open = {
            let mut sessions = self.sessions();
            sessions.remove(session.id());
            sessions.len()
        };
        session.shutdown();
        info!(session = %session.id(), reason, open, "submission session finished");
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<SubmissionSession>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
