use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::domain::{FormPatch, FormState};
use super::identifier::ComplaintIdGenerator;
use super::otp::{OtpGateway, OtpVerdict, OtpVerifier};
use super::workflow::{
    SubmissionWorkflow, SubmitOutcome, WorkflowError, WorkflowFailure, WorkflowPhase,
    WorkflowSnapshot,
};
use crate::telemetry::mask_mobile;
use crate::workflows::tracking::{ComplaintDirectory, ComplaintRecord, DirectoryError};

/// Simulated latencies and the resend cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTiming {
    pub dispatch_delay: Duration,
    pub verification_delay: Duration,
    pub tick_interval: Duration,
    pub resend_countdown_secs: u32,
}

impl Default for WorkflowTiming {
    fn default() -> Self {
        Self {
            dispatch_delay: Duration::from_millis(1500),
            verification_delay: Duration::from_millis(1500),
            tick_interval: Duration::from_secs(1),
            resend_countdown_secs: 30,
        }
    }
}

/// Fresh ids tried before a colliding registration is reported as failed.
const REGISTRATION_ATTEMPTS: usize = 5;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Group of background tasks that live and die together.
///
/// Cancelling the scope, or dropping it, stops every task it spawned and
/// every task of scopes derived from it with [`child`](Self::child).
#[derive(Debug)]
pub struct TaskScope {
    token: CancellationToken,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn child(&self) -> Self {
        Self::with_token(self.token.child_token())
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = task => {}
            }
        });

        let mut handles = lock(&self.handles);
        handles.retain(|handle| !handle.is_finished());
        handles.push(handle);
    }

    pub fn cancel(&self) {
        self.token.cancel();
        let mut handles = lock(&self.handles);
        if !handles.is_empty() {
            debug!(tasks = handles.len(), "cancelling scoped tasks");
        }
        for handle in handles.drain(..) {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn active_tasks(&self) -> usize {
        let mut handles = lock(&self.handles);
        handles.retain(|handle| !handle.is_finished());
        handles.len()
    }
}

impl Default for TaskScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("sub-{id:06}"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("submission session {0} not found")]
    UnknownSession(SessionId),
}

/// Services a submission calls out to.
#[derive(Clone)]
pub struct SessionCollaborators {
    pub ids: Arc<dyn ComplaintIdGenerator>,
    pub gateway: Arc<dyn OtpGateway>,
    pub verifier: Arc<dyn OtpVerifier>,
    pub directory: Arc<dyn ComplaintDirectory>,
}

struct SessionShared {
    workflow: Mutex<SubmissionWorkflow>,
    snapshots: watch::Sender<WorkflowSnapshot>,
    collaborators: SessionCollaborators,
    timing: WorkflowTiming,
}

impl SessionShared {
    /// Runs `change` under the workflow lock and publishes the resulting
    /// snapshot if anything observable moved.
    fn with_workflow<T>(&self, change: impl FnOnce(&mut SubmissionWorkflow) -> T) -> T {
        let mut workflow = lock(&self.workflow);
        let output = change(&mut workflow);
        let next = workflow.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        output
    }

    async fn run_dispatch(self: Arc<Self>) {
        time::sleep(self.timing.dispatch_delay).await;

        let dispatched = self.with_workflow(|workflow| {
            if workflow.phase() != WorkflowPhase::AwaitingOtpDispatch {
                return false;
            }
            let mobile = workflow.form().mobile_number().to_string();
            match self.collaborators.gateway.dispatch(&mobile) {
                Ok(code) => {
                    info!(mobile = %mask_mobile(&mobile), "otp dispatched");
                    settle(workflow.otp_dispatched(code))
                }
                Err(error) => {
                    warn!(%error, mobile = %mask_mobile(&mobile), "otp dispatch failed");
                    settle(workflow.fail(WorkflowFailure::OtpDispatch));
                    false
                }
            }
        });

        if dispatched {
            self.run_countdown().await;
        }
    }

    /// Ticks the resend countdown once per interval until it reaches zero or
    /// the workflow leaves the OTP step.
    async fn run_countdown(&self) {
        let period = self.timing.tick_interval.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.with_workflow(SubmissionWorkflow::tick) {
                Ok(0) => {
                    debug!("otp resend available");
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    }

    async fn run_verification(self: Arc<Self>) {
        time::sleep(self.timing.verification_delay).await;

        self.with_workflow(|workflow| {
            let Some(session) = workflow.verification() else {
                return;
            };
            if workflow.phase() != WorkflowPhase::Verifying {
                return;
            }

            let verdict = self.collaborators.verifier.verify(session);
            info!(?verdict, attempts = session.failed_attempts(), "otp verification finished");

            if verdict == OtpVerdict::Accepted && !self.register_complaint(workflow) {
                settle(workflow.fail(WorkflowFailure::Registration));
                return;
            }

            settle(workflow.verification_completed(verdict));
        });
    }

    /// Files the verified complaint in the directory. An id that is already
    /// taken is swapped for a fresh one before the next attempt, so a retry
    /// never reuses a known conflict.
    fn register_complaint(&self, workflow: &mut SubmissionWorkflow) -> bool {
        for attempt in 1..=REGISTRATION_ATTEMPTS {
            let Some(id) = workflow.complaint_id().cloned() else {
                return false;
            };
            let record =
                ComplaintRecord::registered(id.clone(), workflow.form(), Local::now().naive_local());
            match self.collaborators.directory.register(record) {
                Ok(()) => return true,
                Err(DirectoryError::Conflict(taken)) => {
                    let fresh = workflow.reissue_complaint_id(self.collaborators.ids.as_ref());
                    warn!(%taken, %fresh, attempt, "complaint id already registered");
                }
                Err(error) => {
                    warn!(%error, complaint_id = %id, "complaint registration failed");
                    return false;
                }
            }
        }
        false
    }
}

/// Background transitions race user actions; losing the race is expected.
fn settle(result: Result<(), WorkflowError>) -> bool {
    match result {
        Ok(()) => true,
        Err(error) => {
            debug!(%error, "background transition skipped");
            false
        }
    }
}

/// Async driver around one [`SubmissionWorkflow`].
///
/// Simulated network delays and the resend countdown run as tasks in a
/// per-dispatch scope. Starting a new dispatch, dismissing the OTP step,
/// cancelling, acknowledging and dropping the session all cancel that scope.
pub struct SubmissionSession {
    id: SessionId,
    shared: Arc<SessionShared>,
    scope: TaskScope,
    dispatch: Mutex<Option<TaskScope>>,
}

impl SubmissionSession {
    pub fn open(collaborators: SessionCollaborators, timing: WorkflowTiming) -> Self {
        let workflow = SubmissionWorkflow::new(timing.resend_countdown_secs);
        let (snapshots, _) = watch::channel(workflow.snapshot());
        let id = next_session_id();
        debug!(session = %id, resend_secs = timing.resend_countdown_secs, "submission workflow created");

        Self {
            id,
            shared: Arc::new(SessionShared {
                workflow: Mutex::new(workflow),
                snapshots,
                collaborators,
                timing,
            }),
            scope: TaskScope::new(),
            dispatch: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.shared.snapshots.subscribe()
    }

    pub fn edit_form(&self, edit: impl FnOnce(&mut FormState)) -> Result<(), SessionError> {
        self.shared
            .with_workflow(|workflow| workflow.edit_form(edit))?;
        Ok(())
    }

    pub fn apply(&self, patch: FormPatch) -> Result<(), SessionError> {
        self.edit_form(|form| patch.apply(form))
    }

    pub fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        let ids = self.shared.collaborators.ids.clone();
        let outcome = self
            .shared
            .with_workflow(|workflow| workflow.submit(ids.as_ref()))?;
        if matches!(outcome, SubmitOutcome::Accepted { .. }) {
            self.start_dispatch();
        }
        Ok(outcome)
    }

    pub fn enter_otp(&self, raw: &str) -> Result<(), SessionError> {
        self.shared
            .with_workflow(|workflow| workflow.enter_otp(raw))?;
        Ok(())
    }

    pub fn verify(&self) -> Result<(), SessionError> {
        self.shared
            .with_workflow(SubmissionWorkflow::begin_verification)?;
        let shared = self.shared.clone();
        self.spawn_in_dispatch(shared.run_verification());
        Ok(())
    }

    pub fn resend(&self) -> Result<(), SessionError> {
        self.shared.with_workflow(SubmissionWorkflow::resend)?;
        self.start_dispatch();
        Ok(())
    }

    pub fn retry(&self) -> Result<(), SessionError> {
        self.shared.with_workflow(SubmissionWorkflow::retry)?;
        self.start_dispatch();
        Ok(())
    }

    pub fn dismiss(&self) -> Result<(), SessionError> {
        self.shared
            .with_workflow(SubmissionWorkflow::dismiss_verification)?;
        self.stop_dispatch();
        Ok(())
    }

    pub fn cancel(&self) {
        self.stop_dispatch();
        self.shared.with_workflow(SubmissionWorkflow::cancel);
    }

    pub fn acknowledge(&self) -> Result<(), SessionError> {
        self.shared
            .with_workflow(SubmissionWorkflow::acknowledge)?;
        self.stop_dispatch();
        Ok(())
    }

    /// Resolves once the published snapshot reaches `phase`.
    pub async fn wait_for_phase(&self, phase: WorkflowPhase) -> WorkflowSnapshot {
        let mut receiver = self.subscribe();
        let reached = match receiver.wait_for(|snapshot| snapshot.phase == phase).await {
            Ok(snapshot) => (*snapshot).clone(),
            Err(_) => self.snapshot(),
        };
        reached
    }

    pub fn active_tasks(&self) -> usize {
        lock(&self.dispatch)
            .as_ref()
            .map_or(0, TaskScope::active_tasks)
    }

    /// Cancels every task the session started.
    pub fn shutdown(&self) {
        self.stop_dispatch();
        self.scope.cancel();
        debug!(session = %self.id, "submission session closed");
    }

    fn start_dispatch(&self) {
        let scope = self.scope.child();
        scope.spawn(self.shared.clone().run_dispatch());
        let previous = lock(&self.dispatch).replace(scope);
        drop(previous);
    }

    fn spawn_in_dispatch<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut dispatch = lock(&self.dispatch);
        dispatch.get_or_insert_with(|| self.scope.child()).spawn(task);
    }

    fn stop_dispatch(&self) {
        let previous = lock(&self.dispatch).take();
        drop(previous);
    }
}

impl Drop for SubmissionSession {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

impl fmt::Debug for SubmissionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionSession")
            .field("id", &self.id)
            .field("phase", &self.snapshot().phase)
            .finish_non_exhaustive()
    }
}
