use serde::Serialize;
use tracing::{debug, info};

use super::domain::{FormField, FormState};
use super::identifier::{ComplaintId, ComplaintIdGenerator};
use super::otp::{OneTimeCode, OtpVerdict, VerificationSession};
use super::validation::{validate, FieldError, FormProgress, ValidationReport};
use crate::localization::LocalizationKey;

/// Where a submission currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowPhase {
    Editing,
    Validating,
    AwaitingOtpDispatch,
    OtpPending,
    Verifying,
    Succeeded,
    Errored,
}

/// Operation requested of the workflow, used to report illegal transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowAction {
    EditForm,
    Submit,
    CompleteDispatch,
    Fail,
    Tick,
    EnterOtp,
    Verify,
    CompleteVerification,
    Resend,
    Retry,
    Dismiss,
    Acknowledge,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("cannot {action} while the submission is {phase}")]
    InvalidTransition {
        action: WorkflowAction,
        phase: WorkflowPhase,
    },
    #[error("a new OTP can be requested in {remaining} seconds")]
    ResendNotEligible { remaining: u32 },
}

/// Why a submission landed in [`WorkflowPhase::Errored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowFailure {
    OtpDispatch,
    VerificationLocked,
    Registration,
}

impl WorkflowFailure {
    pub const fn message_key(self) -> LocalizationKey {
        match self {
            Self::OtpDispatch => LocalizationKey::OtpDispatchFailed,
            Self::VerificationLocked => LocalizationKey::OtpLocked,
            Self::Registration => LocalizationKey::RegistrationFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Form invalid; errors are now visible and the first invalid field focused.
    Blocked(ValidationReport),
    /// Form valid; an OTP dispatch should start for this complaint.
    Accepted { complaint_id: ComplaintId },
}

/// Observable state for renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSnapshot {
    pub phase: WorkflowPhase,
    pub form: FormState,
    pub validation_armed: bool,
    pub errors: Vec<FieldError>,
    pub focused_field: Option<FormField>,
    pub progress: FormProgress,
    pub complaint_id: Option<ComplaintId>,
    pub otp: Option<OtpSnapshot>,
    pub failure: Option<WorkflowFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpSnapshot {
    pub masked_mobile: String,
    pub entered_code: String,
    pub resend_in: u32,
    pub resend_eligible: bool,
    pub failed_attempts: u32,
    pub error: Option<LocalizationKey>,
}

/// Synchronous state machine behind a complaint submission.
///
/// Timers and simulated network calls live in the async driver; this type
/// only decides which transitions are legal and what state they leave behind.
#[derive(Debug, Clone)]
pub struct SubmissionWorkflow {
    phase: WorkflowPhase,
    form: FormState,
    validation_armed: bool,
    focused_field: Option<FormField>,
    complaint_id: Option<ComplaintId>,
    verification: Option<VerificationSession>,
    otp_error: Option<LocalizationKey>,
    failure: Option<WorkflowFailure>,
    resend_countdown_secs: u32,
}

impl SubmissionWorkflow {
    pub fn new(resend_countdown_secs: u32) -> Self {
        Self {
            phase: WorkflowPhase::Editing,
            form: FormState::default(),
            validation_armed: false,
            focused_field: None,
            complaint_id: None,
            verification: None,
            otp_error: None,
            failure: None,
            resend_countdown_secs,
        }
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn complaint_id(&self) -> Option<&ComplaintId> {
        self.complaint_id.as_ref()
    }

    pub fn verification(&self) -> Option<&VerificationSession> {
        self.verification.as_ref()
    }

    pub fn failure(&self) -> Option<WorkflowFailure> {
        self.failure
    }

    pub fn edit_form(&mut self, edit: impl FnOnce(&mut FormState)) -> Result<(), WorkflowError> {
        self.require(WorkflowAction::EditForm, &[WorkflowPhase::Editing])?;
        edit(&mut self.form);
        Ok(())
    }

    /// Validates the form and, when it passes, reserves a complaint id.
    ///
    /// An id reserved by an earlier submit that was dismissed is reused.
    pub fn submit(
        &mut self,
        ids: &dyn ComplaintIdGenerator,
    ) -> Result<SubmitOutcome, WorkflowError> {
        self.require(WorkflowAction::Submit, &[WorkflowPhase::Editing])?;
        self.transition(WorkflowPhase::Validating);

        self.validation_armed = true;
        let report = validate(&self.form, true);
        if !report.is_valid() {
            self.focused_field = report.first_invalid();
            self.transition(WorkflowPhase::Editing);
            return Ok(SubmitOutcome::Blocked(report));
        }

        self.focused_field = None;
        let complaint_id = match &self.complaint_id {
            Some(existing) => existing.clone(),
            None => self.reissue_complaint_id(ids),
        };
        self.verification = None;
        self.transition(WorkflowPhase::AwaitingOtpDispatch);
        Ok(SubmitOutcome::Accepted { complaint_id })
    }

    /// Reserves a fresh id in place of the current one, which the directory
    /// already holds.
    pub fn reissue_complaint_id(&mut self, ids: &dyn ComplaintIdGenerator) -> ComplaintId {
        let reserved = ids.next_id();
        info!(complaint_id = %reserved, "complaint id reserved");
        self.complaint_id = Some(reserved.clone());
        reserved
    }

    /// The gateway delivered a code: show OTP entry with a fresh countdown.
    pub fn otp_dispatched(&mut self, code: OneTimeCode) -> Result<(), WorkflowError> {
        self.require(
            WorkflowAction::CompleteDispatch,
            &[WorkflowPhase::AwaitingOtpDispatch],
        )?;
        self.verification = Some(VerificationSession::new(
            self.form.mobile_number(),
            code,
            self.resend_countdown_secs,
        ));
        self.otp_error = None;
        self.transition(WorkflowPhase::OtpPending);
        Ok(())
    }

    pub fn fail(&mut self, failure: WorkflowFailure) -> Result<(), WorkflowError> {
        self.require(
            WorkflowAction::Fail,
            &[WorkflowPhase::AwaitingOtpDispatch, WorkflowPhase::Verifying],
        )?;
        self.failure = Some(failure);
        self.transition(WorkflowPhase::Errored);
        Ok(())
    }

    /// One second of the resend countdown. Returns the seconds left.
    pub fn tick(&mut self) -> Result<u32, WorkflowError> {
        let session = self.verification_in(
            WorkflowAction::Tick,
            &[WorkflowPhase::OtpPending, WorkflowPhase::Verifying],
        )?;
        Ok(session.tick())
    }

    pub fn enter_otp(&mut self, raw: &str) -> Result<(), WorkflowError> {
        let session = self.verification_in(WorkflowAction::EnterOtp, &[WorkflowPhase::OtpPending])?;
        session.enter_code(raw);
        self.otp_error = None;
        Ok(())
    }

    pub fn begin_verification(&mut self) -> Result<(), WorkflowError> {
        self.verification_in(WorkflowAction::Verify, &[WorkflowPhase::OtpPending])?;
        self.transition(WorkflowPhase::Verifying);
        Ok(())
    }

    /// Applies the verifier's verdict. A rejected code returns to OTP entry
    /// keeping the entered digits and the running countdown.
    pub fn verification_completed(&mut self, verdict: OtpVerdict) -> Result<(), WorkflowError> {
        let session = self.verification_in(
            WorkflowAction::CompleteVerification,
            &[WorkflowPhase::Verifying],
        )?;

        match verdict {
            OtpVerdict::Accepted => {
                self.transition(WorkflowPhase::Succeeded);
            }
            OtpVerdict::Rejected => {
                session.record_failure();
                self.otp_error = Some(LocalizationKey::InvalidOtp);
                self.transition(WorkflowPhase::OtpPending);
            }
            OtpVerdict::LockedOut => {
                session.record_failure();
                self.failure = Some(WorkflowFailure::VerificationLocked);
                self.transition(WorkflowPhase::Errored);
            }
        }
        Ok(())
    }

    /// Restarts OTP dispatch once the countdown has run out.
    pub fn resend(&mut self) -> Result<(), WorkflowError> {
        let session = self.verification_in(WorkflowAction::Resend, &[WorkflowPhase::OtpPending])?;
        let countdown = session.countdown();
        if !countdown.is_resend_eligible() {
            return Err(WorkflowError::ResendNotEligible {
                remaining: countdown.remaining(),
            });
        }

        self.verification = None;
        self.otp_error = None;
        self.transition(WorkflowPhase::AwaitingOtpDispatch);
        Ok(())
    }

    pub fn retry(&mut self) -> Result<(), WorkflowError> {
        self.require(WorkflowAction::Retry, &[WorkflowPhase::Errored])?;
        self.failure = None;
        self.verification = None;
        self.otp_error = None;
        self.transition(WorkflowPhase::AwaitingOtpDispatch);
        Ok(())
    }

    /// Backs out of the OTP step to the form. The reserved id is kept.
    pub fn dismiss_verification(&mut self) -> Result<(), WorkflowError> {
        self.require(
            WorkflowAction::Dismiss,
            &[
                WorkflowPhase::AwaitingOtpDispatch,
                WorkflowPhase::OtpPending,
                WorkflowPhase::Verifying,
                WorkflowPhase::Errored,
            ],
        )?;
        self.verification = None;
        self.otp_error = None;
        self.failure = None;
        self.transition(WorkflowPhase::Editing);
        Ok(())
    }

    /// Abandons the submission from any phase and releases the reserved id.
    pub fn cancel(&mut self) {
        if let Some(id) = &self.complaint_id {
            debug!(complaint_id = %id, "reserved complaint id released");
        }
        self.reset();
    }

    pub fn acknowledge(&mut self) -> Result<(), WorkflowError> {
        self.require(WorkflowAction::Acknowledge, &[WorkflowPhase::Succeeded])?;
        self.reset();
        Ok(())
    }

    pub fn validation(&self) -> ValidationReport {
        validate(&self.form, self.validation_armed)
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let report = self.validation();
        WorkflowSnapshot {
            phase: self.phase,
            form: self.form.clone(),
            validation_armed: self.validation_armed,
            errors: report.visible_errors().to_vec(),
            focused_field: self.focused_field,
            progress: FormProgress::of(&self.form),
            complaint_id: self.complaint_id.clone(),
            otp: self.verification.as_ref().map(|session| OtpSnapshot {
                masked_mobile: session.masked_mobile(),
                entered_code: session.entered_code().to_string(),
                resend_in: session.countdown().remaining(),
                resend_eligible: session.countdown().is_resend_eligible(),
                failed_attempts: session.failed_attempts(),
                error: self.otp_error,
            }),
            failure: self.failure,
        }
    }

    fn reset(&mut self) {
        let resend_countdown_secs = self.resend_countdown_secs;
        let from = self.phase;
        *self = Self::new(resend_countdown_secs);
        debug!(%from, to = %self.phase, "submission reset");
    }

    fn require(
        &self,
        action: WorkflowAction,
        allowed: &[WorkflowPhase],
    ) -> Result<(), WorkflowError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    fn verification_in(
        &mut self,
        action: WorkflowAction,
        allowed: &[WorkflowPhase],
    ) -> Result<&mut VerificationSession, WorkflowError> {
        self.require(action, allowed)?;
        let phase = self.phase;
        self.verification
            .as_mut()
            .ok_or(WorkflowError::InvalidTransition { action, phase })
    }

    fn transition(&mut self, to: WorkflowPhase) {
        debug!(from = %self.phase, %to, "submission phase changed");
        self.phase = to;
    }
}
