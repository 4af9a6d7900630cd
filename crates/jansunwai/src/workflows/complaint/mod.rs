//! Complaint registration: form validation, the submission state machine,
//! OTP verification and the async session that drives them.

pub mod domain;
pub mod identifier;
pub mod otp;
pub mod router;
pub mod service;
pub mod session;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    filter_mobile_input, AdministrativeArea, AdministrativeCatalogue, AdministrativeLevel,
    Coordinate, Department, FormField, FormPatch, FormState, Gender, LocationMethod,
    LocationSelection, RequestType, MOBILE_NUMBER_LENGTH,
};
pub use identifier::{
    ComplaintId, ComplaintIdGenerator, RandomComplaintIdGenerator, DEFAULT_COMPLAINT_ID_PREFIX,
};
pub use otp::{
    IssuedCodeVerifier, OneTimeCode, OtpGateway, OtpGatewayError, OtpPolicy, OtpVerdict,
    OtpVerifier, ResendCountdown, SimulatedOtpGateway, VerificationSession,
    WellFormedCodeVerifier,
};
pub use router::submission_router;
pub use service::ComplaintService;
pub use session::{
    SessionCollaborators, SessionError, SessionId, SubmissionSession, TaskScope, WorkflowTiming,
};
pub use validation::{
    is_valid_email, is_valid_mobile_number, is_well_formed_otp, validate, FieldError,
    FormProgress, ValidationReport, OTP_LENGTH,
};
pub use workflow::{
    OtpSnapshot, SubmissionWorkflow, SubmitOutcome, WorkflowAction, WorkflowError,
    WorkflowFailure, WorkflowPhase, WorkflowSnapshot,
};
