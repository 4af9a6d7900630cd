use std::fmt;
use std::sync::Arc;

use rand::Rng;

use super::validation::{is_well_formed_otp, OTP_LENGTH};
use crate::telemetry::mask_mobile;

/// Cooldown before another OTP may be requested.
///
/// Each tick removes exactly one second and the value never goes below zero,
/// so resend only becomes available once the countdown has passed through
/// every intermediate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResendCountdown {
    initial: u32,
    remaining: u32,
}

impl ResendCountdown {
    pub fn new(initial: u32) -> Self {
        Self {
            initial,
            remaining: initial,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn is_resend_eligible(&self) -> bool {
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = self.initial;
    }
}

/// Code issued by an [`OtpGateway`]. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, entered: &str) -> bool {
        self.0 == entered
    }
}

impl fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeCode(******)")
    }
}

/// State of the OTP step for one dispatched code.
#[derive(Debug, Clone)]
pub struct VerificationSession {
    mobile_number: String,
    issued: OneTimeCode,
    entered: String,
    countdown: ResendCountdown,
    failed_attempts: u32,
}

impl VerificationSession {
    pub fn new(mobile_number: impl Into<String>, issued: OneTimeCode, resend_secs: u32) -> Self {
        Self {
            mobile_number: mobile_number.into(),
            issued,
            entered: String::new(),
            countdown: ResendCountdown::new(resend_secs),
            failed_attempts: 0,
        }
    }

    pub fn masked_mobile(&self) -> String {
        mask_mobile(&self.mobile_number)
    }

    pub fn issued_code(&self) -> &OneTimeCode {
        &self.issued
    }

    pub fn entered_code(&self) -> &str {
        &self.entered
    }

    /// Replaces the entered code, keeping only ASCII digits up to the OTP length.
    pub fn enter_code(&mut self, raw: &str) {
        self.entered = raw
            .chars()
            .filter(char::is_ascii_digit)
            .take(OTP_LENGTH)
            .collect();
    }

    pub fn countdown(&self) -> &ResendCountdown {
        &self.countdown
    }

    pub fn tick(&mut self) -> u32 {
        self.countdown.tick()
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub(crate) fn record_failure(&mut self) -> u32 {
        self.failed_attempts += 1;
        self.failed_attempts
    }
}

/// Delivers a fresh code to the citizen's phone.
pub trait OtpGateway: Send + Sync {
    fn dispatch(&self, mobile_number: &str) -> Result<OneTimeCode, OtpGatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OtpGatewayError {
    #[error("otp gateway unavailable: {0}")]
    Unavailable(String),
    #[error("otp gateway rejected mobile number {0}")]
    Rejected(String),
}

/// Gateway that only generates a random six digit code. Nothing is sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedOtpGateway;

impl OtpGateway for SimulatedOtpGateway {
    fn dispatch(&self, _mobile_number: &str) -> Result<OneTimeCode, OtpGatewayError> {
        let value = rand::thread_rng().gen_range(0..1_000_000u32);
        Ok(OneTimeCode::new(format!("{value:06}")))
    }
}

/// Result of checking an entered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerdict {
    Accepted,
    Rejected,
    LockedOut,
}

pub trait OtpVerifier: Send + Sync {
    fn verify(&self, session: &VerificationSession) -> OtpVerdict;
}

/// Accepts any six ASCII digits without looking at the issued code.
#[derive(Debug, Default, Clone, Copy)]
pub struct WellFormedCodeVerifier;

impl OtpVerifier for WellFormedCodeVerifier {
    fn verify(&self, session: &VerificationSession) -> OtpVerdict {
        if is_well_formed_otp(session.entered_code()) {
            OtpVerdict::Accepted
        } else {
            OtpVerdict::Rejected
        }
    }
}

/// Compares against the issued code and locks the session after
/// `max_attempts` wrong entries.
#[derive(Debug, Clone, Copy)]
pub struct IssuedCodeVerifier {
    max_attempts: u32,
}

impl IssuedCodeVerifier {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

impl OtpVerifier for IssuedCodeVerifier {
    fn verify(&self, session: &VerificationSession) -> OtpVerdict {
        if session.issued_code().matches(session.entered_code()) {
            OtpVerdict::Accepted
        } else if session.failed_attempts() + 1 >= self.max_attempts {
            OtpVerdict::LockedOut
        } else {
            OtpVerdict::Rejected
        }
    }
}

/// How entered codes are judged, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPolicy {
    WellFormed,
    Issued { max_attempts: u32 },
}

impl OtpPolicy {
    pub fn verifier(&self) -> Arc<dyn OtpVerifier> {
        match *self {
            Self::WellFormed => Arc::new(WellFormedCodeVerifier),
            Self::Issued { max_attempts } => Arc::new(IssuedCodeVerifier::new(max_attempts)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(issued: &str) -> VerificationSession {
        VerificationSession::new("9876543210", OneTimeCode::new(issued), 30)
    }

    #[test]
    fn countdown_reaches_eligibility_after_exact_ticks() {
        let mut countdown = ResendCountdown::new(30);
        for expected in (0..30).rev() {
            assert!(!countdown.is_resend_eligible());
            assert_eq!(countdown.tick(), expected);
        }
        assert!(countdown.is_resend_eligible());
        assert_eq!(countdown.tick(), 0);
        assert!(countdown.is_resend_eligible());

        countdown.reset();
        assert_eq!(countdown.remaining(), 30);
        assert!(!countdown.is_resend_eligible());
    }

    #[test]
    fn entered_code_keeps_six_digits() {
        let mut session = session("123456");
        session.enter_code("12a3-4567 89");
        assert_eq!(session.entered_code(), "123456");
        assert_eq!(session.masked_mobile(), "******3210");
    }

    #[test]
    fn issued_code_never_shows_in_debug() {
        let rendered = format!("{:?}", session("424242"));
        assert!(!rendered.contains("424242"));
    }

    #[test]
    fn simulated_gateway_issues_six_digits() {
        let code = SimulatedOtpGateway
            .dispatch("9876543210")
            .expect("simulated dispatch");
        assert!(is_well_formed_otp(code.as_str()));
    }

    #[test]
    fn well_formed_verifier_ignores_issued_code() {
        let mut session = session("111111");
        session.enter_code("123456");
        assert_eq!(WellFormedCodeVerifier.verify(&session), OtpVerdict::Accepted);
        session.enter_code("123");
        assert_eq!(WellFormedCodeVerifier.verify(&session), OtpVerdict::Rejected);
    }

    #[test]
    fn issued_verifier_locks_out_after_max_attempts() {
        let verifier = IssuedCodeVerifier::new(2);
        let mut session = session("654321");

        session.enter_code("000000");
        assert_eq!(verifier.verify(&session), OtpVerdict::Rejected);
        session.record_failure();
        assert_eq!(verifier.verify(&session), OtpVerdict::LockedOut);

        session.enter_code("654321");
        assert_eq!(verifier.verify(&session), OtpVerdict::Accepted);
    }
}
