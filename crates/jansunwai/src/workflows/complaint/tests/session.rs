use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};

use super::common::{
    directory_holding_reserved_id, valid_form, CollidingIds, FixedGateway, Harness,
    OfflineGateway, UnavailableDirectory, FRESH_ID, RESERVED_ID,
};
use crate::workflows::complaint::{
    ComplaintId, IssuedCodeVerifier, SessionCollaborators, SessionError, SubmissionSession,
    SubmitOutcome, WellFormedCodeVerifier, WorkflowError, WorkflowFailure, WorkflowPhase,
    WorkflowSnapshot, WorkflowTiming,
};
use crate::workflows::tracking::{ComplaintDirectory, ComplaintStatus};

async fn pending_session(harness: &Harness) -> SubmissionSession {
    let session = harness.session();
    session.edit_form(|form| *form = valid_form()).expect("edit");
    session.submit().expect("submit");
    session.wait_for_phase(WorkflowPhase::OtpPending).await;
    session
}

async fn wait_until_resend_eligible(session: &SubmissionSession) {
    let mut receiver = session.subscribe();
    receiver
        .wait_for(|snapshot| {
            snapshot
                .otp
                .as_ref()
                .is_some_and(|otp| otp.resend_eligible)
        })
        .await
        .expect("session alive");
}

async fn verify_code(session: &SubmissionSession, code: &str) -> WorkflowSnapshot {
    session.enter_otp(code).expect("enter");
    session.verify().expect("verify");
    let mut receiver = session.subscribe();
    let settled = match receiver
        .wait_for(|snapshot| snapshot.phase != WorkflowPhase::Verifying)
        .await
    {
        Ok(snapshot) => (*snapshot).clone(),
        Err(_) => session.snapshot(),
    };
    settled
}

#[tokio::test(start_paused = true)]
async fn otp_dispatch_completes_after_simulated_delay() {
    let harness = Harness::new();
    let session = harness.session();
    session.edit_form(|form| *form = valid_form()).expect("edit");

    let started = Instant::now();
    let outcome = session.submit().expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    assert_eq!(session.snapshot().phase, WorkflowPhase::AwaitingOtpDispatch);

    let snapshot = session.wait_for_phase(WorkflowPhase::OtpPending).await;
    assert_eq!(started.elapsed(), Duration::from_millis(1500));
    assert_eq!(snapshot.otp.expect("otp snapshot").resend_in, 30);
}

#[tokio::test(start_paused = true)]
async fn blocked_submit_starts_no_tasks() {
    let harness = Harness::new();
    let session = harness.session();

    let outcome = session.submit().expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
    assert_eq!(session.active_tasks(), 0);
    assert_eq!(session.snapshot().phase, WorkflowPhase::Editing);
}

#[tokio::test(start_paused = true)]
async fn resend_unlocks_after_thirty_seconds() {
    let harness = Harness::new();
    let session = pending_session(&harness).await;

    let started = Instant::now();
    wait_until_resend_eligible(&session).await;
    assert_eq!(started.elapsed(), Duration::from_secs(30));

    session.resend().expect("resend");
    assert_eq!(session.snapshot().phase, WorkflowPhase::AwaitingOtpDispatch);
    let snapshot = session.wait_for_phase(WorkflowPhase::OtpPending).await;
    assert_eq!(snapshot.otp.expect("otp snapshot").resend_in, 30);
}

#[tokio::test(start_paused = true)]
async fn early_resend_is_refused() {
    let harness = Harness::new();
    let session = pending_session(&harness).await;

    time::sleep(Duration::from_millis(10_500)).await;
    let error = session.resend().expect_err("countdown still running");
    assert_eq!(
        error,
        SessionError::Workflow(WorkflowError::ResendNotEligible { remaining: 20 })
    );
}

#[tokio::test(start_paused = true)]
async fn verified_submission_is_registered() {
    let harness = Harness::new();
    let session = pending_session(&harness).await;

    session.enter_otp("123456").expect("enter");
    session.verify().expect("verify");
    assert_eq!(session.snapshot().phase, WorkflowPhase::Verifying);

    let snapshot = session.wait_for_phase(WorkflowPhase::Succeeded).await;
    assert_eq!(
        snapshot.complaint_id,
        Some(ComplaintId(RESERVED_ID.to_string()))
    );

    let record = harness
        .directory
        .fetch(&ComplaintId(RESERVED_ID.to_string()))
        .expect("directory reachable")
        .expect("registered complaint");
    assert_eq!(record.status(), ComplaintStatus::Registered);
    assert_eq!(record.subject, "Leak");
}

#[tokio::test(start_paused = true)]
async fn wrong_code_returns_to_otp_entry() {
    let harness = Harness::new();
    let session = SubmissionSession::open(
        harness.collaborators(Arc::new(FixedGateway), Arc::new(IssuedCodeVerifier::new(3))),
        WorkflowTiming::default(),
    );
    session.edit_form(|form| *form = valid_form()).expect("edit");
    session.submit().expect("submit");
    session.wait_for_phase(WorkflowPhase::OtpPending).await;

    session.enter_otp("000000").expect("enter");
    session.verify().expect("verify");
    session.wait_for_phase(WorkflowPhase::Verifying).await;
    let snapshot = session.wait_for_phase(WorkflowPhase::OtpPending).await;

    let otp = snapshot.otp.expect("otp snapshot");
    assert_eq!(otp.failed_attempts, 1);
    assert!(otp.error.is_some());
    assert!(harness.directory.is_empty());
}

#[tokio::test(start_paused = true)]
async fn dispatch_failure_can_be_retried() {
    let harness = Harness::new();
    let session = SubmissionSession::open(
        harness.collaborators(Arc::new(OfflineGateway), Arc::new(WellFormedCodeVerifier)),
        WorkflowTiming::default(),
    );
    session.edit_form(|form| *form = valid_form()).expect("edit");
    session.submit().expect("submit");

    let snapshot = session.wait_for_phase(WorkflowPhase::Errored).await;
    assert_eq!(snapshot.failure, Some(WorkflowFailure::OtpDispatch));

    session.retry().expect("retry");
    assert_eq!(session.snapshot().phase, WorkflowPhase::AwaitingOtpDispatch);
    let snapshot = session.wait_for_phase(WorkflowPhase::Errored).await;
    assert_eq!(snapshot.complaint_id, Some(ComplaintId(RESERVED_ID.to_string())));
}

#[tokio::test(start_paused = true)]
async fn registration_failure_is_reported() {
    let harness = Harness::new();
    let session = SubmissionSession::open(
        SessionCollaborators {
            ids: harness.ids.clone(),
            gateway: Arc::new(FixedGateway),
            verifier: Arc::new(WellFormedCodeVerifier),
            directory: Arc::new(UnavailableDirectory),
        },
        WorkflowTiming::default(),
    );
    session.edit_form(|form| *form = valid_form()).expect("edit");
    session.submit().expect("submit");
    session.wait_for_phase(WorkflowPhase::OtpPending).await;

    session.enter_otp("123456").expect("enter");
    session.verify().expect("verify");
    let snapshot = session.wait_for_phase(WorkflowPhase::Errored).await;
    assert_eq!(snapshot.failure, Some(WorkflowFailure::Registration));
}

#[tokio::test(start_paused = true)]
async fn dismiss_stops_the_countdown() {
    let harness = Harness::new();
    let session = pending_session(&harness).await;
    assert_eq!(session.active_tasks(), 1);

    session.dismiss().expect("dismiss");
    assert_eq!(session.active_tasks(), 0);

    time::sleep(Duration::from_secs(45)).await;
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, WorkflowPhase::Editing);
    assert!(snapshot.otp.is_none());
    assert!(snapshot.complaint_id.is_some());
}

#[tokio::test(start_paused = true)]
async fn cancel_during_dispatch_discards_the_result() {
    let harness = Harness::new();
    let session = harness.session();
    session.edit_form(|form| *form = valid_form()).expect("edit");
    session.submit().expect("submit");

    time::sleep(Duration::from_millis(500)).await;
    session.cancel();
    time::sleep(Duration::from_secs(5)).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, WorkflowPhase::Editing);
    assert!(snapshot.otp.is_none());
    assert_eq!(snapshot.complaint_id, None);
    assert_eq!(session.active_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn closing_through_the_service_forgets_the_session() {
    let harness = Harness::new();
    let service = harness.service();
    let session = service.open();
    session.edit_form(|form| *form = valid_form()).expect("edit");
    session.submit().expect("submit");
    assert_eq!(service.open_sessions(), 1);

    service.close(session.id()).expect("close");
    assert_eq!(service.open_sessions(), 0);
    assert_eq!(session.active_tasks(), 0);
    assert!(matches!(
        service.session(session.id()),
        Err(SessionError::UnknownSession(_))
    ));
    assert!(service.close(session.id()).is_err());
}

#[tokio::test(start_paused = true)]
async fn taken_complaint_id_is_replaced_at_registration() {
    let directory = directory_holding_reserved_id();
    let ids = Arc::new(CollidingIds::times(1));
    let session = SubmissionSession::open(
        SessionCollaborators {
            ids: ids.clone(),
            gateway: Arc::new(FixedGateway),
            verifier: Arc::new(WellFormedCodeVerifier),
            directory: directory.clone(),
        },
        WorkflowTiming::default(),
    );
    session.edit_form(|form| *form = valid_form()).expect("edit");
    let SubmitOutcome::Accepted { complaint_id } = session.submit().expect("submit") else {
        panic!("valid form should be accepted");
    };
    assert_eq!(complaint_id, ComplaintId(RESERVED_ID.to_string()));
    session.wait_for_phase(WorkflowPhase::OtpPending).await;

    let snapshot = verify_code(&session, "123456").await;
    assert_eq!(snapshot.phase, WorkflowPhase::Succeeded);
    assert_eq!(snapshot.complaint_id, Some(ComplaintId(FRESH_ID.to_string())));
    assert_eq!(ids.calls(), 2);
    assert_eq!(directory.len(), 2);

    let earlier = directory
        .fetch(&ComplaintId(RESERVED_ID.to_string()))
        .expect("directory reachable")
        .expect("earlier complaint kept");
    assert_eq!(earlier.subject, "Earlier complaint");
}

#[tokio::test(start_paused = true)]
async fn retry_after_repeated_collisions_uses_a_new_id() {
    let directory = directory_holding_reserved_id();
    let ids = Arc::new(CollidingIds::stuck());
    let session = SubmissionSession::open(
        SessionCollaborators {
            ids: ids.clone(),
            gateway: Arc::new(FixedGateway),
            verifier: Arc::new(WellFormedCodeVerifier),
            directory: directory.clone(),
        },
        WorkflowTiming::default(),
    );
    session.edit_form(|form| *form = valid_form()).expect("edit");
    session.submit().expect("submit");
    session.wait_for_phase(WorkflowPhase::OtpPending).await;

    let snapshot = verify_code(&session, "123456").await;
    assert_eq!(snapshot.phase, WorkflowPhase::Errored);
    assert_eq!(snapshot.failure, Some(WorkflowFailure::Registration));
    let attempts = ids.calls();
    assert!(attempts > 1, "a conflicting id should be reissued");

    ids.release();
    session.retry().expect("retry");
    session.wait_for_phase(WorkflowPhase::OtpPending).await;
    let snapshot = verify_code(&session, "123456").await;
    assert_eq!(snapshot.phase, WorkflowPhase::Succeeded);
    assert_eq!(snapshot.complaint_id, Some(ComplaintId(FRESH_ID.to_string())));
    assert_eq!(directory.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn rejected_code_keeps_the_countdown_running() {
    let harness = Harness::new();
    let session = SubmissionSession::open(
        harness.collaborators(Arc::new(FixedGateway), Arc::new(IssuedCodeVerifier::new(3))),
        WorkflowTiming::default(),
    );
    session.edit_form(|form| *form = valid_form()).expect("edit");
    session.submit().expect("submit");
    session.wait_for_phase(WorkflowPhase::OtpPending).await;

    time::sleep(Duration::from_millis(5_200)).await;
    let before = session.snapshot().otp.expect("otp snapshot").resend_in;
    assert_eq!(before, 25);

    let snapshot = verify_code(&session, "000000").await;
    assert_eq!(snapshot.phase, WorkflowPhase::OtpPending);
    let otp = snapshot.otp.expect("otp snapshot");
    assert_eq!(otp.failed_attempts, 1);
    assert_eq!(otp.resend_in, 24);

    time::sleep(Duration::from_secs(2)).await;
    let otp = session.snapshot().otp.expect("otp snapshot");
    assert_eq!(otp.resend_in, 22);
    assert!(!otp.resend_eligible);
}

#[tokio::test(start_paused = true)]
async fn acknowledged_and_cancelled_sessions_leave_the_registry() {
    let harness = Harness::new();
    let service = harness.service();

    let finished = service.open();
    finished.edit_form(|form| *form = valid_form()).expect("edit");
    finished.submit().expect("submit");
    finished.wait_for_phase(WorkflowPhase::OtpPending).await;
    let snapshot = verify_code(&finished, "123456").await;
    assert_eq!(snapshot.phase, WorkflowPhase::Succeeded);

    let abandoned = service.open();
    assert_eq!(service.open_sessions(), 2);

    service.acknowledge(finished.id()).expect("acknowledge");
    assert_eq!(finished.snapshot().phase, WorkflowPhase::Editing);
    service.cancel(abandoned.id()).expect("cancel");
    assert_eq!(service.open_sessions(), 0);
    assert!(matches!(
        service.session(finished.id()),
        Err(SessionError::UnknownSession(_))
    ));
}

#[tokio::test]
async fn acknowledging_before_success_keeps_the_session() {
    let harness = Harness::new();
    let service = harness.service();
    let session = service.open();

    let error = service
        .acknowledge(session.id())
        .expect_err("nothing to acknowledge yet");
    assert!(matches!(error, SessionError::Workflow(_)));
    assert_eq!(service.open_sessions(), 1);
}
