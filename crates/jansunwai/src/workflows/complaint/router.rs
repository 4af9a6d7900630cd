use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{FormField, FormPatch};
use super::service::ComplaintService;
use super::session::{SessionError, SessionId, SubmissionSession};
use super::workflow::{SubmitOutcome, WorkflowError, WorkflowSnapshot};
use crate::localization::{Language, LanguageQuery, LocalizationStore};
use crate::workflows::tracking::ComplaintDirectory;

/// Router driving complaint submissions from a thin client.
pub fn submission_router<D>(service: Arc<ComplaintService<D>>) -> Router
where
    D: ComplaintDirectory + 'static,
{
    Router::new()
        .route("/api/v1/submissions", post(open_handler::<D>))
        .route(
            "/api/v1/submissions/:session_id",
            get(snapshot_handler::<D>).delete(close_handler::<D>),
        )
        .route(
            "/api/v1/submissions/:session_id/form",
            patch(form_handler::<D>),
        )
        .route(
            "/api/v1/submissions/:session_id/submit",
            post(submit_handler::<D>),
        )
        .route("/api/v1/submissions/:session_id/otp", put(otp_handler::<D>))
        .route(
            "/api/v1/submissions/:session_id/verify",
            post(verify_handler::<D>),
        )
        .route(
            "/api/v1/submissions/:session_id/resend",
            post(resend_handler::<D>),
        )
        .route(
            "/api/v1/submissions/:session_id/retry",
            post(retry_handler::<D>),
        )
        .route(
            "/api/v1/submissions/:session_id/dismiss",
            post(dismiss_handler::<D>),
        )
        .route(
            "/api/v1/submissions/:session_id/cancel",
            post(cancel_handler::<D>),
        )
        .route(
            "/api/v1/submissions/:session_id/acknowledge",
            post(acknowledge_handler::<D>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct FieldMessage {
    field: FormField,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct SessionMessages {
    progress: &'static str,
    errors: Vec<FieldMessage>,
    otp: Option<&'static str>,
    failure: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct SessionView {
    session_id: SessionId,
    #[serde(flatten)]
    snapshot: WorkflowSnapshot,
    messages: SessionMessages,
}

impl SessionView {
    fn render(session: &SubmissionSession, store: &LocalizationStore, language: Language) -> Self {
        let snapshot = session.snapshot();
        let messages = SessionMessages {
            progress: store.text_in(language, snapshot.progress.label_key),
            errors: snapshot
                .errors
                .iter()
                .map(|error| FieldMessage {
                    field: error.field,
                    message: store.text_in(language, error.message_key),
                })
                .collect(),
            otp: snapshot
                .otp
                .as_ref()
                .and_then(|otp| otp.error)
                .map(|key| store.text_in(language, key)),
            failure: snapshot
                .failure
                .map(|failure| store.text_in(language, failure.message_key())),
        };

        Self {
            session_id: session.id().clone(),
            snapshot,
            messages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OtpEntry {
    code: String,
}

fn render<D>(
    service: &ComplaintService<D>,
    session: &SubmissionSession,
    query: &LanguageQuery,
    status: StatusCode,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    let store = service.localization();
    let view = SessionView::render(session, store, query.resolve(store));
    (status, Json(view)).into_response()
}

fn error_response(error: SessionError) -> Response {
    let (status, payload) = match &error {
        SessionError::UnknownSession(_) => (
            StatusCode::NOT_FOUND,
            json!({ "error": error.to_string() }),
        ),
        SessionError::Workflow(WorkflowError::InvalidTransition { action, phase }) => (
            StatusCode::CONFLICT,
            json!({
                "error": error.to_string(),
                "action": action,
                "phase": phase,
            }),
        ),
        SessionError::Workflow(WorkflowError::ResendNotEligible { remaining }) => (
            StatusCode::CONFLICT,
            json!({
                "error": error.to_string(),
                "resend_in": remaining,
            }),
        ),
    };
    (status, Json(payload)).into_response()
}

/// Looks up the session, runs `action` on it and renders the new state.
fn act<D>(
    service: &ComplaintService<D>,
    session_id: String,
    query: &LanguageQuery,
    status: StatusCode,
    action: impl FnOnce(&SubmissionSession) -> Result<(), SessionError>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    let outcome = service
        .session(&SessionId(session_id))
        .and_then(|session| action(session.as_ref()).map(|()| session));
    match outcome {
        Ok(session) => render(service, &session, query, status),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn open_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    let session = service.open();
    render(&service, &session, &query, StatusCode::CREATED)
}

pub(crate) async fn snapshot_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    act(&service, session_id, &query, StatusCode::OK, |_| Ok(()))
}

pub(crate) async fn close_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    match service.close(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn form_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
    Json(form_patch): Json<FormPatch>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    act(&service, session_id, &query, StatusCode::OK, |session| {
        session.apply(form_patch)
    })
}

pub(crate) async fn submit_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    let session = match service.session(&SessionId(session_id)) {
        Ok(session) => session,
        Err(error) => return error_response(error),
    };

    match session.submit() {
        Ok(SubmitOutcome::Accepted { .. }) => {
            render(&service, &session, &query, StatusCode::ACCEPTED)
        }
        Ok(SubmitOutcome::Blocked(_)) => {
            render(&service, &session, &query, StatusCode::UNPROCESSABLE_ENTITY)
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn otp_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
    Json(entry): Json<OtpEntry>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    act(&service, session_id, &query, StatusCode::OK, |session| {
        session.enter_otp(&entry.code)
    })
}

pub(crate) async fn verify_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    act(
        &service,
        session_id,
        &query,
        StatusCode::ACCEPTED,
        SubmissionSession::verify,
    )
}

pub(crate) async fn resend_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    act(
        &service,
        session_id,
        &query,
        StatusCode::ACCEPTED,
        SubmissionSession::resend,
    )
}

pub(crate) async fn retry_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    act(
        &service,
        session_id,
        &query,
        StatusCode::ACCEPTED,
        SubmissionSession::retry,
    )
}

pub(crate) async fn dismiss_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    act(
        &service,
        session_id,
        &query,
        StatusCode::OK,
        SubmissionSession::dismiss,
    )
}

pub(crate) async fn cancel_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    match service.cancel(&SessionId(session_id)) {
        Ok(session) => render(&service, &session, &query, StatusCode::OK),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn acknowledge_handler<D>(
    State(service): State<Arc<ComplaintService<D>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    match service.acknowledge(&SessionId(session_id)) {
        Ok(session) => render(&service, &session, &query, StatusCode::OK),
        Err(error) => error_response(error),
    }
}
