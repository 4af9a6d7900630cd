use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::directory::{ComplaintDirectory, DirectoryError};
use super::domain::{ComplaintFilter, ComplaintRecord, ComplaintStatus};
use super::lookup::TrackingError;
use super::service::{TrackingService, TrackingServiceError};
use crate::localization::{Language, LanguageQuery, LocalizationKey, LocalizationStore};

/// Router exposing complaint tracking, feedback and escalation.
pub fn tracking_router<D>(service: Arc<TrackingService<D>>) -> Router
where
    D: ComplaintDirectory + 'static,
{
    Router::new()
        .route("/api/v1/complaints", get(dashboard_handler::<D>))
        .route("/api/v1/complaints/:complaint_id", get(track_handler::<D>))
        .route(
            "/api/v1/complaints/:complaint_id/feedback",
            post(feedback_handler::<D>),
        )
        .route(
            "/api/v1/complaints/:complaint_id/escalations",
            post(escalation_handler::<D>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct ComplaintView<'a> {
    complaint_id: &'a str,
    subject: &'a str,
    department: &'a str,
    location: &'a str,
    filed_on: NaiveDate,
    status: ComplaintStatus,
    status_label: &'static str,
    updates: Vec<StatusUpdateView<'a>>,
    feedback_count: usize,
    escalation_count: usize,
}

#[derive(Debug, Serialize)]
struct StatusUpdateView<'a> {
    recorded_at: NaiveDateTime,
    status: ComplaintStatus,
    title: &'static str,
    detail: &'a str,
}

impl<'a> ComplaintView<'a> {
    fn render(record: &'a ComplaintRecord, store: &LocalizationStore, language: Language) -> Self {
        Self {
            complaint_id: record.id.as_str(),
            subject: &record.subject,
            department: &record.department,
            location: &record.location,
            filed_on: record.filed_on,
            status: record.status(),
            status_label: store.text_in(language, record.status().label_key()),
            updates: record
                .updates()
                .iter()
                .map(|update| StatusUpdateView {
                    recorded_at: update.recorded_at,
                    status: update.status,
                    title: store.text_in(language, update.status.label_key()),
                    detail: &update.detail,
                })
                .collect(),
            feedback_count: record.feedback().len(),
            escalation_count: record.escalations().len(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    filter: ComplaintFilter,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedbackRequest {
    rating: u8,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EscalationRequest {
    #[serde(default)]
    reason: String,
}

pub(crate) async fn dashboard_handler<D>(
    State(service): State<Arc<TrackingService<D>>>,
    Query(dashboard): Query<DashboardQuery>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    let store = service.localization();
    let language = query.resolve(store);
    match service.dashboard(dashboard.filter) {
        Ok(listing) => {
            let text = |key: LocalizationKey| store.text_in(language, key);
            let complaints: Vec<_> = listing
                .complaints
                .iter()
                .map(|record| ComplaintView::render(record, store, language))
                .collect();
            let payload = json!({
                "filter": listing.filter,
                "title": text(listing.filter.title_key()),
                "counts": listing.counts,
                "labels": {
                    "total": text(LocalizationKey::Total),
                    "pending": text(LocalizationKey::Pending),
                    "resolved": text(LocalizationKey::Resolved),
                },
                "complaints": complaints,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(&error, store, language),
    }
}

pub(crate) async fn track_handler<D>(
    State(service): State<Arc<TrackingService<D>>>,
    Path(complaint_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    let store = service.localization();
    let language = query.resolve(store);
    match service.track(&complaint_id) {
        Ok(record) => {
            let view = ComplaintView::render(&record, store, language);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => error_response(&error, store, language),
    }
}

pub(crate) async fn feedback_handler<D>(
    State(service): State<Arc<TrackingService<D>>>,
    Path(complaint_id): Path<String>,
    Query(query): Query<LanguageQuery>,
    Json(request): Json<FeedbackRequest>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    let store = service.localization();
    let language = query.resolve(store);
    match service.submit_feedback(&complaint_id, request.rating, request.comment) {
        Ok(feedback) => {
            let payload = json!({
                "complaint_id": complaint_id.trim(),
                "rating": feedback.rating,
                "rating_label": store.text_in(language, feedback.rating.label_key()),
                "message": store.text_in(language, LocalizationKey::FeedbackSubmitted),
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => error_response(&error, store, language),
    }
}

pub(crate) async fn escalation_handler<D>(
    State(service): State<Arc<TrackingService<D>>>,
    Path(complaint_id): Path<String>,
    Query(query): Query<LanguageQuery>,
    Json(request): Json<EscalationRequest>,
) -> Response
where
    D: ComplaintDirectory + 'static,
{
    let store = service.localization();
    let language = query.resolve(store);
    match service.escalate(&complaint_id, &request.reason) {
        Ok(escalation) => {
            let payload = json!({
                "complaint_id": complaint_id.trim(),
                "reason": escalation.reason,
                "message": store.text_in(language, LocalizationKey::EscalationSubmitted),
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => error_response(&error, store, language),
    }
}

fn error_response(
    error: &TrackingServiceError,
    store: &LocalizationStore,
    language: Language,
) -> Response {
    let (status, message_key) = match error {
        TrackingServiceError::Tracking(TrackingError::EmptyIdentifier) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Some(LocalizationKey::ComplaintIdRequired),
        ),
        TrackingServiceError::Tracking(TrackingError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Some(LocalizationKey::ComplaintNotFound))
        }
        TrackingServiceError::Feedback(feedback) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Some(feedback.message_key()))
        }
        TrackingServiceError::Tracking(TrackingError::Directory(DirectoryError::Unavailable(_)))
        | TrackingServiceError::Directory(DirectoryError::Unavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, None)
        }
        TrackingServiceError::Tracking(TrackingError::Directory(_))
        | TrackingServiceError::Directory(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
    };

    let message = message_key
        .map(|key| store.text_in(language, key))
        .unwrap_or_else(|| store.text_in(language, LocalizationKey::Error));
    let payload = json!({
        "error": error.to_string(),
        "message": message,
    });
    (status, Json(payload)).into_response()
}
