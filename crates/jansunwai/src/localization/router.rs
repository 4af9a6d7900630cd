use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::language::Language;
use super::store::LocalizationStore;

/// `?lang=` override accepted by every localized endpoint. Unknown codes fall
/// back to the active language.
#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

impl LanguageQuery {
    pub fn resolve(&self, store: &LocalizationStore) -> Language {
        self.lang
            .as_deref()
            .and_then(Language::from_code)
            .unwrap_or_else(|| store.language())
    }
}

#[derive(Debug, Serialize)]
struct LanguageView {
    code: &'static str,
    display_name: &'static str,
}

impl From<Language> for LanguageView {
    fn from(language: Language) -> Self {
        Self {
            code: language.code(),
            display_name: language.display_name(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LanguageChange {
    language: String,
}

pub fn localization_router(store: Arc<LocalizationStore>) -> Router {
    Router::new()
        .route(
            "/api/v1/localization",
            get(current_handler).put(change_handler),
        )
        .route("/api/v1/localization/strings", get(catalog_handler))
        .route("/api/v1/localization/strings/:key", get(string_handler))
        .with_state(store)
}

fn language_payload(store: &LocalizationStore) -> serde_json::Value {
    let supported: Vec<LanguageView> = Language::supported()
        .into_iter()
        .map(LanguageView::from)
        .collect();
    json!({
        "language": LanguageView::from(store.language()),
        "supported": supported,
    })
}

async fn current_handler(State(store): State<Arc<LocalizationStore>>) -> Response {
    (StatusCode::OK, Json(language_payload(&store))).into_response()
}

async fn change_handler(
    State(store): State<Arc<LocalizationStore>>,
    Json(change): Json<LanguageChange>,
) -> Response {
    let applied = store.set_language_code(&change.language).is_some();
    let mut payload = language_payload(&store);
    payload["applied"] = json!(applied);
    (StatusCode::OK, Json(payload)).into_response()
}

async fn catalog_handler(
    State(store): State<Arc<LocalizationStore>>,
    Query(query): Query<LanguageQuery>,
) -> Response {
    let language = query.resolve(&store);
    let payload = json!({
        "language": language.code(),
        "strings": store.catalog_for(language),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

async fn string_handler(
    State(store): State<Arc<LocalizationStore>>,
    Path(key): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Response {
    let language = query.resolve(&store);
    let payload = json!({
        "language": language.code(),
        "key": key,
        "value": store.localized_in(language, &key),
    });
    (StatusCode::OK, Json(payload)).into_response()
}
