use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use jansunwai::localization::{
    localization_router, FilePreferenceStore, Language, LocalizationKey, LocalizationStore,
};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[test]
fn language_choice_survives_restart() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.json");

    let store = LocalizationStore::load(Arc::new(FilePreferenceStore::new(&path)));
    assert_eq!(store.language(), Language::English);
    store.set_language(Language::Hindi);

    let reloaded = LocalizationStore::load(Arc::new(FilePreferenceStore::new(&path)));
    assert_eq!(reloaded.language(), Language::Hindi);
    assert_eq!(reloaded.text(LocalizationKey::Submit), "जमा करें");
}

#[tokio::test]
async fn http_language_switch_and_lookup() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.json");
    let store = Arc::new(LocalizationStore::load(Arc::new(FilePreferenceStore::new(
        &path,
    ))));

    let response = localization_router(store.clone())
        .oneshot(
            Request::put("/api/v1/localization")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "language": "hi" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["applied"], true);
    assert_eq!(body["language"]["code"], "hi");
    assert_eq!(store.language(), Language::Hindi);

    let response = localization_router(store.clone())
        .oneshot(
            Request::get("/api/v1/localization/strings/submit?lang=en")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let body = read_json(response).await;
    assert_eq!(body["value"], "Submit");

    let response = localization_router(store.clone())
        .oneshot(
            Request::put("/api/v1/localization")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "language": "fr" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    let body = read_json(response).await;
    assert_eq!(body["applied"], false);
    assert_eq!(store.language(), Language::Hindi);
}
