pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::accounts::handlers::handle_account_names;
use crate::personalization::handlers::handle_personalize;
use crate::proxy::handlers::handle_fetch_url;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/account-names", get(handle_account_names))
        .route("/api/personalize", post(handle_personalize))
        .route("/fetch-url/", get(handle_fetch_url))
        .route("/fetch-url", get(handle_fetch_url))
        // Composer page, stylesheet and wasm bundle
        .fallback_service(static_files)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{test_state, FixtureDirectory, ScriptedModel};

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn router_with(directory: FixtureDirectory, model: Arc<ScriptedModel>) -> Router {
        build_router(test_state(Arc::new(directory), model))
    }

    // Shared with the frontend dropdown test.
    const TARGET_ACCOUNTS: &str =
        include_str!("../../../web/tests/fixtures/target_accounts.json");
    const ACCOUNT_NAMES_BODY: &str =
        include_str!("../../../web/tests/fixtures/account_names.json");

    fn fixture_records() -> Vec<Value> {
        serde_json::from_str(TARGET_ACCOUNTS).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = router_with(
            FixtureDirectory::with_records(vec![]),
            Arc::new(ScriptedModel::replying("")),
        );
        let (status, body) = send(router, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "composer-api");
    }

    #[tokio::test]
    async fn test_account_names_exclude_meta() {
        let router = router_with(
            FixtureDirectory::with_records(fixture_records()),
            Arc::new(ScriptedModel::replying("")),
        );
        let (status, body) = send(
            router,
            Request::get("/api/account-names").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(fixture_records()[0].get("meta").is_some());
        assert_eq!(body, serde_json::from_str::<Value>(ACCOUNT_NAMES_BODY).unwrap());
    }

    #[tokio::test]
    async fn test_account_names_failure_is_500_with_message() {
        let router = router_with(
            FixtureDirectory::unavailable(),
            Arc::new(ScriptedModel::replying("")),
        );
        let (status, body) = send(
            router,
            Request::get("/api/account-names").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_personalize_round_trip() {
        let model = Arc::new(ScriptedModel::replying(
            "Here are your texts:\nText 1: A for Acme\nText 2: B for Acme",
        ));
        let router = router_with(FixtureDirectory::with_records(vec![]), model.clone());

        let (status, body) = send(
            router,
            post_json(
                "/api/personalize",
                r#"{"client": "acme", "texts": ["A", "B"]}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "client": "acme",
                "originalTexts": ["A", "B"],
                "personalizedContent": ["A for Acme", "B for Acme"]
            })
        );
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_personalize_rejects_empty_texts_without_model_call() {
        let model = Arc::new(ScriptedModel::replying("Text 1: unused"));
        let router = router_with(FixtureDirectory::with_records(vec![]), model.clone());

        let (status, body) = send(
            router,
            post_json("/api/personalize", r#"{"client": "acme", "texts": []}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_personalize_rejects_missing_client_without_model_call() {
        let model = Arc::new(ScriptedModel::replying("Text 1: unused"));
        let router = router_with(FixtureDirectory::with_records(vec![]), model.clone());

        let (status, body) = send(
            router,
            post_json("/api/personalize", r#"{"texts": ["Hello"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_personalize_rejects_non_array_texts_and_bad_json() {
        for payload in [r#"{"client": "acme", "texts": "Hello"}"#, "not json"] {
            let model = Arc::new(ScriptedModel::replying("Text 1: unused"));
            let router = router_with(FixtureDirectory::with_records(vec![]), model.clone());

            let (status, body) = send(router, post_json("/api/personalize", payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
            assert_eq!(body["error"], "Invalid input");
            assert_eq!(model.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_personalize_model_failure_is_500_with_details() {
        let model = Arc::new(ScriptedModel::failing(429, "Rate limit reached"));
        let router = router_with(FixtureDirectory::with_records(vec![]), model.clone());

        let (status, body) = send(
            router,
            post_json("/api/personalize", r#"{"client": "acme", "texts": ["Hi"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to personalize content");
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("Rate limit reached"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_url_requires_url_parameter() {
        let router = router_with(
            FixtureDirectory::with_records(vec![]),
            Arc::new(ScriptedModel::replying("")),
        );
        let (status, body) = send(
            router,
            Request::get("/fetch-url/").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("url"));
    }

    #[tokio::test]
    async fn test_fetch_url_rejects_non_http_scheme() {
        let router = router_with(
            FixtureDirectory::with_records(vec![]),
            Arc::new(ScriptedModel::replying("")),
        );
        let (status, _) = send(
            router,
            Request::get("/fetch-url/?url=file%3A%2F%2F%2Fetc%2Fpasswd")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
