//! HTTP API tests
//!
//! Exercise the admin, public and health scopes through actix's test service.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use surveylinker::api::AppState;
use surveylinker::api::jwt::{AdminCredentials, JwtService};
use surveylinker::api::services::{AppStartTime, configure_routes};
use surveylinker::config::{ApiConfig, SurveySettings};
use surveylinker::services::SurveyServices;
use surveylinker::storage::SeaOrmStorage;
use surveylinker::token::TokenCodec;
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

const ADMIN_TOKEN: &str = "test-admin-password";
const SIGNING_SECRET: &[u8] = b"api-test-signing-secret-value";

struct TestContext {
    state: web::Data<AppState>,
    credentials: web::Data<AdminCredentials>,
    start_time: web::Data<AppStartTime>,
    api: ApiConfig,
    _dir: TempDir,
}

async fn setup_with_admin(admin_token: &str) -> TestContext {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("api.db").display());
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );

    let settings = SurveySettings::new(SIGNING_SECRET.to_vec(), Duration::days(7));
    let services = SurveyServices::new(storage.clone(), &settings);
    let credentials = AdminCredentials::new(admin_token, JwtService::new("api-test-jwt-secret", 15, 7));

    TestContext {
        state: web::Data::new(AppState::new(services, storage, 3)),
        credentials: web::Data::new(credentials),
        start_time: web::Data::new(AppStartTime {
            start_datetime: Utc::now(),
        }),
        api: ApiConfig::default(),
        _dir: temp_dir,
    }
}

async fn setup() -> TestContext {
    setup_with_admin(ADMIN_TOKEN).await
}

macro_rules! init_app {
    ($ctx:expr) => {{
        let api = $ctx.api.clone();
        test::init_service(
            App::new()
                .app_data($ctx.state.clone())
                .app_data($ctx.credentials.clone())
                .app_data($ctx.start_time.clone())
                .configure(move |cfg| configure_routes(cfg, &api)),
        )
        .await
    }};
}

macro_rules! login {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/admin/v1/auth/login")
            .set_json(json!({ "password": ADMIN_TOKEN }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        format!("Bearer {}", body["data"]["access_token"].as_str().unwrap())
    }};
}

macro_rules! create_link {
    ($app:expr, $bearer:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/admin/v1/links")
            .insert_header(("Authorization", $bearer.as_str()))
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        body["data"].clone()
    }};
}

// =============================================================================
// Auth
// =============================================================================

#[actix_web::test]
async fn test_login_success_and_verify() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let bearer = login!(app);

    let req = test::TestRequest::get()
        .uri("/admin/v1/auth/verify")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["valid"], true);
}

#[actix_web::test]
async fn test_refresh_issues_new_tokens() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/admin/v1/auth/login")
        .set_json(json!({ "password": ADMIN_TOKEN }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let access = body["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["refresh_expires_in"], 7 * 24 * 3600);

    // 无需 bearer 即可刷新
    let req = test::TestRequest::post()
        .uri("/admin/v1/auth/refresh")
        .set_json(json!({ "refresh_token": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let new_access = body["data"]["access_token"].as_str().unwrap().to_string();
    assert!(body["data"]["refresh_token"].is_string());

    let req = test::TestRequest::get()
        .uri("/admin/v1/links")
        .insert_header(("Authorization", format!("Bearer {}", new_access)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // access token 不能当 refresh token 用，反之亦然
    let req = test::TestRequest::post()
        .uri("/admin/v1/auth/refresh")
        .set_json(json!({ "refresh_token": access }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2000);

    let req = test::TestRequest::get()
        .uri("/admin/v1/links")
        .insert_header(("Authorization", format!("Bearer {}", refresh)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_login_wrong_password() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/admin/v1/auth/login")
        .set_json(json!({ "password": "nope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_admin_requires_bearer() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/admin/v1/links").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/admin/v1/links")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_admin_disabled_without_token() {
    let ctx = setup_with_admin("").await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/admin/v1/auth/login")
        .set_json(json!({ "password": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Links
// =============================================================================

#[actix_web::test]
async fn test_create_and_list_links() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);

    let created = create_link!(app, bearer, json!({ "campaign_id": "q4-retail", "expiry": "2d" }));
    assert_eq!(created["campaign_id"], "q4-retail");
    assert_eq!(created["token"].as_str().unwrap().len(), 60);
    assert!(created["expiry"].is_string());
    assert!(created.get("expires_at").is_none());
    create_link!(app, bearer, json!({}));

    let req = test::TestRequest::get()
        .uri("/admin/v1/links?campaign=q4&with_status=true")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["links"][0]["status"], "active");
}

#[actix_web::test]
async fn test_create_link_rejects_bad_expiry() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);

    for expiry in ["not-a-time", "2001-01-01T00:00:00Z"] {
        let req = test::TestRequest::post()
            .uri("/admin/v1/links")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({ "expiry": expiry }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 3002);
    }
}

#[actix_web::test]
async fn test_bulk_status() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);

    let answered = create_link!(app, bearer, json!({}));
    let open = create_link!(app, bearer, json!({}));
    let answered_token = answered["token"].as_str().unwrap().to_string();
    let open_token = open["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/responses")
        .set_json(json!({ "token": answered_token, "score": 10 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/admin/v1/links/status")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({ "tokens": [answered_token, open_token, "garbage"] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["statuses"][&answered_token], "responded");
    assert_eq!(body["data"]["statuses"][&open_token], "active");
    assert_eq!(body["data"]["rejected"]["garbage"], "invalid_token");
}

#[actix_web::test]
async fn test_bulk_status_mixes_found_unknown_and_invalid() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);

    let known = create_link!(app, bearer, json!({}));
    let known_token = known["token"].as_str().unwrap().to_string();
    // 签名合法，但链接从未创建
    let unknown_token = TokenCodec::new(SIGNING_SECRET)
        .mint(&uuid::Uuid::new_v4())
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/admin/v1/links/status")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({ "tokens": [known_token, unknown_token, "garbage"] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["statuses"][&known_token], "active");
    assert_eq!(body["data"]["statuses"].as_object().unwrap().len(), 1);
    assert_eq!(body["data"]["rejected"][&unknown_token], "not_found");
    assert_eq!(body["data"]["rejected"]["garbage"], "invalid_token");
}

#[actix_web::test]
async fn test_bulk_status_enforces_limit() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);

    let req = test::TestRequest::post()
        .uri("/admin/v1/links/status")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({ "tokens": ["a", "b", "c", "d"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Public responses
// =============================================================================

#[actix_web::test]
async fn test_submit_then_duplicate_then_check() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);
    let link = create_link!(app, bearer, json!({}));
    let token = link["token"].as_str().unwrap().to_string();

    let check_uri = format!("/api/v1/responses/check/{}", token);
    let req = test::TestRequest::get().uri(&check_uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["responded"], false);

    let req = test::TestRequest::post()
        .uri("/api/v1/responses")
        .set_json(json!({ "token": token, "score": 9, "comments": "helpful" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/responses")
        .set_json(json!({ "token": token, "score": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4000);

    let req = test::TestRequest::get().uri(&check_uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["responded"], true);
}

#[actix_web::test]
async fn test_submit_rejects_invalid_score() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);
    let link = create_link!(app, bearer, json!({}));
    let token = link["token"].as_str().unwrap().to_string();

    for score in [json!(9.5), json!(11), json!(-1), json!("7")] {
        let req = test::TestRequest::post()
            .uri("/api/v1/responses")
            .set_json(json!({ "token": token, "score": score }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 4001);
    }
}

#[actix_web::test]
async fn test_submit_missing_score_or_bad_json_uses_envelope() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);
    let link = create_link!(app, bearer, json!({}));
    let token = link["token"].as_str().unwrap().to_string();

    for body in [json!({ "token": token }), json!({ "token": token, "score": null })] {
        let req = test::TestRequest::post()
            .uri("/api/v1/responses")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 4001);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/responses")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"token\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
    assert!(body["data"].is_null());
}

#[actix_web::test]
async fn test_submit_with_tampered_token() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/responses")
        .set_json(json!({ "token": "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", "score": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);
}

// =============================================================================
// Metrics
// =============================================================================

#[actix_web::test]
async fn test_metrics_summary() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);

    for score in [9, 9, 2, 7] {
        let link = create_link!(app, bearer, json!({ "campaign_id": "nps" }));
        let req = test::TestRequest::post()
            .uri("/api/v1/responses")
            .set_json(json!({ "token": link["token"], "score": score }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/admin/v1/metrics?campaign=nps")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["total_responses"], 4);
    assert_eq!(body["data"]["nps_score"], 25.0);
    assert_eq!(body["data"]["trend"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_metrics_rejects_bad_date() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let bearer = login!(app);

    let req = test::TestRequest::get()
        .uri("/admin/v1/metrics?date_from=yesterday-ish")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Health
// =============================================================================

#[actix_web::test]
async fn test_health_endpoints() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/health/live").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
}
