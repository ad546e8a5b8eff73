//! End-to-end tests for the management API against a temp-file database.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, test, web};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use watchdog_service::api::{self, AppState};
use watchdog_service::database::{self, EndpointRegistry, ResultSink, WatchdogDb};
use watchdog_service::monitoring::EndpointProber;
use watchdog_service::pool::LibsqlManager;

async fn test_state() -> (TempDir, web::Data<AppState>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("watchdog.db").to_string_lossy().to_string();

    let db = libsql::Builder::new_local(&db_path).build().await.unwrap();
    let pool: watchdog_service::pool::LibsqlPool =
        deadpool::managed::Pool::builder(LibsqlManager::new(db)).build().unwrap();

    {
        let conn = pool.get().await.unwrap();
        database::initialize_database(&conn).await.unwrap();
    }

    let db = Arc::new(WatchdogDb::new_from_pool(pool));
    let state = web::Data::new(AppState {
        registry: Arc::clone(&db) as Arc<dyn EndpointRegistry>,
        sink: db as Arc<dyn ResultSink>,
        prober: Arc::new(EndpointProber::new(Duration::from_secs(2)).unwrap()),
        uptime_window: 100,
    });

    (temp_dir, state)
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(api::routes)).await
    };
}

macro_rules! register {
    ($app:expr, $body:expr $(,)?) => {{
        let request = test::TestRequest::post().uri("/endpoints").set_json($body).to_request();
        let response = test::call_service($app, request).await;
        let status = response.status().as_u16();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn register_then_list_endpoints() {
    let (_dir, state) = test_state().await;
    let app = test_app!(state);

    let (status, body) = register!(
        &app,
        json!({
            "url": "https://api.example.com/health",
            "expected_status": 200,
            "expected_schema": { "status": "str" }
        }),
    );

    assert_eq!(status, 201);
    assert!(body["uuid"].is_string());
    assert_eq!(body["expected_schema"], json!({ "status": "str" }));

    let request = test::TestRequest::get().uri("/endpoints").to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    let listed: Value = test::read_body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["url"], "https://api.example.com/health");
}

#[actix_web::test]
async fn registration_validates_input() {
    let (_dir, state) = test_state().await;
    let app = test_app!(state);

    let (status, body) =
        register!(&app, json!({ "url": "ftp://example.com", "expected_status": 200 }));
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap().contains("scheme"));

    let (status, _) =
        register!(&app, json!({ "url": "https://example.com", "expected_status": 999 }));
    assert_eq!(status, 400);

    let (status, _) =
        register!(&app, json!({ "url": "https://example.com/a", "expected_status": 200 }));
    assert_eq!(status, 201);
    let (status, body) =
        register!(&app, json!({ "url": "https://example.com/a", "expected_status": 404 }));
    assert_eq!(status, 409);
    assert!(body["detail"].as_str().unwrap().contains("already registered"));
}

#[actix_web::test]
async fn unknown_endpoint_is_distinct_from_a_down_one() {
    let (_dir, state) = test_state().await;
    let app = test_app!(state);

    let missing = uuid::Uuid::new_v4();
    for uri in
        [format!("/endpoints/{}/check", missing), format!("/endpoints/{}/history", missing)]
    {
        let request = test::TestRequest::get().uri(&uri).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status().as_u16(), 404);
    }
}

#[actix_web::test]
async fn manual_check_persists_and_shows_up_everywhere() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let (_dir, state) = test_state().await;
    let app = test_app!(state);

    let (status, registered) = register!(
        &app,
        json!({
            "url": format!("{}/health", server.uri()),
            "expected_status": 200,
            "expected_schema": { "status": "str" }
        }),
    );
    assert_eq!(status, 201);
    let uuid = registered["uuid"].as_str().unwrap().to_string();

    let request =
        test::TestRequest::get().uri(&format!("/endpoints/{}/check", uuid)).to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    let result: Value = test::read_body_json(response).await;
    assert_eq!(result["outcome"], "UP");
    assert_eq!(result["status_code"], 200);
    assert!(result["latency_ms"].is_u64());

    let request =
        test::TestRequest::get().uri(&format!("/endpoints/{}/history", uuid)).to_request();
    let response = test::call_service(&app, request).await;
    let history: Value = test::read_body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let request = test::TestRequest::get().uri("/dashboard").to_request();
    let response = test::call_service(&app, request).await;
    let dashboard: Value = test::read_body_json(response).await;
    assert_eq!(dashboard[0]["last_outcome"], "UP");
    assert_eq!(dashboard[0]["uptime_percent"], 100.0);
}

#[actix_web::test]
async fn manual_check_reports_contract_breakage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unrelated": true })))
        .mount(&server)
        .await;

    let (_dir, state) = test_state().await;
    let app = test_app!(state);

    let (_, registered) = register!(
        &app,
        json!({
            "url": format!("{}/health", server.uri()),
            "expected_status": 200,
            "expected_schema": { "status": "str" }
        }),
    );
    let uuid = registered["uuid"].as_str().unwrap();

    let request =
        test::TestRequest::get().uri(&format!("/endpoints/{}/check", uuid)).to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    let result: Value = test::read_body_json(response).await;
    assert_eq!(result["outcome"], "CONTRACT_BROKEN");
    assert!(result["error"].as_str().unwrap().contains("contract"));
}

#[actix_web::test]
async fn dashboard_has_undefined_uptime_without_history() {
    let (_dir, state) = test_state().await;
    let app = test_app!(state);

    let (status, _) =
        register!(&app, json!({ "url": "https://api.example.com/health", "expected_status": 200 }));
    assert_eq!(status, 201);

    let request = test::TestRequest::get().uri("/dashboard").to_request();
    let response = test::call_service(&app, request).await;
    let dashboard: Value = test::read_body_json(response).await;

    assert_eq!(dashboard.as_array().unwrap().len(), 1);
    assert!(dashboard[0]["uptime_percent"].is_null());
    assert!(dashboard[0]["last_outcome"].is_null());
    assert!(dashboard[0]["last_checked"].is_null());
}
