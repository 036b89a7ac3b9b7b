use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use foodgram_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use foodgram_recipes::router::build_router;
use foodgram_recipes::state::AppState;
use foodgram_testing::auth::MockAuth;

// Only requests rejected before any storage call are routed here; a
// disconnected pool panics on queries.
fn server() -> TestServer {
    let router = build_router(AppState {
        db: DatabaseConnection::Disconnected,
    });
    TestServer::new(router).unwrap()
}

fn as_user(request: TestRequest, auth: MockAuth) -> TestRequest {
    auth.headers()
        .into_iter()
        .fold(request, |request, (name, value)| match name {
            Some(name) => request.add_header(name, value),
            None => request,
        })
}

fn recipe_body(name: &str) -> Value {
    json!({
        "ingredients": [{"id": 1, "amount": 200}],
        "tags": [1],
        "name": name,
        "text": "Mix and bake.",
        "cooking_time": 40,
    })
}

#[tokio::test]
async fn should_answer_liveness_without_database() {
    let response = server().get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_report_not_ready_when_database_is_down() {
    let response = server().get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_attach_request_id_to_responses() {
    let response = server().get("/healthz").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_require_identity_to_create_recipe() {
    let response = server().post("/recipes").json(&recipe_body("Bread")).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_malformed_identity_on_public_route() {
    let response = server()
        .get("/recipes/1")
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_static("not-a-uuid"),
        )
        .add_header(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_static("0"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_blank_recipe_name_before_storage() {
    let server = server();
    let response = as_user(server.post("/recipes"), MockAuth::user())
        .json(&recipe_body("   "))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "MISSING_DATA");
}

#[tokio::test]
async fn should_reject_malformed_list_query() {
    let response = server().get("/recipes?per-page=lots").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "MISSING_DATA");
}

#[tokio::test]
async fn should_forbid_profile_creation_for_non_admin() {
    let server = server();
    let auth = MockAuth::user();
    let response = as_user(server.post("/users"), auth)
        .json(&json!({
            "id": auth.user_id,
            "username": "alice",
            "email": "alice@example.com",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_validate_username_for_admin_before_storage() {
    let server = server();
    let response = as_user(server.post("/users"), MockAuth::admin())
        .json(&json!({
            "id": MockAuth::user().user_id,
            "username": "no spaces allowed",
            "email": "someone@example.com",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_USERNAME");
}

#[tokio::test]
async fn should_reject_oversized_recipes_limit_before_following() {
    let server = server();
    let author = MockAuth::user().user_id;
    let response = as_user(
        server.post(&format!(
            "/users/{author}/subscribe?recipes-limit=9223372036854775808"
        )),
        MockAuth::user(),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "MISSING_DATA");
}
