// tests/http_api.rs
//
// A API HTTP inteira, em processo, sobre a base de demonstração em memória.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use petconnect::{
    config::AppState,
    gateway::MemoryGateway,
    routes,
    services::auth::AuthService,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let gw = MemoryGateway::new(AuthService::new("segredo-de-teste".into(), Duration::hours(1), 4));
    gw.seed_demo().await.unwrap();
    routes::router(AppState::with_gateway(Arc::new(gw)).await)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| {
            let resource = &i["resource"];
            resource["name"]
                .as_str()
                .or_else(|| resource["brand"].as_str())
                .unwrap()
                .to_string()
        })
        .collect()
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_public() {
    let app = app().await;
    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/donations"]["get"].is_object());
    assert!(doc["components"]["securitySchemes"]["api_jwt"].is_object());
}

#[tokio::test]
async fn missing_token_is_401_in_the_requested_language() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_ne!(body["error"], "Token de autenticação inválido ou ausente.");
}

#[tokio::test]
async fn bad_credentials_are_401_without_detail() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "fantasma@test.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "E-mail ou senha inválidos.");

    // identificador fora do formato de e-mail: mesmo 401, sem detalhes de validação
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ngo", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "E-mail ou senha inválidos.");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn register_then_conflict() {
    let app = app().await;
    let payload = json!({
        "name": "Gatil Esperança",
        "registrationNumber": "55.555.555/0001-55",
        "city": "Salvador",
        "state": "BA",
        "contactEmail": "gatil@test.com",
        "contactPhone": "71999999999",
        "password": "segredo123"
    });

    let (status, body) = send(&app, Method::POST, "/api/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["status"], "PENDING");
    assert!(body.get("token").is_none());

    let (status, _) = send(&app, Method::POST, "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "", "state": "Bahia", "password": "1" })),
    )
    .await;
    // campos faltando no corpo são rejeitados antes da validação
    assert!(status.is_client_error(), "{body}");
}

#[tokio::test]
async fn pending_ngo_can_read_profile_but_not_the_board() {
    let app = app().await;
    let token = login(&app, "focinhos@test.com").await;

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING");

    let (status, _) = send(&app, Method::GET, "/api/donations", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn donation_board_filters() {
    let app = app().await;
    let token = login(&app, "caosemfome@test.com").await;

    let (status, body) = send(&app, Method::GET, "/api/donations", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body["items"]), vec!["Vermífugo Drontal", "Golden Power Training"]);
    assert_eq!(body["states"], json!(["RJ"]));

    let (_, body) = send(&app, Method::GET, "/api/donations?category=rations&state=RJ", Some(&token), None).await;
    assert_eq!(names(&body["items"]), vec!["Golden Power Training"]);

    let (_, body) = send(&app, Method::GET, "/api/donations?urgent=true", Some(&token), None).await;
    assert_eq!(names(&body["items"]), vec!["Vermífugo Drontal"]);
    assert_eq!(body["items"][0]["urgent"], true);

    let (_, body) = send(&app, Method::GET, "/api/donations?q=GOLDEN&category=", Some(&token), None).await;
    assert_eq!(names(&body["items"]), vec!["Golden Power Training"]);

    let (status, _) = send(&app, Method::GET, "/api/donations?category=brinquedos", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn donor_approves_coleira_and_catalog_shows_it_donated() {
    let app = app().await;
    let cao = login(&app, "caosemfome@test.com").await;
    let patas = login(&app, "patasunidas@test.com").await;

    let (_, received) = send(&app, Method::GET, "/api/requests/received", Some(&cao), None).await;
    let received = received.as_array().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["resource"]["name"], "Coleira Anti-pulgas");
    assert_eq!(received[0]["counterpart"]["name"], "Patas Unidas");
    let request_id = received[0]["id"].as_str().unwrap().to_string();
    let article_id = received[0]["resourceId"].as_str().unwrap().to_string();

    // quem pediu não decide
    let uri = format!("/api/requests/{request_id}");
    let (status, _) = send(&app, Method::PATCH, &uri, Some(&patas), Some(json!({ "status": "APPROVED" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(&cao), Some(json!({ "status": "APPROVED" }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "APPROVED");

    let (_, catalog) = send(&app, Method::GET, "/api/catalog", Some(&patas), None).await;
    let article = catalog["articles"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == article_id.as_str())
        .unwrap();
    assert_eq!(article["status"], "DONATED");
    assert_eq!(catalog["resourceRequests"][0]["status"], "APPROVED");
    assert!(catalog["error"].is_null());

    // estado terminal
    let (status, _) = send(&app, Method::PATCH, &uri, Some(&cao), Some(json!({ "status": "REJECTED" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, stats) = send(&app, Method::GET, "/api/stats", Some(&cao), None).await;
    assert_eq!(stats["resourcesDonated"], 1);
    assert_eq!(stats["requestsReceivedApproved"], 1);
    assert_eq!(stats["requestsReceivedPending"], 0);
}

#[tokio::test]
async fn request_rules_over_http() {
    let app = app().await;
    let patas = login(&app, "patasunidas@test.com").await;
    let cao = login(&app, "caosemfome@test.com").await;

    let (_, inventory) = send(&app, Method::GET, "/api/inventory", Some(&patas), None).await;
    let vermifugo = inventory
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["kind"] == "medicines")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let own = json!({ "resourceId": vermifugo, "resourceKind": "medicines" });
    let (status, _) = send(&app, Method::POST, "/api/requests", Some(&patas), Some(own.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/api/requests", Some(&cao), Some(own.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["status"], "PENDING");

    let (status, _) = send(&app, Method::POST, "/api/requests", Some(&cao), Some(own)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, sent) = send(&app, Method::GET, "/api/requests/sent", Some(&cao), None).await;
    assert_eq!(sent.as_array().unwrap().len(), 1);
    assert_eq!(sent[0]["counterpart"]["name"], "Patas Unidas");
}

#[tokio::test]
async fn publish_and_edit_resources() {
    let app = app().await;
    let cao = login(&app, "caosemfome@test.com").await;
    let patas = login(&app, "patasunidas@test.com").await;

    let racao = json!({
        "brand": "Premier Pet",
        "quantityKg": 12.5,
        "expirationDate": "2030-01-31"
    });
    let (status, created) = send(&app, Method::POST, "/api/resources/rations", Some(&cao), Some(racao.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["kind"], "rations");
    assert_eq!(created["status"], "AVAILABLE");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::POST, "/api/resources/toys", Some(&cao), Some(racao.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let invalid = json!({ "brand": "Premier Pet", "quantityKg": 0, "expirationDate": "2030-01-31" });
    let (status, body) = send(&app, Method::POST, "/api/resources/rations", Some(&cao), Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].is_object());

    let uri = format!("/api/resources/rations/{id}");
    let edit = json!({ "brand": "Premier Pet Light", "quantityKg": 10, "expirationDate": "2030-01-31" });
    let (status, _) = send(&app, Method::PUT, &uri, Some(&patas), Some(edit.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut locked = edit.clone();
    locked["status"] = json!("DONATED");
    let (status, _) = send(&app, Method::PUT, &uri, Some(&cao), Some(locked)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(&app, Method::PUT, &uri, Some(&cao), Some(edit)).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["brand"], "Premier Pet Light");
    assert_eq!(updated["id"], id.as_str());

    let (status, fetched) = send(&app, Method::GET, &uri, Some(&patas), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["brand"], "Premier Pet Light");

    // o mesmo id em outra coleção não existe
    let (status, _) = send(&app, Method::GET, &format!("/api/resources/medicines/{id}"), Some(&patas), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = app().await;
    let token = login(&app, "patasunidas@test.com").await;

    let (status, _) = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn organizations_by_id() {
    let app = app().await;
    let token = login(&app, "patasunidas@test.com").await;

    let (status, list) = send(&app, Method::GET, "/api/organizations", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 3);

    let id = list[0]["id"].as_str().unwrap();
    let (status, org) = send(&app, Method::GET, &format!("/api/organizations/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(org["id"], id);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, Method::GET, &format!("/api/organizations/{missing}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
