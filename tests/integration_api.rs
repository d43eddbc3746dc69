//! API Integration Tests
//!
//! Drives the HTTP surface end to end over in-memory infrastructure.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

mod common;

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn register(
    app: &common::TestApp,
    first_name: &str,
    document: &str,
    email: &str,
    balance: &str,
    role: &str,
) -> Uuid {
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/users",
            json!({
                "first_name": first_name,
                "last_name": "Test",
                "document": document,
                "email": email,
                "password": "s3cret",
                "balance": balance,
                "role": role,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "registration failed");

    let json = body_json(response).await;
    json["id"].as_str().unwrap().parse().unwrap()
}

async fn balance_string(app: &common::TestApp, user_id: Uuid) -> String {
    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/users/{}", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["balance"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_and_transfer_e2e() {
    let app = common::spawn_app(true);

    // 1. Register payer and payee
    let payer_id = register(
        &app,
        "Maria",
        "529.982.247-25",
        "maria@example.com",
        "1000.00",
        "common",
    )
    .await;
    let payee_id = register(
        &app,
        "Joao",
        "168.995.350-09",
        "joao@example.com",
        "500.00",
        "common",
    )
    .await;

    // 2. Transfer 100.50 from payer to payee
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/transfer",
            json!({
                "payer_id": payer_id,
                "payee_id": payee_id,
                "amount": "100.50",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "Transfer failed");
    let transfer_id: Uuid = body_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    // 3. Verify balances
    assert_eq!(balance_string(&app, payer_id).await, "899.50");
    assert_eq!(balance_string(&app, payee_id).await, "600.50");

    // 4. Verify the recorded transfer
    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/transfers/{}", transfer_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["payer_id"], payer_id.to_string());
    assert_eq!(json["payee_id"], payee_id.to_string());
    assert_eq!(json["amount"], "100.50");
}

#[tokio::test]
async fn test_register_rejects_invalid_document() {
    let app = common::spawn_app(true);

    // Valid shape, wrong check digits.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/users",
            json!({
                "first_name": "Maria",
                "last_name": "Test",
                "document": "529.982.247-26",
                "email": "maria@example.com",
                "password": "s3cret",
                "balance": "0",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error_code"], "invalid_document");
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let app = common::spawn_app(true);
    register(
        &app,
        "Maria",
        "529.982.247-25",
        "maria@example.com",
        "0",
        "common",
    )
    .await;

    // Same document, different email.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/users",
            json!({
                "first_name": "Marina",
                "last_name": "Test",
                "document": "52998224725",
                "email": "marina@example.com",
                "password": "s3cret",
                "balance": "0",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error_code"], "user_already_exists");

    // Different document, same email.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/users",
            json!({
                "first_name": "Marina",
                "last_name": "Test",
                "document": "168.995.350-09",
                "email": "maria@example.com",
                "password": "s3cret",
                "balance": "0",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_malformed_balance() {
    let app = common::spawn_app(true);

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/users",
            json!({
                "first_name": "Maria",
                "last_name": "Test",
                "document": "529.982.247-25",
                "email": "maria@example.com",
                "password": "s3cret",
                "balance": "10.123",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "invalid_request");
}

#[tokio::test]
async fn test_transfer_insufficient_funds() {
    let app = common::spawn_app(true);
    let payer_id = register(
        &app,
        "Maria",
        "529.982.247-25",
        "maria@example.com",
        "90.00",
        "common",
    )
    .await;
    let payee_id = register(
        &app,
        "Joao",
        "168.995.350-09",
        "joao@example.com",
        "0",
        "common",
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/transfer",
            json!({
                "payer_id": payer_id,
                "payee_id": payee_id,
                "amount": "100.00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error_code"], "insufficient_funds");

    // Nothing moved.
    assert_eq!(balance_string(&app, payer_id).await, "90.00");
    assert_eq!(balance_string(&app, payee_id).await, "0.00");
}

#[tokio::test]
async fn test_transfer_merchant_payer_forbidden() {
    let app = common::spawn_app(true);
    let payer_id = register(
        &app,
        "Loja",
        "529.982.247-25",
        "loja@example.com",
        "1000.00",
        "merchant",
    )
    .await;
    let payee_id = register(
        &app,
        "Joao",
        "168.995.350-09",
        "joao@example.com",
        "0",
        "common",
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/transfer",
            json!({
                "payer_id": payer_id,
                "payee_id": payee_id,
                "amount": "100.00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error_code"], "merchant_not_allowed");
}

#[tokio::test]
async fn test_transfer_unknown_payer_not_found() {
    let app = common::spawn_app(true);
    let payee_id = register(
        &app,
        "Joao",
        "168.995.350-09",
        "joao@example.com",
        "0",
        "common",
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/transfer",
            json!({
                "payer_id": Uuid::new_v4(),
                "payee_id": payee_id,
                "amount": "100.00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error_code"], "user_not_found");
}

#[tokio::test]
async fn test_transfer_rejects_invalid_requests() {
    let app = common::spawn_app(true);
    let payer_id = register(
        &app,
        "Maria",
        "529.982.247-25",
        "maria@example.com",
        "1000.00",
        "common",
    )
    .await;
    let payee_id = register(
        &app,
        "Joao",
        "168.995.350-09",
        "joao@example.com",
        "0",
        "common",
    )
    .await;

    // Self-transfer.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/transfer",
            json!({
                "payer_id": payer_id,
                "payee_id": payer_id,
                "amount": "100.00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "same_payer_payee");

    // Non-positive amount.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/transfer",
            json!({
                "payer_id": payer_id,
                "payee_id": payee_id,
                "amount": "-5.00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "invalid_amount");

    // Unparseable amount.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/transfer",
            json!({
                "payer_id": payer_id,
                "payee_id": payee_id,
                "amount": "lots",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "invalid_request");
}

#[tokio::test]
async fn test_transfer_denied_by_gate() {
    let app = common::spawn_app(false);
    let payer_id = register(
        &app,
        "Maria",
        "529.982.247-25",
        "maria@example.com",
        "1000.00",
        "common",
    )
    .await;
    let payee_id = register(
        &app,
        "Joao",
        "168.995.350-09",
        "joao@example.com",
        "500.00",
        "common",
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/transfer",
            json!({
                "payer_id": payer_id,
                "payee_id": payee_id,
                "amount": "100.00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error_code"],
        "transfer_not_authorized"
    );

    // Funds were never touched.
    assert_eq!(balance_string(&app, payer_id).await, "1000.00");
    assert_eq!(balance_string(&app, payee_id).await, "500.00");
    assert!(app.transfers.all().await.is_empty());
}

#[tokio::test]
async fn test_list_users_pages() {
    let app = common::spawn_app(true);
    register(
        &app,
        "Maria",
        "529.982.247-25",
        "maria@example.com",
        "0",
        "common",
    )
    .await;
    register(
        &app,
        "Joao",
        "168.995.350-09",
        "joao@example.com",
        "0",
        "common",
    )
    .await;

    let response = app.router.clone().oneshot(get("/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["users"].as_array().unwrap().len(), 2);

    let response = app
        .router
        .clone()
        .oneshot(get("/users?page=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["users"].as_array().unwrap().is_empty());

    // The largest page number a client can encode is still just an empty page.
    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/users?page={}", i64::MAX)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["users"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_resources_return_not_found() {
    let app = common::spawn_app(true);

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/users/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/transfers/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error_code"],
        "transfer_not_found"
    );
}
