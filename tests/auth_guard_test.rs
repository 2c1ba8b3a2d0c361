mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn first_account_is_admin_and_later_ones_are_users() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "admin", "password": "admin-password" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["tokenType"], "Bearer");

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "buyer", "password": "buyer-password" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn wrong_password_and_duplicate_username_are_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "buyer", "password": "not-the-password" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            Some(json!({ "username": "buyer", "password": "another-password" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            Some(json!({ "username": "ab", "password": "short" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_role_needs_an_admin_caller() {
    let app = TestApp::new().await;
    let request = json!({ "username": "second-admin", "password": "long-enough", "role": "admin" });

    let (status, _) = app
        .send(Method::POST, "/auth/register", Some(request.clone()), Some(app.user_token()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::POST, "/auth/register", Some(request), Some(app.admin_token()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn reads_are_public() {
    let app = TestApp::new().await;
    for uri in [
        "/api/v1/categories",
        "/api/v1/grades",
        "/api/v1/products",
        "/api/v1/product-details",
        "/api/v1/thicknesses",
        "/api/v1/sizes",
        "/api/v1/quotations/full-sheets",
        "/api/v1/quotations/cut-to-size",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.is_array(), "{uri}");
    }
}

#[tokio::test]
async fn cart_requires_a_token() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/cart").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"]["code"].is_string());

    let (status, _) = app
        .send(Method::GET, "/api/v1/cart", None, Some("not-a-jwt"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_mutations_require_admin() {
    let app = TestApp::new().await;
    let body = json!({ "name": "Acrylic" });

    let (status, _) = app
        .send(Method::POST, "/api/v1/categories", Some(body.clone()), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .as_user(Method::POST, "/api/v1/categories", Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app
        .as_admin(Method::POST, "/api/v1/categories", Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Category created successfully");
}
