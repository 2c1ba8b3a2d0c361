mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

async fn app_with_price() -> (TestApp, i32) {
    let app = TestApp::new().await;
    let point = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(2.5), (100, 200), dec!(100.00))
        .await;
    (app, point.price_id)
}

#[tokio::test]
async fn discounted_add_then_quantity_update_keeps_effective_unit_price() {
    let (app, price_id) = app_with_price().await;

    let (status, body) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "productPriceId": price_id, "quantity": 3, "discount": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(decimal(&body["data"]["totalPrice"]), dec!(270.00));
    let line_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .as_user(
            Method::PUT,
            &format!("/api/v1/cart/{line_id}"),
            Some(json!({ "quantity": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["quantity"], 5);
    assert_eq!(decimal(&body["data"]["totalPrice"]), dec!(450.00));
}

#[tokio::test]
async fn adding_the_same_price_point_twice_merges_into_one_line() {
    let (app, price_id) = app_with_price().await;

    for quantity in [2, 3] {
        let (status, _) = app
            .as_user(
                Method::POST,
                "/api/v1/cart",
                Some(json!({ "productPriceId": price_id, "quantity": quantity })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, lines) = app
        .send(Method::GET, "/api/v1/cart", None, Some(app.user_token()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let lines = lines.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 5);
    assert_eq!(decimal(&lines[0]["totalPrice"]), dec!(500.00));
    assert_eq!(lines[0]["series"], "Clear");
    assert_eq!(lines[0]["gradeName"], "CAST");
    assert_eq!(lines[0]["thicknessName"], "2.5mm");
    assert_eq!(lines[0]["length"], 100);
    assert_eq!(lines[0]["breadth"], 200);
    assert_eq!(decimal(&lines[0]["unitPrice"]), dec!(100.00));
}

#[tokio::test]
async fn client_total_replaces_the_computed_total() {
    let (app, price_id) = app_with_price().await;

    let (status, body) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({
                "productPriceId": price_id,
                "quantity": 4,
                "discount": 10,
                "totalPrice": "123.45"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(decimal(&body["data"]["totalPrice"]), dec!(123.45));
}

#[tokio::test]
async fn quantity_below_one_is_rejected_and_line_is_unchanged() {
    let (app, price_id) = app_with_price().await;
    let (_, body) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "productPriceId": price_id, "quantity": 2 })),
        )
        .await;
    let line_id = body["data"]["id"].as_i64().unwrap();

    for quantity in [0, -1] {
        let (status, body) = app
            .as_user(
                Method::PUT,
                &format!("/api/v1/cart/{line_id}"),
                Some(json!({ "quantity": quantity })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Quantity must be at least 1");
    }

    let (_, lines) = app
        .send(Method::GET, "/api/v1/cart", None, Some(app.user_token()))
        .await;
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(decimal(&lines[0]["totalPrice"]), dec!(200.00));
}

#[tokio::test]
async fn cart_total_sums_lines() {
    let app = TestApp::new().await;
    let first = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(3), (8, 4), dec!(50.00))
        .await;
    let second = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(5), (8, 4), dec!(80.00))
        .await;

    for (price_id, quantity) in [(first.price_id, 2), (second.price_id, 1)] {
        app.as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "productPriceId": price_id, "quantity": quantity })),
        )
        .await;
    }

    let (status, total) = app
        .send(Method::GET, "/api/v1/cart/total", None, Some(app.user_token()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total["itemCount"], 2);
    assert_eq!(total["totalQuantity"], 3);
    assert_eq!(decimal(&total["totalPrice"]), dec!(180.00));
}

#[tokio::test]
async fn unknown_price_point_and_cart_line_are_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "productPriceId": 999, "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product price not found: 999");

    let (status, _) = app
        .as_user(Method::DELETE, "/api/v1/cart/42", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn removing_a_line_empties_the_cart() {
    let (app, price_id) = app_with_price().await;
    let (_, body) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "productPriceId": price_id, "quantity": 1 })),
        )
        .await;
    let line_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .as_user(Method::DELETE, &format!("/api/v1/cart/{line_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item removed from cart successfully");

    let (_, lines) = app
        .send(Method::GET, "/api/v1/cart", None, Some(app.user_token()))
        .await;
    assert!(lines.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_discount_is_a_validation_error() {
    let (app, price_id) = app_with_price().await;

    let (status, _) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "productPriceId": price_id, "quantity": 1, "discount": 120 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn amounts_past_the_money_range_are_rejected_without_touching_the_cart() {
    let app = TestApp::new().await;
    let point = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(3), (8, 4), dec!(99999999.99))
        .await;

    let (status, body) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({
                "productPriceId": point.price_id,
                "quantity": 1,
                "totalPrice": "70000000000000000000000000000"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "productPriceId": point.price_id, "quantity": 2000000000 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["message"], "Amount exceeds the supported range");

    let (_, lines) = app
        .send(Method::GET, "/api/v1/cart", None, Some(app.user_token()))
        .await;
    assert!(lines.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn quantity_update_past_the_money_range_leaves_the_line_alone() {
    let app = TestApp::new().await;
    let point = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(3), (8, 4), dec!(60000000.00))
        .await;
    let (status, body) = app
        .as_user(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "productPriceId": point.price_id, "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let line_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .as_user(
            Method::PUT,
            &format!("/api/v1/cart/{line_id}"),
            Some(json!({ "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (_, lines) = app
        .send(Method::GET, "/api/v1/cart", None, Some(app.user_token()))
        .await;
    assert_eq!(lines[0]["quantity"], 1);
    assert_eq!(decimal(&lines[0]["totalPrice"]), dec!(60000000.00));
}
