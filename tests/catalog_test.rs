mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn category_and_grade_crud() {
    let app = TestApp::new().await;

    let (status, category) = app
        .as_admin(Method::POST, "/api/v1/categories", Some(json!({ "name": "Acrylic" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .as_admin(Method::POST, "/api/v1/categories", Some(json!({ "name": "Acrylic" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    for code in ["CAST", "EXTRUDED"] {
        let (status, _) = app
            .as_admin(
                Method::POST,
                "/api/v1/grades",
                Some(json!({ "categoryId": category_id, "typeCode": code })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, error) = app
        .as_admin(
            Method::POST,
            "/api/v1/grades",
            Some(json!({ "categoryId": category_id, "typeCode": "CAST" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["message"], "Grade 'CAST' already exists in this category");

    let (_, with_grades) = app.get("/api/v1/categories/with-grades").await;
    assert_eq!(with_grades[0]["name"], "Acrylic");
    assert_eq!(with_grades[0]["grades"].as_array().unwrap().len(), 2);

    let (_, by_type) = app.get("/api/v1/grades/by-type/CAST").await;
    assert_eq!(by_type.as_array().unwrap().len(), 1);

    let (status, renamed) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/categories/{category_id}"),
            Some(json!({ "name": "PMMA" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["data"]["name"], "PMMA");

    let (status, _) = app
        .as_admin(Method::DELETE, &format!("/api/v1/categories/{category_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, grades) = app.get("/api/v1/grades").await;
    assert!(grades.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_price_triple_is_a_conflict() {
    let app = TestApp::new().await;
    let point = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(2.5), (100, 200), dec!(100.00))
        .await;

    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/prices",
            Some(json!({
                "productDetailId": point.detail_id,
                "thicknessId": point.thickness_id,
                "sizeId": point.size_id,
                "price": 110.00
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Combination of Product Detail, Thickness '2.5', and Size '100x200' already exists"
    );
}

#[tokio::test]
async fn prices_by_grade_carry_display_fields() {
    let app = TestApp::new().await;
    let point = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(2.5), (100, 200), dec!(100))
        .await;

    let (status, prices) = app
        .get(&format!("/api/v1/prices/grade/{}", point.grade_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let row = &prices[0];
    assert_eq!(row["thicknessName"], "2.5mm");
    assert_eq!(row["length"], 100);
    assert_eq!(row["breadth"], 200);
    assert_eq!(row["price"], "100.00");

    let (_, grouped) = app
        .get(&format!(
            "/api/v1/product-details/grade/{}/prices",
            point.grade_id
        ))
        .await;
    assert_eq!(grouped["typeCode"], "CAST");
    assert_eq!(grouped["productDetails"][0]["series"], "Clear");
    assert_eq!(
        grouped["productDetails"][0]["prices"].as_array().unwrap().len(),
        1
    );
}

#[tokio::test]
async fn price_updates_only_touch_the_price() {
    let app = TestApp::new().await;
    let point = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(3), (8, 4), dec!(100))
        .await;

    let (status, body) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/prices/{}", point.price_id),
            Some(json!({ "price": 125.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(decimal(&body["data"]["price"]), dec!(125.50));
    assert_eq!(body["data"]["sizeId"], point.size_id);

    let (status, _) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/prices/{}", point.price_id),
            Some(json!({ "price": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dimensions_validate_and_reject_duplicates() {
    let app = TestApp::new().await;

    let (status, created) = app
        .as_admin(Method::POST, "/api/v1/thicknesses", Some(json!({ "thickness": 2.5 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["thicknessName"], "2.5mm");

    let (status, _) = app
        .as_admin(Method::POST, "/api/v1/thicknesses", Some(json!({ "thickness": 2.5 })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .as_admin(Method::POST, "/api/v1/thicknesses", Some(json!({ "thickness": -1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Valid thickness value is required");

    let (status, size) = app
        .as_admin(
            Method::POST,
            "/api/v1/sizes",
            Some(json!({ "length": 2440, "breadth": 1220 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(size["data"]["sizeName"], "2440x1220");

    let (status, _) = app
        .as_admin(Method::POST, "/api/v1/sizes", Some(json!({ "length": 2440 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn priced_thickness_cannot_change_value() {
    let app = TestApp::new().await;
    let point = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(3), (8, 4), dec!(100))
        .await;

    let (status, _) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/thicknesses/{}", point.thickness_id),
            Some(json!({ "thickness": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, unused) = app
        .as_admin(Method::POST, "/api/v1/thicknesses", Some(json!({ "thickness": 10 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/thicknesses/{}", unused["data"]["id"]),
            Some(json!({ "thickness": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["thicknessName"], "12mm");
}

#[tokio::test]
async fn series_must_be_present_and_unique_per_grade() {
    let app = TestApp::new().await;
    let point = app
        .seed_price_point("Acrylic", "CAST", "Clear", dec!(3), (8, 4), dec!(100))
        .await;

    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/product-details",
            Some(json!({ "gradeId": point.grade_id, "series": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Series is required");

    let (status, _) = app
        .as_admin(
            Method::POST,
            "/api/v1/product-details",
            Some(json!({ "gradeId": point.grade_id, "series": "Clear" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .as_admin(
            Method::POST,
            "/api/v1/product-details",
            Some(json!({ "gradeId": 999, "series": "Opal" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, filtered) = app
        .get(&format!("/api/v1/product-details?gradeId={}", point.grade_id))
        .await;
    assert_eq!(filtered[0]["gradeTypeCode"], "CAST");
}

#[tokio::test]
async fn products_search_and_filter_ignore_case() {
    let app = TestApp::new().await;
    for (name, category) in [
        ("Clear Acrylic Sheet", "Acrylic"),
        ("Opal Acrylic Sheet", "acrylic"),
        ("HDPE Board", "HDPE"),
    ] {
        let (status, _) = app
            .as_admin(
                Method::POST,
                "/api/v1/products",
                Some(json!({ "productName": name, "categoryName": category })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, found) = app.get("/api/v1/products/search?name=ACRYLIC").await;
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (_, by_category) = app.get("/api/v1/products/category/ACRYLIC").await;
    assert_eq!(by_category.as_array().unwrap().len(), 2);

    let (status, _) = app.get("/api/v1/products/search?name=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, purge) = app
        .as_admin(Method::DELETE, "/api/v1/products", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purge["data"]["deletedCount"], 3);
    assert_eq!(purge["data"]["remainingCount"], 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_raw(
            Method::POST,
            "/api/v1/categories",
            "{\"name\": ",
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Malformed request body"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = TestApp::new().await;
    for (uri, message) in [
        ("/api/v1/categories/7", "Category not found: 7"),
        ("/api/v1/grades/7", "Grade not found: 7"),
        ("/api/v1/thicknesses/7", "Thickness not found: 7"),
        ("/api/v1/sizes/7", "Size not found: 7"),
        ("/api/v1/products/7", "Product not found: 7"),
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn health_and_docs_are_served() {
    let app = TestApp::new().await;

    let (status, banner) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(banner["status"], "UP");

    let (status, live) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(live["status"], "UP");

    let (status, db) = app.get("/health/db").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db["status"], "UP");

    let (status, doc) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/cart"].is_object());
}

#[tokio::test]
async fn responses_echo_the_request_id() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api/v1/categories", None, None)
        .await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn non_numeric_ids_get_a_json_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/categories/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid path parameter"));

    let (status, body) = app
        .as_user(Method::PUT, "/api/v1/cart/abc", Some(json!({ "quantity": 2 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}
