#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use plastics_quote_api::{
    config::AppConfig,
    db::{self, DbConfig},
    services::{
        category::CategoryInput,
        grade::CreateGradeInput,
        pricing::CreatePriceInput,
        product_detail::CreateProductDetailInput,
        size::SizeInput,
        thickness::ThicknessInput,
        CrudService,
    },
    AppState,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

const TEST_SECRET: &str = "q8Vt2LmZ9xRw4KpN7sJd1HfGc6YbEu3TaXo0WiQe5ZrUy8MnBv2CkLj4HgFd7SsPp";

/// Ids of a fully wired price-point: category, grade, series, thickness, size and price.
#[derive(Debug, Clone, Copy)]
pub struct PricePoint {
    pub category_id: i32,
    pub grade_id: i32,
    pub detail_id: i32,
    pub thickness_id: i32,
    pub size_id: i32,
    pub price_id: i32,
}

/// Helper harness for spinning up the application against an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    admin_token: String,
    user_token: String,
}

impl TestApp {
    /// Construct a new test application with fresh database state and two
    /// accounts: the bootstrap admin and an ordinary user.
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_SECRET.to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        // A single connection keeps every query on the same in-memory database.
        let pool = db::establish_connection_with_config(&DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = plastics_quote_api::app_router(state.clone());

        let mut app = Self {
            router,
            state,
            admin_token: String::new(),
            user_token: String::new(),
        };
        app.admin_token = app.register("admin", "admin-password").await;
        app.user_token = app.register("buyer", "buyer-password").await;
        app
    }

    async fn register(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("token in register response")
            .to_string()
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    pub fn user_token(&self) -> &str {
        &self.user_token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request with a raw, possibly malformed, JSON body.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        raw_body: &'static str,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }
        let request = builder
            .body(Body::from(raw_body))
            .expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");
        split(response).await
    }

    /// Send a request and decode the JSON body (`Null` for an empty body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        split(self.request(method, uri, body, token).await).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn as_admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(self.admin_token())).await
    }

    pub async fn as_user(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(self.user_token())).await
    }

    /// Seed a complete price-point through the services.
    pub async fn seed_price_point(
        &self,
        category: &str,
        type_code: &str,
        series: &str,
        thickness: Decimal,
        (length, breadth): (i32, i32),
        price: Decimal,
    ) -> PricePoint {
        let services = &self.state.services;

        let category_id = match services
            .categories
            .get_all()
            .await
            .expect("list categories")
            .into_iter()
            .find(|c| c.name == category)
        {
            Some(existing) => existing.id,
            None => {
                services
                    .categories
                    .create(CategoryInput {
                        name: category.to_string(),
                    })
                    .await
                    .expect("seed category")
                    .id
            }
        };

        let grade_id = match services
            .grades
            .by_category(category_id)
            .await
            .expect("list grades")
            .into_iter()
            .find(|g| g.type_code == type_code)
        {
            Some(existing) => existing.id,
            None => {
                services
                    .grades
                    .create(CreateGradeInput {
                        category_id,
                        type_code: type_code.to_string(),
                    })
                    .await
                    .expect("seed grade")
                    .id
            }
        };

        let detail_id = match services
            .product_details
            .list_by_grade(Some(grade_id))
            .await
            .expect("list series")
            .into_iter()
            .find(|d| d.series == series)
        {
            Some(existing) => existing.id,
            None => {
                services
                    .product_details
                    .create(CreateProductDetailInput {
                        grade_id,
                        series: series.to_string(),
                    })
                    .await
                    .expect("seed series")
                    .id
            }
        };

        let thickness_id = match services
            .thicknesses
            .get_all()
            .await
            .expect("list thicknesses")
            .into_iter()
            .find(|t| t.thickness == thickness)
        {
            Some(existing) => existing.id,
            None => {
                services
                    .thicknesses
                    .create(ThicknessInput {
                        thickness: Some(thickness),
                    })
                    .await
                    .expect("seed thickness")
                    .id
            }
        };

        let size_id = match services
            .sizes
            .get_all()
            .await
            .expect("list sizes")
            .into_iter()
            .find(|s| s.length == length && s.breadth == breadth)
        {
            Some(existing) => existing.id,
            None => {
                services
                    .sizes
                    .create(SizeInput {
                        length: Some(length),
                        breadth: Some(breadth),
                    })
                    .await
                    .expect("seed size")
                    .id
            }
        };

        let price_id = services
            .pricing
            .create_price(CreatePriceInput {
                product_detail_id: detail_id,
                thickness_id,
                size_id,
                price: Some(price),
            })
            .await
            .expect("seed price")
            .id;

        PricePoint {
            category_id,
            grade_id,
            detail_id,
            thickness_id,
            size_id,
            price_id,
        }
    }
}

async fn split(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

/// Parse a decimal serialized as a JSON string or number.
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("expected decimal, got {other}"),
    }
}
