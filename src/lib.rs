//! Plastics quotation API
//!
//! Catalog of plastic sheet materials (categories, grades, series,
//! thicknesses, sizes), the pricing matrix over them, a shared cart and
//! stored full-sheet / cut-to-size quotations.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::{AuthRouterExt, AuthService, Role};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let auth = Arc::new(AuthService::new(
            auth::AuthConfig::from(&config),
            db.clone(),
        ));
        Self {
            services: handlers::AppServices::new(db.clone()),
            db,
            config,
            auth,
        }
    }
}

// Envelope for mutations; reads return the plain DTO.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Acknowledgement with no payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Routes mounted under `/api/v1`.
///
/// Reads are public, the cart and quotation submission need a signed-in
/// user, and every other mutation is admin only.
pub fn api_v1_routes() -> Router<AppState> {
    use handlers::{
        cart, categories, grades, prices, product_details, products, quotations, sizes,
        thicknesses,
    };

    let catalog_read = Router::new()
        .route("/categories", get(categories::list_categories))
        .route(
            "/categories/with-grades",
            get(categories::list_categories_with_grades),
        )
        .route("/categories/:id", get(categories::get_category))
        .route("/categories/:id/grades", get(categories::category_grades))
        .route("/grades", get(grades::list_grades))
        .route("/grades/:id", get(grades::get_grade))
        .route(
            "/grades/by-category/:category_id",
            get(grades::grades_by_category),
        )
        .route("/grades/by-type/:type_code", get(grades::grades_by_type))
        .route("/products", get(products::list_products))
        .route("/products/search", get(products::search_products))
        .route("/products/category/:name", get(products::products_by_category))
        .route("/products/:id", get(products::get_product))
        .route(
            "/product-details",
            get(product_details::list_product_details),
        )
        .route(
            "/product-details/:id",
            get(product_details::get_product_detail),
        )
        .route(
            "/product-details/grade/:grade_id/prices",
            get(product_details::grade_details_with_prices),
        )
        .route("/thicknesses", get(thicknesses::list_thicknesses))
        .route("/thicknesses/:id", get(thicknesses::get_thickness))
        .route("/sizes", get(sizes::list_sizes))
        .route("/sizes/:id", get(sizes::get_size))
        .route("/prices/grade/:grade_id", get(prices::prices_by_grade))
        .route("/quotations/full-sheets", get(quotations::list_full_sheets))
        .route("/quotations/cut-to-size", get(quotations::list_cut_to_size))
        .route("/quotations/:id", get(quotations::get_quotation));

    let catalog_admin = Router::new()
        .route("/categories", post(categories::create_category))
        .route(
            "/categories/:id",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route("/grades", post(grades::create_grade))
        .route(
            "/grades/:id",
            put(grades::update_grade).delete(grades::delete_grade),
        )
        .route(
            "/products",
            post(products::create_product).delete(products::delete_all_products),
        )
        .route(
            "/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route(
            "/product-details",
            post(product_details::create_product_detail)
                .delete(product_details::delete_all_product_details),
        )
        .route(
            "/product-details/:id",
            put(product_details::update_product_detail)
                .delete(product_details::delete_product_detail),
        )
        .route(
            "/thicknesses",
            post(thicknesses::create_thickness).delete(thicknesses::delete_all_thicknesses),
        )
        .route(
            "/thicknesses/:id",
            put(thicknesses::update_thickness).delete(thicknesses::delete_thickness),
        )
        .route(
            "/sizes",
            post(sizes::create_size).delete(sizes::delete_all_sizes),
        )
        .route(
            "/sizes/:id",
            put(sizes::update_size).delete(sizes::delete_size),
        )
        .route(
            "/prices",
            post(prices::create_price).delete(prices::delete_all_prices),
        )
        .route(
            "/prices/:id",
            put(prices::update_price).delete(prices::delete_price),
        )
        .route(
            "/quotations/full-sheets",
            delete(quotations::delete_all_full_sheets),
        )
        .route(
            "/quotations/cut-to-size",
            delete(quotations::delete_all_cut_to_size),
        )
        .with_role(Role::Admin);

    let cart_routes = Router::new()
        .route("/cart", get(cart::list_cart).post(cart::add_to_cart))
        .route("/cart/total", get(cart::cart_total))
        .route(
            "/cart/:id",
            put(cart::update_cart_item).delete(cart::remove_cart_item),
        )
        .with_auth();

    let quotation_submit = Router::new()
        .route(
            "/quotations/full-sheets",
            post(quotations::create_full_sheet),
        )
        .route(
            "/quotations/cut-to-size",
            post(quotations::create_cut_to_size),
        )
        .with_auth();

    Router::new()
        .merge(catalog_read)
        .merge(catalog_admin)
        .merge(cart_routes)
        .merge(quotation_submit)
}

/// Full application router. `main` adds CORS, timeouts and compression on top.
pub fn app_router(state: AppState) -> Router {
    let auth_service = state.auth.clone();
    let db = state.db.clone();

    Router::new()
        .nest("/api/v1", api_v1_routes())
        .nest("/auth", handlers::auth::auth_router())
        .with_state(state)
        .merge(health::health_routes(db))
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(Extension(auth_service))
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
}
