use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{
        created_response, message_response, updated_response, AppJson, AppPath, AppQuery,
    },
    services::{
        product::{BulkDeleteResult, ProductDto, ProductInput},
        CrudService,
    },
    ApiResponse, AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive fragment of the product name
    #[serde(default)]
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    responses((status = 200, description = "All products", body = Vec<ProductDto>))
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    Ok(Json(state.services.products.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductDto),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ProductDto>, ApiError> {
    Ok(Json(state.services.products.get_by_id(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/category/{name}",
    tag = "Products",
    params(("name" = String, Path, description = "Category name, any case")),
    responses((status = 200, description = "Products in the category", body = Vec<ProductDto>))
)]
pub async fn products_by_category(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    Ok(Json(state.services.products.by_category_name(&name).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    tag = "Products",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductDto>),
        (status = 400, description = "Blank search term", body = ErrorResponse)
    )
)]
pub async fn search_products(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    Ok(Json(state.services.products.search(&query.name).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductDto>),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(input): AppJson<ProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.products.create(input).await?;
    Ok(created_response(created, "Product created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<ProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.services.products.update(id, input).await?;
    Ok(updated_response(updated, "Product updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.products.delete(id).await?;
    Ok(message_response("Product deleted successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products",
    tag = "Products",
    responses((status = 200, description = "All products deleted", body = ApiResponse<BulkDeleteResult>)),
    security(("Bearer" = []))
)]
pub async fn delete_all_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.services.products.delete_all().await?;
    Ok(updated_response(result, "All products deleted successfully"))
}
