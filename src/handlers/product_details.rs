use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{
        created_response, message_response, updated_response, AppJson, AppPath, AppQuery,
    },
    services::{
        product::BulkDeleteResult,
        product_detail::{
            CreateProductDetailInput, GradePricesDto, ProductDetailDto, UpdateProductDetailInput,
        },
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
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct DetailFilter {
    pub grade_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/product-details",
    tag = "Catalog",
    params(DetailFilter),
    responses(
        (status = 200, description = "Series, optionally of one grade", body = Vec<ProductDetailDto>),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    )
)]
pub async fn list_product_details(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<DetailFilter>,
) -> Result<Json<Vec<ProductDetailDto>>, ApiError> {
    Ok(Json(
        state
            .services
            .product_details
            .list_by_grade(filter.grade_id)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/product-details/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Product detail id")),
    responses(
        (status = 200, description = "Series", body = ProductDetailDto),
        (status = 404, description = "Series not found", body = ErrorResponse)
    )
)]
pub async fn get_product_detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ProductDetailDto>, ApiError> {
    Ok(Json(state.services.product_details.get_by_id(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/product-details/grade/{grade_id}/prices",
    tag = "Catalog",
    params(("grade_id" = i32, Path, description = "Grade id")),
    responses(
        (status = 200, description = "Grade with each series and its prices", body = GradePricesDto),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    )
)]
pub async fn grade_details_with_prices(
    State(state): State<AppState>,
    AppPath(grade_id): AppPath<i32>,
) -> Result<Json<GradePricesDto>, ApiError> {
    Ok(Json(
        state.services.product_details.with_prices(grade_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/product-details",
    tag = "Catalog",
    request_body = CreateProductDetailInput,
    responses(
        (status = 201, description = "Series created", body = ApiResponse<ProductDetailDto>),
        (status = 400, description = "Series is required", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 409, description = "Series already exists for this grade", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_product_detail(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProductDetailInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.product_details.create(input).await?;
    Ok(created_response(created, "Product detail created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/product-details/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Product detail id")),
    request_body = UpdateProductDetailInput,
    responses(
        (status = 200, description = "Series renamed", body = ApiResponse<ProductDetailDto>),
        (status = 404, description = "Series not found", body = ErrorResponse),
        (status = 409, description = "Series already exists for this grade", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_product_detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<UpdateProductDetailInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.services.product_details.update(id, input).await?;
    Ok(updated_response(updated, "Product detail updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/product-details/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Product detail id")),
    responses(
        (status = 200, description = "Series deleted with its prices, cart lines and quotations", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Series not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_product_detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.product_details.delete(id).await?;
    Ok(message_response("Product detail deleted successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/product-details",
    tag = "Catalog",
    responses((status = 200, description = "All series deleted", body = ApiResponse<BulkDeleteResult>)),
    security(("Bearer" = []))
)]
pub async fn delete_all_product_details(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.services.product_details.delete_all().await?;
    Ok(updated_response(
        result,
        "All product details deleted successfully",
    ))
}
