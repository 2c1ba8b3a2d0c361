use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{created_response, message_response, updated_response, AppJson, AppPath},
    services::{
        pricing::{CreatePriceInput, PriceDto, UpdatePriceInput},
        product::BulkDeleteResult,
    },
    ApiResponse, AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

#[utoipa::path(
    get,
    path = "/api/v1/prices/grade/{grade_id}",
    tag = "Pricing",
    params(("grade_id" = i32, Path, description = "Grade id")),
    responses(
        (status = 200, description = "Every price under the grade", body = Vec<PriceDto>),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    )
)]
pub async fn prices_by_grade(
    State(state): State<AppState>,
    AppPath(grade_id): AppPath<i32>,
) -> Result<Json<Vec<PriceDto>>, ApiError> {
    Ok(Json(state.services.pricing.prices_by_grade(grade_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/prices",
    tag = "Pricing",
    request_body = CreatePriceInput,
    responses(
        (status = 201, description = "Price added", body = ApiResponse<PriceDto>),
        (status = 400, description = "Non-positive price", body = ErrorResponse),
        (status = 404, description = "Series, thickness or size not found", body = ErrorResponse),
        (status = 409, description = "Combination already priced", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_price(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePriceInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.pricing.create_price(input).await?;
    Ok(created_response(created, "Price added successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/prices/{id}",
    tag = "Pricing",
    params(("id" = i32, Path, description = "Price id")),
    request_body = UpdatePriceInput,
    responses(
        (status = 200, description = "Price changed", body = ApiResponse<PriceDto>),
        (status = 404, description = "Price not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_price(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<UpdatePriceInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.services.pricing.update_price(id, input).await?;
    Ok(updated_response(updated, "Price updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/prices/{id}",
    tag = "Pricing",
    params(("id" = i32, Path, description = "Price id")),
    responses(
        (status = 200, description = "Price deleted with its cart lines and quotations", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Price not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_price(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.pricing.delete_price(id).await?;
    Ok(message_response("Price deleted successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/prices",
    tag = "Pricing",
    responses((status = 200, description = "Whole matrix cleared", body = ApiResponse<BulkDeleteResult>)),
    security(("Bearer" = []))
)]
pub async fn delete_all_prices(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.services.pricing.delete_all().await?;
    Ok(updated_response(result, "All prices deleted successfully"))
}
