use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{created_response, message_response, updated_response, AppJson, AppPath},
    services::{
        product::BulkDeleteResult,
        size::{SizeDto, SizeInput},
        CrudService,
    },
    ApiResponse, AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

#[utoipa::path(
    get,
    path = "/api/v1/sizes",
    tag = "Dimensions",
    responses((status = 200, description = "Sizes by length then breadth", body = Vec<SizeDto>))
)]
pub async fn list_sizes(
    State(state): State<AppState>,
) -> Result<Json<Vec<SizeDto>>, ApiError> {
    Ok(Json(state.services.sizes.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/sizes/{id}",
    tag = "Dimensions",
    params(("id" = i32, Path, description = "Size id")),
    responses(
        (status = 200, description = "Size", body = SizeDto),
        (status = 404, description = "Size not found", body = ErrorResponse)
    )
)]
pub async fn get_size(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<SizeDto>, ApiError> {
    Ok(Json(state.services.sizes.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/sizes",
    tag = "Dimensions",
    request_body = SizeInput,
    responses(
        (status = 201, description = "Size created", body = ApiResponse<SizeDto>),
        (status = 400, description = "Valid length and breadth are required", body = ErrorResponse),
        (status = 409, description = "Size with these dimensions already exists", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_size(
    State(state): State<AppState>,
    AppJson(input): AppJson<SizeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.sizes.create(input).await?;
    Ok(created_response(created, "Size created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/sizes/{id}",
    tag = "Dimensions",
    params(("id" = i32, Path, description = "Size id")),
    request_body = SizeInput,
    responses(
        (status = 200, description = "Size changed", body = ApiResponse<SizeDto>),
        (status = 404, description = "Size not found", body = ErrorResponse),
        (status = 409, description = "Dimensions taken, or size already referenced", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_size(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<SizeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.services.sizes.update(id, input).await?;
    Ok(updated_response(updated, "Size updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sizes/{id}",
    tag = "Dimensions",
    params(("id" = i32, Path, description = "Size id")),
    responses(
        (status = 200, description = "Size and its dependents deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Size not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_size(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.sizes.delete(id).await?;
    Ok(message_response("Size deleted successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sizes",
    tag = "Dimensions",
    responses((status = 200, description = "All sizes deleted", body = ApiResponse<BulkDeleteResult>)),
    security(("Bearer" = []))
)]
pub async fn delete_all_sizes(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.services.sizes.delete_all().await?;
    Ok(updated_response(result, "All sizes deleted successfully"))
}
