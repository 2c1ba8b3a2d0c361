use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{created_response, message_response, updated_response, AppJson, AppPath},
    services::{
        product::BulkDeleteResult,
        thickness::{ThicknessDto, ThicknessInput},
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
    path = "/api/v1/thicknesses",
    tag = "Dimensions",
    responses((status = 200, description = "Thicknesses, thinnest first", body = Vec<ThicknessDto>))
)]
pub async fn list_thicknesses(
    State(state): State<AppState>,
) -> Result<Json<Vec<ThicknessDto>>, ApiError> {
    Ok(Json(state.services.thicknesses.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/thicknesses/{id}",
    tag = "Dimensions",
    params(("id" = i32, Path, description = "Thickness id")),
    responses(
        (status = 200, description = "Thickness", body = ThicknessDto),
        (status = 404, description = "Thickness not found", body = ErrorResponse)
    )
)]
pub async fn get_thickness(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ThicknessDto>, ApiError> {
    Ok(Json(state.services.thicknesses.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/thicknesses",
    tag = "Dimensions",
    request_body = ThicknessInput,
    responses(
        (status = 201, description = "Thickness created", body = ApiResponse<ThicknessDto>),
        (status = 400, description = "Valid thickness value is required", body = ErrorResponse),
        (status = 409, description = "Thickness with this value already exists", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_thickness(
    State(state): State<AppState>,
    AppJson(input): AppJson<ThicknessInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.thicknesses.create(input).await?;
    Ok(created_response(created, "Thickness created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/thicknesses/{id}",
    tag = "Dimensions",
    params(("id" = i32, Path, description = "Thickness id")),
    request_body = ThicknessInput,
    responses(
        (status = 200, description = "Thickness changed", body = ApiResponse<ThicknessDto>),
        (status = 404, description = "Thickness not found", body = ErrorResponse),
        (status = 409, description = "Value taken, or thickness already referenced", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_thickness(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<ThicknessInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.services.thicknesses.update(id, input).await?;
    Ok(updated_response(updated, "Thickness updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/thicknesses/{id}",
    tag = "Dimensions",
    params(("id" = i32, Path, description = "Thickness id")),
    responses(
        (status = 200, description = "Thickness and its dependents deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Thickness not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_thickness(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.thicknesses.delete(id).await?;
    Ok(message_response("Thickness deleted successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/thicknesses",
    tag = "Dimensions",
    responses((status = 200, description = "All thicknesses deleted", body = ApiResponse<BulkDeleteResult>)),
    security(("Bearer" = []))
)]
pub async fn delete_all_thicknesses(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.services.thicknesses.delete_all().await?;
    Ok(updated_response(result, "All thicknesses deleted successfully"))
}
