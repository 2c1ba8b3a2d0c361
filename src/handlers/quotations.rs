use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{created_response, AppJson, AppPath},
    services::quotation::{
        CutToSizeQuotationDto, CutToSizeQuotationRequest, FullSheetQuotationDto,
        FullSheetQuotationRequest, QuotationDto, QuotationPurgeResult,
    },
    ApiResponse, AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

#[utoipa::path(
    get,
    path = "/api/v1/quotations/full-sheets",
    tag = "Quotations",
    responses((status = 200, description = "Full-sheet quotations, newest first", body = Vec<FullSheetQuotationDto>))
)]
pub async fn list_full_sheets(
    State(state): State<AppState>,
) -> Result<Json<Vec<FullSheetQuotationDto>>, ApiError> {
    Ok(Json(state.services.quotations.full_sheets().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotations/cut-to-size",
    tag = "Quotations",
    responses((status = 200, description = "Cut-to-size quotations, newest first", body = Vec<CutToSizeQuotationDto>))
)]
pub async fn list_cut_to_size(
    State(state): State<AppState>,
) -> Result<Json<Vec<CutToSizeQuotationDto>>, ApiError> {
    Ok(Json(state.services.quotations.cut_to_size().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotations/{id}",
    tag = "Quotations",
    params(("id" = i32, Path, description = "Quotation id; full-sheet quotations are checked first")),
    responses(
        (status = 200, description = "Quotation tagged with its kind", body = QuotationDto),
        (status = 404, description = "Quotation not found", body = ErrorResponse)
    )
)]
pub async fn get_quotation(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<QuotationDto>, ApiError> {
    Ok(Json(state.services.quotations.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/quotations/full-sheets",
    tag = "Quotations",
    request_body = FullSheetQuotationRequest,
    responses(
        (status = 201, description = "Quotation stored", body = ApiResponse<FullSheetQuotationDto>),
        (status = 400, description = "Missing or non-positive figures", body = ErrorResponse),
        (status = 404, description = "Referenced catalog row not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_full_sheet(
    State(state): State<AppState>,
    AppJson(request): AppJson<FullSheetQuotationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.quotations.create_full_sheet(request).await?;
    Ok(created_response(created, "Quotation created successfully"))
}

#[utoipa::path(
    post,
    path = "/api/v1/quotations/cut-to-size",
    tag = "Quotations",
    request_body = CutToSizeQuotationRequest,
    responses(
        (status = 201, description = "Quotation stored", body = ApiResponse<CutToSizeQuotationDto>),
        (status = 400, description = "Missing or non-positive figures", body = ErrorResponse),
        (status = 404, description = "Referenced catalog row not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_cut_to_size(
    State(state): State<AppState>,
    AppJson(request): AppJson<CutToSizeQuotationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.quotations.create_cut_to_size(request).await?;
    Ok(created_response(created, "Quotation created successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/quotations/full-sheets",
    tag = "Quotations",
    responses((status = 200, description = "All full-sheet quotations deleted", body = QuotationPurgeResult)),
    security(("Bearer" = []))
)]
pub async fn delete_all_full_sheets(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.services.quotations.delete_all_full_sheets().await?;
    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/api/v1/quotations/cut-to-size",
    tag = "Quotations",
    responses((status = 200, description = "All cut-to-size quotations deleted", body = QuotationPurgeResult)),
    security(("Bearer" = []))
)]
pub async fn delete_all_cut_to_size(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.services.quotations.delete_all_cut_to_size().await?;
    Ok(Json(result))
}
