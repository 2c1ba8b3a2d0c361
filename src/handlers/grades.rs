use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{created_response, message_response, updated_response, AppJson, AppPath},
    services::{
        grade::{CreateGradeInput, GradeDto, UpdateGradeInput},
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
    path = "/api/v1/grades",
    tag = "Catalog",
    responses((status = 200, description = "All grades", body = Vec<GradeDto>))
)]
pub async fn list_grades(State(state): State<AppState>) -> Result<Json<Vec<GradeDto>>, ApiError> {
    Ok(Json(state.services.grades.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Grade id")),
    responses(
        (status = 200, description = "Grade", body = GradeDto),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    )
)]
pub async fn get_grade(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<GradeDto>, ApiError> {
    Ok(Json(state.services.grades.get_by_id(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/by-category/{category_id}",
    tag = "Catalog",
    params(("category_id" = i32, Path, description = "Category id")),
    responses((status = 200, description = "Grades in the category", body = Vec<GradeDto>))
)]
pub async fn grades_by_category(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i32>,
) -> Result<Json<Vec<GradeDto>>, ApiError> {
    Ok(Json(state.services.grades.by_category(category_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/by-type/{type_code}",
    tag = "Catalog",
    params(("type_code" = String, Path, description = "Grade type code")),
    responses((status = 200, description = "Grades with the type code", body = Vec<GradeDto>))
)]
pub async fn grades_by_type(
    State(state): State<AppState>,
    AppPath(type_code): AppPath<String>,
) -> Result<Json<Vec<GradeDto>>, ApiError> {
    Ok(Json(state.services.grades.by_type_code(&type_code).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/grades",
    tag = "Catalog",
    request_body = CreateGradeInput,
    responses(
        (status = 201, description = "Grade created", body = ApiResponse<GradeDto>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Duplicate type code", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_grade(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateGradeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.grades.create(input).await?;
    Ok(created_response(created, "Grade created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/grades/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Grade id")),
    request_body = UpdateGradeInput,
    responses(
        (status = 200, description = "Grade updated", body = ApiResponse<GradeDto>),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_grade(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<UpdateGradeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.services.grades.update(id, input).await?;
    Ok(updated_response(updated, "Grade updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/grades/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Grade id")),
    responses(
        (status = 200, description = "Grade deleted with its series and prices", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_grade(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.grades.delete(id).await?;
    Ok(message_response("Grade deleted successfully"))
}
