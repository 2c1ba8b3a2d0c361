use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{created_response, message_response, updated_response, AppJson, AppPath},
    services::{
        category::{CategoryDto, CategoryInput, CategoryWithGradesDto},
        grade::GradeDto,
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
    path = "/api/v1/categories",
    tag = "Catalog",
    responses((status = 200, description = "All categories by name", body = Vec<CategoryDto>))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    Ok(Json(state.services.categories.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/with-grades",
    tag = "Catalog",
    responses((status = 200, description = "Categories with their grade codes", body = Vec<CategoryWithGradesDto>))
)]
pub async fn list_categories_with_grades(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithGradesDto>>, ApiError> {
    Ok(Json(state.services.categories.list_with_grades().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryDto),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<CategoryDto>, ApiError> {
    Ok(Json(state.services.categories.get_by_id(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/grades",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Grades of the category", body = Vec<GradeDto>),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn category_grades(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Vec<GradeDto>>, ApiError> {
    Ok(Json(state.services.categories.grades_of(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Catalog",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryDto>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Duplicate name", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.services.categories.create(input).await?;
    Ok(created_response(created, "Category created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<CategoryDto>),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.services.categories.update(id, input).await?;
    Ok(updated_response(updated, "Category updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category and everything under it deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.categories.delete(id).await?;
    Ok(message_response("Category deleted successfully"))
}
