use crate::{
    auth::{optional_auth_user, AuthPayload, LoginRequest, RegisterRequest},
    errors::{ApiError, ErrorResponse},
    handlers::common::{created_response, updated_response, AppJson},
    ApiResponse, AppState,
};
use axum::{extract::State, http::HeaderMap, response::IntoResponse, routing::post, Router};

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and token issued", body = ApiResponse<AuthPayload>),
        (status = 400, description = "Username or password too short", body = ErrorResponse),
        (status = 403, description = "Admin role requested without an admin token", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller_is_admin = optional_auth_user(&headers, &state.auth)
        .map(|user| user.is_admin())
        .unwrap_or(false);
    let payload = state.auth.register(request, caller_is_admin).await?;
    Ok(created_response(payload, "User registered successfully"))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<AuthPayload>),
        (status = 401, description = "Invalid username or password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = state.auth.login(request).await?;
    Ok(updated_response(payload, "Login successful"))
}
