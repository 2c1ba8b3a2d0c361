use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::common::{message_response, updated_response, AppJson, AppPath},
    services::cart::{AddToCartInput, CartItemDto, CartTotalDto, UpdateCartItemInput},
    ApiResponse, AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

#[utoipa::path(
    get,
    path = "/api/v1/cart",
    tag = "Cart",
    responses(
        (status = 200, description = "Cart lines with catalog names", body = Vec<CartItemDto>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn list_cart(State(state): State<AppState>) -> Result<Json<Vec<CartItemDto>>, ApiError> {
    Ok(Json(state.services.cart.cart_items().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/cart/total",
    tag = "Cart",
    responses((status = 200, description = "Line count, quantity and value of the cart", body = CartTotalDto)),
    security(("Bearer" = []))
)]
pub async fn cart_total(State(state): State<AppState>) -> Result<Json<CartTotalDto>, ApiError> {
    Ok(Json(state.services.cart.cart_total().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart",
    tag = "Cart",
    request_body = AddToCartInput,
    responses(
        (status = 200, description = "Line created or merged", body = ApiResponse<CartItemDto>),
        (status = 400, description = "Invalid quantity or discount", body = ErrorResponse),
        (status = 404, description = "Product price not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    AppJson(input): AppJson<AddToCartInput>,
) -> Result<impl IntoResponse, ApiError> {
    let line = state.services.cart.add_to_cart(input).await?;
    Ok(updated_response(line, "Item added to cart successfully"))
}

#[utoipa::path(
    put,
    path = "/api/v1/cart/{id}",
    tag = "Cart",
    params(("id" = i32, Path, description = "Cart line id")),
    request_body = UpdateCartItemInput,
    responses(
        (status = 200, description = "Quantity changed", body = ApiResponse<CartItemDto>),
        (status = 400, description = "Quantity must be at least 1", body = ErrorResponse),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<UpdateCartItemInput>,
) -> Result<impl IntoResponse, ApiError> {
    let line = state.services.cart.update_cart_item(id, input).await?;
    Ok(updated_response(line, "Cart item updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart/{id}",
    tag = "Cart",
    params(("id" = i32, Path, description = "Cart line id")),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.cart.remove_cart_item(id).await?;
    Ok(message_response("Item removed from cart successfully"))
}
