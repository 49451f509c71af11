use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{
        AddToCartRequest, CartMutation, CartView, SubCartList, SubCartWithItems,
        UpdateSubCartItemRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(view_cart))
}

pub fn add_router() -> Router<AppState> {
    Router::new().route("/", post(add_to_cart))
}

pub fn sub_cart_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sub_carts))
        .route("/{id}", get(get_sub_cart).delete(delete_sub_cart))
}

pub fn item_router() -> Router<AppState> {
    Router::new().route("/{id}", patch(update_item).delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart of the current user grouped by restaurant", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/add-to-cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "One unit added to the cart", body = ApiResponse<CartMutation>),
        (status = 400, description = "Food unavailable or not priced for the time serve"),
        (status = 404, description = "Food not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartMutation>>> {
    let resp = cart_service::add_item(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sub-carts",
    responses(
        (status = 200, description = "Sub carts with their items", body = ApiResponse<SubCartList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn list_sub_carts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SubCartList>>> {
    let resp = cart_service::list_sub_carts(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sub-carts/{id}",
    params(("id" = Uuid, Path, description = "Sub cart ID")),
    responses(
        (status = 200, description = "Sub cart with its items", body = ApiResponse<SubCartWithItems>),
        (status = 404, description = "Sub cart not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_sub_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SubCartWithItems>>> {
    let resp = cart_service::get_sub_cart(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sub-carts/{id}",
    params(("id" = Uuid, Path, description = "Sub cart ID")),
    responses(
        (status = 200, description = "Sub cart removed", body = ApiResponse<CartMutation>),
        (status = 404, description = "Sub cart not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn delete_sub_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartMutation>>> {
    let resp = cart_service::delete_sub_cart(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/sub-cart-items/{id}",
    params(("id" = Uuid, Path, description = "Sub cart item ID")),
    request_body = UpdateSubCartItemRequest,
    responses(
        (status = 200, description = "Quantity changed; empty levels are removed", body = ApiResponse<CartMutation>),
        (status = 400, description = "Delta is zero"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartMutation>>> {
    let resp = cart_service::update_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sub-cart-items/{id}",
    params(("id" = Uuid, Path, description = "Sub cart item ID")),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartMutation>),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartMutation>>> {
    let resp = cart_service::remove_item(&state, &user, id).await?;
    Ok(Json(resp))
}
