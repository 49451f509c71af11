use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{
        CreateFoodRequest, FoodCategoryList, FoodCategoryRequest, FoodList, SetFoodPriceRequest,
        UpdateFoodPriceRequest, UpdateFoodRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Food, FoodCategory, FoodPrice},
    response::ApiResponse,
    routes::params::FoodQuery,
    services::food_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_foods).post(create_food))
        .route("/{id}", get(get_food).patch(update_food).delete(delete_food))
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", patch(update_category).delete(delete_category))
}

pub fn price_router() -> Router<AppState> {
    Router::new()
        .route("/", post(set_food_price))
        .route("/{id}", patch(update_food_price).delete(delete_food_price))
}

#[utoipa::path(
    get,
    path = "/api/food-categories",
    responses(
        (status = 200, description = "List food categories", body = ApiResponse<FoodCategoryList>)
    ),
    tag = "Foods"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<FoodCategoryList>>> {
    let resp = food_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/food-categories",
    request_body = FoodCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<FoodCategory>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<FoodCategoryRequest>,
) -> AppResult<Json<ApiResponse<FoodCategory>>> {
    let resp = food_service::create_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/food-categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = FoodCategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<FoodCategory>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FoodCategoryRequest>,
) -> AppResult<Json<ApiResponse<FoodCategory>>> {
    let resp = food_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/food-categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = food_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/foods",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 10"),
        ("name" = Option<String>, Query, description = "Food name contains"),
        ("price_min" = Option<i64>, Query, description = "Has a price at or above"),
        ("price_max" = Option<i64>, Query, description = "Has a price at or below"),
        ("food_category" = Option<String>, Query, description = "Category name contains"),
        ("restaurant_name" = Option<String>, Query, description = "Restaurant name contains"),
        ("restaurant_id" = Option<Uuid>, Query, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "List foods", body = ApiResponse<FoodList>)
    ),
    tag = "Foods"
)]
pub async fn list_foods(
    State(state): State<AppState>,
    Query(query): Query<FoodQuery>,
) -> AppResult<Json<ApiResponse<FoodList>>> {
    let resp = food_service::list_foods(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/foods/{id}",
    params(("id" = Uuid, Path, description = "Food ID")),
    responses(
        (status = 200, description = "Food with its prices", body = ApiResponse<Food>),
        (status = 404, description = "Food not found")
    ),
    tag = "Foods"
)]
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Food>>> {
    let resp = food_service::get_food(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/foods",
    request_body = CreateFoodRequest,
    responses(
        (status = 200, description = "Food created", body = ApiResponse<Food>),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Not the restaurant owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn create_food(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateFoodRequest>,
) -> AppResult<Json<ApiResponse<Food>>> {
    let resp = food_service::create_food(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/foods/{id}",
    params(("id" = Uuid, Path, description = "Food ID")),
    request_body = UpdateFoodRequest,
    responses(
        (status = 200, description = "Food updated", body = ApiResponse<Food>),
        (status = 403, description = "Not the restaurant owner"),
        (status = 404, description = "Food not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn update_food(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFoodRequest>,
) -> AppResult<Json<ApiResponse<Food>>> {
    let resp = food_service::update_food(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/foods/{id}",
    params(("id" = Uuid, Path, description = "Food ID")),
    responses(
        (status = 200, description = "Food deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the restaurant owner"),
        (status = 404, description = "Food not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn delete_food(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = food_service::delete_food(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/food-prices",
    request_body = SetFoodPriceRequest,
    responses(
        (status = 200, description = "Price saved for the time serve", body = ApiResponse<FoodPrice>),
        (status = 400, description = "Price must be positive"),
        (status = 403, description = "Not the restaurant owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn set_food_price(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetFoodPriceRequest>,
) -> AppResult<Json<ApiResponse<FoodPrice>>> {
    let resp = food_service::set_food_price(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/food-prices/{id}",
    params(("id" = Uuid, Path, description = "Food price ID")),
    request_body = UpdateFoodPriceRequest,
    responses(
        (status = 200, description = "Price updated", body = ApiResponse<FoodPrice>),
        (status = 400, description = "Price must be positive"),
        (status = 404, description = "Price not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn update_food_price(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFoodPriceRequest>,
) -> AppResult<Json<ApiResponse<FoodPrice>>> {
    let resp = food_service::update_food_price(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/food-prices/{id}",
    params(("id" = Uuid, Path, description = "Food price ID")),
    responses(
        (status = 200, description = "Price deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Price not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Foods"
)]
pub async fn delete_food_price(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = food_service::delete_food_price(&state, &user, id).await?;
    Ok(Json(resp))
}
