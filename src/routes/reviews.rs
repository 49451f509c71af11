use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{
        CreateFoodReviewRequest, CreateRestaurantReviewRequest, FoodReviewList,
        RestaurantReviewList, UpdateReviewRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{FoodReview, RestaurantReview},
    response::ApiResponse,
    routes::params::{FoodReviewQuery, RestaurantReviewQuery},
    services::review_service,
    state::AppState,
};

pub fn restaurant_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_restaurant_reviews).post(create_restaurant_review),
        )
        .route(
            "/{id}",
            patch(update_restaurant_review).delete(delete_restaurant_review),
        )
}

pub fn food_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_food_reviews).post(create_food_review))
        .route("/{id}", patch(update_food_review).delete(delete_food_review))
}

#[utoipa::path(
    get,
    path = "/api/restaurant-reviews",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
        ("restaurant_id" = Option<Uuid>, Query, description = "Only reviews of this restaurant")
    ),
    responses(
        (status = 200, description = "Restaurant reviews", body = ApiResponse<RestaurantReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn list_restaurant_reviews(
    State(state): State<AppState>,
    Query(query): Query<RestaurantReviewQuery>,
) -> AppResult<Json<ApiResponse<RestaurantReviewList>>> {
    let resp = review_service::list_restaurant_reviews(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/restaurant-reviews",
    request_body = CreateRestaurantReviewRequest,
    responses(
        (status = 200, description = "Review created and rating recomputed", body = ApiResponse<RestaurantReview>),
        (status = 400, description = "No delivered order at this restaurant or star out of range")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_restaurant_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRestaurantReviewRequest>,
) -> AppResult<Json<ApiResponse<RestaurantReview>>> {
    let resp = review_service::create_restaurant_review(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/restaurant-reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<RestaurantReview>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_restaurant_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<RestaurantReview>>> {
    let resp = review_service::update_restaurant_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/restaurant-reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_restaurant_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_restaurant_review(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/food-reviews",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
        ("food_id" = Option<Uuid>, Query, description = "Only reviews of this food")
    ),
    responses(
        (status = 200, description = "Top-level food reviews with their replies", body = ApiResponse<FoodReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn list_food_reviews(
    State(state): State<AppState>,
    Query(query): Query<FoodReviewQuery>,
) -> AppResult<Json<ApiResponse<FoodReviewList>>> {
    let resp = review_service::list_food_reviews(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/food-reviews",
    request_body = CreateFoodReviewRequest,
    responses(
        (status = 200, description = "Review or owner reply created", body = ApiResponse<FoodReview>),
        (status = 400, description = "Order not delivered, bad star or invalid reply")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_food_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateFoodReviewRequest>,
) -> AppResult<Json<ApiResponse<FoodReview>>> {
    let resp = review_service::create_food_review(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/food-reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<FoodReview>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_food_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<FoodReview>>> {
    let resp = review_service::update_food_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/food-reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review and its replies deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_food_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_food_review(&state, &user, id).await?;
    Ok(Json(resp))
}
