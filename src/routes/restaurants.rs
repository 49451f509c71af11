use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateRestaurantRequest, RestaurantList, UpdateRestaurantRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Restaurant,
    response::ApiResponse,
    routes::params::Pagination,
    services::restaurant_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_restaurants).post(create_restaurant))
        .route(
            "/{id}",
            get(get_restaurant)
                .patch(update_restaurant)
                .delete(delete_restaurant),
        )
}

#[utoipa::path(
    get,
    path = "/api/restaurants",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List restaurants", body = ApiResponse<RestaurantList>)
    ),
    tag = "Restaurants"
)]
pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<RestaurantList>>> {
    let resp = restaurant_service::list_restaurants(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant detail", body = ApiResponse<Restaurant>),
        (status = 404, description = "Restaurant not found")
    ),
    tag = "Restaurants"
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let resp = restaurant_service::get_restaurant(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant created", body = ApiResponse<Restaurant>),
        (status = 403, description = "Only restaurant users can create restaurants")
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurants"
)]
pub async fn create_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRestaurantRequest>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let resp = restaurant_service::create_restaurant(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant updated", body = ApiResponse<Restaurant>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Restaurant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurants"
)]
pub async fn update_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let resp = restaurant_service::update_restaurant(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Restaurant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurants"
)]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = restaurant_service::delete_restaurant(&state, &user, id).await?;
    Ok(Json(resp))
}
