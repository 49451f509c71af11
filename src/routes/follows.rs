use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::follows::FollowedRestaurantList,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Follow,
    response::ApiResponse,
    services::follow_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_followed))
        .route("/{restaurant_id}", post(follow).delete(unfollow))
}

#[utoipa::path(
    get,
    path = "/api/follows",
    responses(
        (status = 200, description = "Restaurants followed by the current user", body = ApiResponse<FollowedRestaurantList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Follows"
)]
pub async fn list_followed(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<FollowedRestaurantList>>> {
    let resp = follow_service::list_followed(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/follows/{restaurant_id}",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant followed", body = ApiResponse<Follow>),
        (status = 400, description = "Only customers can follow"),
        (status = 404, description = "Restaurant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Follows"
)]
pub async fn follow(
    State(state): State<AppState>,
    user: AuthUser,
    Path(restaurant_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Follow>>> {
    let resp = follow_service::follow(&state, &user, restaurant_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/follows/{restaurant_id}",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant unfollowed", body = ApiResponse<Follow>),
        (status = 400, description = "Only customers can follow"),
        (status = 404, description = "Restaurant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Follows"
)]
pub async fn unfollow(
    State(state): State<AppState>,
    user: AuthUser,
    Path(restaurant_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Follow>>> {
    let resp = follow_service::unfollow(&state, &user, restaurant_id).await?;
    Ok(Json(resp))
}
