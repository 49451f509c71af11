use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateMenuRequest, MenuList, UpdateMenuRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Menu,
    response::ApiResponse,
    routes::params::MenuQuery,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menus).post(create_menu))
        .route("/{id}", get(get_menu).patch(update_menu).delete(delete_menu))
}

#[utoipa::path(
    get,
    path = "/api/menus",
    params(("restaurant_id" = Option<Uuid>, Query, description = "Restaurant ID")),
    responses(
        (status = 200, description = "List menus", body = ApiResponse<MenuList>)
    ),
    tag = "Menus"
)]
pub async fn list_menus(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_menus(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu with its foods", body = ApiResponse<Menu>),
        (status = 404, description = "Menu not found")
    ),
    tag = "Menus"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::get_menu(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menus",
    request_body = CreateMenuRequest,
    responses(
        (status = 200, description = "Menu created", body = ApiResponse<Menu>),
        (status = 400, description = "Foods belong to another restaurant"),
        (status = 403, description = "Not the restaurant owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn create_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMenuRequest>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::create_menu(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Menu updated", body = ApiResponse<Menu>),
        (status = 403, description = "Not the restaurant owner"),
        (status = 404, description = "Menu not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn update_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuRequest>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::update_menu(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the restaurant owner"),
        (status = 404, description = "Menu not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn delete_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_menu(&state, &user, id).await?;
    Ok(Json(resp))
}
