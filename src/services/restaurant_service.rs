use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::catalog::{CreateRestaurantRequest, RestaurantList, UpdateRestaurantRequest},
    entity::{Addresses, Foods, Orders, Restaurants, enums::UserRole, foods, orders, restaurants},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role},
    models::Restaurant,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{cart_service::purge_foods, food_service::ensure_not_ordered},
    state::AppState,
};

use restaurants::{ActiveModel as RestaurantActive, Column as RestaurantCol};

pub async fn list_restaurants(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<RestaurantList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Restaurants::find().order_by_asc(RestaurantCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::success(
        "Restaurants",
        RestaurantList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_restaurant(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Restaurant>> {
    let restaurant = Restaurants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Restaurant", restaurant.into(), None))
}

pub async fn create_restaurant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    ensure_role(user, UserRole::RestaurantUser)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Restaurant name is required"));
    }
    if let Some(address_id) = payload.address_id {
        ensure_own_address(&state.orm, user, address_id).await?;
    }

    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        phone_number: Set(payload.phone_number),
        owner_id: Set(user.user_id),
        star_rating: Set(0.0),
        address_id: Set(payload.address_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "restaurant_create",
        "restaurants",
        serde_json::json!({ "restaurant_id": restaurant.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Restaurant created",
        restaurant.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_restaurant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    let existing = owned_restaurant(&state.orm, user, id).await?;
    if let Some(address_id) = payload.address_id {
        ensure_own_address(&state.orm, user, address_id).await?;
    }

    let mut active: RestaurantActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Restaurant name is required"));
        }
        active.name = Set(name.to_string());
    }
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    if let Some(address_id) = payload.address_id {
        active.address_id = Set(Some(address_id));
    }
    let restaurant = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Restaurant updated",
        restaurant.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_restaurant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;
    let restaurant = owned_restaurant(&txn, user, id).await?;

    let orders = Orders::find()
        .filter(orders::Column::RestaurantId.eq(restaurant.id))
        .count(&txn)
        .await?;
    if orders > 0 {
        return Err(AppError::bad_request(
            "Restaurant has orders and cannot be deleted",
        ));
    }

    let food_ids: Vec<Uuid> = Foods::find()
        .select_only()
        .column(foods::Column::Id)
        .filter(foods::Column::RestaurantId.eq(restaurant.id))
        .into_tuple()
        .all(&txn)
        .await?;
    ensure_not_ordered(&txn, &food_ids).await?;
    purge_foods(&txn, &food_ids).await?;
    restaurant.delete(&txn).await?;
    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "restaurant_delete",
        "restaurants",
        serde_json::json!({ "restaurant_id": id }),
    )
    .await;

    Ok(crate::response::empty("Restaurant deleted"))
}

/// Load a restaurant the caller owns. Other users get `Forbidden`.
pub(crate) async fn owned_restaurant<C>(
    conn: &C,
    user: &AuthUser,
    restaurant_id: Uuid,
) -> AppResult<restaurants::Model>
where
    C: ConnectionTrait,
{
    let restaurant = Restaurants::find_by_id(restaurant_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    if restaurant.owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(restaurant)
}

async fn ensure_own_address<C>(conn: &C, user: &AuthUser, address_id: Uuid) -> AppResult<()>
where
    C: ConnectionTrait,
{
    Addresses::find_by_id(address_id)
        .one(conn)
        .await?
        .filter(|address| address.user_id == Some(user.user_id))
        .ok_or_else(|| AppError::bad_request("Address not found"))?;
    Ok(())
}
