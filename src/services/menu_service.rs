use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::catalog::{CreateMenuRequest, MenuList, UpdateMenuRequest},
    entity::{Foods, MenuFoods, Menus, foods, menu_foods, menus},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Menu,
    response::{ApiResponse, Meta},
    routes::params::MenuQuery,
    services::{notification_service, restaurant_service::owned_restaurant},
    state::AppState,
};

use menu_foods::{ActiveModel as MenuFoodActive, Column as MenuFoodCol};
use menus::{ActiveModel as MenuActive, Column as MenuCol};

pub async fn list_menus(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuList>> {
    let mut finder = Menus::find().order_by_asc(MenuCol::CreatedAt);
    if let Some(restaurant_id) = query.restaurant_id {
        finder = finder.filter(MenuCol::RestaurantId.eq(restaurant_id));
    }
    let menus = finder.all(&state.orm).await?;

    let ids: Vec<Uuid> = menus.iter().map(|menu| menu.id).collect();
    let mut food_ids: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in MenuFoods::find()
        .filter(MenuFoodCol::MenuId.is_in(ids))
        .all(&state.orm)
        .await?
    {
        food_ids.entry(link.menu_id).or_default().push(link.food_id);
    }

    let items: Vec<Menu> = menus
        .into_iter()
        .map(|menu| {
            let foods = food_ids.remove(&menu.id).unwrap_or_default();
            Menu::from_entity(menu, foods)
        })
        .collect();
    let total = items.len() as i64;

    Ok(ApiResponse::success(
        "Menus",
        MenuList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_menu(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Menu>> {
    let menu = Menus::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let food_ids = food_ids_of(&state.orm, menu.id).await?;
    Ok(ApiResponse::success("Menu", Menu::from_entity(menu, food_ids), None))
}

pub async fn create_menu(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuRequest,
) -> AppResult<ApiResponse<Menu>> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("Menu name is required"));
    }

    let txn = state.orm.begin().await?;
    owned_restaurant(&txn, user, payload.restaurant_id).await?;
    let food_ids = dedup(payload.food_ids);
    ensure_foods_of_restaurant(&txn, payload.restaurant_id, &food_ids).await?;

    let menu = MenuActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(payload.restaurant_id),
        name: Set(name),
        description: Set(payload.description),
        time_serve: Set(payload.time_serve),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;
    link_foods(&txn, menu.id, &food_ids).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "menu_create",
        "menus",
        serde_json::json!({ "menu_id": menu.id, "restaurant_id": menu.restaurant_id }),
    )
    .await;
    notification_service::notify_new_menu(state, &menu).await;

    Ok(ApiResponse::success(
        "Menu created",
        Menu::from_entity(menu, food_ids),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuRequest,
) -> AppResult<ApiResponse<Menu>> {
    let txn = state.orm.begin().await?;

    let existing = Menus::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    owned_restaurant(&txn, user, existing.restaurant_id).await?;

    let food_ids = payload.food_ids.map(dedup);
    if let Some(food_ids) = &food_ids {
        ensure_foods_of_restaurant(&txn, existing.restaurant_id, food_ids).await?;
    }

    let mut active: MenuActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Menu name is required"));
        }
        active.name = Set(name.to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(time_serve) = payload.time_serve {
        active.time_serve = Set(time_serve);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    let menu = active.update(&txn).await?;

    if let Some(food_ids) = &food_ids {
        MenuFoods::delete_many()
            .filter(MenuFoodCol::MenuId.eq(menu.id))
            .exec(&txn)
            .await?;
        link_foods(&txn, menu.id, food_ids).await?;
    }
    let food_ids = food_ids_of(&txn, menu.id).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Menu updated",
        Menu::from_entity(menu, food_ids),
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let menu = Menus::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    owned_restaurant(&txn, user, menu.restaurant_id).await?;

    MenuFoods::delete_many()
        .filter(MenuFoodCol::MenuId.eq(menu.id))
        .exec(&txn)
        .await?;
    menu.delete(&txn).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "menu_delete",
        "menus",
        serde_json::json!({ "menu_id": id }),
    )
    .await;

    Ok(crate::response::empty("Menu deleted"))
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
    ids
}

async fn ensure_foods_of_restaurant<C>(
    conn: &C,
    restaurant_id: Uuid,
    food_ids: &[Uuid],
) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if food_ids.is_empty() {
        return Ok(());
    }
    let matching = Foods::find()
        .filter(foods::Column::Id.is_in(food_ids.iter().copied()))
        .filter(foods::Column::RestaurantId.eq(restaurant_id))
        .count(conn)
        .await?;
    if matching != food_ids.len() as u64 {
        return Err(AppError::bad_request(
            "All menu foods must belong to the menu's restaurant",
        ));
    }
    Ok(())
}

async fn link_foods<C>(conn: &C, menu_id: Uuid, food_ids: &[Uuid]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    for food_id in food_ids {
        MenuFoodActive {
            menu_id: Set(menu_id),
            food_id: Set(*food_id),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

async fn food_ids_of<C>(conn: &C, menu_id: Uuid) -> AppResult<Vec<Uuid>>
where
    C: ConnectionTrait,
{
    Ok(MenuFoods::find()
        .filter(MenuFoodCol::MenuId.eq(menu_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|link| link.food_id)
        .collect())
}
