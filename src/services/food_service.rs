use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::catalog::{
        CreateFoodRequest, FoodCategoryList, FoodCategoryRequest, FoodList, PriceInput,
        SetFoodPriceRequest, UpdateFoodPriceRequest, UpdateFoodRequest,
    },
    entity::{
        FoodCategories, FoodPrices, Foods, OrderDetails, Restaurants, food_categories,
        food_prices, foods, order_details, restaurants,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Food, FoodCategory, FoodPrice},
    response::{ApiResponse, Meta},
    routes::params::{FOOD_PAGE_SIZE, FoodQuery},
    services::{
        cart_service::purge_foods, notification_service, restaurant_service::owned_restaurant,
    },
    state::AppState,
};

use food_categories::{ActiveModel as CategoryActive, Column as CategoryCol};
use food_prices::{ActiveModel as PriceActive, Column as PriceCol};
use foods::{ActiveModel as FoodActive, Column as FoodCol};

fn contains_pattern(value: &str) -> String {
    format!("%{}%", value.trim().to_lowercase())
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<FoodCategoryList>> {
    let items: Vec<FoodCategory> = FoodCategories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Food categories",
        FoodCategoryList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: FoodCategoryRequest,
) -> AppResult<ApiResponse<FoodCategory>> {
    ensure_admin(user)?;
    let name = validate_category_name(&state.orm, &payload.name, None).await?;

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Food category created",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: FoodCategoryRequest,
) -> AppResult<ApiResponse<FoodCategory>> {
    ensure_admin(user)?;
    let existing = FoodCategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let name = validate_category_name(&state.orm, &payload.name, Some(id)).await?;

    let mut active: CategoryActive = existing.into();
    active.name = Set(name);
    let category = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Food category updated",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = FoodCategories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(crate::response::empty("Food category deleted"))
}

async fn validate_category_name<C>(conn: &C, name: &str, current: Option<Uuid>) -> AppResult<String>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Category name is required"));
    }
    let taken = FoodCategories::find()
        .filter(CategoryCol::Name.eq(name))
        .one(conn)
        .await?
        .is_some_and(|category| Some(category.id) != current);
    if taken {
        return Err(AppError::bad_request("Category name is already taken"));
    }
    Ok(name.to_string())
}

pub async fn list_foods(
    state: &AppState,
    query: FoodQuery,
) -> AppResult<ApiResponse<FoodList>> {
    let (page, limit, offset) = query.pagination().normalize_with(FOOD_PAGE_SIZE);
    let mut condition = Condition::all();

    if let Some(name) = query.name.as_deref().filter(|s| !s.trim().is_empty()) {
        condition = condition
            .add(Expr::expr(Func::lower(Expr::col(FoodCol::Name))).like(contains_pattern(name)));
    }

    if query.price_min.is_some() || query.price_max.is_some() {
        let mut prices = FoodPrices::find()
            .select_only()
            .column(PriceCol::FoodId)
            .distinct();
        if let Some(min) = query.price_min {
            prices = prices.filter(PriceCol::Price.gte(min));
        }
        if let Some(max) = query.price_max {
            prices = prices.filter(PriceCol::Price.lte(max));
        }
        let food_ids: Vec<Uuid> = prices.into_tuple().all(&state.orm).await?;
        condition = condition.add(FoodCol::Id.is_in(food_ids));
    }

    if let Some(category) = query.food_category.as_deref().filter(|s| !s.trim().is_empty()) {
        let category_ids: Vec<Uuid> = FoodCategories::find()
            .select_only()
            .column(CategoryCol::Id)
            .filter(
                Expr::expr(Func::lower(Expr::col(CategoryCol::Name)))
                    .like(contains_pattern(category)),
            )
            .into_tuple()
            .all(&state.orm)
            .await?;
        condition = condition.add(FoodCol::FoodCategoryId.is_in(category_ids));
    }

    if let Some(restaurant) = query.restaurant_name.as_deref().filter(|s| !s.trim().is_empty()) {
        let restaurant_ids: Vec<Uuid> = Restaurants::find()
            .select_only()
            .column(restaurants::Column::Id)
            .filter(
                Expr::expr(Func::lower(Expr::col(restaurants::Column::Name)))
                    .like(contains_pattern(restaurant)),
            )
            .into_tuple()
            .all(&state.orm)
            .await?;
        condition = condition.add(FoodCol::RestaurantId.is_in(restaurant_ids));
    }

    if let Some(restaurant_id) = query.restaurant_id {
        condition = condition.add(FoodCol::RestaurantId.eq(restaurant_id));
    }

    let finder = Foods::find()
        .filter(condition)
        .order_by_desc(FoodCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let foods = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = foods.iter().map(|food| food.id).collect();
    let mut prices: HashMap<Uuid, Vec<food_prices::Model>> = HashMap::new();
    for price in FoodPrices::find()
        .filter(PriceCol::FoodId.is_in(ids))
        .all(&state.orm)
        .await?
    {
        prices.entry(price.food_id).or_default().push(price);
    }

    let items = foods
        .into_iter()
        .map(|food| {
            let food_prices = prices.remove(&food.id).unwrap_or_default();
            Food::from_entity(food, food_prices)
        })
        .collect();

    Ok(ApiResponse::success(
        "Foods",
        FoodList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_food(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Food>> {
    let food = Foods::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let prices = prices_of(&state.orm, food.id).await?;
    Ok(ApiResponse::success("Food", Food::from_entity(food, prices), None))
}

pub async fn create_food(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFoodRequest,
) -> AppResult<ApiResponse<Food>> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("Food name is required"));
    }
    validate_prices(&payload.prices)?;

    let txn = state.orm.begin().await?;
    owned_restaurant(&txn, user, payload.restaurant_id).await?;
    if let Some(category_id) = payload.food_category_id {
        FoodCategories::find_by_id(category_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::bad_request("Food category not found"))?;
    }

    let now = Utc::now();
    let food = FoodActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        is_available: Set(payload.is_available.unwrap_or(true)),
        star_rating: Set(0.0),
        food_category_id: Set(payload.food_category_id),
        restaurant_id: Set(payload.restaurant_id),
        image: Set(payload.image),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut prices = Vec::with_capacity(payload.prices.len());
    for input in &payload.prices {
        let price = PriceActive {
            id: Set(Uuid::new_v4()),
            food_id: Set(food.id),
            time_serve: Set(input.time_serve),
            price: Set(input.price),
        }
        .insert(&txn)
        .await?;
        prices.push(price);
    }

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "food_create",
        "foods",
        serde_json::json!({ "food_id": food.id, "restaurant_id": food.restaurant_id }),
    )
    .await;
    notification_service::notify_new_food(state, &food).await;

    Ok(ApiResponse::success(
        "Food created",
        Food::from_entity(food, prices),
        Some(Meta::empty()),
    ))
}

pub async fn update_food(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateFoodRequest,
) -> AppResult<ApiResponse<Food>> {
    let existing = owned_food(&state.orm, user, id).await?;
    if let Some(category_id) = payload.food_category_id {
        FoodCategories::find_by_id(category_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::bad_request("Food category not found"))?;
    }

    let mut active: FoodActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Food name is required"));
        }
        active.name = Set(name.to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(category_id) = payload.food_category_id {
        active.food_category_id = Set(Some(category_id));
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    let food = active.update(&state.orm).await?;
    let prices = prices_of(&state.orm, food.id).await?;

    Ok(ApiResponse::success(
        "Food updated",
        Food::from_entity(food, prices),
        Some(Meta::empty()),
    ))
}

pub async fn delete_food(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;
    let food = owned_food(&txn, user, id).await?;
    ensure_not_ordered(&txn, &[food.id]).await?;
    purge_foods(&txn, &[food.id]).await?;
    food.delete(&txn).await?;
    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "food_delete",
        "foods",
        serde_json::json!({ "food_id": id }),
    )
    .await;

    Ok(crate::response::empty("Food deleted"))
}

/// Create or replace the price of a food for one time serve.
pub async fn set_food_price(
    state: &AppState,
    user: &AuthUser,
    payload: SetFoodPriceRequest,
) -> AppResult<ApiResponse<FoodPrice>> {
    validate_price(payload.price)?;
    let food = owned_food(&state.orm, user, payload.food_id).await?;

    let existing = FoodPrices::find()
        .filter(PriceCol::FoodId.eq(food.id))
        .filter(PriceCol::TimeServe.eq(payload.time_serve))
        .one(&state.orm)
        .await?;
    let price = match existing {
        Some(price) => {
            let mut active: PriceActive = price.into();
            active.price = Set(payload.price);
            active.update(&state.orm).await?
        }
        None => {
            PriceActive {
                id: Set(Uuid::new_v4()),
                food_id: Set(food.id),
                time_serve: Set(payload.time_serve),
                price: Set(payload.price),
            }
            .insert(&state.orm)
            .await?
        }
    };

    Ok(ApiResponse::success(
        "Food price saved",
        price.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_food_price(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateFoodPriceRequest,
) -> AppResult<ApiResponse<FoodPrice>> {
    validate_price(payload.price)?;
    let price = FoodPrices::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    owned_food(&state.orm, user, price.food_id).await?;

    let mut active: PriceActive = price.into();
    active.price = Set(payload.price);
    let price = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Food price updated",
        price.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_food_price(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let price = FoodPrices::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    owned_food(&state.orm, user, price.food_id).await?;
    price.delete(&state.orm).await?;
    Ok(crate::response::empty("Food price deleted"))
}

async fn owned_food<C>(conn: &C, user: &AuthUser, food_id: Uuid) -> AppResult<foods::Model>
where
    C: ConnectionTrait,
{
    let food = Foods::find_by_id(food_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    owned_restaurant(conn, user, food.restaurant_id).await?;
    Ok(food)
}

/// Ordered foods stay referenced by past order lines and cannot be removed.
pub(crate) async fn ensure_not_ordered<C>(conn: &C, food_ids: &[Uuid]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if food_ids.is_empty() {
        return Ok(());
    }
    let ordered = OrderDetails::find()
        .filter(order_details::Column::FoodId.is_in(food_ids.iter().copied()))
        .count(conn)
        .await?;
    if ordered > 0 {
        return Err(AppError::bad_request(
            "Food has been ordered; mark it unavailable instead",
        ));
    }
    Ok(())
}

async fn prices_of<C>(conn: &C, food_id: Uuid) -> AppResult<Vec<food_prices::Model>>
where
    C: ConnectionTrait,
{
    Ok(FoodPrices::find()
        .filter(PriceCol::FoodId.eq(food_id))
        .all(conn)
        .await?)
}

fn validate_price(price: i64) -> AppResult<()> {
    if price <= 0 {
        return Err(AppError::bad_request("Price must be greater than 0"));
    }
    Ok(())
}

fn validate_prices(prices: &[PriceInput]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for input in prices {
        validate_price(input.price)?;
        if !seen.insert(input.time_serve) {
            return Err(AppError::bad_request(format!(
                "Duplicate price for {:?}",
                input.time_serve
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::enums::TimeServe;

    #[test]
    fn rejects_non_positive_prices() {
        assert!(validate_price(40000).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(-5).is_err());
    }

    #[test]
    fn rejects_duplicate_time_serve() {
        let prices = vec![
            PriceInput {
                time_serve: TimeServe::Morning,
                price: 40000,
            },
            PriceInput {
                time_serve: TimeServe::Morning,
                price: 45000,
            },
        ];
        assert!(validate_prices(&prices).is_err());
    }

    #[test]
    fn contains_pattern_is_lowercase() {
        assert_eq!(contains_pattern(" Phở "), "%phở%");
    }
}
