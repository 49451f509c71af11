use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::cart::{
        AddToCartRequest, CartMutation, CartView, SubCartList, SubCartWithItems,
        UpdateSubCartItemRequest,
    },
    entity::{
        Carts, FoodPrices, Foods, SubCartItems, SubCarts, carts, food_prices, sub_cart_items,
        sub_carts,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer},
    response::{ApiResponse, Meta},
    services::lock_user,
    state::AppState,
};

use carts::ActiveModel as CartActive;
use sub_cart_items::{ActiveModel as ItemActive, Column as ItemCol};
use sub_carts::{ActiveModel as SubCartActive, Column as SubCartCol};

enum Adjustment {
    By(i32),
    RemoveAll,
}

fn too_large() -> AppError {
    AppError::bad_request("Quantity is too large")
}

fn line_total(unit_price: i64, quantity: i32) -> AppResult<i64> {
    unit_price
        .checked_mul(i64::from(quantity))
        .ok_or_else(too_large)
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartMutation>> {
    ensure_customer(user)?;

    let txn = state.orm.begin().await?;
    lock_user(&txn, user.user_id).await?;

    let food = Foods::find_by_id(payload.food_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if !food.is_available {
        return Err(AppError::bad_request("Food is not available"));
    }

    let unit_price = FoodPrices::find()
        .filter(food_prices::Column::FoodId.eq(food.id))
        .filter(food_prices::Column::TimeServe.eq(payload.time_serve))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::bad_request("Food has no price for this time serve"))?
        .price;

    let now = Utc::now();
    let cart = match Carts::find()
        .filter(carts::Column::UserId.eq(user.user_id))
        .one(&txn)
        .await?
    {
        Some(cart) => cart,
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                item_number: Set(0),
                total_price: Set(0),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&txn)
            .await?
        }
    };

    let sub_cart = match SubCarts::find()
        .filter(SubCartCol::CartId.eq(cart.id))
        .filter(SubCartCol::RestaurantId.eq(food.restaurant_id))
        .one(&txn)
        .await?
    {
        Some(sub_cart) => sub_cart,
        None => {
            SubCartActive {
                id: Set(Uuid::new_v4()),
                cart_id: Set(cart.id),
                restaurant_id: Set(food.restaurant_id),
                total_price: Set(0),
                total_quantity: Set(0),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?
        }
    };

    let existing = SubCartItems::find()
        .filter(ItemCol::SubCartId.eq(sub_cart.id))
        .filter(ItemCol::FoodId.eq(food.id))
        .filter(ItemCol::TimeServe.eq(payload.time_serve))
        .one(&txn)
        .await?;

    let item = match existing {
        Some(item) => {
            let quantity = item
                .quantity
                .checked_add(1)
                .ok_or_else(too_large)?;
            let price = line_total(item.unit_price, quantity)?;
            let mut active: ItemActive = item.into();
            active.quantity = Set(quantity);
            active.price = Set(price);
            active.update(&txn).await?
        }
        None => {
            ItemActive {
                id: Set(Uuid::new_v4()),
                sub_cart_id: Set(sub_cart.id),
                food_id: Set(food.id),
                restaurant_id: Set(food.restaurant_id),
                quantity: Set(1),
                time_serve: Set(payload.time_serve),
                unit_price: Set(unit_price),
                price: Set(unit_price),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?
        }
    };

    let sub_cart = recompute_sub_cart(&txn, sub_cart).await?;
    let cart = recompute_cart(&txn, cart).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "cart_add_item",
        "sub_cart_items",
        serde_json::json!({ "food_id": food.id, "time_serve": payload.time_serve }),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to cart",
        CartMutation {
            item: Some(item.into()),
            sub_cart: sub_cart.map(Into::into),
            cart: cart.map(Into::into),
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
    payload: UpdateSubCartItemRequest,
) -> AppResult<ApiResponse<CartMutation>> {
    if payload.delta == 0 {
        return Err(AppError::bad_request("Quantity delta must not be zero"));
    }
    adjust_item(state, user, item_id, Adjustment::By(payload.delta)).await
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<CartMutation>> {
    adjust_item(state, user, item_id, Adjustment::RemoveAll).await
}

async fn adjust_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
    adjustment: Adjustment,
) -> AppResult<ApiResponse<CartMutation>> {
    ensure_customer(user)?;

    let txn = state.orm.begin().await?;
    lock_user(&txn, user.user_id).await?;

    let item = SubCartItems::find_by_id(item_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let (cart, sub_cart) = owned_sub_cart(&txn, user.user_id, item.sub_cart_id).await?;

    let quantity = match adjustment {
        Adjustment::By(delta) => item
            .quantity
            .checked_add(delta)
            .ok_or_else(too_large)?,
        Adjustment::RemoveAll => 0,
    };

    let item = if quantity <= 0 {
        item.delete(&txn).await?;
        None
    } else {
        let price = line_total(item.unit_price, quantity)?;
        let mut active: ItemActive = item.into();
        active.quantity = Set(quantity);
        active.price = Set(price);
        Some(active.update(&txn).await?)
    };

    let sub_cart = recompute_sub_cart(&txn, sub_cart).await?;
    let cart = recompute_cart(&txn, cart).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "cart_update_item",
        "sub_cart_items",
        serde_json::json!({ "item_id": item_id, "quantity": quantity.max(0) }),
    )
    .await;

    let message = if item.is_some() {
        "Cart item updated"
    } else {
        "Cart item removed"
    };

    Ok(ApiResponse::success(
        message,
        CartMutation {
            item: item.map(Into::into),
            sub_cart: sub_cart.map(Into::into),
            cart: cart.map(Into::into),
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_sub_cart(
    state: &AppState,
    user: &AuthUser,
    sub_cart_id: Uuid,
) -> AppResult<ApiResponse<CartMutation>> {
    ensure_customer(user)?;

    let txn = state.orm.begin().await?;
    lock_user(&txn, user.user_id).await?;

    let (cart, sub_cart) = owned_sub_cart(&txn, user.user_id, sub_cart_id).await?;
    SubCartItems::delete_many()
        .filter(ItemCol::SubCartId.eq(sub_cart.id))
        .exec(&txn)
        .await?;
    sub_cart.delete(&txn).await?;
    let cart = recompute_cart(&txn, cart).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "cart_delete_sub_cart",
        "sub_carts",
        serde_json::json!({ "sub_cart_id": sub_cart_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Sub cart removed",
        CartMutation {
            item: None,
            sub_cart: None,
            cart: cart.map(Into::into),
        },
        Some(Meta::empty()),
    ))
}

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    ensure_customer(user)?;

    let cart = Carts::find()
        .filter(carts::Column::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;

    let view = match cart {
        Some(cart) => {
            let sub_carts = load_sub_carts(&state.orm, cart.id).await?;
            CartView {
                cart: Some(cart.into()),
                sub_carts,
            }
        }
        None => CartView {
            cart: None,
            sub_carts: Vec::new(),
        },
    };

    Ok(ApiResponse::success("OK", view, Some(Meta::empty())))
}

pub async fn list_sub_carts(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<SubCartList>> {
    ensure_customer(user)?;

    let cart = Carts::find()
        .filter(carts::Column::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let items = match cart {
        Some(cart) => load_sub_carts(&state.orm, cart.id).await?,
        None => Vec::new(),
    };

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        SubCartList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_sub_cart(
    state: &AppState,
    user: &AuthUser,
    sub_cart_id: Uuid,
) -> AppResult<ApiResponse<SubCartWithItems>> {
    ensure_customer(user)?;

    let (_, sub_cart) = owned_sub_cart(&state.orm, user.user_id, sub_cart_id).await?;
    let items = SubCartItems::find()
        .filter(ItemCol::SubCartId.eq(sub_cart.id))
        .order_by_asc(ItemCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        SubCartWithItems {
            sub_cart: sub_cart.into(),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Load a sub cart together with its cart, failing with `NotFound` when
/// it does not belong to `user_id`.
pub(crate) async fn owned_sub_cart<C>(
    conn: &C,
    user_id: Uuid,
    sub_cart_id: Uuid,
) -> AppResult<(carts::Model, sub_carts::Model)>
where
    C: ConnectionTrait,
{
    let sub_cart = SubCarts::find_by_id(sub_cart_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    let cart = Carts::find_by_id(sub_cart.cart_id)
        .one(conn)
        .await?
        .filter(|cart| cart.user_id == user_id)
        .ok_or(AppError::NotFound)?;
    Ok((cart, sub_cart))
}

/// Re-sum the sub cart from its items. An empty sub cart is deleted and
/// `None` is returned.
pub(crate) async fn recompute_sub_cart<C>(
    conn: &C,
    sub_cart: sub_carts::Model,
) -> AppResult<Option<sub_carts::Model>>
where
    C: ConnectionTrait,
{
    let items = SubCartItems::find()
        .filter(ItemCol::SubCartId.eq(sub_cart.id))
        .all(conn)
        .await?;

    if items.is_empty() {
        sub_cart.delete(conn).await?;
        return Ok(None);
    }

    let total_quantity = items
        .iter()
        .try_fold(0i32, |acc, item| acc.checked_add(item.quantity))
        .ok_or_else(too_large)?;
    let total_price = items
        .iter()
        .try_fold(0i64, |acc, item| acc.checked_add(item.price))
        .ok_or_else(too_large)?;

    let mut active: SubCartActive = sub_cart.into();
    active.total_quantity = Set(total_quantity);
    active.total_price = Set(total_price);
    Ok(Some(active.update(conn).await?))
}

/// Re-sum the cart from its sub carts. An empty cart is deleted and
/// `None` is returned.
pub(crate) async fn recompute_cart<C>(
    conn: &C,
    cart: carts::Model,
) -> AppResult<Option<carts::Model>>
where
    C: ConnectionTrait,
{
    let sub_carts = SubCarts::find()
        .filter(SubCartCol::CartId.eq(cart.id))
        .all(conn)
        .await?;

    let item_number = sub_carts
        .iter()
        .try_fold(0i32, |acc, sub| acc.checked_add(sub.total_quantity))
        .ok_or_else(too_large)?;
    if item_number <= 0 {
        SubCarts::delete_many()
            .filter(SubCartCol::CartId.eq(cart.id))
            .exec(conn)
            .await?;
        cart.delete(conn).await?;
        return Ok(None);
    }
    let total_price = sub_carts
        .iter()
        .try_fold(0i64, |acc, sub| acc.checked_add(sub.total_price))
        .ok_or_else(too_large)?;

    let mut active: CartActive = cart.into();
    active.item_number = Set(item_number);
    active.total_price = Set(total_price);
    active.updated_at = Set(Utc::now().into());
    Ok(Some(active.update(conn).await?))
}

/// Remove every cart line holding one of `food_ids` and re-sum the sub
/// carts and carts they belonged to. The owners of those carts are locked
/// before anything is written.
pub(crate) async fn purge_foods<C>(conn: &C, food_ids: &[Uuid]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if food_ids.is_empty() {
        return Ok(());
    }

    let sub_cart_ids: Vec<Uuid> = SubCartItems::find()
        .select_only()
        .column(ItemCol::SubCartId)
        .distinct()
        .filter(ItemCol::FoodId.is_in(food_ids.iter().copied()))
        .into_tuple()
        .all(conn)
        .await?;
    if sub_cart_ids.is_empty() {
        return Ok(());
    }
    let sub_carts = SubCarts::find()
        .filter(SubCartCol::Id.is_in(sub_cart_ids))
        .all(conn)
        .await?;
    let mut carts = Carts::find()
        .filter(carts::Column::Id.is_in(sub_carts.iter().map(|sub| sub.cart_id)))
        .all(conn)
        .await?;

    // fixed order keeps concurrent purges from deadlocking
    carts.sort_by_key(|cart| cart.user_id);
    for cart in &carts {
        lock_user(conn, cart.user_id).await?;
    }

    SubCartItems::delete_many()
        .filter(ItemCol::FoodId.is_in(food_ids.iter().copied()))
        .exec(conn)
        .await?;
    for sub_cart in sub_carts {
        recompute_sub_cart(conn, sub_cart).await?;
    }
    for cart in carts {
        recompute_cart(conn, cart).await?;
    }
    Ok(())
}

async fn load_sub_carts<C>(conn: &C, cart_id: Uuid) -> AppResult<Vec<SubCartWithItems>>
where
    C: ConnectionTrait,
{
    let sub_carts = SubCarts::find()
        .filter(SubCartCol::CartId.eq(cart_id))
        .order_by_asc(SubCartCol::CreatedAt)
        .all(conn)
        .await?;

    let mut result = Vec::with_capacity(sub_carts.len());
    for sub_cart in sub_carts {
        let items = SubCartItems::find()
            .filter(ItemCol::SubCartId.eq(sub_cart.id))
            .order_by_asc(ItemCol::CreatedAt)
            .all(conn)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        result.push(SubCartWithItems {
            sub_cart: sub_cart.into(),
            items,
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_rejects_overflow() {
        assert_eq!(line_total(40000, 3).ok(), Some(120000));
        assert!(matches!(
            line_total(i64::MAX / 2, 3),
            Err(AppError::BadRequest(_))
        ));
    }
}
