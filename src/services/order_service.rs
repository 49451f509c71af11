use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::orders::{CheckoutRequest, OrderList, OrderWithDetails, UpdateOrderStatusRequest},
    entity::{
        Addresses, FoodReviews, OrderDetails, Orders, Payments, Restaurants, SubCartItems,
        enums::{OrderStatus, PaymentStatus, UserRole},
        food_reviews, order_details, orders, payments, restaurants, sub_cart_items,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer},
    models::OrderDetail,
    response::{ApiResponse, Meta},
    routes::params::{ORDER_PAGE_SIZE, OrderListQuery, SortOrder},
    services::{
        cart_service::{owned_sub_cart, recompute_cart},
        lock_user, review_service,
    },
    state::AppState,
};

use order_details::{ActiveModel as DetailActive, Column as DetailCol};
use orders::{ActiveModel as OrderActive, Column as OrderCol, Model as OrderModel};

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithDetails>> {
    ensure_customer(user)?;
    if payload.ship_fee < 0 {
        return Err(AppError::bad_request("Shipping fee must not be negative"));
    }
    if payload.payment_method.trim().is_empty() {
        return Err(AppError::bad_request("Payment method is required"));
    }

    let txn = state.orm.begin().await?;
    lock_user(&txn, user.user_id).await?;

    let (cart, sub_cart) = owned_sub_cart(&txn, user.user_id, payload.sub_cart_id).await?;
    let items = SubCartItems::find()
        .filter(sub_cart_items::Column::SubCartId.eq(sub_cart.id))
        .order_by_asc(sub_cart_items::Column::CreatedAt)
        .all(&txn)
        .await?;
    if items.is_empty() {
        return Err(AppError::bad_request("Sub cart is empty"));
    }

    Addresses::find_by_id(payload.ship_address_id)
        .one(&txn)
        .await?
        .filter(|address| address.user_id == Some(user.user_id))
        .ok_or_else(|| AppError::bad_request("Shipping address not found"))?;

    let expected = sub_cart
        .total_price
        .checked_add(payload.ship_fee)
        .ok_or_else(|| AppError::bad_request("Shipping fee is too large"))?;
    if payload.total_price != expected {
        return Err(AppError::bad_request(format!(
            "Total price mismatch: expected {expected}"
        )));
    }

    let now = Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        restaurant_id: Set(sub_cart.restaurant_id),
        address_id: Set(payload.ship_address_id),
        shipping_fee: Set(payload.ship_fee),
        total: Set(payload.total_price),
        status: Set(OrderStatus::Pending),
        ordered_date: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let payment = payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        payment_method: Set(payload.payment_method.trim().to_string()),
        status: Set(PaymentStatus::Pending),
        amount: Set(sub_cart.total_price),
        total_payment: Set(order.total),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut details: Vec<OrderDetail> = Vec::with_capacity(items.len());
    for item in &items {
        let detail = DetailActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            food_id: Set(item.food_id),
            quantity: Set(item.quantity),
            time_serve: Set(item.time_serve),
            sub_total: Set(item.price),
        }
        .insert(&txn)
        .await?;
        details.push(detail.into());
    }

    // consume the sub cart
    SubCartItems::delete_many()
        .filter(sub_cart_items::Column::SubCartId.eq(sub_cart.id))
        .exec(&txn)
        .await?;
    sub_cart.delete(&txn).await?;
    recompute_cart(&txn, cart).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, total = order.total, "order placed");
    audit_best_effort(
        &state.orm,
        user.user_id,
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "sub_cart_id": payload.sub_cart_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithDetails {
            order: order.into(),
            details,
            payment: Some(payment.into()),
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize_with(ORDER_PAGE_SIZE);

    let mut condition = Condition::all();
    match user.role {
        UserRole::Customer => condition = condition.add(OrderCol::UserId.eq(user.user_id)),
        UserRole::RestaurantUser => {
            let owned = owned_restaurant_ids(&state.orm, user.user_id).await?;
            condition = condition.add(OrderCol::RestaurantId.is_in(owned));
        }
        UserRole::Admin => {}
    }
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::OrderedDate),
        SortOrder::Desc => finder.order_by_desc(OrderCol::OrderedDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderList { items: orders },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithDetails>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if !can_view(&state.orm, user, &order).await? {
        return Err(AppError::NotFound);
    }

    let data = load_order_with_details(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithDetails>> {
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let owns_restaurant = restaurant_owner(&txn, order.restaurant_id).await? == Some(user.user_id);
    let is_buyer = order.user_id == user.user_id;

    let next = payload.status;
    let allowed = user.is_admin()
        || owns_restaurant
        || (is_buyer && order.status == OrderStatus::Pending && next == OrderStatus::Cancel);
    if !allowed {
        return Err(if is_buyer {
            AppError::Forbidden
        } else {
            AppError::NotFound
        });
    }
    if !order.status.can_transition_to(next) {
        return Err(AppError::bad_request(format!(
            "Cannot change order status from {:?} to {:?}",
            order.status, next
        )));
    }

    let previous = order.status;
    let mut active: OrderActive = order.into();
    active.status = Set(next);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;
    let data = load_order_with_details(&txn, order).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "order_status",
        "orders",
        serde_json::json!({ "order_id": id, "from": previous, "to": next }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let owns_restaurant = restaurant_owner(&txn, order.restaurant_id).await? == Some(user.user_id);
    if !(user.is_admin() || owns_restaurant || order.user_id == user.user_id) {
        return Err(AppError::NotFound);
    }

    let details = OrderDetails::find()
        .filter(DetailCol::OrderId.eq(order.id))
        .all(&txn)
        .await?;
    let detail_ids: Vec<Uuid> = details.iter().map(|detail| detail.id).collect();
    let mut food_ids: Vec<Uuid> = details.iter().map(|detail| detail.food_id).collect();
    food_ids.sort();
    food_ids.dedup();

    FoodReviews::delete_many()
        .filter(food_reviews::Column::OrderDetailId.is_in(detail_ids))
        .exec(&txn)
        .await?;
    OrderDetails::delete_many()
        .filter(DetailCol::OrderId.eq(order.id))
        .exec(&txn)
        .await?;
    Payments::delete_many()
        .filter(payments::Column::OrderId.eq(order.id))
        .exec(&txn)
        .await?;
    order.delete(&txn).await?;

    for food_id in food_ids {
        review_service::recompute_food_rating(&txn, food_id).await?;
    }

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "order_delete",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(crate::response::empty("Order deleted"))
}

pub(crate) async fn owned_restaurant_ids<C>(conn: &C, owner_id: Uuid) -> AppResult<Vec<Uuid>>
where
    C: ConnectionTrait,
{
    Ok(Restaurants::find()
        .select_only()
        .column(restaurants::Column::Id)
        .filter(restaurants::Column::OwnerId.eq(owner_id))
        .into_tuple::<Uuid>()
        .all(conn)
        .await?)
}

async fn restaurant_owner<C>(conn: &C, restaurant_id: Uuid) -> AppResult<Option<Uuid>>
where
    C: ConnectionTrait,
{
    Ok(Restaurants::find_by_id(restaurant_id)
        .one(conn)
        .await?
        .map(|restaurant| restaurant.owner_id))
}

async fn can_view<C>(conn: &C, user: &AuthUser, order: &OrderModel) -> AppResult<bool>
where
    C: ConnectionTrait,
{
    if user.is_admin() || order.user_id == user.user_id {
        return Ok(true);
    }
    Ok(restaurant_owner(conn, order.restaurant_id).await? == Some(user.user_id))
}

async fn load_order_with_details<C>(conn: &C, order: OrderModel) -> AppResult<OrderWithDetails>
where
    C: ConnectionTrait,
{
    let details = OrderDetails::find()
        .filter(DetailCol::OrderId.eq(order.id))
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let payment = Payments::find()
        .filter(payments::Column::OrderId.eq(order.id))
        .one(conn)
        .await?
        .map(Into::into);

    Ok(OrderWithDetails {
        order: order.into(),
        details,
        payment,
    })
}
