mod common;

use foodspot_api::{
    dto::{
        cart::AddToCartRequest,
        orders::{CheckoutRequest, UpdateOrderStatusRequest},
        payments::{PaymentCallback, UpdatePaymentStatusRequest},
    },
    entity::{
        Carts, Orders, Payments, SubCartItems, SubCarts,
        enums::{OrderStatus, PaymentStatus, TimeServe, UserRole},
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{cart_service, order_service, payment_service},
    state::AppState,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

struct Scenario {
    state: AppState,
    customer: AuthUser,
    owner: AuthUser,
    address_id: Uuid,
    sub_cart_id: Uuid,
}

/// Customer with one Phở Bò (40000) and two Bún Chả (35000) in one sub cart.
async fn scenario() -> anyhow::Result<Scenario> {
    let state = common::setup_state().await?;
    let customer = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Quán Ngon").await?;
    let pho = common::create_food(&state, restaurant.id, "Phở Bò", TimeServe::Noon, 40000).await?;
    let bun = common::create_food(&state, restaurant.id, "Bún Chả", TimeServe::Noon, 35000).await?;
    let address_id = common::create_address(&state, &customer).await?;

    let mut sub_cart_id = Uuid::nil();
    for food_id in [pho.id, bun.id, bun.id] {
        let added = cart_service::add_item(
            &state,
            &customer,
            AddToCartRequest {
                food_id,
                time_serve: TimeServe::Noon,
            },
        )
        .await?
        .into_data()
        .unwrap();
        sub_cart_id = added.sub_cart.unwrap().id;
    }

    Ok(Scenario {
        state,
        customer,
        owner,
        address_id,
        sub_cart_id,
    })
}

fn checkout_request(s: &Scenario, total_price: i64) -> CheckoutRequest {
    CheckoutRequest {
        sub_cart_id: s.sub_cart_id,
        payment_method: "COD".into(),
        ship_fee: 15000,
        total_price,
        ship_address_id: s.address_id,
    }
}

#[tokio::test]
async fn checkout_consumes_sub_cart_and_creates_order() -> anyhow::Result<()> {
    let s = scenario().await?;

    let placed = order_service::checkout(&s.state, &s.customer, checkout_request(&s, 125000))
        .await?
        .into_data()
        .unwrap();

    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.order.total, 125000);
    assert_eq!(placed.order.shipping_fee, 15000);
    assert_eq!(placed.details.len(), 2);
    let detail_total: i64 = placed.details.iter().map(|d| d.sub_total).sum();
    assert_eq!(detail_total, 110000);

    let payment = placed.payment.unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.amount, 110000);
    assert_eq!(payment.total_payment, 125000);

    assert_eq!(SubCarts::find().count(&s.state.orm).await?, 0);
    assert_eq!(SubCartItems::find().count(&s.state.orm).await?, 0);
    assert_eq!(Carts::find().count(&s.state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn total_mismatch_leaves_cart_untouched() -> anyhow::Result<()> {
    let s = scenario().await?;

    let result = order_service::checkout(&s.state, &s.customer, checkout_request(&s, 110000)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    assert_eq!(Orders::find().count(&s.state.orm).await?, 0);
    assert_eq!(Payments::find().count(&s.state.orm).await?, 0);
    let sub_cart = SubCarts::find_by_id(s.sub_cart_id)
        .one(&s.state.orm)
        .await?
        .expect("sub cart kept");
    assert_eq!(sub_cart.total_price, 110000);
    assert_eq!(sub_cart.total_quantity, 3);
    Ok(())
}

#[tokio::test]
async fn foreign_address_is_rejected() -> anyhow::Result<()> {
    let s = scenario().await?;
    let stranger = common::create_user(&s.state, UserRole::Customer, "binh@example.com", None).await?;
    let foreign_address = common::create_address(&s.state, &stranger).await?;

    let mut request = checkout_request(&s, 125000);
    request.ship_address_id = foreign_address;
    let result = order_service::checkout(&s.state, &s.customer, request).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(Orders::find().count(&s.state.orm).await?, 0);
    assert_eq!(SubCartItems::find().count(&s.state.orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn other_customer_cannot_checkout_sub_cart() -> anyhow::Result<()> {
    let s = scenario().await?;
    let stranger = common::create_user(&s.state, UserRole::Customer, "binh@example.com", None).await?;

    let result = order_service::checkout(&s.state, &stranger, checkout_request(&s, 125000)).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn failed_payment_fails_the_order() -> anyhow::Result<()> {
    let s = scenario().await?;
    let admin = common::create_user(&s.state, UserRole::Admin, "admin@example.com", None).await?;
    let placed = order_service::checkout(&s.state, &s.customer, checkout_request(&s, 125000))
        .await?
        .into_data()
        .unwrap();

    let payment = payment_service::update_payment_status(
        &s.state,
        &admin,
        placed.order.id,
        UpdatePaymentStatusRequest {
            status: PaymentStatus::Fail,
        },
    )
    .await?
    .into_data()
    .unwrap();
    assert_eq!(payment.status, PaymentStatus::Fail);

    let order = Orders::find_by_id(placed.order.id)
        .one(&s.state.orm)
        .await?
        .unwrap();
    assert_eq!(order.status, OrderStatus::Fail);
    Ok(())
}

#[tokio::test]
async fn signed_callback_marks_payment_success() -> anyhow::Result<()> {
    let s = scenario().await?;
    let placed = order_service::checkout(&s.state, &s.customer, checkout_request(&s, 125000))
        .await?
        .into_data()
        .unwrap();

    let mut callback = PaymentCallback {
        order_id: placed.order.id,
        request_id: "req-001".into(),
        amount: 125000,
        result_code: 0,
        message: "Successful.".into(),
        trans_id: "4088878653".into(),
        signature: String::new(),
    };

    let mut forged = callback.clone();
    forged.signature = "00".repeat(32);
    let rejected = payment_service::handle_callback(&s.state, forged).await;
    assert!(matches!(rejected, Err(AppError::BadRequest(_))));

    callback.signature = payment_service::sign_callback(common::PAYMENT_SECRET, &callback)?;
    let payment = payment_service::handle_callback(&s.state, callback)
        .await?
        .into_data()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Success);

    let order = Orders::find_by_id(placed.order.id)
        .one(&s.state.orm)
        .await?
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn order_status_follows_allowed_transitions() -> anyhow::Result<()> {
    let s = scenario().await?;
    let placed = order_service::checkout(&s.state, &s.customer, checkout_request(&s, 125000))
        .await?
        .into_data()
        .unwrap();
    let order_id = placed.order.id;
    let set = |status| UpdateOrderStatusRequest { status };

    let skipped = order_service::update_status(
        &s.state,
        &s.owner,
        order_id,
        set(OrderStatus::Delivered),
    )
    .await;
    assert!(matches!(skipped, Err(AppError::BadRequest(_))));

    order_service::update_status(&s.state, &s.owner, order_id, set(OrderStatus::Accepted)).await?;
    let buyer_cancel = order_service::update_status(
        &s.state,
        &s.customer,
        order_id,
        set(OrderStatus::Cancel),
    )
    .await;
    assert!(matches!(buyer_cancel, Err(AppError::Forbidden)));

    let delivered = order_service::update_status(
        &s.state,
        &s.owner,
        order_id,
        set(OrderStatus::Delivered),
    )
    .await?
    .into_data()
    .unwrap();
    assert_eq!(delivered.order.status, OrderStatus::Delivered);
    Ok(())
}

#[tokio::test]
async fn huge_ship_fee_is_rejected() -> anyhow::Result<()> {
    let s = scenario().await?;

    let mut request = checkout_request(&s, i64::MAX);
    request.ship_fee = i64::MAX;
    let result = order_service::checkout(&s.state, &s.customer, request).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(Orders::find().count(&s.state.orm).await?, 0);
    assert_eq!(SubCartItems::find().count(&s.state.orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn checkout_keeps_other_sub_carts_in_cart() -> anyhow::Result<()> {
    let s = scenario().await?;
    let other_place = common::create_restaurant(&s.state, &s.owner, "Bánh Mì Phượng").await?;
    let banh_mi =
        common::create_food(&s.state, other_place.id, "Bánh Mì", TimeServe::Noon, 25000).await?;
    cart_service::add_item(
        &s.state,
        &s.customer,
        AddToCartRequest {
            food_id: banh_mi.id,
            time_serve: TimeServe::Noon,
        },
    )
    .await?;

    order_service::checkout(&s.state, &s.customer, checkout_request(&s, 125000)).await?;

    let cart = Carts::find().one(&s.state.orm).await?.expect("cart kept");
    assert_eq!(cart.item_number, 1);
    assert_eq!(cart.total_price, 25000);
    let remaining = SubCarts::find().all(&s.state.orm).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].restaurant_id, other_place.id);
    assert_eq!(remaining[0].total_price, 25000);
    assert_eq!(SubCartItems::find().count(&s.state.orm).await?, 1);
    Ok(())
}

fn signed_callback(
    order_id: Uuid,
    result_code: i32,
    request_id: &str,
) -> anyhow::Result<PaymentCallback> {
    let mut callback = PaymentCallback {
        order_id,
        request_id: request_id.into(),
        amount: 125000,
        result_code,
        message: "Gateway result".into(),
        trans_id: format!("trans-{request_id}"),
        signature: String::new(),
    };
    callback.signature = payment_service::sign_callback(common::PAYMENT_SECRET, &callback)?;
    Ok(callback)
}

#[tokio::test]
async fn settled_payment_ignores_later_callbacks() -> anyhow::Result<()> {
    let s = scenario().await?;
    let placed = order_service::checkout(&s.state, &s.customer, checkout_request(&s, 125000))
        .await?
        .into_data()
        .unwrap();
    let order_id = placed.order.id;

    payment_service::handle_callback(&s.state, signed_callback(order_id, 0, "req-1")?).await?;
    let retry = signed_callback(order_id, 1006, "req-2")?;
    let retried = payment_service::handle_callback(&s.state, retry)
        .await?
        .into_data()
        .unwrap();
    assert_eq!(retried.status, PaymentStatus::Success);

    let order = Orders::find_by_id(order_id).one(&s.state.orm).await?.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn failed_callback_leaves_delivered_order_alone() -> anyhow::Result<()> {
    let s = scenario().await?;
    let placed = order_service::checkout(&s.state, &s.customer, checkout_request(&s, 125000))
        .await?
        .into_data()
        .unwrap();
    let order_id = placed.order.id;
    for status in [OrderStatus::Accepted, OrderStatus::Delivered] {
        order_service::update_status(
            &s.state,
            &s.owner,
            order_id,
            UpdateOrderStatusRequest { status },
        )
        .await?;
    }

    let late = signed_callback(order_id, 1006, "req-1")?;
    let payment = payment_service::handle_callback(&s.state, late)
        .await?
        .into_data()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    let order = Orders::find_by_id(order_id).one(&s.state.orm).await?.unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    Ok(())
}
