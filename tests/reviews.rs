mod common;

use foodspot_api::{
    dto::{
        cart::AddToCartRequest,
        orders::{CheckoutRequest, OrderWithDetails, UpdateOrderStatusRequest},
        reviews::{CreateFoodReviewRequest, CreateRestaurantReviewRequest, UpdateReviewRequest},
    },
    entity::{
        Foods, Restaurants,
        enums::{OrderStatus, TimeServe, UserRole},
        foods,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{cart_service, order_service, review_service},
    state::AppState,
};
use sea_orm::EntityTrait;

/// Place an order of one `food` for `customer` and move it to `status`.
async fn order_food(
    state: &AppState,
    customer: &AuthUser,
    owner: &AuthUser,
    food: &foods::Model,
    status: OrderStatus,
) -> anyhow::Result<OrderWithDetails> {
    let address_id = common::create_address(state, customer).await?;
    let added = cart_service::add_item(
        state,
        customer,
        AddToCartRequest {
            food_id: food.id,
            time_serve: TimeServe::Noon,
        },
    )
    .await?
    .into_data()
    .unwrap();
    let sub_cart = added.sub_cart.unwrap();

    let placed = order_service::checkout(
        state,
        customer,
        CheckoutRequest {
            sub_cart_id: sub_cart.id,
            payment_method: "COD".into(),
            ship_fee: 0,
            total_price: sub_cart.total_price,
            ship_address_id: address_id,
        },
    )
    .await?
    .into_data()
    .unwrap();

    let mut steps = Vec::new();
    if status == OrderStatus::Accepted || status == OrderStatus::Delivered {
        steps.push(OrderStatus::Accepted);
    }
    if status == OrderStatus::Delivered {
        steps.push(OrderStatus::Delivered);
    }
    for step in steps {
        order_service::update_status(
            state,
            owner,
            placed.order.id,
            UpdateOrderStatusRequest { status: step },
        )
        .await?;
    }
    Ok(placed)
}

async fn food_rating(state: &AppState, food_id: uuid::Uuid) -> anyhow::Result<f64> {
    let food = Foods::find_by_id(food_id).one(&state.orm).await?.unwrap();
    Ok(food.star_rating)
}

fn review(order_detail_id: uuid::Uuid, star: f64) -> CreateFoodReviewRequest {
    CreateFoodReviewRequest {
        order_detail_id,
        parent_id: None,
        star,
        comment: "Ngon".into(),
    }
}

#[tokio::test]
async fn food_rating_averages_top_level_reviews_only() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let an = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let binh = common::create_user(&state, UserRole::Customer, "binh@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Quán Ngon").await?;
    let pho = common::create_food(&state, restaurant.id, "Phở Bò", TimeServe::Noon, 40000).await?;

    let first = order_food(&state, &an, &owner, &pho, OrderStatus::Delivered).await?;
    let second = order_food(&state, &binh, &owner, &pho, OrderStatus::Delivered).await?;

    let top = review_service::create_food_review(&state, &an, review(first.details[0].id, 4.5))
        .await?
        .into_data()
        .unwrap();
    review_service::create_food_review(&state, &binh, review(second.details[0].id, 5.0)).await?;

    let reply = review_service::create_food_review(
        &state,
        &owner,
        CreateFoodReviewRequest {
            order_detail_id: first.details[0].id,
            parent_id: Some(top.id),
            star: 0.0,
            comment: "Cảm ơn bạn!".into(),
        },
    )
    .await?
    .into_data()
    .unwrap();
    assert_eq!(reply.parent_id, Some(top.id));

    let food = Foods::find_by_id(pho.id).one(&state.orm).await?.unwrap();
    assert_eq!(food.star_rating, 4.8);
    Ok(())
}

#[tokio::test]
async fn reply_rules_are_enforced() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let rival = common::create_user(&state, UserRole::RestaurantUser, "rival@example.com", None).await?;
    let an = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Quán Ngon").await?;
    let pho = common::create_food(&state, restaurant.id, "Phở Bò", TimeServe::Noon, 40000).await?;

    let placed = order_food(&state, &an, &owner, &pho, OrderStatus::Delivered).await?;
    let detail_id = placed.details[0].id;
    let top = review_service::create_food_review(&state, &an, review(detail_id, 4.0))
        .await?
        .into_data()
        .unwrap();

    let reply = |star: f64, parent_id| CreateFoodReviewRequest {
        order_detail_id: detail_id,
        parent_id: Some(parent_id),
        star,
        comment: "Cảm ơn".into(),
    };

    let starred = review_service::create_food_review(&state, &owner, reply(3.0, top.id)).await;
    assert!(matches!(starred, Err(AppError::BadRequest(_))));

    let by_customer = review_service::create_food_review(&state, &an, reply(0.0, top.id)).await;
    assert!(matches!(by_customer, Err(AppError::BadRequest(_))));

    let by_rival = review_service::create_food_review(&state, &rival, reply(0.0, top.id)).await;
    assert!(matches!(by_rival, Err(AppError::BadRequest(_))));

    let answer = review_service::create_food_review(&state, &owner, reply(0.0, top.id))
        .await?
        .into_data()
        .unwrap();
    let nested = review_service::create_food_review(&state, &owner, reply(0.0, answer.id)).await;
    assert!(matches!(nested, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn review_requires_delivered_order() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let an = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Quán Ngon").await?;
    let pho = common::create_food(&state, restaurant.id, "Phở Bò", TimeServe::Noon, 40000).await?;

    let restaurant_review = |star| CreateRestaurantReviewRequest {
        restaurant_id: restaurant.id,
        star,
        comment: "Quán sạch sẽ".into(),
    };

    let no_order =
        review_service::create_restaurant_review(&state, &an, restaurant_review(4.0)).await;
    assert!(matches!(no_order, Err(AppError::BadRequest(_))));

    let pending = order_food(&state, &an, &owner, &pho, OrderStatus::Pending).await?;
    let early =
        review_service::create_food_review(&state, &an, review(pending.details[0].id, 4.0)).await;
    assert!(matches!(early, Err(AppError::BadRequest(_))));

    order_food(&state, &an, &owner, &pho, OrderStatus::Delivered).await?;
    let too_many_stars =
        review_service::create_restaurant_review(&state, &an, restaurant_review(5.5)).await;
    assert!(matches!(too_many_stars, Err(AppError::BadRequest(_))));

    review_service::create_restaurant_review(&state, &an, restaurant_review(4.0)).await?;
    let rated = Restaurants::find_by_id(restaurant.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(rated.star_rating, 4.0);
    Ok(())
}

#[tokio::test]
async fn editing_and_deleting_reviews_recompute_food_rating() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let an = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let binh = common::create_user(&state, UserRole::Customer, "binh@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Quán Ngon").await?;
    let pho = common::create_food(&state, restaurant.id, "Phở Bò", TimeServe::Noon, 40000).await?;

    let first = order_food(&state, &an, &owner, &pho, OrderStatus::Delivered).await?;
    let second = order_food(&state, &binh, &owner, &pho, OrderStatus::Delivered).await?;
    let an_review =
        review_service::create_food_review(&state, &an, review(first.details[0].id, 4.0))
            .await?
            .into_data()
            .unwrap();
    let binh_review =
        review_service::create_food_review(&state, &binh, review(second.details[0].id, 5.0))
            .await?
            .into_data()
            .unwrap();
    assert_eq!(food_rating(&state, pho.id).await?, 4.5);

    review_service::update_food_review(
        &state,
        &an,
        an_review.id,
        UpdateReviewRequest {
            star: Some(2.0),
            comment: None,
        },
    )
    .await?;
    assert_eq!(food_rating(&state, pho.id).await?, 3.5);

    let stranger_edit = review_service::update_food_review(
        &state,
        &an,
        binh_review.id,
        UpdateReviewRequest {
            star: Some(1.0),
            comment: None,
        },
    )
    .await;
    assert!(matches!(stranger_edit, Err(AppError::Forbidden)));
    assert_eq!(food_rating(&state, pho.id).await?, 3.5);

    review_service::delete_food_review(&state, &binh, binh_review.id).await?;
    assert_eq!(food_rating(&state, pho.id).await?, 2.0);

    review_service::delete_food_review(&state, &an, an_review.id).await?;
    assert_eq!(food_rating(&state, pho.id).await?, 0.0);
    Ok(())
}
