mod common;

use foodspot_api::{
    dto::{
        cart::{AddToCartRequest, UpdateSubCartItemRequest},
        orders::CheckoutRequest,
    },
    entity::{
        Carts, Foods, Restaurants, SubCartItems, SubCarts,
        enums::{TimeServe, UserRole},
        foods, restaurants,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{cart_service, food_service, order_service, restaurant_service},
    state::AppState,
};
use sea_orm::{EntityTrait, PaginatorTrait};

/// Two restaurants and a customer holding one Phở Bò (40000) from the
/// first and two Bún Chả (35000) from the second.
struct TwoShops {
    state: AppState,
    customer: AuthUser,
    owner: AuthUser,
    pho_place: restaurants::Model,
    pho: foods::Model,
    bun: foods::Model,
}

async fn two_shops() -> anyhow::Result<TwoShops> {
    let state = common::setup_state().await?;
    let customer = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let pho_place = common::create_restaurant(&state, &owner, "Pho 24").await?;
    let bun_place = common::create_restaurant(&state, &owner, "Bun Cha Huong Lien").await?;
    let pho = common::create_food(&state, pho_place.id, "Phở Bò", TimeServe::Noon, 40000).await?;
    let bun = common::create_food(&state, bun_place.id, "Bún Chả", TimeServe::Noon, 35000).await?;

    for food_id in [pho.id, bun.id, bun.id] {
        cart_service::add_item(
            &state,
            &customer,
            AddToCartRequest {
                food_id,
                time_serve: TimeServe::Noon,
            },
        )
        .await?;
    }

    Ok(TwoShops {
        state,
        customer,
        owner,
        pho_place,
        pho,
        bun,
    })
}

async fn item_id_of(shops: &TwoShops, food_id: uuid::Uuid) -> anyhow::Result<uuid::Uuid> {
    let item = SubCartItems::find()
        .all(&shops.state.orm)
        .await?
        .into_iter()
        .find(|item| item.food_id == food_id)
        .expect("cart line present");
    Ok(item.id)
}

/// Only the Bún Chả sub cart is left and the cart totals follow it.
async fn assert_only_bun_left(shops: &TwoShops) -> anyhow::Result<()> {
    let view = cart_service::view_cart(&shops.state, &shops.customer)
        .await?
        .into_data()
        .unwrap();
    assert_eq!(view.sub_carts.len(), 1);
    let entry = &view.sub_carts[0];
    assert_eq!(entry.items.len(), 1);
    assert_eq!(entry.items[0].food_id, shops.bun.id);
    assert_eq!(entry.sub_cart.total_quantity, 2);
    assert_eq!(entry.sub_cart.total_price, 70000);

    let cart = view.cart.unwrap();
    assert_eq!(cart.item_number, 2);
    assert_eq!(cart.total_price, 70000);
    assert_eq!(SubCarts::find().count(&shops.state.orm).await?, 1);
    assert_eq!(SubCartItems::find().count(&shops.state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn adding_same_food_twice_increments_quantity() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let customer = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Pho 24").await?;
    let pho = common::create_food(&state, restaurant.id, "Phở Bò", TimeServe::Morning, 40000).await?;

    let request = || AddToCartRequest {
        food_id: pho.id,
        time_serve: TimeServe::Morning,
    };
    cart_service::add_item(&state, &customer, request()).await?;
    let second = cart_service::add_item(&state, &customer, request())
        .await?
        .into_data()
        .unwrap();

    let item = second.item.unwrap();
    assert_eq!(item.quantity, 2);
    assert_eq!(item.unit_price, 40000);
    assert_eq!(item.price, 80000);

    let sub_cart = second.sub_cart.unwrap();
    assert_eq!(sub_cart.total_quantity, 2);
    assert_eq!(sub_cart.total_price, 80000);

    let cart = second.cart.unwrap();
    assert_eq!(cart.item_number, 2);
    assert_eq!(cart.total_price, 80000);
    Ok(())
}

#[tokio::test]
async fn cart_totals_match_sub_carts_across_restaurants() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let customer = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let pho_place = common::create_restaurant(&state, &owner, "Pho 24").await?;
    let bun_place = common::create_restaurant(&state, &owner, "Bun Cha Huong Lien").await?;
    let pho = common::create_food(&state, pho_place.id, "Phở Bò", TimeServe::Morning, 40000).await?;
    let bun = common::create_food(&state, bun_place.id, "Bún Chả", TimeServe::Noon, 35000).await?;

    for (food_id, time_serve) in [
        (pho.id, TimeServe::Morning),
        (bun.id, TimeServe::Noon),
        (bun.id, TimeServe::Noon),
    ] {
        cart_service::add_item(
            &state,
            &customer,
            AddToCartRequest { food_id, time_serve },
        )
        .await?;
    }

    let view = cart_service::view_cart(&state, &customer)
        .await?
        .into_data()
        .unwrap();
    assert_eq!(view.sub_carts.len(), 2);

    for entry in &view.sub_carts {
        let quantity: i32 = entry.items.iter().map(|item| item.quantity).sum();
        let price: i64 = entry.items.iter().map(|item| item.price).sum();
        assert_eq!(entry.sub_cart.total_quantity, quantity);
        assert_eq!(entry.sub_cart.total_price, price);
    }

    let cart = view.cart.unwrap();
    assert_eq!(cart.item_number, 3);
    assert_eq!(cart.total_price, 40000 + 2 * 35000);
    Ok(())
}

#[tokio::test]
async fn negative_delta_removes_empty_levels() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let customer = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Pho 24").await?;
    let pho = common::create_food(&state, restaurant.id, "Phở Bò", TimeServe::Morning, 40000).await?;

    let added = cart_service::add_item(
        &state,
        &customer,
        AddToCartRequest {
            food_id: pho.id,
            time_serve: TimeServe::Morning,
        },
    )
    .await?
    .into_data()
    .unwrap();
    let item_id = added.item.unwrap().id;

    let removed = cart_service::update_item(
        &state,
        &customer,
        item_id,
        UpdateSubCartItemRequest { delta: -1 },
    )
    .await?
    .into_data()
    .unwrap();

    assert!(removed.item.is_none());
    assert!(removed.sub_cart.is_none());
    assert!(removed.cart.is_none());
    assert_eq!(SubCartItems::find().count(&state.orm).await?, 0);
    assert_eq!(SubCarts::find().count(&state.orm).await?, 0);
    assert_eq!(Carts::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn rejects_food_without_price_for_time_serve() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let customer = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Pho 24").await?;
    let pho = common::create_food(&state, restaurant.id, "Phở Bò", TimeServe::Morning, 40000).await?;

    let result = cart_service::add_item(
        &state,
        &customer,
        AddToCartRequest {
            food_id: pho.id,
            time_serve: TimeServe::Night,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(Carts::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn zero_delta_is_rejected() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let customer = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;

    let result = cart_service::update_item(
        &state,
        &customer,
        uuid::Uuid::new_v4(),
        UpdateSubCartItemRequest { delta: 0 },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn positive_delta_grows_line_and_totals() -> anyhow::Result<()> {
    let shops = two_shops().await?;
    let item_id = item_id_of(&shops, shops.pho.id).await?;

    let grown = cart_service::update_item(
        &shops.state,
        &shops.customer,
        item_id,
        UpdateSubCartItemRequest { delta: 2 },
    )
    .await?
    .into_data()
    .unwrap();

    let item = grown.item.unwrap();
    assert_eq!(item.quantity, 3);
    assert_eq!(item.price, 120000);
    let sub_cart = grown.sub_cart.unwrap();
    assert_eq!(sub_cart.total_quantity, 3);
    assert_eq!(sub_cart.total_price, 120000);
    let cart = grown.cart.unwrap();
    assert_eq!(cart.item_number, 5);
    assert_eq!(cart.total_price, 120000 + 70000);
    Ok(())
}

#[tokio::test]
async fn overflowing_delta_is_rejected() -> anyhow::Result<()> {
    let shops = two_shops().await?;
    let item_id = item_id_of(&shops, shops.pho.id).await?;

    let result = cart_service::update_item(
        &shops.state,
        &shops.customer,
        item_id,
        UpdateSubCartItemRequest { delta: i32::MAX },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let item = SubCartItems::find_by_id(item_id)
        .one(&shops.state.orm)
        .await?
        .unwrap();
    assert_eq!(item.quantity, 1);
    assert_eq!(item.price, 40000);
    Ok(())
}

#[tokio::test]
async fn remove_item_drops_line_and_empty_sub_cart() -> anyhow::Result<()> {
    let shops = two_shops().await?;
    let item_id = item_id_of(&shops, shops.pho.id).await?;

    let removed = cart_service::remove_item(&shops.state, &shops.customer, item_id)
        .await?
        .into_data()
        .unwrap();
    assert!(removed.item.is_none());
    assert!(removed.sub_cart.is_none());
    assert_eq!(removed.cart.unwrap().total_price, 70000);

    assert_only_bun_left(&shops).await
}

#[tokio::test]
async fn delete_sub_cart_keeps_other_restaurants() -> anyhow::Result<()> {
    let shops = two_shops().await?;
    let pho_line = SubCartItems::find_by_id(item_id_of(&shops, shops.pho.id).await?)
        .one(&shops.state.orm)
        .await?
        .unwrap();

    let result =
        cart_service::delete_sub_cart(&shops.state, &shops.customer, pho_line.sub_cart_id)
            .await?
            .into_data()
            .unwrap();
    let cart = result.cart.unwrap();
    assert_eq!(cart.item_number, 2);
    assert_eq!(cart.total_price, 70000);

    assert_only_bun_left(&shops).await
}

#[tokio::test]
async fn deleting_food_purges_cart_lines() -> anyhow::Result<()> {
    let shops = two_shops().await?;

    food_service::delete_food(&shops.state, &shops.owner, shops.pho.id).await?;

    assert!(Foods::find_by_id(shops.pho.id).one(&shops.state.orm).await?.is_none());
    assert_only_bun_left(&shops).await
}

#[tokio::test]
async fn deleting_restaurant_purges_its_sub_cart() -> anyhow::Result<()> {
    let shops = two_shops().await?;

    restaurant_service::delete_restaurant(&shops.state, &shops.owner, shops.pho_place.id).await?;

    assert!(
        Restaurants::find_by_id(shops.pho_place.id)
            .one(&shops.state.orm)
            .await?
            .is_none()
    );
    assert_only_bun_left(&shops).await
}

#[tokio::test]
async fn ordered_food_and_restaurant_cannot_be_deleted() -> anyhow::Result<()> {
    let shops = two_shops().await?;
    let address_id = common::create_address(&shops.state, &shops.customer).await?;
    let pho_line = SubCartItems::find_by_id(item_id_of(&shops, shops.pho.id).await?)
        .one(&shops.state.orm)
        .await?
        .unwrap();
    order_service::checkout(
        &shops.state,
        &shops.customer,
        CheckoutRequest {
            sub_cart_id: pho_line.sub_cart_id,
            payment_method: "COD".into(),
            ship_fee: 0,
            total_price: 40000,
            ship_address_id: address_id,
        },
    )
    .await?;

    let food = food_service::delete_food(&shops.state, &shops.owner, shops.pho.id).await;
    assert!(matches!(food, Err(AppError::BadRequest(_))));
    let restaurant =
        restaurant_service::delete_restaurant(&shops.state, &shops.owner, shops.pho_place.id).await;
    assert!(matches!(restaurant, Err(AppError::BadRequest(_))));

    assert!(Foods::find_by_id(shops.pho.id).one(&shops.state.orm).await?.is_some());
    assert_only_bun_left(&shops).await
}
