mod common;

use std::sync::Arc;

use foodspot_api::{
    dispatch::Dispatcher,
    dto::catalog::{CreateFoodRequest, CreateMenuRequest, PriceInput},
    entity::{
        Foods, Notifications,
        enums::{FollowStatus, TimeServe, UserRole},
    },
    routes::params::Pagination,
    services::{follow_service, food_service, menu_service, notification_service},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

fn new_food(restaurant_id: Uuid, name: &str) -> CreateFoodRequest {
    CreateFoodRequest {
        restaurant_id,
        name: name.into(),
        description: "Bánh xèo giòn".into(),
        food_category_id: None,
        image: None,
        is_available: None,
        prices: vec![PriceInput {
            time_serve: TimeServe::Evening,
            price: 30000,
        }],
    }
}

#[tokio::test]
async fn new_food_reaches_active_followers_only() -> anyhow::Result<()> {
    let mailer = Arc::new(common::RecordingMailer::default());
    let push = Arc::new(common::RecordingPush::default());
    let state =
        common::setup_state_with(Dispatcher::new(mailer.clone(), push.clone())).await?;

    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let fan = common::create_user(&state, UserRole::Customer, "an@example.com", Some("fcm-an")).await?;
    let former = common::create_user(&state, UserRole::Customer, "binh@example.com", Some("fcm-binh")).await?;
    let bystander = common::create_user(&state, UserRole::Customer, "chi@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Bánh Xèo Mười Xiềm").await?;
    common::create_follow(&state, &fan, restaurant.id, FollowStatus::Follow).await?;
    common::create_follow(&state, &former, restaurant.id, FollowStatus::Cancel).await?;

    food_service::create_food(&state, &owner, new_food(restaurant.id, "Bánh Xèo")).await?;

    let inbox = notification_service::list_notifications(&state, &fan, Pagination::default())
        .await?
        .into_data()
        .unwrap();
    assert_eq!(inbox.items.len(), 1);
    assert_eq!(inbox.unread, 1);
    let notification = &inbox.items[0];
    assert_eq!(notification.notification_type, "new_food");
    assert_eq!(notification.title, "New food at Bánh Xèo Mười Xiềm");
    assert_eq!(notification.message, "Bánh Xèo");

    for other in [&former, &bystander] {
        let inbox = notification_service::list_notifications(&state, other, Pagination::default())
            .await?
            .into_data()
            .unwrap();
        assert!(inbox.items.is_empty());
    }

    let emails = mailer.sent.lock().unwrap().clone();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].0, "an@example.com");

    let pushes = push.sent.lock().unwrap().clone();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].tokens, vec!["fcm-an".to_string()]);
    assert_eq!(pushes[0].data["type"], "new_food");
    assert_eq!(pushes[0].data["restaurant_id"], restaurant.id.to_string());
    Ok(())
}

#[tokio::test]
async fn delivery_failures_do_not_undo_the_food() -> anyhow::Result<()> {
    let state = common::setup_state_with(Dispatcher::new(
        Arc::new(common::FailingMailer),
        Arc::new(common::FailingPush),
    ))
    .await?;

    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let fan = common::create_user(&state, UserRole::Customer, "an@example.com", Some("fcm-an")).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Quán Ngon").await?;
    common::create_follow(&state, &fan, restaurant.id, FollowStatus::Follow).await?;

    let created = food_service::create_food(&state, &owner, new_food(restaurant.id, "Gỏi Cuốn"))
        .await?
        .into_data()
        .unwrap();

    assert!(Foods::find_by_id(created.id).one(&state.orm).await?.is_some());
    assert_eq!(Notifications::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn new_menu_notifies_and_can_be_marked_read() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let fan = common::create_user(&state, UserRole::Customer, "an@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Quán Ngon").await?;
    follow_service::follow(&state, &fan, restaurant.id).await?;

    menu_service::create_menu(
        &state,
        &owner,
        CreateMenuRequest {
            restaurant_id: restaurant.id,
            name: "Thực đơn tối".into(),
            description: "Món nướng".into(),
            time_serve: TimeServe::Evening,
            food_ids: Vec::new(),
        },
    )
    .await?;

    let inbox = notification_service::list_notifications(&state, &fan, Pagination::default())
        .await?
        .into_data()
        .unwrap();
    assert_eq!(inbox.items.len(), 1);
    assert_eq!(inbox.items[0].notification_type, "new_menu");
    assert_eq!(inbox.items[0].message, "Thực đơn tối - Món nướng");

    let read = notification_service::mark_read(&state, &fan, inbox.items[0].id)
        .await?
        .into_data()
        .unwrap();
    assert!(read.is_read);

    let inbox = notification_service::list_notifications(&state, &fan, Pagination::default())
        .await?
        .into_data()
        .unwrap();
    assert_eq!(inbox.unread, 0);
    Ok(())
}

#[tokio::test]
async fn only_customers_can_follow() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let owner = common::create_user(&state, UserRole::RestaurantUser, "quan@example.com", None).await?;
    let restaurant = common::create_restaurant(&state, &owner, "Quán Ngon").await?;

    let result = follow_service::follow(&state, &owner, restaurant.id).await;
    assert!(matches!(
        result,
        Err(foodspot_api::error::AppError::BadRequest(_))
    ));
    Ok(())
}
