#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use foodspot_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dispatch::{Dispatcher, Mailer, PushMessage, PushSender},
    entity::{
        enums::{FollowStatus, TimeServe, UserRole},
        addresses, follows, food_prices, foods, restaurants, users,
    },
    middleware::auth::AuthUser,
    state::AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub const PAYMENT_SECRET: &str = "test-payment-secret";

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, recipient: &str, subject: &str, _body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), subject.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<PushMessage>>,
}

#[async_trait]
impl PushSender for RecordingPush {
    async fn send_multicast(&self, message: &PushMessage) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("smtp unreachable"))
    }
}

pub struct FailingPush;

#[async_trait]
impl PushSender for FailingPush {
    async fn send_multicast(&self, _: &PushMessage) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("push gateway unreachable"))
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-jwt-secret".to_string(),
        payment_secret: PAYMENT_SECRET.to_string(),
        db_max_connections: 1,
        mail_from: "no-reply@foodspot.test".to_string(),
    }
}

/// Fresh in-memory database with the schema applied. A single pooled
/// connection keeps every query on the same database.
pub async fn setup_state_with(dispatcher: Dispatcher) -> anyhow::Result<AppState> {
    let config = test_config();
    let orm = create_orm_conn(&config.database_url, config.db_max_connections).await?;
    run_migrations(&orm).await?;
    Ok(AppState {
        orm,
        config: Arc::new(config),
        dispatcher,
    })
}

pub async fn setup_state() -> anyhow::Result<AppState> {
    setup_state_with(Dispatcher::logging("no-reply@foodspot.test")).await
}

pub async fn create_user(
    state: &AppState,
    role: UserRole,
    email: &str,
    fcm_token: Option<&str>,
) -> anyhow::Result<AuthUser> {
    let username = email.split('@').next().unwrap_or(email).to_string();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        fullname: Set(username.clone()),
        username: Set(username),
        phone_number: Set(None),
        role: Set(role),
        is_active: Set(true),
        fcm_token: Set(fcm_token.map(str::to_string)),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role,
    })
}

pub async fn create_restaurant(
    state: &AppState,
    owner: &AuthUser,
    name: &str,
) -> anyhow::Result<restaurants::Model> {
    Ok(restaurants::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        phone_number: Set(None),
        owner_id: Set(owner.user_id),
        star_rating: Set(0.0),
        address_id: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?)
}

/// Insert an available food with a single price for `time_serve`.
pub async fn create_food(
    state: &AppState,
    restaurant_id: Uuid,
    name: &str,
    time_serve: TimeServe,
    price: i64,
) -> anyhow::Result<foods::Model> {
    let food = foods::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(format!("{name} description")),
        is_available: Set(true),
        star_rating: Set(0.0),
        food_category_id: Set(None),
        restaurant_id: Set(restaurant_id),
        image: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    food_prices::ActiveModel {
        id: Set(Uuid::new_v4()),
        food_id: Set(food.id),
        time_serve: Set(time_serve),
        price: Set(price),
    }
    .insert(&state.orm)
    .await?;

    Ok(food)
}

pub async fn create_address(state: &AppState, user: &AuthUser) -> anyhow::Result<Uuid> {
    let address = addresses::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(Some(user.user_id)),
        name: Set("12 Nguyen Hue, District 1".to_string()),
        latitude: Set(10.7769),
        longitude: Set(106.7009),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(address.id)
}

pub async fn create_follow(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
    status: FollowStatus,
) -> anyhow::Result<()> {
    follows::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        restaurant_id: Set(restaurant_id),
        status: Set(status),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(())
}
