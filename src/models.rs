use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    addresses, carts, follows, food_categories, food_prices, food_reviews, foods, menus,
    notifications, order_details, orders, payments, restaurant_reviews, restaurants,
    sub_cart_items, sub_carts, users,
    enums::{FollowStatus, OrderStatus, PaymentStatus, TimeServe, UserRole},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    pub username: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            fullname: model.fullname,
            username: model.username,
            phone_number: model.phone_number,
            role: model.role,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<addresses::Model> for Address {
    fn from(model: addresses::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    pub owner_id: Uuid,
    pub star_rating: f64,
    pub address_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<restaurants::Model> for Restaurant {
    fn from(model: restaurants::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone_number: model.phone_number,
            owner_id: model.owner_id,
            star_rating: model.star_rating,
            address_id: model.address_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodCategory {
    pub id: Uuid,
    pub name: String,
}

impl From<food_categories::Model> for FoodCategory {
    fn from(model: food_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodPrice {
    pub id: Uuid,
    pub food_id: Uuid,
    pub time_serve: TimeServe,
    pub price: i64,
}

impl From<food_prices::Model> for FoodPrice {
    fn from(model: food_prices::Model) -> Self {
        Self {
            id: model.id,
            food_id: model.food_id,
            time_serve: model.time_serve,
            price: model.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_available: bool,
    pub star_rating: f64,
    pub food_category_id: Option<Uuid>,
    pub restaurant_id: Uuid,
    pub image: Option<String>,
    pub prices: Vec<FoodPrice>,
    pub created_at: DateTime<Utc>,
}

impl Food {
    pub fn from_entity(model: foods::Model, prices: Vec<food_prices::Model>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            is_available: model.is_available,
            star_rating: model.star_rating,
            food_category_id: model.food_category_id,
            restaurant_id: model.restaurant_id,
            image: model.image,
            prices: prices.into_iter().map(FoodPrice::from).collect(),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Menu {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: String,
    pub time_serve: TimeServe,
    pub is_active: bool,
    pub food_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Menu {
    pub fn from_entity(model: menus::Model, food_ids: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            name: model.name,
            description: model.description,
            time_serve: model.time_serve,
            is_active: model.is_active,
            food_ids,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_number: i32,
    pub total_price: i64,
}

impl From<carts::Model> for Cart {
    fn from(model: carts::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            item_number: model.item_number,
            total_price: model.total_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubCart {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub restaurant_id: Uuid,
    pub total_price: i64,
    pub total_quantity: i32,
}

impl From<sub_carts::Model> for SubCart {
    fn from(model: sub_carts::Model) -> Self {
        Self {
            id: model.id,
            cart_id: model.cart_id,
            restaurant_id: model.restaurant_id,
            total_price: model.total_price,
            total_quantity: model.total_quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubCartItem {
    pub id: Uuid,
    pub sub_cart_id: Uuid,
    pub food_id: Uuid,
    pub restaurant_id: Uuid,
    pub quantity: i32,
    pub time_serve: TimeServe,
    pub unit_price: i64,
    pub price: i64,
}

impl From<sub_cart_items::Model> for SubCartItem {
    fn from(model: sub_cart_items::Model) -> Self {
        Self {
            id: model.id,
            sub_cart_id: model.sub_cart_id,
            food_id: model.food_id,
            restaurant_id: model.restaurant_id,
            quantity: model.quantity,
            time_serve: model.time_serve,
            unit_price: model.unit_price,
            price: model.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub address_id: Uuid,
    pub shipping_fee: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub ordered_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            restaurant_id: model.restaurant_id,
            address_id: model.address_id,
            shipping_fee: model.shipping_fee,
            total: model.total,
            status: model.status,
            ordered_date: model.ordered_date.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub food_id: Uuid,
    pub quantity: i32,
    pub time_serve: TimeServe,
    pub sub_total: i64,
}

impl From<order_details::Model> for OrderDetail {
    fn from(model: order_details::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            food_id: model.food_id,
            quantity: model.quantity,
            time_serve: model.time_serve,
            sub_total: model.sub_total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub amount: i64,
    pub total_payment: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<payments::Model> for Payment {
    fn from(model: payments::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            payment_method: model.payment_method,
            status: model.status,
            amount: model.amount,
            total_payment: model.total_payment,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestaurantReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub star: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<restaurant_reviews::Model> for RestaurantReview {
    fn from(model: restaurant_reviews::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            restaurant_id: model.restaurant_id,
            star: model.star,
            comment: model.comment,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_detail_id: Uuid,
    pub food_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub star: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<food_reviews::Model> for FoodReview {
    fn from(model: food_reviews::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            order_detail_id: model.order_detail_id,
            food_id: model.food_id,
            parent_id: model.parent_id,
            star: model.star,
            comment: model.comment,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: FollowStatus,
}

impl From<follows::Model> for Follow {
    fn from(model: follows::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            restaurant_id: model.restaurant_id,
            status: model.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub related_object_id: Option<Uuid>,
    pub related_object_type: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notifications::Model> for Notification {
    fn from(model: notifications::Model) -> Self {
        Self {
            id: model.id,
            notification_type: model.notification_type,
            title: model.title,
            message: model.message,
            related_object_id: model.related_object_id,
            related_object_type: model.related_object_type,
            is_read: model.is_read,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
