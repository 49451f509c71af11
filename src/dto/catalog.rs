use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::TimeServe,
    models::{Food, FoodCategory, Menu, Restaurant},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub phone_number: Option<String>,
    pub address_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantList {
    pub items: Vec<Restaurant>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FoodCategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodCategoryList {
    pub items: Vec<FoodCategory>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PriceInput {
    pub time_serve: TimeServe,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFoodRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: String,
    pub food_category_id: Option<Uuid>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
    #[serde(default)]
    pub prices: Vec<PriceInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFoodRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub food_category_id: Option<Uuid>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodList {
    pub items: Vec<Food>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetFoodPriceRequest {
    pub food_id: Uuid,
    pub time_serve: TimeServe,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateFoodPriceRequest {
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: String,
    pub time_serve: TimeServe,
    #[serde(default)]
    pub food_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub time_serve: Option<TimeServe>,
    pub is_active: Option<bool>,
    /// Replaces the menu's foods when present.
    pub food_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuList {
    pub items: Vec<Menu>,
}
