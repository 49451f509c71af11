use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Restaurant;

#[derive(Debug, Serialize, ToSchema)]
pub struct FollowedRestaurantList {
    pub items: Vec<Restaurant>,
}
