use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{FoodReview, RestaurantReview};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantReviewRequest {
    pub restaurant_id: Uuid,
    pub star: f64,
    pub comment: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFoodReviewRequest {
    pub order_detail_id: Uuid,
    /// Set when a restaurant replies to a customer review.
    pub parent_id: Option<Uuid>,
    pub star: f64,
    pub comment: String,
}

/// Only the comment and the star of a review can be edited.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateReviewRequest {
    pub star: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantReviewList {
    pub items: Vec<RestaurantReview>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodReviewWithReplies {
    pub review: FoodReview,
    pub replies: Vec<FoodReview>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodReviewList {
    pub items: Vec<FoodReviewWithReplies>,
}
