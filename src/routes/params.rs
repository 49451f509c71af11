use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::enums::OrderStatus;

pub const FOOD_PAGE_SIZE: i64 = 10;
pub const ORDER_PAGE_SIZE: i64 = 8;
pub const REVIEW_PAGE_SIZE: i64 = 12;
pub const NOTIFICATION_PAGE_SIZE: i64 = 10;
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        self.normalize_with(DEFAULT_PAGE_SIZE)
    }

    /// Returns `(page, per_page, offset)` using `default_per_page` when
    /// the caller did not ask for a page size.
    pub fn normalize_with(&self, default_per_page: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FoodQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive match on the food name.
    pub name: Option<String>,
    /// Foods with at least one price at or above this value.
    pub price_min: Option<i64>,
    /// Foods with at least one price at or below this value.
    pub price_max: Option<i64>,
    /// Case-insensitive match on the category name.
    pub food_category: Option<String>,
    /// Case-insensitive match on the restaurant name.
    pub restaurant_name: Option<String>,
    pub restaurant_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RestaurantReviewQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub restaurant_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FoodReviewQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub food_id: Option<Uuid>,
}

// Query strings are not flattened into `Pagination`: serde_urlencoded
// cannot parse numbers through `#[serde(flatten)]`.
macro_rules! paginated {
    ($($query:ty),+) => {
        $(impl $query {
            pub fn pagination(&self) -> Pagination {
                Pagination {
                    page: self.page,
                    per_page: self.per_page,
                }
            }
        })+
    };
}

paginated!(FoodQuery, OrderListQuery, RestaurantReviewQuery, FoodReviewQuery);

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MenuQuery {
    pub restaurant_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_to_first_page() {
        let (page, per_page, offset) = Pagination::default().normalize();
        assert_eq!((page, per_page, offset), (1, 20, 0));
    }

    #[test]
    fn normalize_clamps_bad_input() {
        let pagination = Pagination {
            page: Some(-3),
            per_page: Some(1000),
        };
        assert_eq!(pagination.normalize(), (1, 100, 0));
    }

    #[test]
    fn normalize_with_uses_resource_page_size() {
        let pagination = Pagination {
            page: Some(3),
            per_page: None,
        };
        assert_eq!(pagination.normalize_with(ORDER_PAGE_SIZE), (3, 8, 16));
    }
}
