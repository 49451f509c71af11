use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "CUSTOMER")]
    Customer,
    #[sea_orm(string_value = "RESTAURANT_USER")]
    RestaurantUser,
}

/// Meal time-slot a food price applies to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeServe {
    #[sea_orm(string_value = "MORNING")]
    Morning,
    #[sea_orm(string_value = "NOON")]
    Noon,
    #[sea_orm(string_value = "EVENING")]
    Evening,
    #[sea_orm(string_value = "NIGHT")]
    Night,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "CANCEL")]
    Cancel,
    #[sea_orm(string_value = "FAIL")]
    Fail,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancel | OrderStatus::Fail
        )
    }

    /// Transitions a restaurant (or an admin) may apply by hand.
    /// `FAIL` is only ever set by a failed payment.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Accepted)
                | (OrderStatus::Pending, OrderStatus::Cancel)
                | (OrderStatus::Accepted, OrderStatus::Delivered)
                | (OrderStatus::Accepted, OrderStatus::Cancel)
        )
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "SUCCESS")]
    Success,
    #[sea_orm(string_value = "FAIL")]
    Fail,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FollowStatus {
    #[sea_orm(string_value = "FOLLOW")]
    Follow,
    #[sea_orm(string_value = "CANCEL")]
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Accepted));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancel));
        assert!(OrderStatus::Accepted.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancel));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Fail));
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Fail.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(!OrderStatus::Accepted.is_terminal());
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&UserRole::RestaurantUser).unwrap();
        assert_eq!(json, "\"RESTAURANT_USER\"");
        let slot: TimeServe = serde_json::from_str("\"MORNING\"").unwrap();
        assert_eq!(slot, TimeServe::Morning);
    }
}
