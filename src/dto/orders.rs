use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::OrderStatus,
    models::{Order, OrderDetail, Payment},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub sub_cart_id: Uuid,
    pub payment_method: String,
    pub ship_fee: i64,
    /// Must equal the sub-cart total plus `ship_fee`.
    pub total_price: i64,
    pub ship_address_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithDetails {
    pub order: Order,
    pub details: Vec<OrderDetail>,
    pub payment: Option<Payment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
