use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::TimeServe,
    models::{Cart, SubCart, SubCartItem},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub food_id: Uuid,
    pub time_serve: TimeServe,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSubCartItemRequest {
    /// Signed quantity change; the item is removed when it drops to zero.
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubCartWithItems {
    pub sub_cart: SubCart,
    pub items: Vec<SubCartItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    /// `None` once the cart has been emptied and removed.
    pub cart: Option<Cart>,
    pub sub_carts: Vec<SubCartWithItems>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubCartList {
    pub items: Vec<SubCartWithItems>,
}

/// State of the touched line and its parents after a cart mutation.
/// A `None` level was deleted because it became empty.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartMutation {
    pub item: Option<SubCartItem>,
    pub sub_cart: Option<SubCart>,
    pub cart: Option<Cart>,
}
