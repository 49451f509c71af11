use sea_orm::entity::prelude::*;

use super::enums::TimeServe;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sub_cart_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sub_cart_id: Uuid,
    pub food_id: Uuid,
    /// Copy of the food's restaurant.
    pub restaurant_id: Uuid,
    pub quantity: i32,
    pub time_serve: TimeServe,
    /// Food price for `time_serve` when the line was created.
    pub unit_price: i64,
    /// Line total: `unit_price * quantity`.
    pub price: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sub_carts::Entity",
        from = "Column::SubCartId",
        to = "super::sub_carts::Column::Id",
        on_delete = "Cascade"
    )]
    SubCarts,
    #[sea_orm(
        belongs_to = "super::foods::Entity",
        from = "Column::FoodId",
        to = "super::foods::Column::Id",
        on_delete = "Cascade"
    )]
    Foods,
}

impl Related<super::sub_carts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCarts.def()
    }
}

impl Related<super::foods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Foods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
