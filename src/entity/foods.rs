use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "foods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_available: bool,
    /// Average of top-level food review stars, kept by the review write path.
    pub star_rating: f64,
    pub food_category_id: Option<Uuid>,
    pub restaurant_id: Uuid,
    pub image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurants::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurants::Column::Id",
        on_delete = "Cascade"
    )]
    Restaurants,
    #[sea_orm(
        belongs_to = "super::food_categories::Entity",
        from = "Column::FoodCategoryId",
        to = "super::food_categories::Column::Id",
        on_delete = "SetNull"
    )]
    FoodCategories,
    #[sea_orm(has_many = "super::food_prices::Entity")]
    FoodPrices,
}

impl Related<super::restaurants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurants.def()
    }
}

impl Related<super::food_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodCategories.def()
    }
}

impl Related<super::food_prices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodPrices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
