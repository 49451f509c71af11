use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250501_000001_create_foodspot_tables::Migration)]
    }
}

/// Create a table straight from its entity definition so the schema
/// works on both Postgres and SQLite.
async fn create_table<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let schema = Schema::new(manager.get_database_backend());
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

async fn drop_table<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}

mod m20250501_000001_create_foodspot_tables {
    use sea_orm_migration::prelude::*;

    use super::{create_table, drop_table};
    use crate::entity::{
        Addresses, AuditLogs, Carts, Follows, FoodCategories, FoodPrices, FoodReviews, Foods,
        MenuFoods, Menus, Notifications, OrderDetails, Orders, Payments, RestaurantReviews,
        Restaurants, SubCartItems, SubCarts, Users, follows, food_prices, sub_cart_items,
        sub_carts,
    };

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250501_000001_create_foodspot_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Referenced tables first.
            create_table(manager, Users).await?;
            create_table(manager, Addresses).await?;
            create_table(manager, Restaurants).await?;
            create_table(manager, Follows).await?;
            create_table(manager, FoodCategories).await?;
            create_table(manager, Foods).await?;
            create_table(manager, FoodPrices).await?;
            create_table(manager, Menus).await?;
            create_table(manager, MenuFoods).await?;
            create_table(manager, Carts).await?;
            create_table(manager, SubCarts).await?;
            create_table(manager, SubCartItems).await?;
            create_table(manager, Orders).await?;
            create_table(manager, OrderDetails).await?;
            create_table(manager, Payments).await?;
            create_table(manager, RestaurantReviews).await?;
            create_table(manager, FoodReviews).await?;
            create_table(manager, Notifications).await?;
            create_table(manager, AuditLogs).await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_follows_user_restaurant")
                        .table(Follows)
                        .col(follows::Column::UserId)
                        .col(follows::Column::RestaurantId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .name("uq_food_prices_food_time_serve")
                        .table(FoodPrices)
                        .col(food_prices::Column::FoodId)
                        .col(food_prices::Column::TimeServe)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .name("uq_sub_carts_cart_restaurant")
                        .table(SubCarts)
                        .col(sub_carts::Column::CartId)
                        .col(sub_carts::Column::RestaurantId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .name("uq_sub_cart_items_line")
                        .table(SubCartItems)
                        .col(sub_cart_items::Column::SubCartId)
                        .col(sub_cart_items::Column::FoodId)
                        .col(sub_cart_items::Column::TimeServe)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            drop_table(manager, AuditLogs).await?;
            drop_table(manager, Notifications).await?;
            drop_table(manager, FoodReviews).await?;
            drop_table(manager, RestaurantReviews).await?;
            drop_table(manager, Payments).await?;
            drop_table(manager, OrderDetails).await?;
            drop_table(manager, Orders).await?;
            drop_table(manager, SubCartItems).await?;
            drop_table(manager, SubCarts).await?;
            drop_table(manager, Carts).await?;
            drop_table(manager, MenuFoods).await?;
            drop_table(manager, Menus).await?;
            drop_table(manager, FoodPrices).await?;
            drop_table(manager, Foods).await?;
            drop_table(manager, FoodCategories).await?;
            drop_table(manager, Follows).await?;
            drop_table(manager, Restaurants).await?;
            drop_table(manager, Addresses).await?;
            drop_table(manager, Users).await?;
            Ok(())
        }
    }
}
