use chrono::Utc;
use foodspot_api::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{
        FoodCategories, FoodPrices, Foods, Restaurants, Users,
        enums::{TimeServe, UserRole},
        food_categories, food_prices, foods, restaurants, users,
    },
    services::auth_service::hash_password,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url, config.db_max_connections).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin@foodspot.local", "admin123", UserRole::Admin).await?;
    let customer_id =
        ensure_user(&orm, "khachhang@foodspot.local", "khach123", UserRole::Customer).await?;
    let owner_id =
        ensure_user(&orm, "quanan@foodspot.local", "quan123", UserRole::RestaurantUser).await?;
    seed_catalog(&orm, owner_id).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Customer ID: {customer_id}, Owner ID: {owner_id}"
    );
    Ok(())
}

async fn ensure_user(
    orm: &OrmConn,
    email: &str,
    password: &str,
    role: UserRole,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already exists");
        return Ok(existing.id);
    }

    let username = email.split('@').next().unwrap_or(email).to_string();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        fullname: Set(username.clone()),
        username: Set(username),
        phone_number: Set(None),
        role: Set(role),
        is_active: Set(true),
        fcm_token: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role:?})");
    Ok(user.id)
}

async fn seed_catalog(orm: &OrmConn, owner_id: Uuid) -> anyhow::Result<()> {
    let restaurant = match Restaurants::find()
        .filter(restaurants::Column::Name.eq("Quán Phở Hà Nội"))
        .one(orm)
        .await?
    {
        Some(existing) => existing,
        None => {
            restaurants::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set("Quán Phở Hà Nội".to_string()),
                phone_number: Set(Some("0901234567".to_string())),
                owner_id: Set(owner_id),
                star_rating: Set(0.0),
                address_id: Set(None),
                created_at: Set(Utc::now().into()),
            }
            .insert(orm)
            .await?
        }
    };

    let foods = vec![
        (
            "Phở Bò",
            "Phở",
            "Phở bò tái nạm",
            vec![(TimeServe::Morning, 40000), (TimeServe::Evening, 45000)],
        ),
        (
            "Bún Chả",
            "Bún",
            "Bún chả Hà Nội",
            vec![(TimeServe::Noon, 35000)],
        ),
        (
            "Bánh Mì",
            "Bánh",
            "Bánh mì pate",
            vec![(TimeServe::Morning, 20000), (TimeServe::Night, 25000)],
        ),
    ];

    for (name, category, description, prices) in foods {
        let category_id = ensure_category(orm, category).await?;

        let exists = Foods::find()
            .filter(foods::Column::RestaurantId.eq(restaurant.id))
            .filter(foods::Column::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let food = foods::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            is_available: Set(true),
            star_rating: Set(0.0),
            food_category_id: Set(Some(category_id)),
            restaurant_id: Set(restaurant.id),
            image: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;

        for (time_serve, price) in prices {
            food_prices::ActiveModel {
                id: Set(Uuid::new_v4()),
                food_id: Set(food.id),
                time_serve: Set(time_serve),
                price: Set(price),
            }
            .insert(orm)
            .await?;
        }
    }

    let price_count = FoodPrices::find().all(orm).await?.len();
    println!("Seeded catalog for {} ({price_count} prices)", restaurant.name);
    Ok(())
}

async fn ensure_category(orm: &OrmConn, name: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = FoodCategories::find()
        .filter(food_categories::Column::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }
    let category = food_categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    }
    .insert(orm)
    .await?;
    Ok(category.id)
}
