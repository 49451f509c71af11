use axum::Router;

use crate::state::AppState;

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod doc;
pub mod follows;
pub mod foods;
pub mod health;
pub mod menus;
pub mod notifications;
pub mod orders;
pub mod params;
pub mod payments;
pub mod restaurants;
pub mod reviews;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", auth::users_router())
        .nest("/addresses", addresses::router())
        .nest("/restaurants", restaurants::router())
        .nest("/follows", follows::router())
        .nest("/food-categories", foods::category_router())
        .nest("/foods", foods::router())
        .nest("/food-prices", foods::price_router())
        .nest("/menus", menus::router())
        .nest("/cart", cart::router())
        .nest("/add-to-cart", cart::add_router())
        .nest("/sub-carts", cart::sub_cart_router())
        .nest("/sub-cart-items", cart::item_router())
        .nest("/orders", orders::route())
        .nest("/payments", payments::router())
        .nest("/restaurant-reviews", reviews::restaurant_router())
        .nest("/food-reviews", reviews::food_router())
        .nest("/notifications", notifications::router())
}
