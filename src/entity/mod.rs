pub mod addresses;
pub mod audit_logs;
pub mod carts;
pub mod enums;
pub mod follows;
pub mod food_categories;
pub mod food_prices;
pub mod food_reviews;
pub mod foods;
pub mod menu_foods;
pub mod menus;
pub mod notifications;
pub mod order_details;
pub mod orders;
pub mod payments;
pub mod restaurant_reviews;
pub mod restaurants;
pub mod sub_cart_items;
pub mod sub_carts;
pub mod users;

pub use addresses::Entity as Addresses;
pub use audit_logs::Entity as AuditLogs;
pub use carts::Entity as Carts;
pub use follows::Entity as Follows;
pub use food_categories::Entity as FoodCategories;
pub use food_prices::Entity as FoodPrices;
pub use food_reviews::Entity as FoodReviews;
pub use foods::Entity as Foods;
pub use menu_foods::Entity as MenuFoods;
pub use menus::Entity as Menus;
pub use notifications::Entity as Notifications;
pub use order_details::Entity as OrderDetails;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use restaurant_reviews::Entity as RestaurantReviews;
pub use restaurants::Entity as Restaurants;
pub use sub_cart_items::Entity as SubCartItems;
pub use sub_carts::Entity as SubCarts;
pub use users::Entity as Users;
