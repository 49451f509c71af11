use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest},
        cart::{
            AddToCartRequest, CartMutation, CartView, SubCartList, SubCartWithItems,
            UpdateSubCartItemRequest,
        },
        catalog::{
            CreateFoodRequest, CreateMenuRequest, CreateRestaurantRequest, FoodCategoryList,
            FoodCategoryRequest, FoodList, MenuList, PriceInput, RestaurantList,
            SetFoodPriceRequest, UpdateFoodPriceRequest, UpdateFoodRequest, UpdateMenuRequest,
            UpdateRestaurantRequest,
        },
        follows::FollowedRestaurantList,
        notifications::NotificationList,
        orders::{CheckoutRequest, OrderList, OrderWithDetails, UpdateOrderStatusRequest},
        payments::{PaymentCallback, UpdatePaymentStatusRequest},
        reviews::{
            CreateFoodReviewRequest, CreateRestaurantReviewRequest, FoodReviewList,
            FoodReviewWithReplies, RestaurantReviewList, UpdateReviewRequest,
        },
    },
    entity::enums::{FollowStatus, OrderStatus, PaymentStatus, TimeServe, UserRole},
    models::{
        Address, Cart, Follow, Food, FoodCategory, FoodPrice, FoodReview, Menu, Notification,
        Order, OrderDetail, Payment, Restaurant, RestaurantReview, SubCart, SubCartItem, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        addresses, auth, cart, follows, foods, health, menus, notifications, orders, params,
        payments, restaurants, reviews,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        auth::update_me,
        addresses::list_addresses,
        addresses::create_address,
        addresses::update_address,
        addresses::delete_address,
        restaurants::list_restaurants,
        restaurants::get_restaurant,
        restaurants::create_restaurant,
        restaurants::update_restaurant,
        restaurants::delete_restaurant,
        follows::list_followed,
        follows::follow,
        follows::unfollow,
        foods::list_categories,
        foods::create_category,
        foods::update_category,
        foods::delete_category,
        foods::list_foods,
        foods::get_food,
        foods::create_food,
        foods::update_food,
        foods::delete_food,
        foods::set_food_price,
        foods::update_food_price,
        foods::delete_food_price,
        menus::list_menus,
        menus::get_menu,
        menus::create_menu,
        menus::update_menu,
        menus::delete_menu,
        cart::view_cart,
        cart::add_to_cart,
        cart::list_sub_carts,
        cart::get_sub_cart,
        cart::delete_sub_cart,
        cart::update_item,
        cart::remove_item,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::update_order_status,
        orders::delete_order,
        payments::payment_callback,
        payments::update_payment_status,
        reviews::list_restaurant_reviews,
        reviews::create_restaurant_review,
        reviews::update_restaurant_review,
        reviews::delete_restaurant_review,
        reviews::list_food_reviews,
        reviews::create_food_review,
        reviews::update_food_review,
        reviews::delete_food_review,
        notifications::list_notifications,
        notifications::mark_read,
        notifications::mark_all_read
    ),
    components(
        schemas(
            User,
            Address,
            Restaurant,
            FoodCategory,
            FoodPrice,
            Food,
            Menu,
            Cart,
            SubCart,
            SubCartItem,
            Order,
            OrderDetail,
            Payment,
            RestaurantReview,
            FoodReview,
            Follow,
            Notification,
            UserRole,
            TimeServe,
            OrderStatus,
            PaymentStatus,
            FollowStatus,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            CreateAddressRequest,
            UpdateAddressRequest,
            AddressList,
            CreateRestaurantRequest,
            UpdateRestaurantRequest,
            RestaurantList,
            FollowedRestaurantList,
            FoodCategoryRequest,
            FoodCategoryList,
            PriceInput,
            CreateFoodRequest,
            UpdateFoodRequest,
            FoodList,
            SetFoodPriceRequest,
            UpdateFoodPriceRequest,
            CreateMenuRequest,
            UpdateMenuRequest,
            MenuList,
            AddToCartRequest,
            UpdateSubCartItemRequest,
            SubCartWithItems,
            CartView,
            SubCartList,
            CartMutation,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderWithDetails,
            OrderList,
            PaymentCallback,
            UpdatePaymentStatusRequest,
            CreateRestaurantReviewRequest,
            CreateFoodReviewRequest,
            UpdateReviewRequest,
            RestaurantReviewList,
            FoodReviewWithReplies,
            FoodReviewList,
            NotificationList,
            params::Pagination,
            params::SortOrder,
            params::FoodQuery,
            params::OrderListQuery,
            params::RestaurantReviewQuery,
            params::FoodReviewQuery,
            params::MenuQuery,
            Meta,
            ApiResponse<Food>,
            ApiResponse<FoodList>,
            ApiResponse<CartMutation>,
            ApiResponse<OrderWithDetails>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login endpoints"),
        (name = "Users", description = "Current user profile endpoints"),
        (name = "Addresses", description = "Delivery address endpoints"),
        (name = "Restaurants", description = "Restaurant endpoints"),
        (name = "Follows", description = "Restaurant follow endpoints"),
        (name = "Foods", description = "Food, category and price endpoints"),
        (name = "Menus", description = "Menu endpoints"),
        (name = "Cart", description = "Cart, sub cart and item endpoints"),
        (name = "Orders", description = "Checkout and order endpoints"),
        (name = "Payments", description = "Payment status and gateway callback endpoints"),
        (name = "Reviews", description = "Restaurant and food review endpoints"),
        (name = "Notifications", description = "In-app notification endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
