//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    access_handler, auth_handler, category_handler, delivery_handler, food_item_handler,
    order_handler, payment_handler, restaurant_handler, user_handler,
};
use crate::domain::{
    AddOrderItem, AssignDelivery, Category, CategoryInput, CategoryMenu, CreateUser,
    CustomerSummary, Delivery, FoodItem, FoodItemInput, Order, OrderDetails, OrderItem, OrderLine,
    OrderStatus, Payment, PaymentMethod, PlaceOrder, RegisterUser, Restaurant, RestaurantInput,
    RestaurantMenu, UpdateDelivery, UpdatePayment, UpdateStatus, UpdateUser, UserResponse,
    UserRole,
};
use crate::services::TokenResponse;
use crate::types::{MessageResponse, PaginationMeta};

/// OpenAPI documentation for the food delivery API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Food Delivery API",
        version = "0.1.0",
        description = "Role-based order management for restaurants, deliveries and payments",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::verify_email,
        auth_handler::logout,
        auth_handler::me,
        access_handler::check_role,
        access_handler::check_permission,
        access_handler::allowed_actions,
        restaurant_handler::list_restaurants,
        restaurant_handler::get_restaurant,
        restaurant_handler::create_restaurant,
        restaurant_handler::update_restaurant,
        restaurant_handler::delete_restaurant,
        restaurant_handler::restaurant_menu,
        category_handler::list_categories,
        category_handler::get_category,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        category_handler::category_menu,
        food_item_handler::list_food_items,
        food_item_handler::get_food_item,
        food_item_handler::create_food_item,
        food_item_handler::update_food_item,
        food_item_handler::delete_food_item,
        order_handler::list_orders,
        order_handler::place_order,
        order_handler::get_order,
        order_handler::delete_order,
        order_handler::update_status,
        order_handler::add_item,
        order_handler::remove_item,
        delivery_handler::list_deliveries,
        delivery_handler::assigned_deliveries,
        delivery_handler::get_delivery,
        delivery_handler::update_delivery,
        delivery_handler::assign_delivery,
        payment_handler::list_payments,
        payment_handler::get_payment,
        payment_handler::update_payment,
        payment_handler::confirm_payment,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            RegisterUser,
            CreateUser,
            UpdateUser,
            Restaurant,
            RestaurantInput,
            RestaurantMenu,
            Category,
            CategoryInput,
            CategoryMenu,
            FoodItem,
            FoodItemInput,
            Order,
            OrderStatus,
            OrderItem,
            OrderLine,
            OrderDetails,
            CustomerSummary,
            Delivery,
            Payment,
            PaymentMethod,
            PlaceOrder,
            AddOrderItem,
            UpdateStatus,
            UpdateDelivery,
            AssignDelivery,
            UpdatePayment,
            TokenResponse,
            MessageResponse,
            PaginationMeta,
            auth_handler::LoginRequest,
            auth_handler::VerifyEmailRequest,
            access_handler::PermissionQuery,
            access_handler::RoleCheck,
            access_handler::PermissionCheck,
            access_handler::AllowedActions,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and email verification"),
        (name = "Access", description = "Role and permission introspection"),
        (name = "Restaurants", description = "Restaurant catalog"),
        (name = "Categories", description = "Food categories"),
        (name = "Food Items", description = "Menu items"),
        (name = "Orders", description = "Order placement and tracking"),
        (name = "Deliveries", description = "Delivery scheduling and assignment"),
        (name = "Payments", description = "Payment status"),
        (name = "Users", description = "User management operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_gated_paths_with_security_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/orders"));
        assert!(doc.paths.paths.contains_key("/deliveries/{id}/assign"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
