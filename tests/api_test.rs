//! Integration tests for the public library surface.
//!
//! Router behavior against mocked services is covered next to the router;
//! these tests exercise what downstream code can reach without a database.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rust_decimal::Decimal;
use serde_json::Value;
use validator::Validate;

use food_delivery::domain::permissions::{allowed_actions, has_role, is_allowed};
use food_delivery::domain::{
    FoodItemInput, OrderStatus, PaymentMethod, PlaceOrder, RestaurantInput, UserRole,
};
use food_delivery::types::{Paginated, PaginationParams};
use food_delivery::{AppError, Config, Password, Permission};

async fn error_body(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Permission Table Tests
// =============================================================================

#[test]
fn test_customer_permissions() {
    assert!(is_allowed("Customer", "Orders", "Create"));
    assert!(is_allowed("Customer", "OrderItems", "AddToOrder"));
    assert!(!is_allowed("Customer", "Orders", "Index"));
    assert!(!is_allowed("Customer", "Deliveries", "AssignDelivery"));
}

#[test]
fn test_delivery_permissions() {
    assert!(is_allowed("Delivery", "Deliveries", "TrackDelivery"));
    assert!(!is_allowed("Delivery", "Orders", "Create"));
    assert_eq!(allowed_actions("Delivery").len(), 4);
}

#[test]
fn test_admin_permissions_cover_management() {
    for permission in [
        Permission::USERS_DELETE,
        Permission::ORDERS_UPDATE_STATUS,
        Permission::DELIVERIES_ASSIGN,
        Permission::PAYMENTS_CONFIRM,
        Permission::ORDERS_CREATE,
    ] {
        assert!(permission.is_granted_to("Admin"), "admin lacks {}", permission);
    }
}

#[test]
fn test_unknown_role_and_case_mismatch_are_denied() {
    assert!(allowed_actions("Chef").is_empty());
    assert!(!is_allowed("admin", "Orders", "Index"));
    assert!(!has_role("admin", "Admin"));
    assert!(has_role("Admin", "Admin"));
}

// =============================================================================
// Error Envelope Tests
// =============================================================================

#[tokio::test]
async fn test_validation_error_envelope() {
    let (status, body) =
        error_body(AppError::validation_failed(["Invalid email format.", "Invalid phone number."]))
            .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Validation failed: Invalid email format., Invalid phone number."
    );
}

#[tokio::test]
async fn test_auth_error_statuses() {
    let (status, body) = error_body(AppError::Unauthenticated).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

    let (status, body) = error_body(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_internal_details_are_hidden() {
    let (status, body) = error_body(AppError::internal("connection string leaked")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_persistence_failure_message_is_kept() {
    let (status, body) = error_body(AppError::persistence("Error creating order")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");
    assert_eq!(body["error"]["message"], "Error creating order");
}

// =============================================================================
// Domain Parsing Tests
// =============================================================================

#[test]
fn test_role_round_trip() {
    for role in [UserRole::Admin, UserRole::Customer, UserRole::Delivery] {
        assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
    }
    assert!("Chef".parse::<UserRole>().is_err());
}

#[test]
fn test_status_and_method_reject_unknown_values() {
    assert!("Shipped".parse::<OrderStatus>().is_err());
    assert!("Bitcoin".parse::<PaymentMethod>().is_err());
    assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::default());
}

// =============================================================================
// Input Validation Tests
// =============================================================================

#[test]
fn test_order_form_with_bad_payment_method_is_invalid() {
    let form: PlaceOrder = serde_json::from_value(serde_json::json!({
        "customer_name": "Jane Doe",
        "customer_email": "jane@example.com",
        "delivery_address": "221B Baker Street",
        "food_item_id": 3,
        "quantity": 2,
        "payment_method": "Bitcoin"
    }))
    .unwrap();

    let errors = form.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("payment_method"));
}

#[test]
fn test_restaurant_phone_validation() {
    let mut input = RestaurantInput {
        name: "Luigi's".into(),
        address: "12 Harbour Street".into(),
        phone: "+44 20 7946 0018".into(),
    };
    assert!(input.validate().is_ok());

    input.phone = "not a phone".into();
    assert!(input.validate().is_err());
}

#[test]
fn test_negative_price_rejected() {
    let input = FoodItemInput {
        name: "Refund".into(),
        description: None,
        price: Decimal::new(-100, 2),
        image_url: None,
        restaurant_id: 1,
        category_id: 1,
    };

    assert!(input.validate().is_err());
}

// =============================================================================
// Password and Config Tests
// =============================================================================

#[test]
fn test_password_hash_verifies_only_original() {
    let password = Password::new("secret123").unwrap();

    assert!(password.verify("secret123"));
    assert!(!password.verify("secret124"));
    assert_ne!(password.as_str(), "secret123");
}

#[test]
fn test_password_length_bounds() {
    assert!(Password::new("12345").is_err());
    assert!(Password::new(&"x".repeat(101)).is_err());
}

#[test]
fn test_config_requires_long_secret() {
    assert!(Config::with_secret("short").is_err());
    let config = Config::with_secret("a-secret-that-is-at-least-32-chars").unwrap();
    assert_eq!(config.jwt_expiration_hours, 24);
}

// =============================================================================
// Pagination Tests
// =============================================================================

#[test]
fn test_pagination_caps_page_size() {
    let params = PaginationParams::new(3, 500);
    assert_eq!(params.limit(), 100);
    assert_eq!(params.offset(), 200);

    let page = Paginated::new(vec![1, 2, 3], PaginationParams::new(1, 2), 3);
    assert_eq!(page.meta.total_pages, 2);
}
