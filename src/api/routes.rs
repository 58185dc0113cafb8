//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    access_routes, auth_routes, category_routes, delivery_routes, food_item_routes,
    order_item_routes, order_routes, payment_routes, restaurant_routes, user_routes,
};
use super::middleware::session_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth_routes())
        .nest("/access", access_routes())
        .nest("/restaurants", restaurant_routes())
        .nest("/categories", category_routes())
        .nest("/food-items", food_item_routes())
        .nest("/orders", order_routes())
        .nest("/order-items", order_item_routes())
        .nest("/deliveries", delivery_routes())
        .nest("/payments", payment_routes())
        .nest("/users", user_routes())
        // Identity first, then per-route permission gates
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Food delivery order management API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, database) = match state.database.ping().await {
        Ok(_) => (
            StatusCode::OK,
            ServiceStatus {
                status: "healthy",
                error: None,
            },
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        ),
    };

    let response = HealthResponse {
        status: if status_code == StatusCode::OK { "healthy" } else { "degraded" },
        services: ServiceHealth { database },
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;
    use sea_orm::DatabaseConnection;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{
        Delivery, Order, OrderDetails, OrderStatus, Payment, PaymentMethod, User, UserRole,
    };
    use crate::errors::AppError;
    use crate::infra::Database;
    use crate::services::{
        Claims, MockAuthService, MockCatalogService, MockDeliveryService, MockOrderService,
        MockPaymentService, MockUserService, Registration,
    };
    use crate::types::Paginated;

    const ADMIN: &str = "admin-token";
    const CUSTOMER: &str = "customer-token";
    const COURIER: &str = "courier-token";

    fn claims(sub: i32, role: &str) -> Claims {
        Claims {
            sub,
            email: format!("user{}@example.com", sub),
            name: format!("User {}", sub),
            role: role.to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    #[derive(Default)]
    struct TestServices {
        auth: MockAuthService,
        users: MockUserService,
        catalog: MockCatalogService,
        orders: MockOrderService,
        deliveries: MockDeliveryService,
        payments: MockPaymentService,
    }

    impl TestServices {
        fn new() -> Self {
            let mut services = Self::default();
            services.auth.expect_verify_token().returning(|token| match token {
                ADMIN => Ok(claims(1, "Admin")),
                CUSTOMER => Ok(claims(2, "Customer")),
                COURIER => Ok(claims(3, "Delivery")),
                _ => Err(AppError::Unauthenticated),
            });
            services
        }

        fn into_router(self) -> Router {
            create_router(AppState {
                auth_service: Arc::new(self.auth),
                user_service: Arc::new(self.users),
                catalog_service: Arc::new(self.catalog),
                order_service: Arc::new(self.orders),
                delivery_service: Arc::new(self.deliveries),
                payment_service: Arc::new(self.payments),
                database: Arc::new(Database::from_connection(DatabaseConnection::Disconnected)),
            })
        }
    }

    fn order_owned_by(user_id: i32) -> OrderDetails {
        let now = Utc::now();
        OrderDetails {
            order: Order {
                id: 10,
                order_date: now,
                status: OrderStatus::Pending,
                user_id: Some(user_id),
            },
            customer: None,
            delivery: Delivery {
                id: 10,
                order_id: 10,
                address: "1 Main St".into(),
                estimated_delivery_time: now + Duration::hours(1),
                delivery_user_id: None,
            },
            payment: Payment {
                id: 10,
                order_id: 10,
                payment_method: PaymentMethod::Cash,
                is_paid: false,
            },
            items: Vec::new(),
        }
    }

    fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_anonymous_api_call_is_unauthenticated() {
        let app = TestServices::new().into_router();
        let (status, body) = send(app, request("GET", "/orders", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_anonymous_browser_is_redirected_to_login() {
        let app = TestServices::new().into_router();
        let request = Request::builder()
            .uri("/orders")
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }

    #[tokio::test]
    async fn test_invalid_token_counts_as_anonymous() {
        let app = TestServices::new().into_router();
        let (status, _) = send(app, request("GET", "/orders", Some("forged"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_customer_cannot_list_all_orders() {
        let mut services = TestServices::new();
        services.orders.expect_list_orders().never();

        let (status, body) = send(
            services.into_router(),
            request("GET", "/orders", Some(CUSTOMER)),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_admin_lists_orders_with_pagination_meta() {
        let mut services = TestServices::new();
        services
            .orders
            .expect_list_orders()
            .returning(|params| Ok(Paginated::new(vec![order_owned_by(2)], params, 1)));

        let (status, body) = send(
            services.into_router(),
            request("GET", "/orders?page=1&per_page=5", Some(ADMIN)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["order"]["status"], "Pending");
    }

    #[tokio::test]
    async fn test_customer_tracks_only_own_order() {
        let mut services = TestServices::new();
        services
            .orders
            .expect_get_order()
            .with(eq(10))
            .returning(|_| Ok(order_owned_by(7)));

        let (status, _) = send(
            services.into_router(),
            request("GET", "/orders/10", Some(CUSTOMER)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let mut services = TestServices::new();
        services.orders.expect_get_order().returning(|_| Ok(order_owned_by(2)));

        let (status, body) = send(
            services.into_router(),
            request("GET", "/orders/10", Some(CUSTOMER)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order"]["user_id"], 2);
    }

    #[tokio::test]
    async fn test_unknown_status_is_a_validation_error() {
        let mut services = TestServices::new();
        services
            .orders
            .expect_update_status()
            .withf(|id, status| *id == 10 && status == "Shipped")
            .returning(|_, _| {
                Err(AppError::validation(
                    "Invalid status. Must be Pending, Preparing, or Delivered.",
                ))
            });

        let request = json_request(
            "POST",
            "/orders/10/status",
            Some(ADMIN),
            json!({ "status": "Shipped" }),
        );
        let (status, body) = send(services.into_router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let services = TestServices::new();
        let request = Request::builder()
            .method("POST")
            .uri("/orders")
            .header(header::AUTHORIZATION, format!("Bearer {}", CUSTOMER))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(services.into_router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_assign_accepts_camel_case_body() {
        let mut services = TestServices::new();
        services
            .deliveries
            .expect_assign_delivery()
            .with(eq(5), eq(3))
            .returning(|id, user_id| {
                Ok(Delivery {
                    id,
                    order_id: 10,
                    address: "1 Main St".into(),
                    estimated_delivery_time: Utc::now() + Duration::hours(1),
                    delivery_user_id: Some(user_id),
                })
            });

        let request = json_request(
            "POST",
            "/deliveries/5/assign",
            Some(ADMIN),
            json!({ "deliveryUserId": 3 }),
        );
        let (status, body) = send(services.into_router(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["delivery_user_id"], 3);
    }

    #[tokio::test]
    async fn test_courier_sees_only_own_delivery() {
        let mut services = TestServices::new();
        services.deliveries.expect_get_delivery().returning(|id| {
            Ok(Delivery {
                id,
                order_id: 10,
                address: "1 Main St".into(),
                estimated_delivery_time: Utc::now() + Duration::hours(1),
                delivery_user_id: Some(99),
            })
        });

        let (status, _) = send(
            services.into_router(),
            request("GET", "/deliveries/5", Some(COURIER)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_courier_cannot_assign() {
        let mut services = TestServices::new();
        services.deliveries.expect_assign_delivery().never();

        let request = json_request(
            "POST",
            "/deliveries/5/assign",
            Some(COURIER),
            json!({ "deliveryUserId": 3 }),
        );
        let (status, _) = send(services.into_router(), request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_food_items_are_public() {
        let mut services = TestServices::new();
        services.catalog.expect_list_food_items().returning(|| Ok(Vec::new()));

        let (status, body) = send(
            services.into_router(),
            request("GET", "/food-items", None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_allowed_actions_for_courier() {
        let app = TestServices::new().into_router();
        let (status, body) = send(
            app,
            request("GET", "/access/allowed-actions", Some(COURIER)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userRole"], "Delivery");
        let actions = body["allowedActions"].as_array().unwrap();
        assert!(actions.contains(&json!("Deliveries/TrackDelivery")));
        assert!(!actions.contains(&json!("Orders/Index")));
    }

    #[tokio::test]
    async fn test_registration_keeps_verification_token_private() {
        let mut services = TestServices::new();
        services.auth.expect_register().returning(|input| {
            let now = Utc::now();
            Ok(Registration {
                user: User {
                    id: 5,
                    full_name: input.full_name,
                    email: input.email,
                    password_hash: "hash".into(),
                    role: UserRole::Customer,
                    is_email_verified: false,
                    created_at: now,
                    updated_at: now,
                },
                verification_token: "issued-token".into(),
            })
        });

        let request = json_request(
            "POST",
            "/auth/register",
            None,
            json!({
                "full_name": "Jane Doe",
                "email": "jane@example.com",
                "password": "secret123"
            }),
        );
        let (status, body) = send(services.into_router(), request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 5);
        assert_eq!(body["is_email_verified"], false);
        assert!(!body.to_string().contains("issued-token"));
    }

    #[tokio::test]
    async fn test_check_role_and_permission() {
        let app = TestServices::new().into_router();
        let (_, body) = send(
            app,
            request("GET", "/access/check-role?role=Admin", Some(CUSTOMER)),
        )
        .await;
        assert_eq!(body, json!({ "hasRole": false, "userRole": "Customer" }));

        let app = TestServices::new().into_router();
        let request = json_request(
            "POST",
            "/access/check-permission",
            Some(CUSTOMER),
            json!({ "controller": "Orders", "action": "Create" }),
        );
        let (_, body) = send(app, request).await;
        assert_eq!(body, json!({ "isAuthorized": true, "userRole": "Customer" }));
    }

    #[tokio::test]
    async fn test_access_endpoints_require_identity() {
        let app = TestServices::new().into_router();
        let (status, _) = send(app, request("GET", "/access/allowed-actions", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_user_passes_acting_admin() {
        let mut services = TestServices::new();
        services
            .users
            .expect_delete_user()
            .with(eq(1), eq(1))
            .returning(|_, _| Err(AppError::validation("You cannot delete your own account.")));

        let (status, body) = send(
            services.into_router(),
            request("DELETE", "/users/1", Some(ADMIN)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "You cannot delete your own account.");
    }
}
