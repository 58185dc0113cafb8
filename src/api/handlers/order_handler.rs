//! Order handlers.
//!
//! Customers may track and extend only their own orders; administrators may
//! act on any order.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::middleware::{gated, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    AddOrderItem, Order, OrderDetails, OrderItem, Permission, PlaceOrder, UpdateStatus,
};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", gated(get(list_orders), Permission::ORDERS_INDEX))
        .route("/", gated(post(place_order), Permission::ORDERS_CREATE))
        .route("/:id", gated(get(get_order), Permission::ORDERS_TRACK))
        .route("/:id", gated(delete(delete_order), Permission::ORDERS_DELETE))
        .route("/:id/status", gated(post(update_status), Permission::ORDERS_UPDATE_STATUS))
        .route("/:id/items", gated(post(add_item), Permission::ORDER_ITEMS_ADD))
}

pub fn order_item_routes() -> Router<AppState> {
    Router::new().route("/:id", gated(delete(remove_item), Permission::ORDER_ITEMS_DELETE))
}

fn ensure_visible(user: &CurrentUser, order: &OrderDetails) -> AppResult<()> {
    if user.is_admin() || order.belongs_to(user.id) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = user.id,
            order_id = order.order.id,
            "Order belongs to another customer"
        );
        Err(AppError::Unauthorized)
    }
}

/// Newest orders first
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of orders with `meta`", body = [OrderDetails])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<OrderDetails>>> {
    Ok(Json(state.order_service.list_orders(params).await?))
}

/// Place an order, creating a guest customer for unknown emails
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    request_body = PlaceOrder,
    responses(
        (status = 201, body = OrderDetails),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Food item not found"),
        (status = 500, description = "Order could not be stored")
    ),
    security(("bearer_auth" = []))
)]
pub async fn place_order(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<PlaceOrder>,
) -> AppResult<Created<OrderDetails>> {
    Ok(Created(state.order_service.place_order(payload).await?))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, body = OrderDetails),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<OrderDetails>> {
    let order = state.order_service.get_order(id).await?;
    ensure_visible(&user, &order)?;
    Ok(Json(order))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.order_service.delete_order(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateStatus,
    responses(
        (status = 200, body = Order),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateStatus>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.order_service.update_status(id, payload.status).await?))
}

#[utoipa::path(
    post,
    path = "/orders/{id}/items",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order id")),
    request_body = AddOrderItem,
    responses(
        (status = 201, body = OrderItem),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "Order or food item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<AddOrderItem>,
) -> AppResult<Created<OrderItem>> {
    if !user.is_admin() {
        let order = state.order_service.get_order(id).await?;
        ensure_visible(&user, &order)?;
    }
    Ok(Created(state.order_service.add_item(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/order-items/{id}",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order item id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.order_service.remove_item(id).await?;
    Ok(NoContent)
}
