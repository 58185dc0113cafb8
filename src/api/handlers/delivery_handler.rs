//! Delivery handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::middleware::{gated, CurrentUser};
use crate::api::AppState;
use crate::domain::{AssignDelivery, Delivery, Permission, UpdateDelivery};
use crate::errors::{AppError, AppResult};

pub fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/", gated(get(list_deliveries), Permission::DELIVERIES_INDEX))
        .route("/assigned", gated(get(assigned_deliveries), Permission::DELIVERIES_TRACK))
        .route("/:id", gated(get(get_delivery), Permission::DELIVERIES_TRACK))
        .route("/:id", gated(put(update_delivery), Permission::DELIVERIES_EDIT))
        .route("/:id/assign", gated(post(assign_delivery), Permission::DELIVERIES_ASSIGN))
}

#[utoipa::path(
    get,
    path = "/deliveries",
    tag = "Deliveries",
    responses((status = 200, body = [Delivery])),
    security(("bearer_auth" = []))
)]
pub async fn list_deliveries(State(state): State<AppState>) -> AppResult<Json<Vec<Delivery>>> {
    Ok(Json(state.delivery_service.list_deliveries().await?))
}

/// Deliveries assigned to the caller
#[utoipa::path(
    get,
    path = "/deliveries/assigned",
    tag = "Deliveries",
    responses((status = 200, body = [Delivery])),
    security(("bearer_auth" = []))
)]
pub async fn assigned_deliveries(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Delivery>>> {
    Ok(Json(state.delivery_service.assigned_to(user.id).await?))
}

#[utoipa::path(
    get,
    path = "/deliveries/{id}",
    tag = "Deliveries",
    params(("id" = i32, Path, description = "Delivery id")),
    responses(
        (status = 200, body = Delivery),
        (status = 403, description = "Assigned to another courier"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_delivery(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Delivery>> {
    let delivery = state.delivery_service.get_delivery(id).await?;

    if user.is_delivery_staff() && delivery.delivery_user_id != Some(user.id) {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(delivery))
}

#[utoipa::path(
    put,
    path = "/deliveries/{id}",
    tag = "Deliveries",
    params(("id" = i32, Path, description = "Delivery id")),
    request_body = UpdateDelivery,
    responses(
        (status = 200, body = Delivery),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_delivery(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateDelivery>,
) -> AppResult<Json<Delivery>> {
    Ok(Json(state.delivery_service.update_delivery(id, payload).await?))
}

/// Hand a delivery to a courier
#[utoipa::path(
    post,
    path = "/deliveries/{id}/assign",
    tag = "Deliveries",
    params(("id" = i32, Path, description = "Delivery id")),
    request_body = AssignDelivery,
    responses(
        (status = 200, body = Delivery),
        (status = 400, description = "Invalid delivery user"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn assign_delivery(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<AssignDelivery>,
) -> AppResult<Json<Delivery>> {
    let delivery = state
        .delivery_service
        .assign_delivery(id, payload.delivery_user_id)
        .await?;

    Ok(Json(delivery))
}
