//! Payment handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::middleware::gated;
use crate::api::AppState;
use crate::domain::{Payment, Permission, UpdatePayment};
use crate::errors::AppResult;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", gated(get(list_payments), Permission::PAYMENTS_INDEX))
        .route("/:id", gated(get(get_payment), Permission::PAYMENTS_INDEX))
        .route("/:id", gated(put(update_payment), Permission::PAYMENTS_EDIT))
        .route("/:id/confirm", gated(post(confirm_payment), Permission::PAYMENTS_CONFIRM))
}

#[utoipa::path(
    get,
    path = "/payments",
    tag = "Payments",
    responses((status = 200, body = [Payment])),
    security(("bearer_auth" = []))
)]
pub async fn list_payments(State(state): State<AppState>) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(state.payment_service.list_payments().await?))
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "Payments",
    params(("id" = i32, Path, description = "Payment id")),
    responses((status = 200, body = Payment), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Payment>> {
    Ok(Json(state.payment_service.get_payment(id).await?))
}

#[utoipa::path(
    put,
    path = "/payments/{id}",
    tag = "Payments",
    params(("id" = i32, Path, description = "Payment id")),
    request_body = UpdatePayment,
    responses(
        (status = 200, body = Payment),
        (status = 400, description = "Unknown payment method"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<UpdatePayment>,
) -> AppResult<Json<Payment>> {
    Ok(Json(state.payment_service.update_payment(id, payload).await?))
}

/// Record that the payment was received
#[utoipa::path(
    post,
    path = "/payments/{id}/confirm",
    tag = "Payments",
    params(("id" = i32, Path, description = "Payment id")),
    responses((status = 200, body = Payment), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Payment>> {
    Ok(Json(state.payment_service.confirm_payment(id).await?))
}
