//! Restaurant handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::middleware::gated;
use crate::api::AppState;
use crate::domain::{Permission, Restaurant, RestaurantInput, RestaurantMenu};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/", gated(get(list_restaurants), Permission::HOME_RESTAURANTS))
        .route("/", gated(post(create_restaurant), Permission::RESTAURANTS_CREATE))
        .route("/:id", gated(get(get_restaurant), Permission::HOME_RESTAURANTS))
        .route("/:id", gated(put(update_restaurant), Permission::RESTAURANTS_EDIT))
        .route("/:id", gated(delete(delete_restaurant), Permission::RESTAURANTS_DELETE))
        .route(
            "/:id/food-items",
            gated(get(restaurant_menu), Permission::FOOD_ITEMS_BY_RESTAURANT),
        )
}

#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "Restaurants",
    responses((status = 200, body = [Restaurant])),
    security(("bearer_auth" = []))
)]
pub async fn list_restaurants(State(state): State<AppState>) -> AppResult<Json<Vec<Restaurant>>> {
    Ok(Json(state.catalog_service.list_restaurants().await?))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant id")),
    responses((status = 200, body = Restaurant), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(state.catalog_service.get_restaurant(id).await?))
}

#[utoipa::path(
    post,
    path = "/restaurants",
    tag = "Restaurants",
    request_body = RestaurantInput,
    responses((status = 201, body = Restaurant), (status = 400, description = "Validation error")),
    security(("bearer_auth" = []))
)]
pub async fn create_restaurant(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RestaurantInput>,
) -> AppResult<Created<Restaurant>> {
    Ok(Created(state.catalog_service.create_restaurant(payload).await?))
}

#[utoipa::path(
    put,
    path = "/restaurants/{id}",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant id")),
    request_body = RestaurantInput,
    responses((status = 200, body = Restaurant), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<RestaurantInput>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(state.catalog_service.update_restaurant(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Restaurant still has food items"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_restaurant(id).await?;
    Ok(NoContent)
}

/// Restaurant with the food items it serves
#[utoipa::path(
    get,
    path = "/restaurants/{id}/food-items",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant id")),
    responses((status = 200, body = RestaurantMenu), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn restaurant_menu(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RestaurantMenu>> {
    Ok(Json(state.catalog_service.restaurant_menu(id).await?))
}
