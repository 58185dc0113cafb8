//! Food item handlers. Browsing is public; changes need catalog permissions.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::middleware::gated;
use crate::api::AppState;
use crate::domain::{FoodItem, FoodItemInput, Permission};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

pub fn food_item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_food_items))
        .route("/", gated(post(create_food_item), Permission::FOOD_ITEMS_CREATE))
        .route("/:id", get(get_food_item))
        .route("/:id", gated(put(update_food_item), Permission::FOOD_ITEMS_EDIT))
        .route("/:id", gated(delete(delete_food_item), Permission::FOOD_ITEMS_DELETE))
}

#[utoipa::path(
    get,
    path = "/food-items",
    tag = "Food Items",
    responses((status = 200, body = [FoodItem]))
)]
pub async fn list_food_items(State(state): State<AppState>) -> AppResult<Json<Vec<FoodItem>>> {
    Ok(Json(state.catalog_service.list_food_items().await?))
}

#[utoipa::path(
    get,
    path = "/food-items/{id}",
    tag = "Food Items",
    params(("id" = i32, Path, description = "Food item id")),
    responses((status = 200, body = FoodItem), (status = 404, description = "Not found"))
)]
pub async fn get_food_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<FoodItem>> {
    Ok(Json(state.catalog_service.get_food_item(id).await?))
}

#[utoipa::path(
    post,
    path = "/food-items",
    tag = "Food Items",
    request_body = FoodItemInput,
    responses(
        (status = 201, body = FoodItem),
        (status = 400, description = "Validation error or unknown restaurant/category")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_food_item(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<FoodItemInput>,
) -> AppResult<Created<FoodItem>> {
    Ok(Created(state.catalog_service.create_food_item(payload).await?))
}

#[utoipa::path(
    put,
    path = "/food-items/{id}",
    tag = "Food Items",
    params(("id" = i32, Path, description = "Food item id")),
    request_body = FoodItemInput,
    responses((status = 200, body = FoodItem), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn update_food_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<FoodItemInput>,
) -> AppResult<Json<FoodItem>> {
    Ok(Json(state.catalog_service.update_food_item(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/food-items/{id}",
    tag = "Food Items",
    params(("id" = i32, Path, description = "Food item id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Food item is referenced by orders")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_food_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_food_item(id).await?;
    Ok(NoContent)
}
