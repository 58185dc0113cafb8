//! Category handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::middleware::gated;
use crate::api::AppState;
use crate::domain::{Category, CategoryInput, CategoryMenu, Permission};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", gated(get(list_categories), Permission::HOME_CATEGORIES))
        .route("/", gated(post(create_category), Permission::CATEGORIES_CREATE))
        .route("/:id", gated(get(get_category), Permission::HOME_CATEGORIES))
        .route("/:id", gated(put(update_category), Permission::CATEGORIES_EDIT))
        .route("/:id", gated(delete(delete_category), Permission::CATEGORIES_DELETE))
        .route(
            "/:id/food-items",
            gated(get(category_menu), Permission::FOOD_ITEMS_BY_CATEGORY),
        )
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses((status = 200, body = [Category])),
    security(("bearer_auth" = []))
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog_service.list_categories().await?))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses((status = 200, body = Category), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog_service.get_category(id).await?))
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CategoryInput,
    responses((status = 201, body = Category), (status = 400, description = "Validation error")),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CategoryInput>,
) -> AppResult<Created<Category>> {
    Ok(Created(state.catalog_service.create_category(payload).await?))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryInput,
    responses((status = 200, body = Category), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<CategoryInput>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog_service.update_category(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Category still has food items"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_category(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/categories/{id}/food-items",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses((status = 200, body = CategoryMenu), (status = 404, description = "Not found")),
    security(("bearer_auth" = []))
)]
pub async fn category_menu(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryMenu>> {
    Ok(Json(state.catalog_service.category_menu(id).await?))
}
