//! User management handlers (administrators only).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::middleware::{gated, CurrentUser};
use crate::api::AppState;
use crate::domain::{CreateUser, Permission, UpdateUser, UserResponse};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated, PaginationParams};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", gated(get(list_users), Permission::USERS_INDEX))
        .route("/", gated(post(create_user), Permission::USERS_CREATE))
        .route("/:id", gated(get(get_user), Permission::USERS_DETAILS))
        .route("/:id", gated(put(update_user), Permission::USERS_EDIT))
        .route("/:id", gated(delete(delete_user), Permission::USERS_DELETE))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(PaginationParams),
    responses((status = 200, description = "One page of users with `meta`", body = [UserResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let users = state.user_service.list_users(params).await?;
    Ok(Json(users.map(UserResponse::from)))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, body = UserResponse), (status = 404, description = "User not found")),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Create an account with any role
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUser>,
) -> AppResult<Created<UserResponse>> {
    let user = state.user_service.create_user(payload).await?;
    Ok(Created(UserResponse::from(user)))
}

/// Update user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_user(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Own account or user with orders"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.user_service.delete_user(id, user.id).await?;
    Ok(NoContent)
}
