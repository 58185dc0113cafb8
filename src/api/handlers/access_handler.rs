//! Access introspection for the signed-in user.
//!
//! Responses use camelCase keys, which front-end code relies on.

use axum::{
    extract::Query,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::permissions;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoleQuery {
    /// Role to compare against, e.g. `Admin`
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PermissionQuery {
    #[validate(length(min = 1, message = "Controller is required."))]
    #[schema(example = "Orders")]
    pub controller: String,
    #[validate(length(min = 1, message = "Action is required."))]
    #[schema(example = "Create")]
    pub action: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleCheck {
    pub has_role: bool,
    pub user_role: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheck {
    pub is_authorized: bool,
    pub user_role: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllowedActions {
    pub user_role: String,
    pub allowed_actions: Vec<String>,
}

pub fn access_routes() -> Router<AppState> {
    Router::new()
        .route("/check-role", get(check_role))
        .route("/check-permission", post(check_permission))
        .route("/allowed-actions", get(allowed_actions))
}

/// Does the caller have exactly this role?
#[utoipa::path(
    get,
    path = "/access/check-role",
    tag = "Access",
    params(RoleQuery),
    responses(
        (status = 200, body = RoleCheck),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_role(user: CurrentUser, Query(query): Query<RoleQuery>) -> Json<RoleCheck> {
    Json(RoleCheck {
        has_role: permissions::has_role(&user.role, &query.role),
        user_role: user.role,
    })
}

/// May the caller perform `controller/action`?
#[utoipa::path(
    post,
    path = "/access/check-permission",
    tag = "Access",
    request_body = PermissionQuery,
    responses(
        (status = 200, body = PermissionCheck),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_permission(
    user: CurrentUser,
    ValidatedJson(query): ValidatedJson<PermissionQuery>,
) -> Json<PermissionCheck> {
    Json(PermissionCheck {
        is_authorized: permissions::is_allowed(&user.role, &query.controller, &query.action),
        user_role: user.role,
    })
}

/// Every permission the caller's role holds
#[utoipa::path(
    get,
    path = "/access/allowed-actions",
    tag = "Access",
    responses(
        (status = 200, body = AllowedActions),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn allowed_actions(user: CurrentUser) -> Json<AllowedActions> {
    Json(AllowedActions {
        allowed_actions: permissions::allowed_actions(&user.role),
        user_role: user.role,
    })
}
