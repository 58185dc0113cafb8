//! Session identity and permission gate.
//!
//! [`session_middleware`] runs on every request and turns a valid bearer
//! token into a [`CurrentUser`] in the request extensions. It never rejects;
//! rejection is the job of [`gate`], which is attached per route with
//! [`gated`].

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{
        header::{ACCEPT, AUTHORIZATION},
        request::Parts,
        HeaderMap,
    },
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::MethodRouter,
};

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, LOGIN_PATH, ROLE_ADMIN, ROLE_DELIVERY};
use crate::domain::Permission;
use crate::errors::AppError;
use crate::services::Claims;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn is_delivery_staff(&self) -> bool {
        self.role == ROLE_DELIVERY
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Attach the caller's identity when the request carries a valid token.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims =
        bearer_token(request.headers()).map(|token| state.auth_service.verify_token(token));

    match claims {
        Some(Ok(claims)) => {
            request.extensions_mut().insert(CurrentUser::from(claims));
        }
        Some(Err(e)) => tracing::debug!(error = %e, "Ignoring invalid session token"),
        None => {}
    }

    next.run(request).await
}

/// Let the request through only if the caller's role holds `permission`.
///
/// Anonymous browser requests are redirected to the login page; anonymous
/// API requests get 401.
pub async fn gate(State(permission): State<Permission>, request: Request, next: Next) -> Response {
    let Some(user) = request.extensions().get::<CurrentUser>() else {
        if wants_html(request.headers()) {
            return Redirect::to(LOGIN_PATH).into_response();
        }
        return AppError::Unauthenticated.into_response();
    };

    if !permission.is_granted_to(&user.role) {
        tracing::warn!(
            user_id = user.id,
            role = %user.role,
            permission = %permission,
            "Access denied"
        );
        return AppError::Unauthorized.into_response();
    }

    next.run(request).await
}

/// Wrap a method router with the permission gate.
pub fn gated<S>(route: MethodRouter<S>, permission: Permission) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(permission, gate))
}
