//! Authentication handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::middleware::{gated, CurrentUser};
use crate::api::AppState;
use crate::domain::{Permission, RegisterUser, UserResponse};
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::{Created, MessageResponse};

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format."))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "Password is required."))]
    #[schema(example = "secret123")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyEmailRequest {
    /// Token issued at registration
    #[validate(length(min = 1, message = "Verification token is required."))]
    pub token: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-email", post(verify_email))
        .route("/logout", gated(post(logout), Permission::USERS_LOGOUT))
        .route("/me", gated(get(me), Permission::HOME_PROFILE))
}

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterUser,
    responses(
        (
            status = 201,
            description = "User registered, email not yet verified",
            body = UserResponse
        ),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterUser>,
) -> AppResult<Created<UserResponse>> {
    let registration = state.auth_service.register(payload).await?;

    // No mail transport yet; the token only reaches the server log
    tracing::debug!(
        user_id = registration.user.id,
        email = %registration.user.email,
        token = %registration.verification_token,
        "Email verification token issued"
    );

    Ok(Created(UserResponse::from(registration.user)))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials or unverified email")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Confirm an email address
#[utoipa::path(
    post,
    path = "/auth/verify-email",
    tag = "Authentication",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = UserResponse),
        (status = 401, description = "Invalid or expired token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyEmailRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth_service.verify_email(payload.token).await?;
    Ok(Json(UserResponse::from(user)))
}

/// End the session. Tokens are stateless, so the client discards its copy.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    security(("bearer_auth" = []))
)]
pub async fn logout(user: CurrentUser) -> Json<MessageResponse> {
    tracing::debug!(user_id = user.id, "User logged out");
    Json(MessageResponse::new("Logged out."))
}

/// Profile of the signed-in user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(user.id).await?;
    Ok(Json(UserResponse::from(user)))
}
