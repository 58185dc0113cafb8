//! Authentication service - registration, login and email verification.
//!
//! Session tokens and email verification tokens are both HS256 JWTs signed
//! with the configured secret. They carry different claim shapes, so one can
//! never be decoded as the other.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::config::{
    Config, EMAIL_VERIFICATION_EXPIRATION_HOURS, EMAIL_VERIFICATION_PURPOSE, SECONDS_PER_HOUR,
    TOKEN_TYPE_BEARER,
};
use crate::domain::{NewUser, Password, RegisterUser, User, UserChanges, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(test)]
use mockall::automock;

// Verified against when the email is unknown so both paths pay for a hash.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$YmFkaGFzaDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTI";

/// JWT claims payload carried by session tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct VerificationClaims {
    sub: String,
    purpose: String,
    exp: i64,
    iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// A freshly registered account and the token that verifies its email.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub verification_token: String,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new customer account
    async fn register(&self, input: RegisterUser) -> AppResult<Registration>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Mark the account named by a verification token as verified
    async fn verify_email(&self, token: String) -> AppResult<User>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        name: user.full_name.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn generate_verification_token(email: &str, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = VerificationClaims {
        sub: email.to_string(),
        purpose: EMAIL_VERIFICATION_PURPOSE.to_string(),
        exp: (now + Duration::hours(EMAIL_VERIFICATION_EXPIRATION_HOURS)).timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?)
}

fn decode_claims<T: serde::de::DeserializeOwned>(token: &str, config: &Config) -> AppResult<T> {
    let token_data = decode::<T>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: RegisterUser) -> AppResult<Registration> {
        input.validate()?;

        if self.uow.users().find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("This email is already registered."));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                full_name: input.full_name,
                email: input.email,
                password_hash,
                role: UserRole::Customer,
                is_email_verified: false,
            })
            .await?;

        let verification_token = generate_verification_token(&user.email, &self.config)?;
        tracing::info!(user_id = user.id, "User registered");

        Ok(Registration {
            user,
            verification_token,
        })
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = match self.uow.users().find_by_email(&email).await? {
            Some(user) => user,
            None => {
                // Same hashing cost as a real attempt
                let _ = Password::from_hash(DUMMY_HASH.to_string()).verify(&password);
                return Err(AppError::InvalidCredentials);
            }
        };

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_email_verified {
            return Err(AppError::EmailNotVerified);
        }

        generate_token(&user, &self.config)
    }

    async fn verify_email(&self, token: String) -> AppResult<User> {
        let claims: VerificationClaims = decode_claims(&token, &self.config)?;
        if claims.purpose != EMAIL_VERIFICATION_PURPOSE {
            return Err(AppError::validation("Invalid verification token."));
        }

        let user = self
            .uow
            .users()
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AppError::NotFound)?;

        if user.is_email_verified {
            return Ok(user);
        }

        let changes = UserChanges {
            is_email_verified: Some(true),
            ..Default::default()
        };
        let user = self.uow.users().update(user.id, changes).await?;
        tracing::info!(user_id = user.id, "Email verified");
        Ok(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_claims(token, &self.config)
    }
}
