//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_DELIVERY};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
    Delivery,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Customer => ROLE_CUSTOMER,
            UserRole::Delivery => ROLE_DELIVERY,
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_CUSTOMER => Ok(UserRole::Customer),
            ROLE_DELIVERY => Ok(UserRole::Delivery),
            _ => Err(AppError::validation(
                "Invalid role. Must be Customer, Admin, or Delivery.",
            )),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if user can be assigned deliveries
    pub fn is_delivery_staff(&self) -> bool {
        matches!(self.role, UserRole::Delivery)
    }
}

/// Row data for a user about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_email_verified: bool,
}

impl NewUser {
    /// Unverified customer account created on behalf of an order.
    pub fn guest(full_name: String, email: String, password_hash: String) -> Self {
        Self {
            full_name,
            email,
            password_hash,
            role: UserRole::Customer,
            is_email_verified: false,
        }
    }
}

/// Partial update of a stored user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub is_email_verified: Option<bool>,
}

/// Self-service registration payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[schema(example = "Jane Doe")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name is required and cannot exceed 100 characters."
    ))]
    pub full_name: String,
    #[schema(example = "jane@example.com")]
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    #[schema(example = "secret123", min_length = 6, max_length = 100)]
    #[validate(length(
        min = 6,
        max = 100,
        message = "Password must be between 6 and 100 characters."
    ))]
    pub password: String,
}

/// Account created by an administrator
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[schema(example = "Sam Rider")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name is required and cannot exceed 100 characters."
    ))]
    pub full_name: String,
    #[schema(example = "sam@example.com")]
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    #[schema(example = "secret123", min_length = 6, max_length = 100)]
    #[validate(length(
        min = 6,
        max = 100,
        message = "Password must be between 6 and 100 characters."
    ))]
    pub password: String,
    /// One of Customer, Admin, Delivery
    #[schema(example = "Delivery")]
    pub role: String,
    #[serde(default)]
    pub is_email_verified: bool,
}

/// Administrative user update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name is required and cannot exceed 100 characters."
    ))]
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email format."))]
    pub email: Option<String>,
    #[validate(length(
        min = 6,
        max = 100,
        message = "Password must be between 6 and 100 characters."
    ))]
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_email_verified: Option<bool>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Customer")]
    pub role: String,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role.to_string(),
            is_email_verified: user.is_email_verified,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_exact() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("Delivery".parse::<UserRole>().unwrap(), UserRole::Delivery);
        assert!("admin".parse::<UserRole>().is_err());
        assert!("Manager".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_guest_is_unverified_customer() {
        let guest = NewUser::guest("Ann".into(), "ann@example.com".into(), "hash".into());
        assert_eq!(guest.role, UserRole::Customer);
        assert!(!guest.is_email_verified);
    }

    #[test]
    fn test_register_validation_collects_every_field() {
        let input = RegisterUser {
            full_name: String::new(),
            email: "not-an-email".into(),
            password: "123".into(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }
}
