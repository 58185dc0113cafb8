//! User service - administrative account management.

use async_trait::async_trait;
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

use crate::domain::{CreateUser, NewUser, Password, UpdateUser, User, UserChanges, UserRole};
use crate::errors::{format_validation_errors, AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(test)]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// One page of users ordered by id
    async fn list_users(&self, params: PaginationParams) -> AppResult<Paginated<User>>;

    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Create an account with any of the known roles
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    async fn update_user(&self, id: i32, input: UpdateUser) -> AppResult<User>;

    /// Delete an account. Nobody may delete themselves, and accounts with
    /// orders are kept.
    async fn delete_user(&self, id: i32, acting_user_id: i32) -> AppResult<()>;
}

/// Run field validation and role parsing together so that one response
/// lists every problem.
fn check_input(
    fields: Result<(), ValidationErrors>,
    role: Option<&str>,
) -> AppResult<Option<UserRole>> {
    let mut messages = match fields {
        Ok(()) => Vec::new(),
        Err(errors) => format_validation_errors(&errors),
    };

    let role = match role.map(str::parse::<UserRole>).transpose() {
        Ok(role) => role,
        Err(e) => {
            messages.push(e.to_string());
            None
        }
    };

    if !messages.is_empty() {
        return Err(AppError::validation_failed(messages));
    }
    Ok(role)
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i32>) -> AppResult<()> {
        match self.uow.users().find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(AppError::conflict("This email is already registered."))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self, params: PaginationParams) -> AppResult<Paginated<User>> {
        let (users, total) = self.uow.users().list(params).await?;
        Ok(Paginated::new(users, params, total))
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        let role = check_input(input.validate(), Some(&input.role))?.unwrap_or_default();
        self.ensure_email_free(&input.email, None).await?;

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                full_name: input.full_name,
                email: input.email,
                password_hash,
                role,
                is_email_verified: input.is_email_verified,
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: i32, input: UpdateUser) -> AppResult<User> {
        let role = check_input(input.validate(), input.role.as_deref())?;
        let existing = self.get_user(id).await?;

        // Assigned deliveries must keep pointing at delivery staff
        let leaves_delivery = existing.role == UserRole::Delivery
            && role.is_some_and(|r| r != UserRole::Delivery);
        if leaves_delivery && self.uow.deliveries().count_for_user(id).await? > 0 {
            return Err(AppError::validation(
                "Cannot change the role of a user with assigned deliveries.",
            ));
        }

        if let Some(email) = &input.email {
            self.ensure_email_free(email, Some(id)).await?;
        }

        let password_hash = match &input.password {
            Some(password) => Some(Password::new(password)?.into_string()),
            None => None,
        };

        let changes = UserChanges {
            full_name: input.full_name,
            email: input.email,
            password_hash,
            role,
            is_email_verified: input.is_email_verified,
        };
        self.uow.users().update(id, changes).await
    }

    async fn delete_user(&self, id: i32, acting_user_id: i32) -> AppResult<()> {
        if id == acting_user_id {
            return Err(AppError::validation("You cannot delete your own account."));
        }

        self.get_user(id).await?;

        if self.uow.orders().count_for_user(id).await? > 0 {
            return Err(AppError::validation("Cannot delete user with existing orders."));
        }

        self.uow.users().delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
