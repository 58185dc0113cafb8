//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List one page of users, with the total count
    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)>;

    /// Create a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply a partial update
    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User>;

    /// Permanently delete a user
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Build the insert model for a new user.
pub(crate) fn new_user_model(user: NewUser) -> ActiveModel {
    let now = chrono::Utc::now();
    ActiveModel {
        full_name: Set(user.full_name),
        email: Set(user.email),
        password_hash: Set(user.password_hash),
        role: Set(user.role.to_string()),
        is_email_verified: Set(user.is_email_verified),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let total = UserEntity::find().count(&self.db).await?;
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let model = new_user_model(user).insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();

        if let Some(full_name) = changes.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.to_string());
        }
        if let Some(verified) = changes.is_email_verified {
            active.is_email_verified = Set(verified);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
