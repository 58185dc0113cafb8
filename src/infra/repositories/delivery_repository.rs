//! Delivery persistence.
//!
//! Deliveries are inserted by the order workflow and removed with their
//! order, so this repository only reads and edits them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::delivery::{self, ActiveModel, Entity as DeliveryEntity};
use crate::domain::Delivery;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Editable delivery fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryChanges {
    pub address: String,
    pub estimated_delivery_time: DateTime<Utc>,
    pub delivery_user_id: Option<i32>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Delivery>>;

    /// Deliveries assigned to one delivery user
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Delivery>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Delivery>>;

    /// Number of deliveries assigned to `user_id`
    async fn count_for_user(&self, user_id: i32) -> AppResult<u64>;

    async fn update(&self, id: i32, changes: DeliveryChanges) -> AppResult<Delivery>;

    async fn assign(&self, id: i32, user_id: i32) -> AppResult<Delivery>;
}

pub struct DeliveryStore {
    db: DatabaseConnection,
}

impl DeliveryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> AppResult<delivery::Model> {
        DeliveryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl DeliveryRepository for DeliveryStore {
    async fn list(&self) -> AppResult<Vec<Delivery>> {
        let models = DeliveryEntity::find()
            .order_by_asc(delivery::Column::EstimatedDeliveryTime)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Delivery::from).collect())
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Delivery>> {
        let models = DeliveryEntity::find()
            .filter(delivery::Column::DeliveryUserId.eq(user_id))
            .order_by_asc(delivery::Column::EstimatedDeliveryTime)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Delivery::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Delivery>> {
        let result = DeliveryEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Delivery::from))
    }

    async fn count_for_user(&self, user_id: i32) -> AppResult<u64> {
        let count = DeliveryEntity::find()
            .filter(delivery::Column::DeliveryUserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i32, changes: DeliveryChanges) -> AppResult<Delivery> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.address = Set(changes.address);
        active.estimated_delivery_time = Set(changes.estimated_delivery_time);
        active.delivery_user_id = Set(changes.delivery_user_id);

        let model = active.update(&self.db).await?;
        Ok(Delivery::from(model))
    }

    async fn assign(&self, id: i32, user_id: i32) -> AppResult<Delivery> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.delivery_user_id = Set(Some(user_id));

        let model = active.update(&self.db).await?;
        Ok(Delivery::from(model))
    }
}
