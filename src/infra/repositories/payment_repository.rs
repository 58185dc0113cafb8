//! Payment persistence. Payments share their order's lifecycle.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::entities::payment::{self, ActiveModel, Entity as PaymentEntity};
use crate::domain::{Payment, PaymentMethod};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Payment>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Payment>>;

    async fn update(&self, id: i32, method: PaymentMethod, is_paid: bool) -> AppResult<Payment>;

    async fn mark_paid(&self, id: i32) -> AppResult<Payment>;
}

pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> AppResult<payment::Model> {
        PaymentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn list(&self) -> AppResult<Vec<Payment>> {
        let models = PaymentEntity::find()
            .order_by_desc(payment::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Payment::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Payment>> {
        let result = PaymentEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Payment::from))
    }

    async fn update(&self, id: i32, method: PaymentMethod, is_paid: bool) -> AppResult<Payment> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.payment_method = Set(method.to_string());
        active.is_paid = Set(is_paid);

        let model = active.update(&self.db).await?;
        Ok(Payment::from(model))
    }

    async fn mark_paid(&self, id: i32) -> AppResult<Payment> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.is_paid = Set(true);

        let model = active.update(&self.db).await?;
        Ok(Payment::from(model))
    }
}
