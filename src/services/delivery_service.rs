//! Delivery service - scheduling and courier assignment.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::domain::{Delivery, UpdateDelivery};
use crate::errors::{format_validation_errors, AppError, AppResult, OptionExt};
use crate::infra::{DeliveryChanges, UnitOfWork};

#[cfg(test)]
use mockall::automock;

const INVALID_DELIVERY_USER: &str = "Invalid delivery user.";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeliveryService: Send + Sync {
    async fn list_deliveries(&self) -> AppResult<Vec<Delivery>>;

    /// Deliveries assigned to one courier
    async fn assigned_to(&self, user_id: i32) -> AppResult<Vec<Delivery>>;

    async fn get_delivery(&self, id: i32) -> AppResult<Delivery>;

    async fn update_delivery(&self, id: i32, input: UpdateDelivery) -> AppResult<Delivery>;

    /// Hand a delivery to a user with the Delivery role
    async fn assign_delivery(&self, id: i32, delivery_user_id: i32) -> AppResult<Delivery>;
}

pub struct DeliveryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DeliveryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn is_courier(&self, user_id: i32) -> AppResult<bool> {
        let user = self.uow.users().find_by_id(user_id).await?;
        Ok(user.is_some_and(|user| user.is_delivery_staff()))
    }
}

#[async_trait]
impl<U: UnitOfWork> DeliveryService for DeliveryManager<U> {
    async fn list_deliveries(&self) -> AppResult<Vec<Delivery>> {
        self.uow.deliveries().list().await
    }

    async fn assigned_to(&self, user_id: i32) -> AppResult<Vec<Delivery>> {
        self.uow.deliveries().list_for_user(user_id).await
    }

    async fn get_delivery(&self, id: i32) -> AppResult<Delivery> {
        self.uow.deliveries().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_delivery(&self, id: i32, input: UpdateDelivery) -> AppResult<Delivery> {
        let mut messages = match input.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => format_validation_errors(&errors),
        };

        if input.estimated_delivery_time <= Utc::now() {
            messages.push("Estimated delivery time must be in the future.".to_string());
        }
        if let Some(user_id) = input.delivery_user_id {
            if !self.is_courier(user_id).await? {
                messages.push(INVALID_DELIVERY_USER.to_string());
            }
        }

        if !messages.is_empty() {
            return Err(AppError::validation_failed(messages));
        }

        let changes = DeliveryChanges {
            address: input.address,
            estimated_delivery_time: input.estimated_delivery_time,
            delivery_user_id: input.delivery_user_id,
        };
        self.uow.deliveries().update(id, changes).await
    }

    async fn assign_delivery(&self, id: i32, delivery_user_id: i32) -> AppResult<Delivery> {
        self.get_delivery(id).await?;

        if !self.is_courier(delivery_user_id).await? {
            return Err(AppError::validation(INVALID_DELIVERY_USER));
        }

        let delivery = self.uow.deliveries().assign(id, delivery_user_id).await?;
        tracing::info!(
            delivery_id = id,
            order_id = delivery.order_id,
            delivery_user_id,
            "Delivery assigned"
        );
        Ok(delivery)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::UserRole;
    use crate::infra::repositories::{MockDeliveryRepository, MockUserRepository};
    use crate::services::testing::{sample_user, TestUnitOfWork};

    fn delivery(id: i32, courier: Option<i32>) -> Delivery {
        Delivery {
            id,
            order_id: 10,
            address: "221B Baker Street".into(),
            estimated_delivery_time: Utc::now() + Duration::hours(1),
            delivery_user_id: courier,
        }
    }

    fn users_with_roles() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(2))
            .returning(|id| Ok(Some(sample_user(id, UserRole::Customer))));
        users
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(sample_user(id, UserRole::Delivery))));
        users
    }

    #[tokio::test]
    async fn test_assign_to_customer_fails() {
        let mut deliveries = MockDeliveryRepository::new();
        deliveries.expect_find_by_id().returning(|id| Ok(Some(delivery(id, None))));
        deliveries.expect_assign().never();

        let uow = TestUnitOfWork::new().with_users(users_with_roles()).with_deliveries(deliveries);
        let service = DeliveryManager::new(uow.into_arc());

        let err = service.assign_delivery(1, 2).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid delivery user.");
    }

    #[tokio::test]
    async fn test_assign_to_courier_succeeds() {
        let mut deliveries = MockDeliveryRepository::new();
        deliveries.expect_find_by_id().returning(|id| Ok(Some(delivery(id, None))));
        deliveries
            .expect_assign()
            .with(eq(1), eq(3))
            .times(1)
            .returning(|id, user_id| Ok(delivery(id, Some(user_id))));

        let uow = TestUnitOfWork::new().with_users(users_with_roles()).with_deliveries(deliveries);
        let service = DeliveryManager::new(uow.into_arc());

        let assigned = service.assign_delivery(1, 3).await.unwrap();
        assert_eq!(assigned.delivery_user_id, Some(3));
    }

    #[tokio::test]
    async fn test_assign_unknown_delivery_is_not_found() {
        let mut deliveries = MockDeliveryRepository::new();
        deliveries.expect_find_by_id().returning(|_| Ok(None));

        let service =
            DeliveryManager::new(TestUnitOfWork::new().with_deliveries(deliveries).into_arc());
        assert!(matches!(service.assign_delivery(8, 3).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_reports_past_eta_and_bad_assignee_together() {
        let mut deliveries = MockDeliveryRepository::new();
        deliveries.expect_update().never();

        let uow = TestUnitOfWork::new().with_users(users_with_roles()).with_deliveries(deliveries);
        let service = DeliveryManager::new(uow.into_arc());

        let input = UpdateDelivery {
            address: "1 Main St".into(),
            estimated_delivery_time: Utc::now() - Duration::minutes(5),
            delivery_user_id: Some(2),
        };
        let message = service.update_delivery(1, input).await.unwrap_err().to_string();

        assert!(message.contains("Estimated delivery time must be in the future."));
        assert!(message.contains("Invalid delivery user."));
    }

    #[tokio::test]
    async fn test_update_with_valid_fields() {
        let mut deliveries = MockDeliveryRepository::new();
        deliveries
            .expect_update()
            .withf(|id, changes| *id == 1 && changes.delivery_user_id == Some(3))
            .returning(|id, changes| {
                Ok(Delivery {
                    id,
                    order_id: 10,
                    address: changes.address,
                    estimated_delivery_time: changes.estimated_delivery_time,
                    delivery_user_id: changes.delivery_user_id,
                })
            });

        let uow = TestUnitOfWork::new().with_users(users_with_roles()).with_deliveries(deliveries);
        let service = DeliveryManager::new(uow.into_arc());

        let input = UpdateDelivery {
            address: "1 Main St".into(),
            estimated_delivery_time: Utc::now() + Duration::hours(2),
            delivery_user_id: Some(3),
        };
        let updated = service.update_delivery(1, input).await.unwrap();

        assert_eq!(updated.address, "1 Main St");
    }
}
