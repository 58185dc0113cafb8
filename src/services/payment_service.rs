//! Payment service.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::domain::{Payment, PaymentMethod, UpdatePayment};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn list_payments(&self) -> AppResult<Vec<Payment>>;

    async fn get_payment(&self, id: i32) -> AppResult<Payment>;

    async fn update_payment(&self, id: i32, input: UpdatePayment) -> AppResult<Payment>;

    /// Mark a payment as received
    async fn confirm_payment(&self, id: i32) -> AppResult<Payment>;
}

pub struct PaymentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PaymentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentManager<U> {
    async fn list_payments(&self) -> AppResult<Vec<Payment>> {
        self.uow.payments().list().await
    }

    async fn get_payment(&self, id: i32) -> AppResult<Payment> {
        self.uow.payments().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_payment(&self, id: i32, input: UpdatePayment) -> AppResult<Payment> {
        input.validate()?;
        let method: PaymentMethod = input.payment_method.parse()?;
        self.uow.payments().update(id, method, input.is_paid).await
    }

    async fn confirm_payment(&self, id: i32) -> AppResult<Payment> {
        let payment = self.uow.payments().mark_paid(id).await?;
        tracing::info!(payment_id = id, order_id = payment.order_id, "Payment confirmed");
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::errors::AppError;
    use crate::infra::repositories::MockPaymentRepository;
    use crate::services::testing::TestUnitOfWork;

    #[tokio::test]
    async fn test_confirm_sets_paid_flag() {
        let mut payments = MockPaymentRepository::new();
        payments.expect_mark_paid().with(eq(4)).times(1).returning(|id| {
            Ok(Payment { id, order_id: 10, payment_method: PaymentMethod::Cash, is_paid: true })
        });

        let service = PaymentManager::new(TestUnitOfWork::new().with_payments(payments).into_arc());
        assert!(service.confirm_payment(4).await.unwrap().is_paid);
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_method() {
        let mut payments = MockPaymentRepository::new();
        payments.expect_update().never();

        let service = PaymentManager::new(TestUnitOfWork::new().with_payments(payments).into_arc());
        let input = UpdatePayment { payment_method: "Bitcoin".into(), is_paid: false };

        assert!(matches!(service.update_payment(4, input).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_passes_parsed_method() {
        let mut payments = MockPaymentRepository::new();
        payments
            .expect_update()
            .with(eq(4), eq(PaymentMethod::Paypal), eq(true))
            .returning(|id, method, is_paid| {
                Ok(Payment { id, order_id: 10, payment_method: method, is_paid })
            });

        let service = PaymentManager::new(TestUnitOfWork::new().with_payments(payments).into_arc());
        let input = UpdatePayment { payment_method: "Paypal".into(), is_paid: true };

        let payment = service.update_payment(4, input).await.unwrap();
        assert_eq!(payment.payment_method, PaymentMethod::Paypal);
    }

    #[tokio::test]
    async fn test_get_missing_payment() {
        let mut payments = MockPaymentRepository::new();
        payments.expect_find_by_id().returning(|_| Ok(None));

        let service = PaymentManager::new(TestUnitOfWork::new().with_payments(payments).into_arc());
        assert!(matches!(service.get_payment(1).await, Err(AppError::NotFound)));
    }
}
