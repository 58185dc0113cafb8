//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository and owns the transaction helper
//! used for multi-table writes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use super::repositories::{
    CatalogRepository, CatalogStore, DeliveryRepository, DeliveryStore, OrderRepository,
    OrderStore, PaymentRepository, PaymentStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Services depend on this trait only, so tests can hand them mock
/// repositories.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn catalog(&self) -> Arc<dyn CatalogRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    fn deliveries(&self) -> Arc<dyn DeliveryRepository>;

    fn payments(&self) -> Arc<dyn PaymentRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    catalog_repo: Arc<CatalogStore>,
    order_repo: Arc<OrderStore>,
    delivery_repo: Arc<DeliveryStore>,
    payment_repo: Arc<PaymentStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            catalog_repo: Arc::new(CatalogStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            delivery_repo: Arc::new(DeliveryStore::new(db.clone())),
            payment_repo: Arc::new(PaymentStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    fn deliveries(&self) -> Arc<dyn DeliveryRepository> {
        self.delivery_repo.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payment_repo.clone()
    }
}

/// Run `f` inside a transaction.
///
/// Commits when `f` succeeds; rolls back and returns the original error
/// otherwise.
pub(crate) async fn run_in_transaction<F, T>(
    db: &DatabaseConnection,
    isolation: IsolationLevel,
    f: F,
) -> AppResult<T>
where
    F: for<'a> FnOnce(
            &'a DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
        + Send,
    T: Send,
{
    let txn = db
        .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
        .await
        .map_err(AppError::from)?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
