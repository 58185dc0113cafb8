//! Service Container - Centralized service access.
//!
//! Owns one instance of every application service, all sharing a single
//! [`Persistence`] unit of work.

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, CatalogManager, CatalogService, DeliveryManager, DeliveryService,
    OrderManager, OrderService, PaymentManager, PaymentService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn deliveries(&self) -> Arc<dyn DeliveryService>;

    fn payments(&self) -> Arc<dyn PaymentService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    catalog_service: Arc<dyn CatalogService>,
    order_service: Arc<dyn OrderService>,
    delivery_service: Arc<dyn DeliveryService>,
    payment_service: Arc<dyn PaymentService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            order_service: Arc::new(OrderManager::new(uow.clone())),
            delivery_service: Arc::new(DeliveryManager::new(uow.clone())),
            payment_service: Arc::new(PaymentManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn deliveries(&self) -> Arc<dyn DeliveryService> {
        self.delivery_service.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }
}

/// Helpers for running independent lookups concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}

#[cfg(test)]
mod tests {
    use super::parallel;
    use crate::errors::{AppError, AppResult};

    #[tokio::test]
    async fn test_join2_returns_both_results() {
        let (a, b) = parallel::join2(async { Ok(1) }, async { Ok("two") }).await.unwrap();
        assert_eq!((a, b), (1, "two"));
    }

    #[tokio::test]
    async fn test_join2_short_circuits_on_error() {
        let result: AppResult<(i32, i32)> =
            parallel::join2(async { Err(AppError::NotFound) }, async { Ok(2) }).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
