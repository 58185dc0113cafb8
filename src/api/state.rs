//! Application state - Dependency injection container.
//!
//! Provides handlers with every application service and the database handle
//! used by the health check.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, CatalogService, DeliveryService, OrderService, PaymentService, ServiceContainer,
    Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub order_service: Arc<dyn OrderService>,
    pub delivery_service: Arc<dyn DeliveryService>,
    pub payment_service: Arc<dyn PaymentService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Create application state from any service container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            catalog_service: container.catalog(),
            order_service: container.orders(),
            delivery_service: container.deliveries(),
            payment_service: container.payments(),
            database,
        }
    }
}
