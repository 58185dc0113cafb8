//! Unit of Work backed by mockall repositories.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{User, UserRole};
use crate::infra::repositories::{
    MockCatalogRepository, MockDeliveryRepository, MockOrderRepository, MockPaymentRepository,
    MockUserRepository,
};
use crate::infra::{
    CatalogRepository, DeliveryRepository, OrderRepository, PaymentRepository, UnitOfWork,
    UserRepository,
};

/// Every repository defaults to a mock with no expectations, so any call a
/// test did not set up fails loudly.
#[derive(Default)]
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    catalog: Arc<MockCatalogRepository>,
    orders: Arc<MockOrderRepository>,
    deliveries: Arc<MockDeliveryRepository>,
    payments: Arc<MockPaymentRepository>,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_catalog(mut self, repo: MockCatalogRepository) -> Self {
        self.catalog = Arc::new(repo);
        self
    }

    pub fn with_orders(mut self, repo: MockOrderRepository) -> Self {
        self.orders = Arc::new(repo);
        self
    }

    pub fn with_deliveries(mut self, repo: MockDeliveryRepository) -> Self {
        self.deliveries = Arc::new(repo);
        self
    }

    pub fn with_payments(mut self, repo: MockPaymentRepository) -> Self {
        self.payments = Arc::new(repo);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn deliveries(&self) -> Arc<dyn DeliveryRepository> {
        self.deliveries.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }
}

pub fn sample_user(id: i32, role: UserRole) -> User {
    User {
        id,
        full_name: format!("User {}", id),
        email: format!("user{}@example.com", id),
        password_hash: "hash".to_string(),
        role,
        is_email_verified: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
