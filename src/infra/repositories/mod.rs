//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod catalog_repository;
mod delivery_repository;
pub(crate) mod entities;
mod order_repository;
mod payment_repository;
mod user_repository;

pub use catalog_repository::{CatalogRepository, CatalogStore};
pub use delivery_repository::{DeliveryChanges, DeliveryRepository, DeliveryStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use payment_repository::{PaymentRepository, PaymentStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
#[cfg(test)]
pub use delivery_repository::MockDeliveryRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
