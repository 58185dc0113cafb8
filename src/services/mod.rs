//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on the [`UnitOfWork`](crate::infra::UnitOfWork)
//! abstraction, never on SeaORM directly.

mod auth_service;
mod catalog_service;
pub mod container;
mod delivery_service;
mod order_service;
mod payment_service;
mod user_service;

#[cfg(test)]
pub(crate) mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use catalog_service::{CatalogManager, CatalogService};
pub use delivery_service::{DeliveryManager, DeliveryService};
pub use order_service::{OrderManager, OrderService};
pub use payment_service::{PaymentManager, PaymentService};
pub use user_service::{UserManager, UserService};

#[cfg(test)]
pub use auth_service::MockAuthService;
#[cfg(test)]
pub use catalog_service::MockCatalogService;
#[cfg(test)]
pub use delivery_service::MockDeliveryService;
#[cfg(test)]
pub use order_service::MockOrderService;
#[cfg(test)]
pub use payment_service::MockPaymentService;
#[cfg(test)]
pub use user_service::MockUserService;
