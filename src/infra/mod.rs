//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - SeaORM repositories
//! - Unit of Work for repository access and transactions

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CatalogRepository, DeliveryChanges, DeliveryRepository, OrderRepository, PaymentRepository,
    UserRepository,
};
pub use unit_of_work::{Persistence, UnitOfWork};
