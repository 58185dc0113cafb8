//! Food delivery order management API.
//!
//! Customers order from restaurant menus, administrators run the catalog
//! and the order pipeline, and delivery staff track the deliveries assigned
//! to them. Every route is guarded by one static role-permission table.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Business entities, inputs and the permission table
//! - **services**: Application use cases
//! - **infra**: SeaORM entities, migrations and repositories
//! - **api**: HTTP handlers, middleware and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Permission, User, UserRole};
pub use errors::{AppError, AppResult};
