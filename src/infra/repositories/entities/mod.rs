//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod category;
pub mod delivery;
pub mod food_item;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod restaurant;
pub mod user;
