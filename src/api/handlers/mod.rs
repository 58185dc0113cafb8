//! HTTP request handlers.

pub mod access_handler;
pub mod auth_handler;
pub mod category_handler;
pub mod delivery_handler;
pub mod food_item_handler;
pub mod order_handler;
pub mod payment_handler;
pub mod restaurant_handler;
pub mod user_handler;

pub use access_handler::access_routes;
pub use auth_handler::auth_routes;
pub use category_handler::category_routes;
pub use delivery_handler::delivery_routes;
pub use food_item_handler::food_item_routes;
pub use order_handler::{order_item_routes, order_routes};
pub use payment_handler::payment_routes;
pub use restaurant_handler::restaurant_routes;
pub use user_handler::user_routes;
