//! API middleware.

mod auth;

pub use auth::{gate, gated, session_middleware, CurrentUser};
