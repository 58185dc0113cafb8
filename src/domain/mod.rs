//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod catalog;
pub mod order;
pub mod password;
pub mod permissions;
pub mod user;

pub use catalog::{
    Category, CategoryInput, CategoryMenu, FoodItem, FoodItemInput, Restaurant, RestaurantInput,
    RestaurantMenu,
};
pub use order::{
    AddOrderItem, AssignDelivery, CustomerRef, CustomerSummary, Delivery, DraftLine, NewOrderItem,
    Order, OrderDetails, OrderDraft, OrderItem, OrderLine, OrderStatus, Payment, PaymentMethod,
    PlaceOrder, UpdateDelivery, UpdatePayment, UpdateStatus,
};
pub use password::Password;
pub use permissions::Permission;
pub use user::{
    CreateUser, NewUser, RegisterUser, UpdateUser, User, UserChanges, UserResponse, UserRole,
};
