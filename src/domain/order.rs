//! Orders and their fulfillment records.
//!
//! An order always owns exactly one delivery and one payment. Both are
//! created together with the order and removed with it.

use std::borrow::Cow;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::user::NewUser;
use crate::config::{
    DEFAULT_ORDER_QUANTITY, DEFAULT_PAYMENT_METHOD, ESTIMATED_DELIVERY_MINUTES,
    ORDER_STATUS_DELIVERED, ORDER_STATUS_PENDING, ORDER_STATUS_PREPARING, PAYMENT_METHOD_CARD,
    PAYMENT_METHOD_CASH, PAYMENT_METHOD_PAYPAL,
};
use crate::errors::AppError;

const INVALID_STATUS: &str = "Invalid status. Must be Pending, Preparing, or Delivered.";
const INVALID_PAYMENT_METHOD: &str = "Invalid payment method. Must be Card, Cash, or Paypal.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => ORDER_STATUS_PENDING,
            OrderStatus::Preparing => ORDER_STATUS_PREPARING,
            OrderStatus::Delivered => ORDER_STATUS_DELIVERED,
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ORDER_STATUS_PENDING => Ok(OrderStatus::Pending),
            ORDER_STATUS_PREPARING => Ok(OrderStatus::Preparing),
            ORDER_STATUS_DELIVERED => Ok(OrderStatus::Delivered),
            _ => Err(AppError::validation(INVALID_STATUS)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    Card,
    #[default]
    Cash,
    Paypal,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => PAYMENT_METHOD_CARD,
            PaymentMethod::Cash => PAYMENT_METHOD_CASH,
            PaymentMethod::Paypal => PAYMENT_METHOD_PAYPAL,
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PAYMENT_METHOD_CARD => Ok(PaymentMethod::Card),
            PAYMENT_METHOD_CASH => Ok(PaymentMethod::Cash),
            PAYMENT_METHOD_PAYPAL => Ok(PaymentMethod::Paypal),
            _ => Err(AppError::validation(INVALID_PAYMENT_METHOD)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_payment_method(method: &str) -> Result<(), ValidationError> {
    method.parse::<PaymentMethod>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("payment_method");
        error.message = Some(Cow::Borrowed(INVALID_PAYMENT_METHOD));
        error
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub food_item_id: i32,
    pub quantity: i32,
    #[schema(value_type = String, example = "9.90")]
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Delivery {
    pub id: i32,
    pub order_id: i32,
    pub address: String,
    pub estimated_delivery_time: DateTime<Utc>,
    pub delivery_user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Payment {
    pub id: i32,
    pub order_id: i32,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
}

/// Who placed an order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub id: i32,
    pub full_name: String,
    pub email: String,
}

/// Order line joined with the food item's name.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderLine {
    #[serde(flatten)]
    pub item: OrderItem,
    pub food_item_name: String,
}

/// Fully loaded order aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderDetails {
    pub order: Order,
    pub customer: Option<CustomerSummary>,
    pub delivery: Delivery,
    pub payment: Payment,
    pub items: Vec<OrderLine>,
}

impl OrderDetails {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|line| line.item.subtotal()).sum()
    }

    pub fn belongs_to(&self, user_id: i32) -> bool {
        self.order.user_id == Some(user_id)
    }
}

fn default_quantity() -> i32 {
    DEFAULT_ORDER_QUANTITY
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

/// Order form submitted by a customer or an administrator.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct PlaceOrder {
    #[schema(example = "Jane Doe")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name is required and cannot exceed 100 characters."
    ))]
    pub customer_name: String,
    #[schema(example = "jane@example.com")]
    #[validate(email(message = "Invalid email format."))]
    pub customer_email: String,
    #[schema(example = "221B Baker Street")]
    #[validate(length(
        min = 1,
        max = 200,
        message = "Address is required and cannot exceed 200 characters."
    ))]
    pub delivery_address: String,
    /// Free-text request used when no catalog item is ordered
    #[serde(default)]
    #[validate(length(max = 500, message = "Special request cannot exceed 500 characters."))]
    pub special_request: Option<String>,
    #[serde(default)]
    pub food_item_id: Option<i32>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[schema(example = "Cash")]
    #[serde(default = "default_payment_method")]
    #[validate(custom(function = "validate_payment_method"))]
    pub payment_method: String,
}

/// Line added to an existing order
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct AddOrderItem {
    pub food_item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i32,
}

/// Row data for a line about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub food_item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Who an order draft belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerRef {
    Existing(i32),
    New(NewUser),
}

/// The single line an order is created with.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftLine {
    Catalog {
        food_item_id: i32,
        food_item_name: String,
        quantity: i32,
        unit_price: Decimal,
    },
    /// Placeholder food item priced at zero, quantity one.
    SpecialRequest { description: String },
}

/// A complete order graph that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub customer: CustomerRef,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub estimated_delivery_time: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub line: Option<DraftLine>,
}

impl OrderDraft {
    pub fn new(
        customer: CustomerRef,
        delivery_address: String,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            customer,
            order_date: now,
            status: OrderStatus::Pending,
            delivery_address,
            estimated_delivery_time: now + Duration::minutes(ESTIMATED_DELIVERY_MINUTES),
            payment_method,
            line: None,
        }
    }

    pub fn with_line(mut self, line: Option<DraftLine>) -> Self {
        self.line = line;
        self
    }
}

/// New status for an order, validated against [`OrderStatus`].
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct UpdateStatus {
    #[schema(example = "Preparing")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateDelivery {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Address is required and cannot exceed 200 characters."
    ))]
    pub address: String,
    pub estimated_delivery_time: DateTime<Utc>,
    #[serde(default)]
    pub delivery_user_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, ToSchema)]
pub struct AssignDelivery {
    #[serde(alias = "deliveryUserId")]
    pub delivery_user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdatePayment {
    #[schema(example = "Card")]
    #[validate(custom(function = "validate_payment_method"))]
    pub payment_method: String,
    pub is_paid: bool,
}
