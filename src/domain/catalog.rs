//! Restaurants, categories and the food items they offer.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9][0-9 ().\-]{5,18}[0-9]$").expect("phone pattern is valid")
});

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub(crate) fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_PATTERN.is_match(phone) {
        Ok(())
    } else {
        Err(error_with_message("phone", "Invalid phone number."))
    }
}

pub(crate) fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        Err(error_with_message("price", "Price cannot be negative."))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FoodItem {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub restaurant_id: i32,
    pub category_id: i32,
}

/// A restaurant together with everything it serves.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RestaurantMenu {
    pub restaurant: Restaurant,
    pub food_items: Vec<FoodItem>,
}

/// A category together with every food item filed under it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryMenu {
    pub category: Category,
    pub food_items: Vec<FoodItem>,
}

/// Restaurant create/edit form
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct RestaurantInput {
    #[schema(example = "Luigi's")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name is required and cannot exceed 100 characters."
    ))]
    pub name: String,
    #[schema(example = "12 Harbour Street")]
    #[validate(length(
        min = 1,
        max = 200,
        message = "Address is required and cannot exceed 200 characters."
    ))]
    pub address: String,
    #[schema(example = "+44 20 7946 0018")]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

/// Category create/edit form
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[schema(example = "Pizza")]
    #[validate(length(
        min = 1,
        max = 50,
        message = "Name is required and cannot exceed 50 characters."
    ))]
    pub name: String,
}

/// Food item create/edit form
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct FoodItemInput {
    #[schema(example = "Margherita")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name is required and cannot exceed 100 characters."
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters."))]
    pub description: Option<String>,
    #[schema(value_type = String, example = "9.90")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    #[validate(url(message = "Invalid image URL."))]
    pub image_url: Option<String>,
    pub restaurant_id: i32,
    pub category_id: i32,
}
