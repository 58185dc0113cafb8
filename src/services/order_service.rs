//! Order service - checkout workflow and order maintenance.
//!
//! Placing an order resolves everything it needs up front (customer, food
//! item price, payment method) and hands the repository one [`OrderDraft`],
//! which is written in a single transaction.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::domain::{
    AddOrderItem, CustomerRef, DraftLine, NewOrderItem, NewUser, Order, OrderDetails, OrderDraft,
    OrderItem, OrderStatus, Password, PaymentMethod, PlaceOrder,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Create an order with its delivery, payment and first line
    async fn place_order(&self, input: PlaceOrder) -> AppResult<OrderDetails>;

    async fn list_orders(&self, params: PaginationParams) -> AppResult<Paginated<OrderDetails>>;

    async fn get_order(&self, id: i32) -> AppResult<OrderDetails>;

    /// Overwrite the status; the value must name a known status
    async fn update_status(&self, id: i32, status: String) -> AppResult<Order>;

    async fn delete_order(&self, id: i32) -> AppResult<()>;

    /// Append a line priced at the food item's current price
    async fn add_item(&self, order_id: i32, input: AddOrderItem) -> AppResult<OrderItem>;

    async fn remove_item(&self, id: i32) -> AppResult<()>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn resolve_customer(&self, input: &PlaceOrder) -> AppResult<CustomerRef> {
        match self.uow.users().find_by_email(&input.customer_email).await? {
            Some(user) => Ok(CustomerRef::Existing(user.id)),
            None => {
                let password_hash = Password::placeholder()?.into_string();
                Ok(CustomerRef::New(NewUser::guest(
                    input.customer_name.clone(),
                    input.customer_email.clone(),
                    password_hash,
                )))
            }
        }
    }

    async fn resolve_line(&self, input: &PlaceOrder) -> AppResult<Option<DraftLine>> {
        if let Some(food_item_id) = input.food_item_id.filter(|_| input.quantity > 0) {
            let food_item = self
                .uow
                .catalog()
                .find_food_item(food_item_id)
                .await?
                .ok_or_not_found()?;

            return Ok(Some(DraftLine::Catalog {
                food_item_id: food_item.id,
                food_item_name: food_item.name,
                quantity: input.quantity,
                unit_price: food_item.price,
            }));
        }

        let request = input
            .special_request
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());

        Ok(request.map(|text| DraftLine::SpecialRequest {
            description: text.to_string(),
        }))
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn place_order(&self, input: PlaceOrder) -> AppResult<OrderDetails> {
        input.validate()?;
        let payment_method: PaymentMethod = input.payment_method.parse()?;

        let line = self.resolve_line(&input).await?;
        let customer = self.resolve_customer(&input).await?;

        let draft = OrderDraft::new(customer, input.delivery_address, payment_method, Utc::now())
            .with_line(line);

        let details = self.uow.orders().create(draft).await.map_err(|e| {
            tracing::error!(error = %e, "Order creation rolled back");
            AppError::persistence("Error creating order")
        })?;

        tracing::info!(
            order_id = details.order.id,
            user_id = ?details.order.user_id,
            lines = details.items.len(),
            "Order placed"
        );
        Ok(details)
    }

    async fn list_orders(&self, params: PaginationParams) -> AppResult<Paginated<OrderDetails>> {
        let (orders, total) = self.uow.orders().list(params).await?;
        Ok(Paginated::new(orders, params, total))
    }

    async fn get_order(&self, id: i32) -> AppResult<OrderDetails> {
        self.uow.orders().find_details(id).await?.ok_or_not_found()
    }

    async fn update_status(&self, id: i32, status: String) -> AppResult<Order> {
        let status: OrderStatus = status.parse()?;
        let order = self.uow.orders().update_status(id, status).await?;
        tracing::info!(order_id = id, status = %status, "Order status updated");
        Ok(order)
    }

    async fn delete_order(&self, id: i32) -> AppResult<()> {
        self.uow.orders().delete(id).await
    }

    async fn add_item(&self, order_id: i32, input: AddOrderItem) -> AppResult<OrderItem> {
        input.validate()?;

        self.uow.orders().find_by_id(order_id).await?.ok_or_not_found()?;
        let food_item = self
            .uow
            .catalog()
            .find_food_item(input.food_item_id)
            .await?
            .ok_or_not_found()?;

        self.uow
            .orders()
            .add_item(NewOrderItem {
                order_id,
                food_item_id: food_item.id,
                quantity: input.quantity,
                unit_price: food_item.price,
            })
            .await
    }

    async fn remove_item(&self, id: i32) -> AppResult<()> {
        self.uow.orders().delete_item(id).await
    }
}
