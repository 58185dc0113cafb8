//! Order aggregate persistence.
//!
//! Orders are read back as fully materialized [`OrderDetails`]: the order,
//! its customer, delivery, payment and lines with food item names. Related
//! rows are fetched with one `IN (...)` query per table and stitched
//! together in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::{
    category, delivery, food_item, order, order_item, payment, restaurant, user,
};
use super::user_repository::new_user_model;
use crate::config::SPECIAL_REQUEST_ITEM_NAME;
use crate::domain::{
    CustomerRef, CustomerSummary, Delivery, DraftLine, NewOrderItem, Order, OrderDetails,
    OrderDraft, OrderItem, OrderLine, OrderStatus, Payment,
};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::run_in_transaction;
use crate::types::PaginationParams;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a complete order graph atomically
    async fn create(&self, draft: OrderDraft) -> AppResult<OrderDetails>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>>;

    async fn find_details(&self, id: i32) -> AppResult<Option<OrderDetails>>;

    /// Newest orders first, with the total count
    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<OrderDetails>, u64)>;

    async fn update_status(&self, id: i32, status: OrderStatus) -> AppResult<Order>;

    /// Delete an order together with its lines, delivery and payment
    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn count_for_user(&self, user_id: i32) -> AppResult<u64>;

    async fn add_item(&self, item: NewOrderItem) -> AppResult<OrderItem>;

    async fn delete_item(&self, id: i32) -> AppResult<()>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn create(&self, draft: OrderDraft) -> AppResult<OrderDetails> {
        run_in_transaction(&self.db, IsolationLevel::ReadCommitted, move |txn| {
            Box::pin(async move { OrderGraphWriter::new(txn).insert(draft).await })
        })
        .await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>> {
        let result = order::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Order::from))
    }

    async fn find_details(&self, id: i32) -> AppResult<Option<OrderDetails>> {
        let Some(model) = order::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut details = load_details(&self.db, vec![model]).await?;
        Ok(details.pop())
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<OrderDetails>, u64)> {
        let total = order::Entity::find().count(&self.db).await?;
        let models = order::Entity::find()
            .order_by_desc(order::Column::OrderDate)
            .order_by_desc(order::Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await?;

        Ok((load_details(&self.db, models).await?, total))
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> AppResult<Order> {
        let existing = order::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(status.to_string());

        let model = active.update(&self.db).await?;
        Ok(Order::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = order::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count_for_user(&self, user_id: i32) -> AppResult<u64> {
        let count = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn add_item(&self, item: NewOrderItem) -> AppResult<OrderItem> {
        let model = order_item::ActiveModel {
            order_id: Set(item.order_id),
            food_item_id: Set(item.food_item_id),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(OrderItem::from(model))
    }

    async fn delete_item(&self, id: i32) -> AppResult<()> {
        let result = order_item::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Writes an order graph inside a borrowed transaction.
///
/// The returned details are assembled from the rows as inserted, so the
/// caller never reads the order back after commit.
pub(crate) struct OrderGraphWriter<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> OrderGraphWriter<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert user (if new), order, delivery, payment and line.
    pub(crate) async fn insert(&self, draft: OrderDraft) -> AppResult<OrderDetails> {
        let customer = self.customer(draft.customer).await?;

        let order = order::ActiveModel {
            order_date: Set(draft.order_date),
            status: Set(draft.status.to_string()),
            user_id: Set(Some(customer.id)),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        let delivery = delivery::ActiveModel {
            order_id: Set(order.id),
            address: Set(draft.delivery_address),
            estimated_delivery_time: Set(draft.estimated_delivery_time),
            delivery_user_id: Set(None),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        let payment = payment::ActiveModel {
            order_id: Set(order.id),
            payment_method: Set(draft.payment_method.to_string()),
            is_paid: Set(false),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        let mut items = Vec::new();
        match draft.line {
            Some(DraftLine::Catalog {
                food_item_id,
                food_item_name,
                quantity,
                unit_price,
            }) => {
                let item = self
                    .insert_line(order.id, food_item_id, quantity, unit_price)
                    .await?;
                items.push(OrderLine {
                    item,
                    food_item_name,
                });
            }
            Some(DraftLine::SpecialRequest { description }) => {
                let placeholder = self.insert_special_request_item(description).await?;
                let item = self
                    .insert_line(order.id, placeholder.id, 1, Decimal::ZERO)
                    .await?;
                items.push(OrderLine {
                    item,
                    food_item_name: placeholder.name,
                });
            }
            None => {}
        }

        Ok(OrderDetails {
            order: Order::from(order),
            customer: Some(customer),
            delivery: Delivery::from(delivery),
            payment: Payment::from(payment),
            items,
        })
    }

    async fn customer(&self, customer: CustomerRef) -> AppResult<CustomerSummary> {
        let model = match customer {
            CustomerRef::Existing(id) => user::Entity::find_by_id(id)
                .one(self.txn)
                .await?
                .ok_or(AppError::NotFound)?,
            CustomerRef::New(new_user) => {
                let created = new_user_model(new_user).insert(self.txn).await?;
                tracing::debug!(user_id = created.id, "Created customer for order");
                created
            }
        };

        Ok(summary(model))
    }

    async fn insert_line(
        &self,
        order_id: i32,
        food_item_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> AppResult<OrderItem> {
        let model = order_item::ActiveModel {
            order_id: Set(order_id),
            food_item_id: Set(food_item_id),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        Ok(OrderItem::from(model))
    }

    async fn insert_special_request_item(
        &self,
        description: String,
    ) -> AppResult<food_item::Model> {
        let restaurant = restaurant::Entity::find()
            .filter(restaurant::Column::IsHouse.eq(true))
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::internal("House restaurant is missing; apply migrations"))?;
        let category = category::Entity::find()
            .filter(category::Column::IsHouse.eq(true))
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::internal("House category is missing; apply migrations"))?;

        let item = food_item::ActiveModel {
            name: Set(SPECIAL_REQUEST_ITEM_NAME.to_string()),
            description: Set(Some(description)),
            price: Set(Decimal::ZERO),
            image_url: Set(None),
            restaurant_id: Set(restaurant.id),
            category_id: Set(category.id),
            is_special_request: Set(true),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;

        Ok(item)
    }
}

fn summary(model: user::Model) -> CustomerSummary {
    CustomerSummary {
        id: model.id,
        full_name: model.full_name,
        email: model.email,
    }
}

/// Attach customers, deliveries, payments and lines to a batch of orders.
async fn load_details<C>(db: &C, orders: Vec<order::Model>) -> AppResult<Vec<OrderDetails>>
where
    C: ConnectionTrait,
{
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let user_ids: Vec<i32> = orders.iter().filter_map(|o| o.user_id).collect();

    let mut deliveries: HashMap<i32, Delivery> = delivery::Entity::find()
        .filter(delivery::Column::OrderId.is_in(order_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.order_id, Delivery::from(m)))
        .collect();

    let mut payments: HashMap<i32, Payment> = payment::Entity::find()
        .filter(payment::Column::OrderId.is_in(order_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.order_id, Payment::from(m)))
        .collect();

    let mut lines: HashMap<i32, Vec<OrderLine>> = HashMap::new();
    let rows = order_item::Entity::find()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_item::Column::Id)
        .find_also_related(food_item::Entity)
        .all(db)
        .await?;
    for (item, food) in rows {
        lines.entry(item.order_id).or_default().push(OrderLine {
            food_item_name: food.map(|f| f.name).unwrap_or_default(),
            item: OrderItem::from(item),
        });
    }

    let customers: HashMap<i32, CustomerSummary> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, summary(m)))
            .collect()
    };

    orders
        .into_iter()
        .map(|model| {
            let id = model.id;
            let delivery = deliveries
                .remove(&id)
                .ok_or_else(|| AppError::internal(format!("Order {} has no delivery", id)))?;
            let payment = payments
                .remove(&id)
                .ok_or_else(|| AppError::internal(format!("Order {} has no payment", id)))?;

            Ok(OrderDetails {
                customer: model.user_id.and_then(|uid| customers.get(&uid).cloned()),
                order: Order::from(model),
                delivery,
                payment,
                items: lines.remove(&id).unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Statement, Value};

    use super::*;
    use crate::domain::PaymentMethod;

    fn statements(db: DatabaseConnection) -> Vec<Statement> {
        db.into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().to_vec())
            .collect()
    }

    fn binds(statement: &Statement, value: Value) -> bool {
        statement
            .values
            .as_ref()
            .is_some_and(|values| values.0.contains(&value))
    }

    fn inserts_into(statement: &Statement, table: &str) -> bool {
        statement
            .sql
            .starts_with(&format!(r#"INSERT INTO "{}""#, table))
    }

    fn customer_row(now: DateTime<Utc>) -> user::Model {
        user::Model {
            id: 4,
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            password_hash: "hash".into(),
            role: "Customer".into(),
            is_email_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mock connection answering the customer lookup and the three header inserts.
    fn header_rows(now: DateTime<Utc>) -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![customer_row(now)]])
            .append_query_results([vec![order::Model {
                id: 10,
                order_date: now,
                status: "Pending".into(),
                user_id: Some(4),
            }]])
            .append_query_results([vec![delivery::Model {
                id: 20,
                order_id: 10,
                address: "1 Main St".into(),
                estimated_delivery_time: now,
                delivery_user_id: None,
            }]])
            .append_query_results([vec![payment::Model {
                id: 30,
                order_id: 10,
                payment_method: "Card".into(),
                is_paid: false,
            }]])
    }

    fn draft(now: DateTime<Utc>, line: DraftLine) -> OrderDraft {
        OrderDraft::new(
            CustomerRef::Existing(4),
            "1 Main St".into(),
            PaymentMethod::Card,
            now,
        )
        .with_line(Some(line))
    }

    fn burger_line() -> DraftLine {
        DraftLine::Catalog {
            food_item_id: 3,
            food_item_name: "Burger".into(),
            quantity: 2,
            unit_price: Decimal::new(450, 2),
        }
    }

    #[tokio::test]
    async fn test_create_writes_whole_graph_in_one_transaction() {
        let now = Utc::now();
        let db = header_rows(now)
            .append_query_results([vec![order_item::Model {
                id: 40,
                order_id: 10,
                food_item_id: 3,
                quantity: 2,
                unit_price: Decimal::new(450, 2),
            }]])
            .into_connection();
        let store = OrderStore::new(db.clone());

        let details = store.create(draft(now, burger_line())).await.unwrap();

        assert_eq!(details.order.id, 10);
        assert_eq!(details.customer.as_ref().map(|c| c.id), Some(4));
        assert_eq!(details.delivery.order_id, 10);
        assert_eq!(details.payment.payment_method, PaymentMethod::Card);
        assert_eq!(details.items.len(), 1);
        assert_eq!(details.items[0].food_item_name, "Burger");
        assert_eq!(details.total(), Decimal::new(900, 2));

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let stmts = log[0].statements();
        assert_eq!(stmts.len(), 7);
        assert_eq!(stmts[0].sql, "BEGIN");
        assert!(stmts[1].sql.starts_with("SELECT"));
        assert!(inserts_into(&stmts[2], "orders"));
        assert!(inserts_into(&stmts[3], "deliveries"));
        assert!(inserts_into(&stmts[4], "payments"));
        assert!(inserts_into(&stmts[5], "order_items"));
        assert!(binds(&stmts[5], Value::from(Decimal::new(450, 2))));
        assert_eq!(stmts[6].sql, "COMMIT");
    }

    #[tokio::test]
    async fn test_special_request_files_placeholder_under_house_rows() {
        let now = Utc::now();
        let db = header_rows(now)
            .append_query_results([vec![restaurant::Model {
                id: 1,
                name: "Special Requests".into(),
                address: "In-house kitchen".into(),
                phone: "0000000000".into(),
                is_house: true,
            }]])
            .append_query_results([vec![category::Model {
                id: 2,
                name: "Special Requests".into(),
                is_house: true,
            }]])
            .append_query_results([vec![food_item::Model {
                id: 50,
                name: "Special Request".into(),
                description: Some("Extra spicy curry".into()),
                price: Decimal::ZERO,
                image_url: None,
                restaurant_id: 1,
                category_id: 2,
                is_special_request: true,
            }]])
            .append_query_results([vec![order_item::Model {
                id: 41,
                order_id: 10,
                food_item_id: 50,
                quantity: 1,
                unit_price: Decimal::ZERO,
            }]])
            .into_connection();
        let store = OrderStore::new(db.clone());
        let line = DraftLine::SpecialRequest {
            description: "Extra spicy curry".into(),
        };

        let details = store.create(draft(now, line)).await.unwrap();

        assert_eq!(details.items[0].food_item_name, "Special Request");
        assert_eq!(details.items[0].item.food_item_id, 50);
        assert_eq!(details.total(), Decimal::ZERO);

        let log = statements(db);
        let house = log
            .iter()
            .filter(|s| s.sql.contains(r#""is_house" = $"#))
            .count();
        assert_eq!(house, 2);
        assert!(!log.iter().any(|s| inserts_into(s, "restaurants")));
        assert!(!log.iter().any(|s| inserts_into(s, "categories")));

        let placeholder = log
            .iter()
            .find(|s| inserts_into(s, "food_items"))
            .unwrap();
        assert!(binds(placeholder, Value::from("Special Request")));
        assert!(binds(placeholder, Value::from("Extra spicy curry")));
        assert!(binds(placeholder, Value::from(true)));
        assert!(binds(placeholder, Value::from(2)));

        let line = log
            .iter()
            .find(|s| inserts_into(s, "order_items"))
            .unwrap();
        assert!(binds(line, Value::from(50)));
        assert!(binds(line, Value::from(1)));
        assert!(binds(line, Value::from(Decimal::ZERO)));
        assert_eq!(log.last().unwrap().sql, "COMMIT");
    }

    #[tokio::test]
    async fn test_missing_house_restaurant_rolls_back() {
        let now = Utc::now();
        let db = header_rows(now)
            .append_query_results([Vec::<restaurant::Model>::new()])
            .into_connection();
        let store = OrderStore::new(db.clone());
        let line = DraftLine::SpecialRequest {
            description: "Anything".into(),
        };

        let err = store.create(draft(now, line)).await.unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        let log = statements(db);
        assert!(!log.iter().any(|s| inserts_into(s, "food_items")));
        assert_eq!(log.last().unwrap().sql, "ROLLBACK");
    }

    #[tokio::test]
    async fn test_failed_line_insert_rolls_back_header_rows() {
        let now = Utc::now();
        let db = header_rows(now)
            .append_query_errors([DbErr::Custom("foreign key violation".into())])
            .into_connection();
        let store = OrderStore::new(db.clone());

        let result = store.create(draft(now, burger_line())).await;

        assert!(result.is_err());
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let stmts = log[0].statements();
        assert!(inserts_into(&stmts[2], "orders"));
        assert!(inserts_into(&stmts[5], "order_items"));
        assert_eq!(stmts.last().unwrap().sql, "ROLLBACK");
        assert!(!stmts.iter().any(|s| s.sql == "COMMIT"));
    }

    #[tokio::test]
    async fn test_unknown_customer_aborts_before_any_insert() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let store = OrderStore::new(db.clone());

        let err = store
            .create(draft(Utc::now(), burger_line()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
        let log = statements(db);
        assert!(!log.iter().any(|s| s.sql.starts_with("INSERT")));
        assert_eq!(log.last().unwrap().sql, "ROLLBACK");
    }
}
