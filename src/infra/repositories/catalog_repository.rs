//! Restaurant, category and food item persistence.
//!
//! The house restaurant and category, and the special request placeholders
//! filed under them, are invisible here: they are never listed, fetched,
//! edited or deleted through the catalog.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::entities::{category, food_item, restaurant};
use crate::domain::{
    Category, CategoryInput, FoodItem, FoodItemInput, Restaurant, RestaurantInput,
};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // === Restaurants ===
    async fn list_restaurants(&self) -> AppResult<Vec<Restaurant>>;
    async fn find_restaurant(&self, id: i32) -> AppResult<Option<Restaurant>>;
    async fn create_restaurant(&self, input: RestaurantInput) -> AppResult<Restaurant>;
    async fn update_restaurant(&self, id: i32, input: RestaurantInput) -> AppResult<Restaurant>;
    async fn delete_restaurant(&self, id: i32) -> AppResult<()>;

    // === Categories ===
    async fn list_categories(&self) -> AppResult<Vec<Category>>;
    async fn find_category(&self, id: i32) -> AppResult<Option<Category>>;
    async fn create_category(&self, input: CategoryInput) -> AppResult<Category>;
    async fn update_category(&self, id: i32, input: CategoryInput) -> AppResult<Category>;
    async fn delete_category(&self, id: i32) -> AppResult<()>;

    // === Food items ===
    async fn list_food_items(&self) -> AppResult<Vec<FoodItem>>;
    async fn list_food_items_by_restaurant(&self, restaurant_id: i32) -> AppResult<Vec<FoodItem>>;
    async fn list_food_items_by_category(&self, category_id: i32) -> AppResult<Vec<FoodItem>>;
    async fn count_food_items_by_restaurant(&self, restaurant_id: i32) -> AppResult<u64>;
    async fn count_food_items_by_category(&self, category_id: i32) -> AppResult<u64>;
    async fn find_food_item(&self, id: i32) -> AppResult<Option<FoodItem>>;
    async fn create_food_item(&self, input: FoodItemInput) -> AppResult<FoodItem>;
    async fn update_food_item(&self, id: i32, input: FoodItemInput) -> AppResult<FoodItem>;
    async fn delete_food_item(&self, id: i32) -> AppResult<()>;
}

pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn restaurants() -> Select<restaurant::Entity> {
    restaurant::Entity::find().filter(restaurant::Column::IsHouse.eq(false))
}

fn categories() -> Select<category::Entity> {
    category::Entity::find().filter(category::Column::IsHouse.eq(false))
}

fn food_items() -> Select<food_item::Entity> {
    food_item::Entity::find().filter(food_item::Column::IsSpecialRequest.eq(false))
}

fn ensure_deleted(rows_affected: u64) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn list_restaurants(&self) -> AppResult<Vec<Restaurant>> {
        let models = restaurants()
            .order_by_asc(restaurant::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Restaurant::from).collect())
    }

    async fn find_restaurant(&self, id: i32) -> AppResult<Option<Restaurant>> {
        let result = restaurants()
            .filter(restaurant::Column::Id.eq(id))
            .one(&self.db)
            .await?;
        Ok(result.map(Restaurant::from))
    }

    async fn create_restaurant(&self, input: RestaurantInput) -> AppResult<Restaurant> {
        let model = restaurant::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            phone: Set(input.phone),
            is_house: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(Restaurant::from(model))
    }

    async fn update_restaurant(&self, id: i32, input: RestaurantInput) -> AppResult<Restaurant> {
        let existing = restaurants()
            .filter(restaurant::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: restaurant::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.address = Set(input.address);
        active.phone = Set(input.phone);

        let model = active.update(&self.db).await?;
        Ok(Restaurant::from(model))
    }

    async fn delete_restaurant(&self, id: i32) -> AppResult<()> {
        let result = restaurant::Entity::delete_many()
            .filter(restaurant::Column::Id.eq(id))
            .filter(restaurant::Column::IsHouse.eq(false))
            .exec(&self.db)
            .await?;
        ensure_deleted(result.rows_affected)
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let models = categories()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_category(&self, id: i32) -> AppResult<Option<Category>> {
        let result = categories()
            .filter(category::Column::Id.eq(id))
            .one(&self.db)
            .await?;
        Ok(result.map(Category::from))
    }

    async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        let model = category::ActiveModel {
            name: Set(input.name),
            is_house: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(Category::from(model))
    }

    async fn update_category(&self, id: i32, input: CategoryInput) -> AppResult<Category> {
        let existing = categories()
            .filter(category::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(input.name);

        let model = active.update(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn delete_category(&self, id: i32) -> AppResult<()> {
        let result = category::Entity::delete_many()
            .filter(category::Column::Id.eq(id))
            .filter(category::Column::IsHouse.eq(false))
            .exec(&self.db)
            .await?;
        ensure_deleted(result.rows_affected)
    }

    async fn list_food_items(&self) -> AppResult<Vec<FoodItem>> {
        let models = food_items()
            .order_by_asc(food_item::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(FoodItem::from).collect())
    }

    async fn list_food_items_by_restaurant(&self, restaurant_id: i32) -> AppResult<Vec<FoodItem>> {
        let models = food_items()
            .filter(food_item::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(food_item::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(FoodItem::from).collect())
    }

    async fn list_food_items_by_category(&self, category_id: i32) -> AppResult<Vec<FoodItem>> {
        let models = food_items()
            .filter(food_item::Column::CategoryId.eq(category_id))
            .order_by_asc(food_item::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(FoodItem::from).collect())
    }

    async fn count_food_items_by_restaurant(&self, restaurant_id: i32) -> AppResult<u64> {
        let count = food_item::Entity::find()
            .filter(food_item::Column::RestaurantId.eq(restaurant_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn count_food_items_by_category(&self, category_id: i32) -> AppResult<u64> {
        let count = food_item::Entity::find()
            .filter(food_item::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn find_food_item(&self, id: i32) -> AppResult<Option<FoodItem>> {
        let result = food_items()
            .filter(food_item::Column::Id.eq(id))
            .one(&self.db)
            .await?;
        Ok(result.map(FoodItem::from))
    }

    async fn create_food_item(&self, input: FoodItemInput) -> AppResult<FoodItem> {
        let model = food_item::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            image_url: Set(input.image_url),
            restaurant_id: Set(input.restaurant_id),
            category_id: Set(input.category_id),
            is_special_request: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(FoodItem::from(model))
    }

    async fn update_food_item(&self, id: i32, input: FoodItemInput) -> AppResult<FoodItem> {
        let existing = food_items()
            .filter(food_item::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: food_item::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.image_url = Set(input.image_url);
        active.restaurant_id = Set(input.restaurant_id);
        active.category_id = Set(input.category_id);

        let model = active.update(&self.db).await?;
        Ok(FoodItem::from(model))
    }

    async fn delete_food_item(&self, id: i32) -> AppResult<()> {
        let result = food_item::Entity::delete_many()
            .filter(food_item::Column::Id.eq(id))
            .filter(food_item::Column::IsSpecialRequest.eq(false))
            .exec(&self.db)
            .await?;
        ensure_deleted(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Statement, Value};

    use super::*;

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

    #[tokio::test]
    async fn test_public_listing_skips_special_request_items() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<food_item::Model>::new()])
            .into_connection();
        let store = CatalogStore::new(db.clone());

        assert!(store.list_food_items().await.unwrap().is_empty());

        let log = statements(db);
        assert_eq!(log.len(), 1);
        assert!(log[0].sql.contains(r#""is_special_request" = $"#));
        assert!(binds(&log[0], Value::from(false)));
    }

    #[tokio::test]
    async fn test_special_request_item_is_not_found_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<food_item::Model>::new()])
            .into_connection();
        let store = CatalogStore::new(db.clone());

        assert!(store.find_food_item(9).await.unwrap().is_none());

        let log = statements(db);
        assert!(log[0].sql.contains(r#""is_special_request" = $"#));
        assert!(binds(&log[0], Value::from(9)));
    }

    #[tokio::test]
    async fn test_menus_skip_special_request_items() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<food_item::Model>::new()])
            .append_query_results([Vec::<food_item::Model>::new()])
            .into_connection();
        let store = CatalogStore::new(db.clone());

        store.list_food_items_by_restaurant(1).await.unwrap();
        store.list_food_items_by_category(1).await.unwrap();

        for statement in statements(db) {
            assert!(statement.sql.contains(r#""is_special_request" = $"#));
        }
    }

    #[tokio::test]
    async fn test_house_restaurant_cannot_be_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let store = CatalogStore::new(db.clone());

        let err = store.delete_restaurant(1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        let log = statements(db);
        assert!(log[0].sql.starts_with("DELETE"));
        assert!(log[0].sql.contains(r#""is_house" = $"#));
    }

    #[tokio::test]
    async fn test_house_category_is_hidden_from_listing() {
        let visible = category::Model {
            id: 2,
            name: "Pizza".into(),
            is_house: false,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![visible]])
            .into_connection();
        let store = CatalogStore::new(db.clone());

        let categories = store.list_categories().await.unwrap();
        assert_eq!(categories.len(), 1);

        let log = statements(db);
        assert!(log[0].sql.contains(r#""is_house" = $"#));
    }
}
