//! Catalog service - restaurants, categories and food items.
//!
//! Deletes are guarded: a restaurant or category that still owns food items
//! is kept and the caller gets a validation error.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use super::container::parallel;
use crate::domain::{
    Category, CategoryInput, CategoryMenu, FoodItem, FoodItemInput, Restaurant, RestaurantInput,
    RestaurantMenu,
};
use crate::errors::{format_validation_errors, AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_restaurants(&self) -> AppResult<Vec<Restaurant>>;
    async fn get_restaurant(&self, id: i32) -> AppResult<Restaurant>;
    async fn create_restaurant(&self, input: RestaurantInput) -> AppResult<Restaurant>;
    async fn update_restaurant(&self, id: i32, input: RestaurantInput) -> AppResult<Restaurant>;
    async fn delete_restaurant(&self, id: i32) -> AppResult<()>;
    /// Restaurant with its food items
    async fn restaurant_menu(&self, id: i32) -> AppResult<RestaurantMenu>;

    async fn list_categories(&self) -> AppResult<Vec<Category>>;
    async fn get_category(&self, id: i32) -> AppResult<Category>;
    async fn create_category(&self, input: CategoryInput) -> AppResult<Category>;
    async fn update_category(&self, id: i32, input: CategoryInput) -> AppResult<Category>;
    async fn delete_category(&self, id: i32) -> AppResult<()>;
    /// Category with its food items
    async fn category_menu(&self, id: i32) -> AppResult<CategoryMenu>;

    async fn list_food_items(&self) -> AppResult<Vec<FoodItem>>;
    async fn get_food_item(&self, id: i32) -> AppResult<FoodItem>;
    async fn create_food_item(&self, input: FoodItemInput) -> AppResult<FoodItem>;
    async fn update_food_item(&self, id: i32, input: FoodItemInput) -> AppResult<FoodItem>;
    async fn delete_food_item(&self, id: i32) -> AppResult<()>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Field validation plus existence of the referenced restaurant and
    /// category, reported together.
    async fn check_food_item(&self, input: &FoodItemInput) -> AppResult<()> {
        let mut messages = match input.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => format_validation_errors(&errors),
        };

        let catalog = self.uow.catalog();
        let (restaurant, category) = parallel::join2(
            catalog.find_restaurant(input.restaurant_id),
            catalog.find_category(input.category_id),
        )
        .await?;

        if restaurant.is_none() {
            messages.push("Restaurant does not exist.".to_string());
        }
        if category.is_none() {
            messages.push("Category does not exist.".to_string());
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_failed(messages))
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_restaurants(&self) -> AppResult<Vec<Restaurant>> {
        self.uow.catalog().list_restaurants().await
    }

    async fn get_restaurant(&self, id: i32) -> AppResult<Restaurant> {
        self.uow.catalog().find_restaurant(id).await?.ok_or_not_found()
    }

    async fn create_restaurant(&self, input: RestaurantInput) -> AppResult<Restaurant> {
        input.validate()?;
        self.uow.catalog().create_restaurant(input).await
    }

    async fn update_restaurant(&self, id: i32, input: RestaurantInput) -> AppResult<Restaurant> {
        input.validate()?;
        self.uow.catalog().update_restaurant(id, input).await
    }

    async fn delete_restaurant(&self, id: i32) -> AppResult<()> {
        let catalog = self.uow.catalog();
        catalog.find_restaurant(id).await?.ok_or_not_found()?;

        if catalog.count_food_items_by_restaurant(id).await? > 0 {
            return Err(AppError::validation(
                "Cannot delete restaurant with existing food items.",
            ));
        }

        catalog.delete_restaurant(id).await
    }

    async fn restaurant_menu(&self, id: i32) -> AppResult<RestaurantMenu> {
        let catalog = self.uow.catalog();
        let (restaurant, food_items) = parallel::join2(
            catalog.find_restaurant(id),
            catalog.list_food_items_by_restaurant(id),
        )
        .await?;

        Ok(RestaurantMenu {
            restaurant: restaurant.ok_or_not_found()?,
            food_items,
        })
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.catalog().list_categories().await
    }

    async fn get_category(&self, id: i32) -> AppResult<Category> {
        self.uow.catalog().find_category(id).await?.ok_or_not_found()
    }

    async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        input.validate()?;
        self.uow.catalog().create_category(input).await
    }

    async fn update_category(&self, id: i32, input: CategoryInput) -> AppResult<Category> {
        input.validate()?;
        self.uow.catalog().update_category(id, input).await
    }

    async fn delete_category(&self, id: i32) -> AppResult<()> {
        let catalog = self.uow.catalog();
        catalog.find_category(id).await?.ok_or_not_found()?;

        if catalog.count_food_items_by_category(id).await? > 0 {
            return Err(AppError::validation(
                "Cannot delete category with existing food items.",
            ));
        }

        catalog.delete_category(id).await
    }

    async fn category_menu(&self, id: i32) -> AppResult<CategoryMenu> {
        let catalog = self.uow.catalog();
        let (category, food_items) = parallel::join2(
            catalog.find_category(id),
            catalog.list_food_items_by_category(id),
        )
        .await?;

        Ok(CategoryMenu {
            category: category.ok_or_not_found()?,
            food_items,
        })
    }

    async fn list_food_items(&self) -> AppResult<Vec<FoodItem>> {
        self.uow.catalog().list_food_items().await
    }

    async fn get_food_item(&self, id: i32) -> AppResult<FoodItem> {
        self.uow.catalog().find_food_item(id).await?.ok_or_not_found()
    }

    async fn create_food_item(&self, input: FoodItemInput) -> AppResult<FoodItem> {
        self.check_food_item(&input).await?;
        self.uow.catalog().create_food_item(input).await
    }

    async fn update_food_item(&self, id: i32, input: FoodItemInput) -> AppResult<FoodItem> {
        self.check_food_item(&input).await?;
        self.uow.catalog().update_food_item(id, input).await
    }

    async fn delete_food_item(&self, id: i32) -> AppResult<()> {
        self.uow.catalog().delete_food_item(id).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::infra::repositories::MockCatalogRepository;
    use crate::services::testing::TestUnitOfWork;

    fn pizza() -> Category {
        Category { id: 2, name: "Pizza".into() }
    }

    fn margherita_input() -> FoodItemInput {
        FoodItemInput {
            name: "Margherita".into(),
            description: None,
            price: Decimal::new(990, 2),
            image_url: None,
            restaurant_id: 1,
            category_id: 2,
        }
    }

    #[tokio::test]
    async fn test_delete_category_with_food_items_is_refused() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_category().with(eq(2)).returning(|_| Ok(Some(pizza())));
        catalog.expect_count_food_items_by_category().with(eq(2)).returning(|_| Ok(3));
        catalog.expect_delete_category().never();

        let service = CatalogManager::new(TestUnitOfWork::new().with_catalog(catalog).into_arc());
        let err = service.delete_category(2).await.unwrap_err();

        assert_eq!(err.to_string(), "Cannot delete category with existing food items.");
    }

    #[tokio::test]
    async fn test_delete_empty_category() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_category().returning(|_| Ok(Some(pizza())));
        catalog.expect_count_food_items_by_category().returning(|_| Ok(0));
        catalog.expect_delete_category().with(eq(2)).times(1).returning(|_| Ok(()));

        let service = CatalogManager::new(TestUnitOfWork::new().with_catalog(catalog).into_arc());
        assert!(service.delete_category(2).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_restaurant_is_not_found() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_restaurant().returning(|_| Ok(None));
        catalog.expect_count_food_items_by_restaurant().never();

        let service = CatalogManager::new(TestUnitOfWork::new().with_catalog(catalog).into_arc());
        assert!(matches!(service.delete_restaurant(9).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_food_item_requires_existing_parents() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_restaurant().returning(|_| Ok(None));
        catalog.expect_find_category().returning(|_| Ok(Some(pizza())));
        catalog.expect_create_food_item().never();

        let service = CatalogManager::new(TestUnitOfWork::new().with_catalog(catalog).into_arc());
        let err = service.create_food_item(margherita_input()).await.unwrap_err();

        assert!(err.to_string().contains("Restaurant does not exist."));
    }

    #[tokio::test]
    async fn test_create_restaurant_validates_phone() {
        let service = CatalogManager::new(TestUnitOfWork::new().into_arc());
        let input = RestaurantInput {
            name: "Luigi's".into(),
            address: "12 Harbour Street".into(),
            phone: "call me".into(),
        };

        let err = service.create_restaurant(input).await.unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: Invalid phone number.");
    }

    #[tokio::test]
    async fn test_category_menu_lists_items() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_category().returning(|_| Ok(Some(pizza())));
        catalog.expect_list_food_items_by_category().with(eq(2)).returning(|_| {
            Ok(vec![FoodItem {
                id: 1,
                name: "Margherita".into(),
                description: None,
                price: Decimal::new(990, 2),
                image_url: None,
                restaurant_id: 1,
                category_id: 2,
            }])
        });

        let service = CatalogManager::new(TestUnitOfWork::new().with_catalog(catalog).into_arc());
        let menu = service.category_menu(2).await.unwrap();

        assert_eq!(menu.category.name, "Pizza");
        assert_eq!(menu.food_items.len(), 1);
    }
}
