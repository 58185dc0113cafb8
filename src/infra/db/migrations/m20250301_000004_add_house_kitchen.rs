//! Migration: Seed the house restaurant and category.
//!
//! Special request placeholders are filed under one flagged restaurant and
//! category. Both rows are created here, once; a partial unique index keeps
//! them single. Placeholder food items are flagged so menus can skip them.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use crate::config::{
    SPECIAL_REQUEST_CATEGORY_NAME, SPECIAL_REQUEST_RESTAURANT_ADDRESS,
    SPECIAL_REQUEST_RESTAURANT_NAME, SPECIAL_REQUEST_RESTAURANT_PHONE,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn seed_error(e: impl std::fmt::Display) -> DbErr {
    DbErr::Migration(format!("Failed to build seed statement: {}", e))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Restaurants::Table)
                    .add_column(
                        ColumnDef::new(Restaurants::IsHouse)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Categories::Table)
                    .add_column(
                        ColumnDef::new(Categories::IsHouse)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(FoodItems::Table)
                    .add_column(
                        ColumnDef::new(FoodItems::IsSpecialRequest)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        db.execute_unprepared(
            "CREATE UNIQUE INDEX idx_restaurants_single_house ON restaurants (is_house) \
             WHERE is_house",
        )
        .await?;
        db.execute_unprepared(
            "CREATE UNIQUE INDEX idx_categories_single_house ON categories (is_house) \
             WHERE is_house",
        )
        .await?;

        let restaurant = Query::insert()
            .into_table(Restaurants::Table)
            .columns([
                Restaurants::Name,
                Restaurants::Address,
                Restaurants::Phone,
                Restaurants::IsHouse,
            ])
            .values([
                SPECIAL_REQUEST_RESTAURANT_NAME.into(),
                SPECIAL_REQUEST_RESTAURANT_ADDRESS.into(),
                SPECIAL_REQUEST_RESTAURANT_PHONE.into(),
                true.into(),
            ])
            .map_err(seed_error)?
            .to_owned();
        manager.exec_stmt(restaurant).await?;

        let category = Query::insert()
            .into_table(Categories::Table)
            .columns([Categories::Name, Categories::IsHouse])
            .values([SPECIAL_REQUEST_CATEGORY_NAME.into(), true.into()])
            .map_err(seed_error)?
            .to_owned();
        manager.exec_stmt(category).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Placeholder items and any order lines pointing at them go first
        let db = manager.get_connection();
        db.execute_unprepared(
            "DELETE FROM order_items WHERE food_item_id IN \
             (SELECT id FROM food_items WHERE is_special_request)",
        )
        .await?;
        db.execute_unprepared("DELETE FROM food_items WHERE is_special_request")
            .await?;
        db.execute_unprepared("DELETE FROM restaurants WHERE is_house")
            .await?;
        db.execute_unprepared("DELETE FROM categories WHERE is_house")
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(FoodItems::Table)
                    .drop_column(FoodItems::IsSpecialRequest)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Categories::Table)
                    .drop_column(Categories::IsHouse)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Restaurants::Table)
                    .drop_column(Restaurants::IsHouse)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Restaurants {
    Table,
    Name,
    Address,
    Phone,
    IsHouse,
}

#[derive(Iden)]
enum Categories {
    Table,
    Name,
    IsHouse,
}

#[derive(Iden)]
enum FoodItems {
    Table,
    IsSpecialRequest,
}
