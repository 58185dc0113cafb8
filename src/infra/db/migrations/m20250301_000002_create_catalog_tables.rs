//! Migration: Create restaurants, categories and food_items tables.
//!
//! Food items keep their restaurant and category alive (`RESTRICT`).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Restaurants::Address).string_len(200).not_null())
                    .col(ColumnDef::new(Restaurants::Phone).string_len(20).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FoodItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FoodItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FoodItems::Name).string_len(100).not_null())
                    .col(ColumnDef::new(FoodItems::Description).string_len(500).null())
                    .col(ColumnDef::new(FoodItems::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(FoodItems::ImageUrl).string().null())
                    .col(ColumnDef::new(FoodItems::RestaurantId).integer().not_null())
                    .col(ColumnDef::new(FoodItems::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_food_items_restaurant")
                            .from(FoodItems::Table, FoodItems::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_food_items_category")
                            .from(FoodItems::Table, FoodItems::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_food_items_restaurant_id")
                    .table(FoodItems::Table)
                    .col(FoodItems::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_food_items_category_id")
                    .table(FoodItems::Table)
                    .col(FoodItems::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoodItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Restaurants {
    Table,
    Id,
    Name,
    Address,
    Phone,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum FoodItems {
    Table,
    Id,
    Name,
    Description,
    Price,
    ImageUrl,
    RestaurantId,
    CategoryId,
}
