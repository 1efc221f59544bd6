use sea_orm_migration::{prelude::*, schema::*};

use super::m20250101_000002_create_restaurants::Restaurant;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FoodItem::Table)
                    .if_not_exists()
                    .col(uuid(FoodItem::Id).primary_key())
                    .col(uuid(FoodItem::RestaurantId).not_null())
                    .col(string_len(FoodItem::Name, 150).not_null())
                    .col(text_null(FoodItem::Description))
                    .col(double(FoodItem::Price).not_null())
                    .col(text_null(FoodItem::ImageUrl))
                    .col(boolean(FoodItem::IsAvailable).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(FoodItem::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_food_item_restaurant")
                            .from(FoodItem::Table, FoodItem::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoodItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FoodItem {
    #[sea_orm(iden = "food_items")]
    Table,
    Id,
    RestaurantId,
    Name,
    Description,
    Price,
    ImageUrl,
    IsAvailable,
    CreatedAt,
}
