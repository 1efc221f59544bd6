use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(uuid(Restaurant::Id).primary_key())
                    .col(uuid_null(Restaurant::OwnerId))
                    .col(string_len(Restaurant::Name, 150).not_null())
                    .col(text_null(Restaurant::Address))
                    .col(text_null(Restaurant::ImageUrl))
                    .col(string_len_null(Restaurant::Lat, 32))
                    .col(string_len_null(Restaurant::Lng, 32))
                    .col(boolean(Restaurant::IsActive).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(Restaurant::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurants_owner_id")
                    .table(Restaurant::Table)
                    .col(Restaurant::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Restaurant {
    #[sea_orm(iden = "restaurants")]
    Table,
    Id,
    OwnerId,
    Name,
    Address,
    ImageUrl,
    Lat,
    Lng,
    IsActive,
    CreatedAt,
}
