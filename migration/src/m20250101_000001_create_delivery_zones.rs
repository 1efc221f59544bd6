use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliveryZone::Table)
                    .if_not_exists()
                    .col(pk_auto(DeliveryZone::Id))
                    .col(string_len(DeliveryZone::Name, 100).not_null().unique_key())
                    .col(ColumnDef::new(DeliveryZone::PolygonPoints).json_binary().null())
                    .col(boolean(DeliveryZone::IsActive).not_null().default(true))
                    .to_owned(),
            )
            .await?;

        // Seed name-only zones; polygons are drawn later from the back office
        let insert = Query::insert()
            .into_table(DeliveryZone::Table)
            .columns([DeliveryZone::Name])
            .values_panic(["Tibanga".into()])
            .values_panic(["Poblacion".into()])
            .values_panic(["Pala-o".into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryZone::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DeliveryZone {
    #[sea_orm(iden = "delivery_zones")]
    Table,
    Id,
    Name,
    PolygonPoints,
    IsActive,
}
