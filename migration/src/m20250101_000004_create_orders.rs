use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250101_000002_create_restaurants::Restaurant;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(OrderStatus::Enum)
                    .values([
                        OrderStatus::Pending,
                        OrderStatus::Preparing,
                        OrderStatus::DriverAssigned,
                        OrderStatus::OutForDelivery,
                        OrderStatus::Delivered,
                        OrderStatus::Completed,
                        OrderStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(uuid(Order::Id).primary_key())
                    .col(uuid(Order::UserId).not_null())
                    .col(uuid_null(Order::RestaurantId))
                    .col(double(Order::Subtotal).not_null())
                    .col(double(Order::DeliveryFee).not_null())
                    .col(double(Order::Total).not_null())
                    .col(text(Order::ShippingAddress).not_null())
                    .col(string_len(Order::ContactName, 100).not_null())
                    .col(string_len(Order::ContactPhone, 32).not_null())
                    .col(string_len(Order::PaymentMethod, 20).not_null())
                    .col(
                        ColumnDef::new(Order::Status)
                            .custom(OrderStatus::Enum)
                            .not_null()
                            .default("pending"),
                    )
                    .col(double_null(Order::Latitude))
                    .col(double_null(Order::Longitude))
                    .col(double_null(Order::DistanceKm))
                    .col(integer_null(Order::EtaMinutes))
                    .col(
                        timestamp_with_time_zone(Order::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_restaurant")
                            .from(Order::Table, Order::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_user_id")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(OrderStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Order {
    #[sea_orm(iden = "orders")]
    Table,
    Id,
    UserId,
    RestaurantId,
    Subtotal,
    DeliveryFee,
    Total,
    ShippingAddress,
    ContactName,
    ContactPhone,
    PaymentMethod,
    Status,
    Latitude,
    Longitude,
    DistanceKm,
    EtaMinutes,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum OrderStatus {
    #[sea_orm(iden = "order_status")]
    Enum,
    #[sea_orm(iden = "pending")]
    Pending,
    #[sea_orm(iden = "preparing")]
    Preparing,
    #[sea_orm(iden = "driver_assigned")]
    DriverAssigned,
    #[sea_orm(iden = "out_for_delivery")]
    OutForDelivery,
    #[sea_orm(iden = "delivered")]
    Delivered,
    #[sea_orm(iden = "completed")]
    Completed,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}
