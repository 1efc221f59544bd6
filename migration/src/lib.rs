pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_delivery_zones;
mod m20250101_000002_create_restaurants;
mod m20250101_000003_create_food_items;
mod m20250101_000004_create_orders;
mod m20250101_000005_create_order_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_delivery_zones::Migration),
            Box::new(m20250101_000002_create_restaurants::Migration),
            Box::new(m20250101_000003_create_food_items::Migration),
            Box::new(m20250101_000004_create_orders::Migration),
            Box::new(m20250101_000005_create_order_items::Migration),
        ]
    }
}
