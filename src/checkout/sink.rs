use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::draft::CartLine;
use super::payload::OrderSubmission;
use super::submit::{OrderSink, SinkError};
use crate::entities::{order, order_item};

/// Writes orders to the `orders` / `order_items` tables, one statement per call.
#[derive(Clone)]
pub struct SeaOrmOrderSink {
    db: DatabaseConnection,
}

impl SeaOrmOrderSink {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderSink for SeaOrmOrderSink {
    async fn insert_order(&self, o: &OrderSubmission) -> Result<Uuid, SinkError> {
        let header = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(o.customer_id),
            restaurant_id: Set(o.assigned_fulfillment_point_id),
            subtotal: Set(o.subtotal),
            delivery_fee: Set(o.delivery_fee),
            total: Set(o.total),
            shipping_address: Set(o.shipping_address.clone()),
            contact_name: Set(o.contact_name.clone()),
            contact_phone: Set(o.contact_phone.clone()),
            payment_method: Set(o.payment_method.as_str().to_string()),
            status: Set(o.status),
            latitude: Set(o.coordinate.map(|c| c.latitude())),
            longitude: Set(o.coordinate.map(|c| c.longitude())),
            distance_km: Set(o.distance_km),
            eta_minutes: Set(o.eta_minutes),
            ..Default::default()
        };

        let inserted = header.insert(&self.db).await?;
        Ok(inserted.id)
    }

    async fn insert_line_items(&self, order_id: Uuid, items: &[CartLine]) -> Result<(), SinkError> {
        if items.is_empty() {
            return Err(SinkError::Rejected("order has no line items".to_string()));
        }

        let rows = items.iter().map(|item| order_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            food_item_id: Set(item.food_item_id),
            name: Set(item.name.clone()),
            price: Set(item.price),
            quantity: Set(item.quantity),
        });

        order_item::Entity::insert_many(rows).exec(&self.db).await?;
        Ok(())
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<(), SinkError> {
        let result = order::Entity::delete_by_id(order_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(SinkError::Rejected(format!("order {order_id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::draft::PaymentMethod;
    use crate::orders::OrderStatus;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn deleted(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_empty_line_items_are_rejected() {
        let sink = SeaOrmOrderSink::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let err = sink.insert_line_items(Uuid::new_v4(), &[]).await.unwrap_err();

        assert!(matches!(err, SinkError::Rejected(msg) if msg == "order has no line items"));
    }

    #[tokio::test]
    async fn test_delete_missing_order_is_an_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([deleted(0)])
            .into_connection();
        let sink = SeaOrmOrderSink::new(db);
        let order_id = Uuid::new_v4();

        let err = sink.delete_order(order_id).await.unwrap_err();

        assert!(matches!(err, SinkError::Rejected(msg) if msg == format!("order {order_id} not found")));
    }

    #[tokio::test]
    async fn test_delete_existing_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([deleted(1)])
            .into_connection();
        let sink = SeaOrmOrderSink::new(db);

        assert!(sink.delete_order(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_insert_order_returns_stored_id() {
        let customer_id = Uuid::new_v4();
        let stored = order::Model {
            id: Uuid::new_v4(),
            user_id: customer_id,
            restaurant_id: None,
            subtotal: 250.0,
            delivery_fee: 50.0,
            total: 300.0,
            shipping_address: "Tibanga • Purok 3".to_string(),
            contact_name: "Ana Cruz".to_string(),
            contact_phone: "09171234567".to_string(),
            payment_method: "COD".to_string(),
            status: OrderStatus::Pending,
            latitude: None,
            longitude: None,
            distance_km: None,
            eta_minutes: None,
            created_at: Utc::now().fixed_offset(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let sink = SeaOrmOrderSink::new(db);
        let submission = OrderSubmission {
            customer_id,
            subtotal: 250.0,
            delivery_fee: 50.0,
            total: 300.0,
            shipping_address: "Tibanga • Purok 3".to_string(),
            contact_name: "Ana Cruz".to_string(),
            contact_phone: "09171234567".to_string(),
            payment_method: PaymentMethod::Cod,
            status: OrderStatus::Pending,
            coordinate: None,
            distance_km: None,
            eta_minutes: None,
            assigned_fulfillment_point_id: None,
            line_items: vec![],
        };

        let id = sink.insert_order(&submission).await.unwrap();

        assert_eq!(id, stored.id);
    }
}
