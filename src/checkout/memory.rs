use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::draft::CartLine;
use super::payload::OrderSubmission;
use super::submit::{OrderSink, SinkError};

/// Which sink calls should fail, for exercising the rollback path.
#[derive(Debug, Clone, Default)]
pub struct SinkFailures {
    pub order_header: bool,
    pub line_items: bool,
    pub delete: bool,
    pub line_items_delay: Option<Duration>,
}

#[derive(Default)]
pub struct InMemoryOrderSink {
    orders: RwLock<HashMap<Uuid, OrderSubmission>>,
    items: RwLock<HashMap<Uuid, Vec<CartLine>>>,
    failures: SinkFailures,
}

impl InMemoryOrderSink {
    pub fn with_failures(failures: SinkFailures) -> Self {
        Self {
            failures,
            ..Default::default()
        }
    }

    pub async fn order(&self, id: Uuid) -> Option<OrderSubmission> {
        self.orders.read().await.get(&id).cloned()
    }

    pub async fn items(&self, id: Uuid) -> Vec<CartLine> {
        self.items.read().await.get(&id).cloned().unwrap_or_default()
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait::async_trait]
impl OrderSink for InMemoryOrderSink {
    async fn insert_order(&self, order: &OrderSubmission) -> Result<Uuid, SinkError> {
        if self.failures.order_header {
            return Err(SinkError::Rejected("orders insert rejected".to_string()));
        }
        let id = Uuid::new_v4();
        self.orders.write().await.insert(id, order.clone());
        Ok(id)
    }

    async fn insert_line_items(&self, order_id: Uuid, items: &[CartLine]) -> Result<(), SinkError> {
        if let Some(delay) = self.failures.line_items_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failures.line_items {
            return Err(SinkError::Rejected("order_items insert rejected".to_string()));
        }
        self.items.write().await.insert(order_id, items.to_vec());
        Ok(())
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<(), SinkError> {
        if self.failures.delete {
            return Err(SinkError::Rejected("orders delete rejected".to_string()));
        }
        self.orders.write().await.remove(&order_id);
        Ok(())
    }
}
