use async_trait::async_trait;
use sea_orm::DbErr;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use super::draft::CartLine;
use super::payload::OrderSubmission;
use super::ValidationError;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("{0}")]
    Rejected(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("failed to create order: {0}")]
    OrderHeader(#[source] SinkError),
    #[error("failed to save order items: {source}")]
    LineItems {
        #[source]
        source: SinkError,
        order_id: Uuid,
        /// Whether the compensating delete of the order header succeeded.
        rolled_back: bool,
    },
}

impl SubmissionError {
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            SubmissionError::OrderHeader(SinkError::Timeout(_))
                | SubmissionError::LineItems {
                    source: SinkError::Timeout(_),
                    ..
                }
        )
    }

    /// Everything past local validation is worth another try by the user.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SubmissionError::Invalid(_))
    }
}

/// Destination of a placed order. Header and line items are separate writes
/// with no transaction spanning them.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn insert_order(&self, order: &OrderSubmission) -> Result<Uuid, SinkError>;
    async fn insert_line_items(&self, order_id: Uuid, items: &[CartLine]) -> Result<(), SinkError>;
    async fn delete_order(&self, order_id: Uuid) -> Result<(), SinkError>;
}

async fn within<T, F>(timeout: Duration, fut: F) -> Result<T, SinkError>
where
    F: Future<Output = Result<T, SinkError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(SinkError::Timeout(timeout)),
    }
}

/// Insert the header, then the line items. If the items fail the header is
/// deleted again and the item error is returned.
pub async fn submit_order(
    sink: &dyn OrderSink,
    order: &OrderSubmission,
    timeout: Duration,
) -> Result<Uuid, SubmissionError> {
    let order_id = within(timeout, sink.insert_order(order))
        .await
        .map_err(SubmissionError::OrderHeader)?;

    tracing::debug!(%order_id, items = order.line_items.len(), "Order header inserted");

    if let Err(source) = within(timeout, sink.insert_line_items(order_id, &order.line_items)).await {
        tracing::warn!(%order_id, error = %source, "Failed to insert order items, rolling back order");

        let rolled_back = match within(timeout, sink.delete_order(order_id)).await {
            Ok(()) => true,
            Err(e) => {
                // TODO: queue orphaned headers for a cleanup job instead of only logging them
                tracing::error!(%order_id, error = %e, "Rollback failed, order header left without items");
                false
            }
        };

        return Err(SubmissionError::LineItems {
            source,
            order_id,
            rolled_back,
        });
    }

    Ok(order_id)
}
