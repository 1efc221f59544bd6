use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{order, order_item, restaurant};
use crate::error::{AppError, AppResult};
use crate::orders::{OrderStatus, StatusTransitionError};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub food_item_id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub status: OrderStatus,
    pub next_status: Option<OrderStatus>,
    pub can_cancel: bool,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub shipping_address: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub payment_method: String,
    pub distance_km: Option<f64>,
    pub eta_minutes: Option<i32>,
    pub restaurant_name: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
}

pub fn order_response(
    o: order::Model,
    items: &[order_item::Model],
    restaurants: &[restaurant::Model],
) -> OrderResponse {
    let restaurant_name = o
        .restaurant_id
        .and_then(|rid| restaurants.iter().find(|r| r.id == rid))
        .map(|r| r.name.clone());

    let items = items
        .iter()
        .filter(|i| i.order_id == o.id)
        .map(|i| OrderItemResponse {
            food_item_id: i.food_item_id,
            name: i.name.clone(),
            price: i.price,
            quantity: i.quantity,
        })
        .collect();

    OrderResponse {
        id: o.id,
        status: o.status,
        next_status: o.status.next(),
        can_cancel: o.status.can_cancel(),
        subtotal: o.subtotal,
        delivery_fee: o.delivery_fee,
        total: o.total,
        shipping_address: o.shipping_address,
        contact_name: o.contact_name,
        contact_phone: o.contact_phone,
        payment_method: o.payment_method,
        distance_km: o.distance_km,
        eta_minutes: o.eta_minutes,
        restaurant_name,
        items,
        created_at: o.created_at.with_timezone(&Utc),
    }
}

/// Orders are only visible to the customer who placed them
async fn find_own_order(state: &AppState, order_id: Uuid, user_id: Uuid) -> AppResult<order::Model> {
    order::Entity::find_by_id(order_id)
        .filter(order::Column::UserId.eq(user_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

async fn load_details(state: &AppState, o: order::Model) -> AppResult<OrderResponse> {
    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(o.id))
        .all(&state.db)
        .await?;
    let restaurants = match o.restaurant_id {
        Some(rid) => restaurant::Entity::find_by_id(rid)
            .all(&state.db)
            .await?,
        None => Vec::new(),
    };

    Ok(order_response(o, &items, &restaurants))
}

/// Apply a guarded transition. The write only lands while the row still holds
/// the status that was checked, so concurrent moves cannot both succeed.
pub(crate) async fn set_status(
    db: &DatabaseConnection,
    o: order::Model,
    to: OrderStatus,
) -> AppResult<order::Model> {
    let from = o.status;
    let status = from.transition(to)?;

    let result = order::Entity::update_many()
        .col_expr(order::Column::Status, status.as_enum())
        .filter(order::Column::Id.eq(o.id))
        .filter(order::Column::Status.eq(from))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!(order_id = %o.id, %from, to = %status, "Order status changed concurrently");
        return Err(StatusTransitionError::Stale(from).into());
    }

    tracing::info!(order_id = %o.id, %from, to = %status, "Order status changed");
    Ok(order::Model { status, ..o })
}

/// Order history, newest first
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = order::Entity::find()
        .filter(order::Column::UserId.eq(claims.sub))
        .order_by_desc(order::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .all(&state.db)
        .await?;
    let restaurants = restaurant::Entity::find().all(&state.db).await?;

    let responses = orders
        .into_iter()
        .map(|o| order_response(o, &items, &restaurants))
        .collect();

    Ok(Json(responses))
}

/// Tracking view of one order
pub async fn get_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let o = find_own_order(&state, order_id, claims.sub).await?;
    Ok(Json(load_details(&state, o).await?))
}

/// Cancel an order the kitchen has not handed over yet
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let o = find_own_order(&state, order_id, claims.sub).await?;
    let updated = set_status(&state.db, o, OrderStatus::Cancelled).await?;
    Ok(Json(load_details(&state, updated).await?))
}

/// Customer confirms a delivered order
pub async fn confirm_received(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let o = find_own_order(&state, order_id, claims.sub).await?;
    if o.status != OrderStatus::Delivered {
        return Err(StatusTransitionError::NotAllowed {
            from: o.status,
            to: OrderStatus::Completed,
        }
        .into());
    }

    let updated = set_status(&state.db, o, OrderStatus::Completed).await?;
    Ok(Json(load_details(&state, updated).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn preparing_order() -> order::Model {
        order::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            restaurant_id: None,
            subtotal: 250.0,
            delivery_fee: 50.0,
            total: 300.0,
            shipping_address: "Tibanga • Purok 3".to_string(),
            contact_name: "Ana Cruz".to_string(),
            contact_phone: "09171234567".to_string(),
            payment_method: "COD".to_string(),
            status: OrderStatus::Preparing,
            latitude: None,
            longitude: None,
            distance_km: Some(3.2),
            eta_minutes: Some(8),
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn db_with_rows_affected(rows_affected: u64) -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected,
            }])
            .into_connection()
    }

    #[tokio::test]
    async fn test_set_status_moves_order() {
        let db = db_with_rows_affected(1);
        let o = preparing_order();
        let id = o.id;

        let updated = set_status(&db, o, OrderStatus::DriverAssigned).await.unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.status, OrderStatus::DriverAssigned);
    }

    #[tokio::test]
    async fn test_set_status_loses_race_to_concurrent_move() {
        // The owner already handed the order to a driver; the cancel matches no row
        let db = db_with_rows_affected(0);

        let err = set_status(&db, preparing_order(), OrderStatus::Cancelled)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::StatusTransition(StatusTransitionError::Stale(OrderStatus::Preparing))
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_set_status_rejects_before_writing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = set_status(&db, preparing_order(), OrderStatus::Delivered)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::StatusTransition(StatusTransitionError::NotAllowed { .. })
        ));
    }
}
