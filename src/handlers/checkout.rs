use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::load_snapshot;
use crate::checkout::{
    CartLine, CheckoutOrchestrator, FormField, LocationSignal, OrderConfirmation, PaymentMethod,
    SeaOrmOrderSink,
};
use crate::delivery::DeliveryAssessment;
use crate::entities::food_item;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    #[serde(default)]
    pub signal: LocationSignal,
    pub area_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub area_name: String,
    pub formatted_address: Option<String>,
    #[serde(flatten)]
    pub assessment: DeliveryAssessment,
}

#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub food_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub contact_name: String,
    pub contact_phone: String,
    pub area_name: String,
    pub street_detail: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub location: LocationSignal,
    pub items: Vec<CartItemRequest>,
}

/// Price the cart from the menu rather than trusting client prices
async fn resolve_cart(db: &DatabaseConnection, items: &[CartItemRequest]) -> AppResult<Vec<CartLine>> {
    if let Some(bad) = items.iter().find(|i| i.quantity < 1) {
        return Err(AppError::BadRequest(format!(
            "Quantity for item {} must be at least 1",
            bad.food_item_id
        )));
    }

    let ids: Vec<Uuid> = items.iter().map(|i| i.food_item_id).collect();
    let menu: HashMap<Uuid, food_item::Model> = food_item::Entity::find()
        .filter(food_item::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();

    items
        .iter()
        .map(|item| {
            let food = menu
                .get(&item.food_item_id)
                .filter(|f| f.is_available)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Item {} is not available", item.food_item_id))
                })?;
            Ok(CartLine {
                food_item_id: food.id,
                name: food.name.clone(),
                price: food.price,
                quantity: item.quantity,
            })
        })
        .collect()
}

/// Recompute the delivery fee, ETA and service-area check for a location
pub async fn assess_delivery(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AssessRequest>,
) -> AppResult<Json<AssessResponse>> {
    let snapshot = Arc::new(load_snapshot(&state.db).await?);
    let mut checkout =
        CheckoutOrchestrator::new(snapshot, state.config.checkout.clone(), claims.sub, Vec::new());

    if let Some(area) = payload.area_name {
        checkout.on_field_change(FormField::AreaName, area);
    }
    checkout.locate(payload.signal, state.geocoder.as_deref()).await;

    let draft = checkout.draft();
    Ok(Json(AssessResponse {
        area_name: draft.area_name.clone(),
        formatted_address: draft.formatted_address.clone(),
        assessment: draft.assessment.clone(),
    }))
}

/// Place an order: validate the form, price the cart, and persist it
pub async fn place_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<OrderConfirmation>> {
    let cart = resolve_cart(&state.db, &payload.items).await?;
    let snapshot = Arc::new(load_snapshot(&state.db).await?);

    let mut checkout =
        CheckoutOrchestrator::new(snapshot, state.config.checkout.clone(), claims.sub, cart);
    checkout.on_field_change(FormField::ContactName, payload.contact_name);
    checkout.on_field_change(FormField::ContactPhone, payload.contact_phone);
    checkout.on_field_change(FormField::AreaName, payload.area_name);
    checkout.on_field_change(FormField::StreetDetail, payload.street_detail);
    checkout.set_payment_method(payload.payment_method);
    checkout.locate(payload.location, state.geocoder.as_deref()).await;

    checkout.validate_for_submission()?;

    let sink = SeaOrmOrderSink::new(state.db.clone());
    let confirmation = checkout.submit(&sink).await?;

    Ok(Json(confirmation))
}
