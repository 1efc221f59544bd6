use serde::Serialize;
use uuid::Uuid;

use super::draft::{CartLine, PaymentMethod};
use crate::orders::OrderStatus;
use crate::utils::geo::Coordinate;

/// Everything the order sink needs to persist one checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSubmission {
    pub customer_id: Uuid,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub shipping_address: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub coordinate: Option<Coordinate>,
    pub distance_km: Option<f64>,
    pub eta_minutes: Option<i32>,
    pub assigned_fulfillment_point_id: Option<Uuid>,
    pub line_items: Vec<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub total: f64,
    pub eta_minutes: Option<i32>,
    pub restaurant_name: Option<String>,
}

pub fn subtotal(cart: &[CartLine]) -> f64 {
    cart.iter().map(CartLine::line_total).sum()
}

/// `"{locality}, {label} {area} • {street}"`, leaving out the locality and the
/// area label when unset.
pub fn shipping_address(
    locality: Option<&str>,
    area_label: Option<&str>,
    area: &str,
    street: &str,
) -> String {
    let area = match area_label {
        Some(label) if !label.is_empty() => format!("{label} {}", area.trim()),
        _ => area.trim().to_string(),
    };
    let place = match locality {
        Some(locality) if !locality.is_empty() => format!("{locality}, {area}"),
        _ => area.to_string(),
    };
    format!("{place} • {}", street.trim())
}
