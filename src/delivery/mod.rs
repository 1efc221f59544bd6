//! Delivery-zone assignment and fee/ETA estimation.

pub mod fee;
pub mod matcher;
pub mod zone;

use serde::Serialize;

use crate::utils::geo::Coordinate;

pub use fee::FeeSchedule;
pub use matcher::{DistanceStrategy, FulfillmentPoint, NearestPoint, RestaurantMatcher};
pub use zone::{DeliveryZone, ZoneResolver, ZoneStrategy};

/// Zones and restaurants as fetched at the start of a checkout session.
/// Read-only for the lifetime of that session.
#[derive(Debug, Clone, Default)]
pub struct ServiceSnapshot {
    pub zones: Vec<DeliveryZone>,
    pub points: Vec<FulfillmentPoint>,
}

/// Everything derived from the latest location signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryAssessment {
    pub coordinate: Option<Coordinate>,
    pub distance_km: Option<f64>,
    pub eta_minutes: Option<i32>,
    pub delivery_fee: f64,
    pub in_service_area: bool,
    pub assigned_fulfillment_point: Option<FulfillmentPoint>,
    pub provider_duration_text: Option<String>,
}

impl DeliveryAssessment {
    pub fn unlocated(fees: &FeeSchedule) -> Self {
        Self {
            coordinate: None,
            distance_km: None,
            eta_minutes: None,
            delivery_fee: fees.delivery_fee(None),
            in_service_area: false,
            assigned_fulfillment_point: None,
            provider_duration_text: None,
        }
    }
}
