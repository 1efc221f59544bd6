use std::sync::Arc;
use uuid::Uuid;

use super::draft::{CartLine, FormField, OrderDraft, PaymentMethod};
use super::payload::{self, OrderConfirmation, OrderSubmission};
use super::signal::LocationSignal;
use super::submit::{submit_order, OrderSink, SubmissionError};
use super::{CheckoutSettings, ValidationError};
use crate::delivery::{
    DeliveryAssessment, DistanceStrategy, RestaurantMatcher, ServiceSnapshot, ZoneResolver,
};
use crate::geocoding::{Geocoder, GeocodingError};
use crate::orders::OrderStatus;

/// Owns the order draft of one checkout session and keeps its delivery
/// assessment in step with every location signal and field edit.
pub struct CheckoutOrchestrator {
    snapshot: Arc<ServiceSnapshot>,
    settings: CheckoutSettings,
    resolver: ZoneResolver,
    customer_id: Uuid,
    cart: Vec<CartLine>,
    draft: OrderDraft,
}

impl CheckoutOrchestrator {
    pub fn new(
        snapshot: Arc<ServiceSnapshot>,
        settings: CheckoutSettings,
        customer_id: Uuid,
        cart: Vec<CartLine>,
    ) -> Self {
        let draft = OrderDraft::new(DeliveryAssessment::unlocated(&settings.fees));
        let mut orchestrator = Self {
            snapshot,
            resolver: ZoneResolver::new(settings.zone_strategy),
            settings,
            customer_id,
            cart,
            draft,
        };
        orchestrator.refresh_service_area();
        orchestrator
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn assessment(&self) -> &DeliveryAssessment {
        &self.draft.assessment
    }

    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    pub fn on_field_change(&mut self, field: FormField, value: impl Into<String>) {
        self.draft.set_field(field, value.into());
        if field == FormField::AreaName {
            self.refresh_service_area();
        }
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.draft.payment_method = method;
    }

    pub fn on_location_signal(&mut self, signal: LocationSignal) {
        if let Some(area) = signal.area_name {
            self.draft.area_name = area;
        }
        if let Some(address) = signal.formatted_address {
            self.draft.formatted_address = Some(address);
        }

        if let Some(coordinate) = signal.coordinate {
            let nearest = RestaurantMatcher::nearest(Some(coordinate), &self.snapshot.points);
            let distance_km = self
                .settings
                .distance_strategy
                .delivery_distance(nearest.as_ref(), signal.provider_distance_meters);
            let fees = &self.settings.fees;

            let assessment = &mut self.draft.assessment;
            assessment.coordinate = Some(coordinate);
            assessment.distance_km = distance_km;
            assessment.delivery_fee = fees.delivery_fee(distance_km);
            assessment.eta_minutes = fees.eta_minutes(distance_km);
            assessment.assigned_fulfillment_point = nearest.map(|n| n.point);
            assessment.provider_duration_text = signal.provider_duration_text;

            tracing::debug!(
                latitude = coordinate.latitude(),
                longitude = coordinate.longitude(),
                distance_km = ?distance_km,
                restaurant = ?assessment.assigned_fulfillment_point.as_ref().map(|p| &p.name),
                "Delivery assessment updated"
            );
        }

        self.refresh_service_area();
    }

    /// Geocoding is optional: a failure leaves the assessment as it was.
    pub fn on_geocoding_failure(&self, error: &GeocodingError) {
        tracing::warn!(error = %error, "Geocoding unavailable, keeping previous delivery estimate");
    }

    /// Apply a signal after completing it with whatever the geocoder can add:
    /// a coordinate for typed text, an area name for a bare coordinate, and a
    /// driving distance from the assigned restaurant.
    pub async fn locate(&mut self, mut signal: LocationSignal, geocoder: Option<&dyn Geocoder>) {
        let Some(geocoder) = geocoder else {
            self.on_location_signal(signal);
            return;
        };
        let had_area = signal.area_name.is_some();

        if signal.coordinate.is_none() {
            if let Some(address) = signal.formatted_address.clone() {
                match geocoder.forward(&address).await {
                    Ok(found) => signal.fill_from(found),
                    Err(e) => self.on_geocoding_failure(&e),
                }
            }
        } else if signal.area_name.is_none() {
            if let Some(coordinate) = signal.coordinate {
                match geocoder.reverse(coordinate).await {
                    Ok(found) => {
                        signal.area_name = found.area_name;
                        signal.formatted_address = signal.formatted_address.or(found.formatted_address);
                    }
                    Err(e) => self.on_geocoding_failure(&e),
                }
            }
        }

        // A geocoded area only fills an empty field; the customer's pick stays
        if !had_area && self.draft.area().is_some() {
            signal.area_name = None;
        }

        let wants_route = self.settings.distance_strategy == DistanceStrategy::ProviderFirst
            && signal.provider_distance_meters.is_none();
        self.on_location_signal(signal);

        if !wants_route {
            return;
        }
        let assessment = &self.draft.assessment;
        let (Some(destination), Some(point)) =
            (assessment.coordinate, assessment.assigned_fulfillment_point.as_ref())
        else {
            return;
        };

        match geocoder.driving_distance(point.location, destination).await {
            Ok(route) => self.on_location_signal(
                LocationSignal::at(destination).with_provider_distance(route.meters, route.duration_text),
            ),
            Err(e) => self.on_geocoding_failure(&e),
        }
    }

    fn refresh_service_area(&mut self) {
        let in_area = self.resolver.is_serviceable(
            self.draft.assessment.coordinate,
            self.draft.area(),
            &self.snapshot.zones,
        );
        self.draft.assessment.in_service_area = in_area;
    }

    pub fn validate_for_submission(&self) -> Result<(), ValidationError> {
        if let Some(field) = self.draft.first_missing() {
            return Err(ValidationError::MissingField(field));
        }
        if self.cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        if !self.draft.assessment.in_service_area {
            return Err(ValidationError::OutOfServiceArea);
        }
        Ok(())
    }

    pub fn build_order_payload(&self) -> OrderSubmission {
        let assessment = &self.draft.assessment;
        let subtotal = payload::subtotal(&self.cart);

        OrderSubmission {
            customer_id: self.customer_id,
            subtotal,
            delivery_fee: assessment.delivery_fee,
            total: subtotal + assessment.delivery_fee,
            shipping_address: payload::shipping_address(
                self.settings.locality.as_deref(),
                self.settings.area_label.as_deref(),
                &self.draft.area_name,
                &self.draft.street_detail,
            ),
            contact_name: self.draft.contact_name.trim().to_string(),
            contact_phone: self.draft.contact_phone.trim().to_string(),
            payment_method: self.draft.payment_method,
            status: OrderStatus::Pending,
            coordinate: assessment.coordinate,
            distance_km: assessment.distance_km,
            eta_minutes: assessment.eta_minutes,
            assigned_fulfillment_point_id: assessment.assigned_fulfillment_point.as_ref().map(|p| p.id),
            line_items: self.cart.clone(),
        }
    }

    pub async fn submit(&self, sink: &dyn OrderSink) -> Result<OrderConfirmation, SubmissionError> {
        self.validate_for_submission()?;

        let order = self.build_order_payload();
        let order_id = submit_order(sink, &order, self.settings.submit_timeout).await?;

        tracing::info!(%order_id, total = order.total, "Order placed");

        Ok(OrderConfirmation {
            order_id,
            status: order.status,
            total: order.total,
            eta_minutes: order.eta_minutes,
            restaurant_name: self
                .draft
                .assessment
                .assigned_fulfillment_point
                .as_ref()
                .map(|p| p.name.clone()),
        })
    }
}
