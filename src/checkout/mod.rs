//! Checkout session: location signals in, a validated order out.

pub mod draft;
pub mod memory;
pub mod orchestrator;
pub mod payload;
pub mod signal;
pub mod sink;
pub mod submit;

use std::time::Duration;
use thiserror::Error;

use crate::delivery::{DistanceStrategy, FeeSchedule, ZoneStrategy};

pub use draft::{CartLine, FormField, OrderDraft, PaymentMethod};
pub use orchestrator::CheckoutOrchestrator;
pub use payload::{OrderConfirmation, OrderSubmission};
pub use signal::LocationSignal;
pub use sink::SeaOrmOrderSink;
pub use submit::{OrderSink, SinkError, SubmissionError};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(FormField),
    #[error("your cart is empty")]
    EmptyCart,
    #[error("this address is outside our delivery area")]
    OutOfServiceArea,
}

/// Tunables for one checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub fees: FeeSchedule,
    pub zone_strategy: ZoneStrategy,
    pub distance_strategy: DistanceStrategy,
    /// Applied to each write of the submission separately.
    pub submit_timeout: Duration,
    /// Prefixed to the area in the shipping address, e.g. the city name.
    pub locality: Option<String>,
    /// Placed before the area name, e.g. "Brgy.".
    pub area_label: Option<String>,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            fees: FeeSchedule::default(),
            zone_strategy: ZoneStrategy::default(),
            distance_strategy: DistanceStrategy::default(),
            submit_timeout: Duration::from_secs(10),
            locality: None,
            area_label: None,
        }
    }
}
