use serde::{Deserialize, Serialize};

use crate::utils::geo::Coordinate;

/// One location update from any input channel: typed search, autocomplete
/// pick, reverse geocode, GPS fix, marker drag or a distance-matrix reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSignal {
    pub coordinate: Option<Coordinate>,
    pub formatted_address: Option<String>,
    pub area_name: Option<String>,
    pub provider_distance_meters: Option<f64>,
    pub provider_duration_text: Option<String>,
}

impl LocationSignal {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            ..Default::default()
        }
    }

    pub fn address(text: impl Into<String>) -> Self {
        Self {
            formatted_address: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area_name = Some(area.into());
        self
    }

    pub fn with_provider_distance(mut self, meters: f64, duration_text: Option<String>) -> Self {
        self.provider_distance_meters = Some(meters);
        self.provider_duration_text = duration_text;
        self
    }

    /// Fill in whatever this signal is missing from `other`.
    pub fn fill_from(&mut self, other: LocationSignal) {
        self.coordinate = self.coordinate.or(other.coordinate);
        self.formatted_address = self.formatted_address.take().or(other.formatted_address);
        self.area_name = self.area_name.take().or(other.area_name);
        self.provider_distance_meters = self.provider_distance_meters.or(other.provider_distance_meters);
        self.provider_duration_text = self.provider_duration_text.take().or(other.provider_duration_text);
    }
}
