use serde::{Deserialize, Serialize};

/// Distance-banded delivery pricing and transit-time estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Charged while the distance is still unknown.
    pub unknown_fee: f64,
    pub tier1_max_km: f64,
    pub tier1_fee: f64,
    pub tier2_max_km: f64,
    pub tier2_fee: f64,
    pub tier3_fee: f64,
    pub average_speed_kmph: f64,
    pub min_eta_minutes: i32,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            unknown_fee: 50.0,
            tier1_max_km: 2.0,
            tier1_fee: 30.0,
            tier2_max_km: 5.0,
            tier2_fee: 50.0,
            tier3_fee: 70.0,
            average_speed_kmph: 25.0,
            min_eta_minutes: 5,
        }
    }
}

impl FeeSchedule {
    pub fn delivery_fee(&self, distance_km: Option<f64>) -> f64 {
        match distance_km {
            None => self.unknown_fee,
            Some(d) if d <= self.tier1_max_km => self.tier1_fee,
            Some(d) if d <= self.tier2_max_km => self.tier2_fee,
            Some(_) => self.tier3_fee,
        }
    }

    pub fn eta_minutes(&self, distance_km: Option<f64>) -> Option<i32> {
        let distance = distance_km?;
        let minutes = (distance / self.average_speed_kmph * 60.0).ceil() as i32;
        Some(minutes.max(self.min_eta_minutes))
    }
}
