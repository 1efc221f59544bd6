use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::geo::{distance_km, Coordinate};

/// A restaurant location orders can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentPoint {
    pub id: Uuid,
    pub name: String,
    pub location: Coordinate,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestPoint {
    pub point: FulfillmentPoint,
    pub distance_km: f64,
}

/// How the delivery distance is derived once a point has been assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceStrategy {
    /// Use the map provider's driving distance when a signal carries one.
    #[default]
    ProviderFirst,
    /// Always use the great-circle distance.
    Haversine,
}

impl FromStr for DistanceStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider_first" => Ok(Self::ProviderFirst),
            "haversine" => Ok(Self::Haversine),
            other => Err(format!("unknown distance strategy: {other}")),
        }
    }
}

impl DistanceStrategy {
    pub fn delivery_distance(
        &self,
        nearest: Option<&NearestPoint>,
        provider_distance_meters: Option<f64>,
    ) -> Option<f64> {
        match (self, provider_distance_meters) {
            (Self::ProviderFirst, Some(meters)) => Some(meters / 1000.0),
            _ => nearest.map(|n| n.distance_km),
        }
    }
}

pub struct RestaurantMatcher;

impl RestaurantMatcher {
    /// Nearest active point by great-circle distance. Ties keep the point
    /// that comes first in `points`.
    pub fn nearest(
        coordinate: Option<Coordinate>,
        points: &[FulfillmentPoint],
    ) -> Option<NearestPoint> {
        let origin = coordinate?;
        let mut best: Option<(&FulfillmentPoint, f64)> = None;

        for point in points.iter().filter(|p| p.active) {
            let d = distance_km(origin, point.location);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((point, d)),
            }
        }

        best.map(|(point, distance_km)| NearestPoint {
            point: point.clone(),
            distance_km,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn point(name: &str, lat: f64, lng: f64) -> FulfillmentPoint {
        FulfillmentPoint {
            id: Uuid::new_v4(),
            name: name.to_string(),
            location: coord(lat, lng),
            active: true,
        }
    }

    #[test]
    fn test_empty_points() {
        assert!(RestaurantMatcher::nearest(Some(coord(0.0, 0.0)), &[]).is_none());
    }

    #[test]
    fn test_missing_coordinate() {
        let points = vec![point("Only", 0.0, 0.0)];
        assert!(RestaurantMatcher::nearest(None, &points).is_none());
    }

    #[test]
    fn test_single_point_reports_true_distance() {
        let only = point("Only", 1.0, 0.0);
        let origin = coord(0.0, 0.0);

        let nearest = RestaurantMatcher::nearest(Some(origin), &[only.clone()]).unwrap();
        assert_eq!(nearest.point, only);
        assert_eq!(nearest.distance_km, distance_km(origin, only.location));
    }

    #[test]
    fn test_picks_closest() {
        let points = vec![
            point("Far", 0.5, 0.0),
            point("Near", 0.01, 0.0),
            point("Middle", 0.1, 0.0),
        ];

        let nearest = RestaurantMatcher::nearest(Some(coord(0.0, 0.0)), &points).unwrap();
        assert_eq!(nearest.point.name, "Near");
    }

    #[test]
    fn test_tie_keeps_first() {
        let points = vec![point("North", 0.1, 0.0), point("South", -0.1, 0.0)];

        let nearest = RestaurantMatcher::nearest(Some(coord(0.0, 0.0)), &points).unwrap();
        assert_eq!(nearest.point.name, "North");
    }

    #[test]
    fn test_skips_inactive_points() {
        let mut closed = point("Closed", 0.001, 0.0);
        closed.active = false;
        let points = vec![closed, point("Open", 0.2, 0.0)];

        let nearest = RestaurantMatcher::nearest(Some(coord(0.0, 0.0)), &points).unwrap();
        assert_eq!(nearest.point.name, "Open");
    }

    #[test]
    fn test_distance_strategies() {
        let nearest = NearestPoint {
            point: point("Kitchen", 0.0, 0.0),
            distance_km: 1.2,
        };

        let provider = DistanceStrategy::ProviderFirst;
        assert_eq!(provider.delivery_distance(Some(&nearest), Some(3200.0)), Some(3.2));
        assert_eq!(provider.delivery_distance(Some(&nearest), None), Some(1.2));
        assert_eq!(provider.delivery_distance(None, None), None);

        let haversine = DistanceStrategy::Haversine;
        assert_eq!(haversine.delivery_distance(Some(&nearest), Some(3200.0)), Some(1.2));
    }
}
