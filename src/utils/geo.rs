use serde::{Deserialize, Serialize};
use thiserror::Error;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("invalid coordinate text: {0}")]
    Unparsable(String),
}

/// A point on the earth's surface in decimal degrees.
///
/// Construction validates the range, so every `Coordinate` in the system is
/// safe to feed to [`distance_km`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng")]
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a coordinate stored as two text columns (restaurant rows keep
    /// lat/lng as strings).
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, GeoError> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| GeoError::Unparsable(latitude.to_string()))?;
        let lng = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| GeoError::Unparsable(longitude.to_string()))?;
        Self::new(lat, lng)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Closed ring of coordinates describing one deliverable area. The last point
/// connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(Vec<Coordinate>);

impl Polygon {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in kilometers
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Ray-casting parity test with longitude as x and latitude as y.
///
/// Edges are half-open: a point exactly on a bottom or left edge counts as
/// inside, on a top or right edge as outside. Rings with fewer than three
/// points never contain anything.
pub fn point_in_polygon(point: Coordinate, polygon: &Polygon) -> bool {
    let ring = polygon.points();
    if ring.len() < 3 {
        return false;
    }

    let (x, y) = (point.longitude, point.latitude);
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].longitude, ring[i].latitude);
        let (xj, yj) = (ring[j].longitude, ring[j].latitude);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            coord(0.0, 0.0),
            coord(0.0, 1.0),
            coord(1.0, 1.0),
            coord(1.0, 0.0),
        ])
    }

    #[test]
    fn test_distance_iligan_cagayan() {
        let iligan = coord(8.2280, 124.2452);
        let cagayan = coord(8.4542, 124.6319);

        let distance = distance_km(iligan, cagayan);
        // Roughly 49 km as the crow flies
        assert!(distance > 45.0 && distance < 55.0, "got {distance}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(coord(0.0, 0.0), coord(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_point_in_square() {
        assert!(point_in_polygon(coord(0.5, 0.5), &unit_square()));
        assert!(!point_in_polygon(coord(2.0, 2.0), &unit_square()));
    }

    #[test]
    fn test_degenerate_polygons_contain_nothing() {
        let empty = Polygon::new(vec![]);
        let segment = Polygon::new(vec![coord(0.0, 0.0), coord(1.0, 1.0)]);

        assert!(!point_in_polygon(coord(0.0, 0.0), &empty));
        assert!(!point_in_polygon(coord(0.5, 0.5), &segment));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening to the north
        let u = Polygon::new(vec![
            coord(0.0, 0.0),
            coord(0.0, 3.0),
            coord(3.0, 3.0),
            coord(3.0, 2.0),
            coord(1.0, 2.0),
            coord(1.0, 1.0),
            coord(3.0, 1.0),
            coord(3.0, 0.0),
        ]);

        assert!(point_in_polygon(coord(2.0, 0.5), &u));
        assert!(!point_in_polygon(coord(2.0, 1.5), &u));
        assert!(point_in_polygon(coord(2.0, 2.5), &u));
    }

    #[test]
    fn test_half_open_edges() {
        let square = unit_square();
        assert!(point_in_polygon(coord(0.5, 0.0), &square));
        assert!(!point_in_polygon(coord(0.5, 1.0), &square));
    }

    #[test]
    fn test_coordinate_range_is_validated() {
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(GeoError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.5),
            Err(GeoError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn test_parse_text_columns() {
        let c = Coordinate::parse(" 8.2280", "124.2452 ").unwrap();
        assert_eq!(c.latitude(), 8.2280);
        assert_eq!(c.longitude(), 124.2452);

        assert!(matches!(
            Coordinate::parse("north", "124.0"),
            Err(GeoError::Unparsable(_))
        ));
    }

    #[test]
    fn test_deserialize_lat_lng_aliases() {
        let c: Coordinate = serde_json::from_str(r#"{"lat": 8.5, "lng": 124.1}"#).unwrap();
        assert_eq!(c, coord(8.5, 124.1));

        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 95.0, "lng": 0.0}"#);
        assert!(bad.is_err());
    }

    fn any_coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| coord(lat, lng))
    }

    proptest! {
        #[test]
        fn distance_to_self_is_zero(a in any_coordinate()) {
            prop_assert_eq!(distance_km(a, a), 0.0);
        }

        #[test]
        fn distance_is_symmetric(a in any_coordinate(), b in any_coordinate()) {
            let ab = distance_km(a, b);
            let ba = distance_km(b, a);
            prop_assert!((ab - ba).abs() < 1e-9, "{} != {}", ab, ba);
        }
    }
}
