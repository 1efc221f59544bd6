use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::geo::{point_in_polygon, Coordinate, Polygon};

/// A named serviceable area, optionally bounded by a polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryZone {
    pub name: String,
    pub polygon: Option<Polygon>,
    pub active: bool,
}

impl DeliveryZone {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polygon: None,
            active: true,
        }
    }

    pub fn bounded(name: impl Into<String>, polygon: Polygon) -> Self {
        Self {
            name: name.into(),
            polygon: Some(polygon),
            active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStrategy {
    /// Polygon zones decide when any are configured, area names otherwise.
    #[default]
    PolygonFirst,
    /// Polygons are ignored; the typed area must be an active zone name.
    AreaNameOnly,
}

impl FromStr for ZoneStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polygon_first" => Ok(Self::PolygonFirst),
            "area_name_only" => Ok(Self::AreaNameOnly),
            other => Err(format!("unknown zone strategy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneResolver {
    strategy: ZoneStrategy,
}

impl ZoneResolver {
    pub fn new(strategy: ZoneStrategy) -> Self {
        Self { strategy }
    }

    /// Decide whether an address is deliverable.
    ///
    /// Fails open: with no active zones, or with polygon zones but no
    /// coordinate yet, the address is treated as serviceable until a
    /// coordinate arrives.
    pub fn is_serviceable(
        &self,
        coordinate: Option<Coordinate>,
        area_name: Option<&str>,
        zones: &[DeliveryZone],
    ) -> bool {
        let active: Vec<&DeliveryZone> = zones.iter().filter(|z| z.active).collect();
        if active.is_empty() {
            return true;
        }

        if self.strategy == ZoneStrategy::PolygonFirst {
            let polygons: Vec<&Polygon> = active.iter().filter_map(|z| z.polygon.as_ref()).collect();
            if !polygons.is_empty() {
                return match coordinate {
                    Some(point) => polygons.iter().any(|p| point_in_polygon(point, p)),
                    None => true,
                };
            }
        }

        match area_name {
            Some(area) => active.iter().any(|z| z.name == area),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn square_zone(name: &str) -> DeliveryZone {
        DeliveryZone::bounded(
            name,
            Polygon::new(vec![
                coord(0.0, 0.0),
                coord(0.0, 1.0),
                coord(1.0, 1.0),
                coord(1.0, 0.0),
            ]),
        )
    }

    #[test]
    fn test_area_name_match() {
        let resolver = ZoneResolver::default();
        let zones = vec![DeliveryZone::named("A")];

        assert!(resolver.is_serviceable(None, Some("A"), &zones));
        assert!(!resolver.is_serviceable(None, Some("B"), &zones));
        assert!(!resolver.is_serviceable(None, Some("a"), &zones));
        assert!(!resolver.is_serviceable(None, None, &zones));
    }

    #[test]
    fn test_no_zones_fails_open() {
        let resolver = ZoneResolver::default();
        assert!(resolver.is_serviceable(None, Some("anything"), &[]));
        assert!(resolver.is_serviceable(Some(coord(10.0, 10.0)), None, &[]));
    }

    #[test]
    fn test_only_inactive_zones_fails_open() {
        let resolver = ZoneResolver::default();
        let mut zone = DeliveryZone::named("A");
        zone.active = false;

        assert!(resolver.is_serviceable(None, Some("B"), &[zone]));
    }

    #[test]
    fn test_inactive_names_are_not_served() {
        let resolver = ZoneResolver::default();
        let mut closed = DeliveryZone::named("Closed");
        closed.active = false;
        let zones = vec![DeliveryZone::named("Open"), closed];

        assert!(!resolver.is_serviceable(None, Some("Closed"), &zones));
        assert!(resolver.is_serviceable(None, Some("Open"), &zones));
    }

    #[test]
    fn test_polygons_take_precedence_over_names() {
        let resolver = ZoneResolver::default();
        let zones = vec![square_zone("Square"), DeliveryZone::named("Elsewhere")];

        assert!(resolver.is_serviceable(Some(coord(0.5, 0.5)), None, &zones));
        assert!(!resolver.is_serviceable(Some(coord(2.0, 2.0)), Some("Elsewhere"), &zones));
    }

    #[test]
    fn test_missing_coordinate_with_polygons_is_allowed() {
        let resolver = ZoneResolver::default();
        let zones = vec![square_zone("Square")];

        assert!(resolver.is_serviceable(None, Some("Nowhere"), &zones));
    }

    #[test]
    fn test_area_name_only_ignores_polygons() {
        let resolver = ZoneResolver::new(ZoneStrategy::AreaNameOnly);
        let zones = vec![square_zone("Square")];

        assert!(!resolver.is_serviceable(Some(coord(0.5, 0.5)), None, &zones));
        assert!(resolver.is_serviceable(Some(coord(5.0, 5.0)), Some("Square"), &zones));
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("polygon_first".parse(), Ok(ZoneStrategy::PolygonFirst));
        assert_eq!("area_name_only".parse(), Ok(ZoneStrategy::AreaNameOnly));
        assert!("nearest".parse::<ZoneStrategy>().is_err());
    }
}
