//! Loads the zones and restaurants a checkout session works against.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::delivery::{DeliveryZone, FulfillmentPoint, ServiceSnapshot};
use crate::entities::{delivery_zone, restaurant};
use crate::error::AppResult;
use crate::utils::geo::{Coordinate, Polygon};

/// A zone whose polygon cannot be read is kept as a name-only zone.
pub fn zone_from_model(model: delivery_zone::Model) -> DeliveryZone {
    let polygon = model.polygon_points.and_then(|points| {
        match serde_json::from_value::<Vec<Coordinate>>(points) {
            Ok(ring) => Some(Polygon::new(ring)),
            Err(e) => {
                tracing::warn!(zone = %model.name, error = %e, "Ignoring unreadable zone polygon");
                None
            }
        }
    });

    DeliveryZone {
        name: model.name,
        polygon,
        active: model.is_active,
    }
}

/// Restaurants without a usable location cannot be assigned orders.
pub fn point_from_model(model: restaurant::Model) -> Option<FulfillmentPoint> {
    let (Some(lat), Some(lng)) = (model.lat.as_deref(), model.lng.as_deref()) else {
        tracing::debug!(restaurant = %model.name, "Restaurant has no location");
        return None;
    };

    match Coordinate::parse(lat, lng) {
        Ok(location) => Some(FulfillmentPoint {
            id: model.id,
            name: model.name,
            location,
            active: model.is_active,
        }),
        Err(e) => {
            tracing::warn!(restaurant = %model.name, error = %e, "Skipping restaurant with bad location");
            None
        }
    }
}

pub async fn active_zones(db: &DatabaseConnection) -> AppResult<Vec<delivery_zone::Model>> {
    let zones = delivery_zone::Entity::find()
        .filter(delivery_zone::Column::IsActive.eq(true))
        .order_by_asc(delivery_zone::Column::Name)
        .all(db)
        .await?;
    Ok(zones)
}

pub async fn active_restaurants(db: &DatabaseConnection) -> AppResult<Vec<restaurant::Model>> {
    let restaurants = restaurant::Entity::find()
        .filter(restaurant::Column::IsActive.eq(true))
        .order_by_asc(restaurant::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(restaurants)
}

/// Fetch zones and restaurants once for a checkout session.
pub async fn load_snapshot(db: &DatabaseConnection) -> AppResult<ServiceSnapshot> {
    let zones: Vec<DeliveryZone> = active_zones(db).await?.into_iter().map(zone_from_model).collect();
    let points: Vec<FulfillmentPoint> = active_restaurants(db)
        .await?
        .into_iter()
        .filter_map(point_from_model)
        .collect();

    tracing::debug!(zones = zones.len(), restaurants = points.len(), "Loaded service snapshot");

    Ok(ServiceSnapshot { zones, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn restaurant(lat: Option<&str>, lng: Option<&str>) -> restaurant::Model {
        restaurant::Model {
            id: Uuid::new_v4(),
            owner_id: None,
            name: "Iligan Kitchen".to_string(),
            address: None,
            image_url: None,
            lat: lat.map(String::from),
            lng: lng.map(String::from),
            is_active: true,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_zone_with_polygon() {
        let zone = zone_from_model(delivery_zone::Model {
            id: 1,
            name: "Downtown".to_string(),
            polygon_points: Some(json!([
                {"lat": 8.22, "lng": 124.23},
                {"lat": 8.22, "lng": 124.26},
                {"lat": 8.25, "lng": 124.26}
            ])),
            is_active: true,
        });

        assert_eq!(zone.name, "Downtown");
        assert_eq!(zone.polygon.map(|p| p.len()), Some(3));
    }

    #[test]
    fn test_zone_with_bad_polygon_is_name_only() {
        let zone = zone_from_model(delivery_zone::Model {
            id: 2,
            name: "Tibanga".to_string(),
            polygon_points: Some(json!({"not": "a ring"})),
            is_active: true,
        });

        assert!(zone.polygon.is_none());
        assert!(zone.active);
    }

    #[test]
    fn test_point_from_text_coordinates() {
        let point = point_from_model(restaurant(Some("8.2280"), Some("124.2452"))).unwrap();
        assert_eq!(point.location, Coordinate::new(8.2280, 124.2452).unwrap());
    }

    #[test]
    fn test_point_without_usable_location() {
        assert!(point_from_model(restaurant(None, Some("124.2452"))).is_none());
        assert!(point_from_model(restaurant(Some("abc"), Some("124.2452"))).is_none());
        assert!(point_from_model(restaurant(Some("95"), Some("124.2452"))).is_none());
    }
}
