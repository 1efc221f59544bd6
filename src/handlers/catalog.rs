use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::{active_restaurants, active_zones, point_from_model};
use crate::entities::{food_item, restaurant};
use crate::error::{AppError, AppResult};
use crate::utils::geo::Coordinate;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ZoneInfo {
    pub name: String,
    pub has_polygon: bool,
}

#[derive(Debug, Serialize)]
pub struct RestaurantInfo {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub image_url: Option<String>,
    pub location: Option<Coordinate>,
}

#[derive(Debug, Serialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub is_available: bool,
}

impl From<food_item::Model> for MenuItem {
    fn from(f: food_item::Model) -> Self {
        Self {
            id: f.id,
            restaurant_id: f.restaurant_id,
            name: f.name,
            description: f.description,
            price: f.price,
            image_url: f.image_url,
            is_available: f.is_available,
        }
    }
}

/// List active delivery zones for the area picker
pub async fn list_zones(State(state): State<AppState>) -> AppResult<Json<Vec<ZoneInfo>>> {
    let zones = active_zones(&state.db).await?;

    let responses: Vec<ZoneInfo> = zones
        .into_iter()
        .map(|z| ZoneInfo {
            name: z.name,
            has_polygon: z.polygon_points.is_some(),
        })
        .collect();

    Ok(Json(responses))
}

/// List active restaurants
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RestaurantInfo>>> {
    let restaurants = active_restaurants(&state.db).await?;

    let responses: Vec<RestaurantInfo> = restaurants
        .into_iter()
        .map(|r| RestaurantInfo {
            id: r.id,
            name: r.name.clone(),
            address: r.address.clone(),
            image_url: r.image_url.clone(),
            location: point_from_model(r).map(|p| p.location),
        })
        .collect();

    Ok(Json(responses))
}

/// Available dishes of one restaurant
pub async fn restaurant_menu(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> AppResult<Json<Vec<MenuItem>>> {
    restaurant::Entity::find_by_id(restaurant_id)
        .filter(restaurant::Column::IsActive.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

    let items = food_item::Entity::find()
        .filter(food_item::Column::RestaurantId.eq(restaurant_id))
        .filter(food_item::Column::IsAvailable.eq(true))
        .order_by_asc(food_item::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(items.into_iter().map(MenuItem::from).collect()))
}
