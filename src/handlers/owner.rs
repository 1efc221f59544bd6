use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{food_item, order, order_item, restaurant};
use crate::error::{AppError, AppResult};
use crate::handlers::catalog::MenuItem;
use crate::handlers::orders::{order_response, set_status, OrderResponse};
use crate::orders::{OrderStatus, StatusFilter};
use crate::utils::jwt::Claims;
use crate::AppState;

/// The restaurant registered to the signed-in owner
async fn my_restaurant(state: &AppState, claims: &Claims) -> AppResult<restaurant::Model> {
    restaurant::Entity::find()
        .filter(restaurant::Column::OwnerId.eq(claims.sub))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No restaurant registered for this account".to_string()))
}

async fn menu_ids(state: &AppState, restaurant_id: Uuid) -> AppResult<Vec<Uuid>> {
    let items = food_item::Entity::find()
        .filter(food_item::Column::RestaurantId.eq(restaurant_id))
        .all(&state.db)
        .await?;
    Ok(items.into_iter().map(|f| f.id).collect())
}

// ============ Orders ============

#[derive(Debug, Deserialize)]
pub struct OwnerOrdersQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OwnerOrderResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    /// Only the items this restaurant prepares
    pub restaurant_subtotal: f64,
}

/// Sum of price × quantity over `items` of one order. Callers pass only the
/// rows of their own restaurant.
fn restaurant_subtotal(order_id: Uuid, items: &[order_item::Model]) -> f64 {
    items
        .iter()
        .filter(|i| i.order_id == order_id)
        .map(|i| i.price * f64::from(i.quantity))
        .sum()
}

/// Order as the owner sees it: named after the owner's restaurant even when
/// the order was assigned to another kitchen.
fn owner_order_response(
    o: order::Model,
    items: &[order_item::Model],
    restaurant: &restaurant::Model,
) -> OrderResponse {
    let mut response = order_response(o, items, std::slice::from_ref(restaurant));
    response.restaurant_name = Some(restaurant.name.clone());
    response
}

/// Orders containing at least one of the owner's dishes, newest first
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<OwnerOrdersQuery>,
) -> AppResult<Json<Vec<OwnerOrderResponse>>> {
    let filter = match query.status.as_deref() {
        Some(raw) => raw.parse::<StatusFilter>().map_err(AppError::BadRequest)?,
        None => state.config.owner_status_filter,
    };

    let restaurant = my_restaurant(&state, &claims).await?;
    let menu = menu_ids(&state, restaurant.id).await?;

    let items = order_item::Entity::find()
        .filter(order_item::Column::FoodItemId.is_in(menu))
        .all(&state.db)
        .await?;

    let order_ids: HashSet<Uuid> = items.iter().map(|i| i.order_id).collect();
    if order_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let orders = order::Entity::find()
        .filter(order::Column::Id.is_in(order_ids))
        .order_by_desc(order::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let responses = orders
        .into_iter()
        .filter(|o| filter.matches(o.status))
        .map(|o| {
            let restaurant_subtotal = restaurant_subtotal(o.id, &items);
            OwnerOrderResponse {
                order: owner_order_response(o, &items, &restaurant),
                restaurant_subtotal,
            }
        })
        .collect();

    Ok(Json(responses))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Move an order one step along, or cancel it
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<OrderResponse>> {
    let restaurant = my_restaurant(&state, &claims).await?;
    let menu = menu_ids(&state, restaurant.id).await?;

    let o = order::Entity::find_by_id(order_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(&state.db)
        .await?;

    let ours = o.restaurant_id == Some(restaurant.id)
        || items.iter().any(|i| menu.contains(&i.food_item_id));
    if !ours {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    let updated = set_status(&state.db, o, payload.status).await?;
    Ok(Json(owner_order_response(updated, &items, &restaurant)))
}

// ============ Menu Management ============

#[derive(Debug, Deserialize)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

fn check_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest("Price must be zero or more".to_string()));
    }
    Ok(())
}

async fn find_own_item(
    state: &AppState,
    restaurant_id: Uuid,
    item_id: Uuid,
) -> AppResult<food_item::Model> {
    food_item::Entity::find_by_id(item_id)
        .filter(food_item::Column::RestaurantId.eq(restaurant_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))
}

/// The owner's full menu, including unavailable dishes
pub async fn list_menu(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let restaurant = my_restaurant(&state, &claims).await?;

    let items = food_item::Entity::find()
        .filter(food_item::Column::RestaurantId.eq(restaurant.id))
        .order_by_asc(food_item::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(items.into_iter().map(MenuItem::from).collect()))
}

pub async fn create_menu_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<Json<MenuItem>> {
    let restaurant = my_restaurant(&state, &claims).await?;

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    check_price(payload.price)?;

    let item = food_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant.id),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        image_url: Set(payload.image_url),
        is_available: Set(payload.is_available),
        ..Default::default()
    };

    let created = item.insert(&state.db).await?;
    Ok(Json(created.into()))
}

pub async fn update_menu_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<MenuItem>> {
    let restaurant = my_restaurant(&state, &claims).await?;
    let item = find_own_item(&state, restaurant.id, item_id).await?;

    let mut active: food_item::ActiveModel = item.into();

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        active.name = Set(name.trim().to_string());
    }

    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }

    if let Some(price) = payload.price {
        check_price(price)?;
        active.price = Set(price);
    }

    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }

    if let Some(available) = payload.is_available {
        active.is_available = Set(available);
    }

    let updated = active.update(&state.db).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let restaurant = my_restaurant(&state, &claims).await?;
    let item = find_own_item(&state, restaurant.id, item_id).await?;

    let ordered = order_item::Entity::find()
        .filter(order_item::Column::FoodItemId.eq(item.id))
        .one(&state.db)
        .await?;

    if ordered.is_some() {
        // Past orders reference the row; hide it from the menu instead
        let mut active: food_item::ActiveModel = item.into();
        active.is_available = Set(false);
        active.update(&state.db).await?;
        return Ok(Json(serde_json::json!({ "message": "Menu item has orders and was marked unavailable" })));
    }

    food_item::Entity::delete_by_id(item_id).exec(&state.db).await?;

    Ok(Json(serde_json::json!({ "message": "Menu item deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(order_id: Uuid, price: f64, quantity: i32) -> order_item::Model {
        order_item::Model {
            id: Uuid::new_v4(),
            order_id,
            food_item_id: Uuid::new_v4(),
            name: "Lechon kawali".to_string(),
            price,
            quantity,
        }
    }

    fn order_for(restaurant_id: Option<Uuid>) -> order::Model {
        order::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            restaurant_id,
            subtotal: 240.0,
            delivery_fee: 30.0,
            total: 270.0,
            shipping_address: "Poblacion • Quezon Ave".to_string(),
            contact_name: "Ana Cruz".to_string(),
            contact_phone: "09171234567".to_string(),
            payment_method: "COD".to_string(),
            status: OrderStatus::Pending,
            latitude: None,
            longitude: None,
            distance_km: None,
            eta_minutes: None,
            created_at: chrono::Utc::now().fixed_offset(),
        }
    }

    fn restaurant_named(name: &str) -> restaurant::Model {
        restaurant::Model {
            id: Uuid::new_v4(),
            owner_id: Some(Uuid::new_v4()),
            name: name.to_string(),
            address: None,
            image_url: None,
            lat: None,
            lng: None,
            is_active: true,
            created_at: chrono::Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_owner_view_names_own_restaurant_for_other_assignment() {
        let mine = restaurant_named("Lechon House");
        let o = order_for(Some(Uuid::new_v4()));
        let items = vec![item(o.id, 120.0, 2)];

        let response = owner_order_response(o, &items, &mine);

        assert_eq!(response.restaurant_name.as_deref(), Some("Lechon House"));
        assert_eq!(response.items.len(), 1);
    }

    #[test]
    fn test_owner_view_without_assignment() {
        let mine = restaurant_named("Lechon House");
        let o = order_for(None);

        let response = owner_order_response(o, &[], &mine);

        assert_eq!(response.restaurant_name.as_deref(), Some("Lechon House"));
    }

    #[test]
    fn test_restaurant_subtotal_counts_only_that_order() {
        let order_a = Uuid::new_v4();
        let order_b = Uuid::new_v4();
        let items = vec![
            item(order_a, 120.0, 2),
            item(order_a, 35.5, 1),
            item(order_b, 999.0, 1),
        ];

        assert_eq!(restaurant_subtotal(order_a, &items), 275.5);
        assert_eq!(restaurant_subtotal(Uuid::new_v4(), &items), 0.0);
    }
}
