use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{catalog, checkout, orders, owner};
use crate::middleware::auth::auth_middleware;
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::user_rate_limit::{create_checkout_governor, create_user_governor};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based limit for anonymous browsing
    let public_governor = create_public_governor();

    // Public catalog routes
    let public_routes = Router::new()
        .route("/zones", get(catalog::list_zones))
        .route("/restaurants", get(catalog::list_restaurants))
        .route("/restaurants/{id}/menu", get(catalog::restaurant_menu))
        .layer(public_governor);

    // Customer routes (requires auth)
    // Placing an order carries its own, tighter per-user limit
    let customer_routes = Router::new()
        .route("/checkout/assess", post(checkout::assess_delivery))
        .route(
            "/orders",
            post(checkout::place_order)
                .layer(create_checkout_governor())
                .get(orders::my_orders),
        )
        .route("/orders/{id}", get(orders::get_order))
        .route("/orders/{id}/cancel", post(orders::cancel_order))
        .route("/orders/{id}/received", post(orders::confirm_received))
        .layer(create_user_governor())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Restaurant owner routes (requires auth, scoped to the owner's restaurant)
    let owner_routes = Router::new()
        .route("/orders", get(owner::list_orders))
        .route("/orders/{id}/status", put(owner::update_order_status))
        .route("/menu", get(owner::list_menu).post(owner::create_menu_item))
        .route(
            "/menu/{id}",
            put(owner::update_menu_item).delete(owner::delete_menu_item),
        )
        .layer(create_user_governor())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = public_routes
        .merge(customer_routes)
        .nest("/owner", owner_routes);

    Router::new().nest("/api", api_routes).with_state(state)
}
