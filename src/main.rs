use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use food_delivery_backend::{
    config::Config,
    db,
    geocoding::{Geocoder, GoogleMapsGeocoder},
    middleware::rate_limit::{create_global_governor, log_request},
    routes, AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "food_delivery_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Connect to database
    let db = db::connect(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    // Run migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Migrations complete");

    let geocoder = build_geocoder(&config);

    let state = AppState {
        db,
        config: config.clone(),
        geocoder,
    };

    // Outermost first: trace, CORS, per-IP limit, request log
    let app = routes::create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(create_global_governor())
            .layer(middleware::from_fn(log_request)),
    );

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}

fn build_geocoder(config: &Config) -> Option<Arc<dyn Geocoder>> {
    let Some(api_key) = config.google_maps_api_key.as_deref() else {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set, geocoding disabled");
        return None;
    };

    match GoogleMapsGeocoder::new(&config.google_maps_base_url, api_key, config.geocoder_timeout) {
        Ok(geocoder) => Some(Arc::new(geocoder)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build geocoder, geocoding disabled");
            None
        }
    }
}
