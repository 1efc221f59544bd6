pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod delivery;
pub mod entities;
pub mod error;
pub mod geocoding;
pub mod handlers;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

use geocoding::Geocoder;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    /// Unset when no maps API key is configured; checkout then relies on typed areas.
    pub geocoder: Option<Arc<dyn Geocoder>>,
}
