use std::env;
use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;

use crate::checkout::CheckoutSettings;
use crate::delivery::FeeSchedule;
use crate::orders::StatusFilter;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub checkout: CheckoutSettings,
    pub google_maps_api_key: Option<String>,
    pub google_maps_base_url: String,
    pub geocoder_timeout: Duration,
    /// Owner dashboard filter when the request does not pick one.
    pub owner_status_filter: StatusFilter,
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|e| panic!("{key} is invalid: {e:?}")),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = FeeSchedule::default();
        let fees = FeeSchedule {
            unknown_fee: env_or("DELIVERY_FEE_UNKNOWN", defaults.unknown_fee),
            tier1_max_km: env_or("DELIVERY_FEE_TIER1_MAX_KM", defaults.tier1_max_km),
            tier1_fee: env_or("DELIVERY_FEE_TIER1", defaults.tier1_fee),
            tier2_max_km: env_or("DELIVERY_FEE_TIER2_MAX_KM", defaults.tier2_max_km),
            tier2_fee: env_or("DELIVERY_FEE_TIER2", defaults.tier2_fee),
            tier3_fee: env_or("DELIVERY_FEE_TIER3", defaults.tier3_fee),
            average_speed_kmph: env_or("AVERAGE_SPEED_KMPH", defaults.average_speed_kmph),
            min_eta_minutes: env_or("MIN_ETA_MINUTES", defaults.min_eta_minutes),
        };

        let checkout = CheckoutSettings {
            fees,
            zone_strategy: env_or("ZONE_STRATEGY", Default::default()),
            distance_strategy: env_or("DISTANCE_STRATEGY", Default::default()),
            submit_timeout: Duration::from_secs(env_or("SUBMIT_TIMEOUT_SECS", 10)),
            locality: env::var("ADDRESS_LOCALITY").ok().filter(|s| !s.is_empty()),
            area_label: env::var("ADDRESS_AREA_LABEL").ok().filter(|s| !s.is_empty()),
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env_or("SERVER_PORT", 3000),
            checkout,
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY").ok().filter(|s| !s.is_empty()),
            google_maps_base_url: env::var("GOOGLE_MAPS_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com".to_string()),
            geocoder_timeout: Duration::from_secs(env_or("GEOCODER_TIMEOUT_SECS", 5)),
            owner_status_filter: env_or("OWNER_STATUS_FILTER", StatusFilter::All),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
