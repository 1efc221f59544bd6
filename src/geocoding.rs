//! Address lookup and driving distance from the map provider.
//!
//! The checkout only consumes what comes back as [`LocationSignal`]s; when no
//! provider is configured or a call fails, checkout carries on without it.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::checkout::LocationSignal;
use crate::utils::geo::{Coordinate, GeoError};

/// Address component types that name the customer's area, most specific first.
const AREA_COMPONENT_TYPES: [&str; 4] = [
    "sublocality_level_1",
    "sublocality",
    "neighborhood",
    "administrative_area_level_3",
];

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("geocoding unavailable: {0}")]
    Unavailable(String),
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no results for {0}")]
    NoResults(String),
    #[error("provider returned an invalid coordinate: {0}")]
    InvalidCoordinate(#[from] GeoError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrivingDistance {
    pub meters: f64,
    pub duration_text: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Address text to coordinate.
    async fn forward(&self, address: &str) -> Result<LocationSignal, GeocodingError>;
    /// Coordinate to address components, notably the area name.
    async fn reverse(&self, coordinate: Coordinate) -> Result<LocationSignal, GeocodingError>;
    async fn driving_distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DrivingDistance, GeocodingError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: f64,
}

fn check_status(status: &str, error_message: Option<String>, query: &str) -> Result<(), GeocodingError> {
    match status {
        "OK" => Ok(()),
        "ZERO_RESULTS" | "NOT_FOUND" => Err(GeocodingError::NoResults(query.to_string())),
        other => Err(GeocodingError::Unavailable(
            error_message.unwrap_or_else(|| other.to_string()),
        )),
    }
}

fn area_from(components: &[AddressComponent]) -> Option<String> {
    AREA_COMPONENT_TYPES.iter().find_map(|wanted| {
        components
            .iter()
            .find(|c| c.types.iter().any(|t| t == wanted))
            .map(|c| c.long_name.clone())
    })
}

fn latlng(coordinate: Coordinate) -> String {
    format!("{},{}", coordinate.latitude(), coordinate.longitude())
}

/// Google Maps Geocoding and Distance Matrix client.
#[derive(Clone)]
pub struct GoogleMapsGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleMapsGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn geocode(&self, param: (&str, &str)) -> Result<LocationSignal, GeocodingError> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let response: GeocodeResponse = self
            .client
            .get(&url)
            .query(&[param, ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        check_status(&response.status, response.error_message, param.1)?;

        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NoResults(param.1.to_string()))?;
        let location = first.geometry.location;

        Ok(LocationSignal {
            coordinate: Some(Coordinate::new(location.lat, location.lng)?),
            formatted_address: first.formatted_address,
            area_name: area_from(&first.address_components),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Geocoder for GoogleMapsGeocoder {
    async fn forward(&self, address: &str) -> Result<LocationSignal, GeocodingError> {
        self.geocode(("address", address)).await
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<LocationSignal, GeocodingError> {
        self.geocode(("latlng", &latlng(coordinate))).await
    }

    async fn driving_distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DrivingDistance, GeocodingError> {
        let url = format!("{}/maps/api/distancematrix/json", self.base_url);
        let origins = latlng(origin);
        let destinations = latlng(destination);

        let response: DistanceMatrixResponse = self
            .client
            .get(&url)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("mode", "driving"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        check_status(&response.status, response.error_message, &destinations)?;

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| GeocodingError::NoResults(destinations.clone()))?;
        check_status(&element.status, None, &destinations)?;

        let distance = element
            .distance
            .ok_or_else(|| GeocodingError::NoResults(destinations.clone()))?;

        Ok(DrivingDistance {
            meters: distance.value,
            duration_text: element.duration.map(|d| d.text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> GoogleMapsGeocoder {
        GoogleMapsGeocoder::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap()
    }

    fn tibanga_result() -> serde_json::Value {
        json!({
            "status": "OK",
            "results": [{
                "formatted_address": "Tibanga, Iligan City, Lanao del Norte",
                "geometry": { "location": { "lat": 8.2412, "lng": 124.2437 } },
                "address_components": [
                    { "long_name": "Iligan City", "short_name": "Iligan", "types": ["locality", "political"] },
                    { "long_name": "Tibanga", "short_name": "Tibanga", "types": ["sublocality_level_1", "sublocality", "political"] }
                ]
            }]
        })
    }

    #[tokio::test]
    async fn test_forward_geocode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .and(query_param("address", "Tibanga, Iligan"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tibanga_result()))
            .mount(&server)
            .await;

        let signal = geocoder(&server).forward("Tibanga, Iligan").await.unwrap();

        assert_eq!(signal.coordinate, Some(Coordinate::new(8.2412, 124.2437).unwrap()));
        assert_eq!(signal.area_name.as_deref(), Some("Tibanga"));
        assert_eq!(
            signal.formatted_address.as_deref(),
            Some("Tibanga, Iligan City, Lanao del Norte")
        );
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .and(query_param("latlng", "8.2412,124.2437"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tibanga_result()))
            .mount(&server)
            .await;

        let here = Coordinate::new(8.2412, 124.2437).unwrap();
        let signal = geocoder(&server).reverse(here).await.unwrap();

        assert_eq!(signal.area_name.as_deref(), Some("Tibanga"));
    }

    #[tokio::test]
    async fn test_zero_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
            )
            .mount(&server)
            .await;

        let result = geocoder(&server).forward("nowhere").await;
        assert!(matches!(result, Err(GeocodingError::NoResults(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn test_denied_request_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid."
            })))
            .mount(&server)
            .await;

        let result = geocoder(&server).forward("Tibanga").await;
        match result {
            Err(GeocodingError::Unavailable(msg)) => assert!(msg.contains("API key")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = geocoder(&server).forward("Tibanga").await;
        assert!(matches!(result, Err(GeocodingError::Http(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn test_driving_distance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/distancematrix/json"))
            .and(query_param("origins", "8.228,124.2452"))
            .and(query_param("destinations", "8.2412,124.2437"))
            .and(query_param("mode", "driving"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "rows": [{ "elements": [{
                    "status": "OK",
                    "distance": { "text": "3.2 km", "value": 3200 },
                    "duration": { "text": "9 mins", "value": 540 }
                }]}]
            })))
            .mount(&server)
            .await;

        let origin = Coordinate::new(8.228, 124.2452).unwrap();
        let destination = Coordinate::new(8.2412, 124.2437).unwrap();
        let route = geocoder(&server)
            .driving_distance(origin, destination)
            .await
            .unwrap();

        assert_eq!(
            route,
            DrivingDistance {
                meters: 3200.0,
                duration_text: Some("9 mins".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_unroutable_destination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/distancematrix/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "rows": [{ "elements": [{ "status": "ZERO_RESULTS" }] }]
            })))
            .mount(&server)
            .await;

        let here = Coordinate::new(8.2, 124.2).unwrap();
        let result = geocoder(&server).driving_distance(here, here).await;
        assert!(matches!(result, Err(GeocodingError::NoResults(_))), "got {result:?}");
    }
}
