//! Maps service client
//!
//! This module provides HTTP client functionality for the three maps
//! endpoints the assistant depends on: geocoding, directions, and
//! nearby-place search. Geocoding results and route durations are cached
//! with jittered TTLs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::TripTimeError;
use crate::cache;
use crate::config::TripTimeConfig;
use crate::models::{Coordinate, GeocodeCandidate, PlaceSuggestion, TravelMode};

/// The three maps operations the assistant orchestrates.
///
/// Implementations report transport or service failures as errors; the
/// resolver layer decides how failures degrade.
#[async_trait]
pub trait MapsService: Send + Sync {
    /// Geocode a free-text place description into ranked candidates
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeCandidate>>;

    /// Fetch the duration text of the first leg of the first route,
    /// or `None` when the service finds no route
    async fn route_duration(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
    ) -> Result<Option<String>>;

    /// Search for places near a coordinate matching a keyword,
    /// in service-ranked order
    async fn places_nearby(
        &self,
        anchor: &Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<PlaceSuggestion>>;
}

/// Maps API client for the Google Maps web services
#[derive(Debug)]
pub struct GoogleMapsClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
    geocode_ttl: Duration,
    route_ttl: Duration,
}

impl GoogleMapsClient {
    /// Create a new maps client from configuration
    pub fn new(config: &TripTimeConfig) -> Result<Self> {
        let api_key = config
            .maps
            .api_key
            .clone()
            .ok_or_else(|| TripTimeError::config("Maps API key is not configured"))?;

        let timeout = Duration::from_secs(config.maps.timeout_seconds.into());
        let base_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("TripTime/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.maps.max_retries);
        let client = ClientBuilder::new(base_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.maps.base_url.trim_end_matches('/').to_string(),
            api_key,
            geocode_ttl: Duration::from_secs(u64::from(config.cache.geocode_ttl_hours) * 3600),
            route_ttl: Duration::from_secs(u64::from(config.cache.route_ttl_hours) * 3600),
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TripTimeError::maps(format!("Maps request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TripTimeError::maps(format!(
                "Maps request failed with status {status}"
            ))
            .into());
        }

        let parsed = response
            .json()
            .await
            .with_context(|| "Failed to parse maps service response")?;
        Ok(parsed)
    }
}

#[async_trait]
impl MapsService for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeCandidate>> {
        let cache_key = format!("geocode:{}", address.trim().to_lowercase());
        if let Some(cached) = cache::get::<Vec<GeocodeCandidate>>(&cache_key).await {
            return Ok(cached);
        }

        let url = format!(
            "{}/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            self.api_key
        );

        debug!("Geocoding '{}'", address);
        let response: google::GeocodeResponse = self.fetch_json(&url).await?;

        if !response.status.is_usable() {
            return Err(TripTimeError::maps(format!(
                "Geocoding failed with service status {}",
                response.status.0
            ))
            .into());
        }

        let candidates: Vec<GeocodeCandidate> = response
            .results
            .into_iter()
            .map(|result| GeocodeCandidate {
                coordinate: Coordinate::new(
                    result.geometry.location.lat,
                    result.geometry.location.lng,
                ),
                formatted_address: result.formatted_address,
            })
            .collect();

        if candidates.is_empty() {
            warn!("No geocoding candidates for '{}'", address);
        } else {
            info!("Found {} geocoding candidates for '{}'", candidates.len(), address);
        }

        cache::put(&cache_key, candidates.clone(), cache::jittered(self.geocode_ttl)).await;
        Ok(candidates)
    }

    #[instrument(skip(self))]
    async fn route_duration(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
    ) -> Result<Option<String>> {
        let cache_key = format!(
            "route:{}-{}:{}",
            origin.cache_key(),
            destination.cache_key(),
            mode
        );
        if let Some(cached) = cache::get::<String>(&cache_key).await {
            return Ok(Some(cached));
        }

        let url = format!(
            "{}/directions/json?origin={}&destination={}&mode={}&key={}",
            self.base_url,
            origin.as_latlng_param(),
            destination.as_latlng_param(),
            mode,
            self.api_key
        );

        debug!("Fetching directions ({} mode)", mode);
        let response: google::DirectionsResponse = self.fetch_json(&url).await?;

        if !response.status.is_usable() {
            return Err(TripTimeError::maps(format!(
                "Directions failed with service status {}",
                response.status.0
            ))
            .into());
        }

        let duration = response
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .map(|leg| leg.duration.text);

        match &duration {
            Some(text) => {
                info!("Route duration: {}", text);
                cache::put(&cache_key, text.clone(), cache::jittered(self.route_ttl)).await;
            }
            None => warn!("No route found for {} mode", mode),
        }

        Ok(duration)
    }

    #[instrument(skip(self))]
    async fn places_nearby(
        &self,
        anchor: &Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<PlaceSuggestion>> {
        let url = format!(
            "{}/place/nearbysearch/json?location={}&radius={}&keyword={}&key={}",
            self.base_url,
            anchor.as_latlng_param(),
            radius_m,
            urlencoding::encode(keyword),
            self.api_key
        );

        debug!("Searching places near {} for '{}'", anchor.as_latlng_param(), keyword);
        let response: google::PlacesResponse = self.fetch_json(&url).await?;

        if !response.status.is_usable() {
            return Err(TripTimeError::maps(format!(
                "Nearby search failed with service status {}",
                response.status.0
            ))
            .into());
        }

        let suggestions: Vec<PlaceSuggestion> = response
            .results
            .into_iter()
            .map(|place| PlaceSuggestion {
                name: place.name,
                vicinity: place.vicinity.unwrap_or_default(),
            })
            .collect();

        info!("Found {} places near '{}'", suggestions.len(), keyword);
        Ok(suggestions)
    }
}

/// Google Maps web service response structures
mod google {
    use serde::Deserialize;

    /// Service-level status carried in every response body.
    ///
    /// `ZERO_RESULTS` is an empty answer, not a failure.
    #[derive(Debug, Deserialize)]
    pub struct ServiceStatus(pub String);

    impl ServiceStatus {
        pub fn is_usable(&self) -> bool {
            matches!(self.0.as_str(), "OK" | "ZERO_RESULTS")
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        pub status: ServiceStatus,
        #[serde(default)]
        pub results: Vec<GeocodeResult>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResult {
        pub geometry: Geometry,
        pub formatted_address: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub location: LatLng,
    }

    #[derive(Debug, Deserialize)]
    pub struct LatLng {
        pub lat: f64,
        pub lng: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct DirectionsResponse {
        pub status: ServiceStatus,
        #[serde(default)]
        pub routes: Vec<Route>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Route {
        #[serde(default)]
        pub legs: Vec<Leg>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Leg {
        pub duration: TextValue,
    }

    #[derive(Debug, Deserialize)]
    pub struct TextValue {
        pub text: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct PlacesResponse {
        pub status: ServiceStatus,
        #[serde(default)]
        pub results: Vec<PlaceResult>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PlaceResult {
        pub name: String,
        pub vicinity: Option<String>,
    }
}
