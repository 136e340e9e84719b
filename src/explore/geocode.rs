//! Reverse geocoding
//!
//! A [`Geocoder`] turns a coordinate into zero or more [`Placemark`]s. Lookups are
//! futures so the screen can run them on the async runtime and pick the replies up
//! later. Failures never reach the user: [`region_label`] and [`tap_labels`] fall
//! back to fixed placeholder text.

use crate::async_runtime::MaybeSend;
use crate::explore::{Coordinate, ExploreError};
use instant::Duration;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;

/// Shown when the map center cannot be described
pub const REGION_FALLBACK: &str = "Some Place";
/// Title of a tapped pin without a locality
pub const LOCALITY_FALLBACK: &str = "Somewhere";
/// Subtitle of a tapped pin without a country
pub const COUNTRY_FALLBACK: &str = "Some Country";

/// Human-readable description of a location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placemark {
    pub locality: Option<String>,
    pub country: Option<String>,
    pub ocean: Option<String>,
    pub inland_water: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoder responded with HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed geocoder response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No place found at ({latitude:.5}, {longitude:.5})")]
    NotFound { latitude: f64, longitude: f64 },

    #[error("Geocoding unavailable: no async runtime to run the lookup")]
    Unavailable,
}

pub type GeocodeResult<T> = std::result::Result<T, GeocodeError>;

/// Asynchronous reverse geocoding service
pub trait Geocoder {
    /// Places describing `coordinate`, best match first.
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = GeocodeResult<Vec<Placemark>>> + MaybeSend + 'static;
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Describes a map center: ocean, else locality, else inland water, else [`REGION_FALLBACK`].
pub fn region_label(place: Option<&Placemark>) -> &str {
    place
        .and_then(|p| {
            non_empty(&p.ocean)
                .or_else(|| non_empty(&p.locality))
                .or_else(|| non_empty(&p.inland_water))
        })
        .unwrap_or(REGION_FALLBACK)
}

/// Notification text for a settled map region
pub fn region_message(place: Option<&Placemark>) -> String {
    format!("Map is centered in : {}", region_label(place))
}

/// Title and subtitle of a tapped pin: locality and country, or their fallbacks.
pub fn tap_labels(place: Option<&Placemark>) -> (String, String) {
    let locality = place
        .and_then(|p| non_empty(&p.locality))
        .unwrap_or(LOCALITY_FALLBACK);
    let country = place
        .and_then(|p| non_empty(&p.country))
        .unwrap_or(COUNTRY_FALLBACK);
    (locality.to_string(), country.to_string())
}

/// Connection settings for a Nominatim-compatible reverse geocoder
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Service root, e.g. `https://nominatim.openstreetmap.org`
    pub base_url: String,
    /// Identifies the application (required by the public instance's usage policy)
    pub user_agent: String,
    /// Per-request timeout (native only)
    pub timeout: Duration,
    /// Address detail level (3 = country ... 18 = building)
    pub zoom: u8,
    /// Preferred result language (`Accept-Language`)
    pub language: Option<String>,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
            zoom: 14,
            language: None,
        }
    }
}

impl NominatimConfig {
    /// Checks that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> crate::explore::Result<()> {
        let invalid = |reason: String| ExploreError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }
}

/// Reverse geocoder speaking the Nominatim `/reverse` API
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: Arc<NominatimConfig>,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> crate::explore::Result<Self> {
        config.validate()?;

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout);
        let client = builder.build()?;

        tracing::info!("Reverse geocoding through {}", config.base_url);
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Request URL for a coordinate
    pub fn reverse_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/reverse?format=jsonv2&lat={:.7}&lon={:.7}&zoom={}&addressdetails=1",
            self.config.base_url.trim_end_matches('/'),
            coordinate.latitude,
            coordinate.longitude,
            self.config.zoom
        )
    }
}

impl Geocoder for NominatimGeocoder {
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = GeocodeResult<Vec<Placemark>>> + MaybeSend + 'static {
        let client = self.client.clone();
        let url = self.reverse_url(coordinate);
        let language = self.config.language.clone();

        async move {
            tracing::debug!("Reverse geocoding: {url}");
            let mut request = client.get(&url);
            if let Some(language) = language {
                request = request.header(reqwest::header::ACCEPT_LANGUAGE, language);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(GeocodeError::Status {
                    status: status.as_u16(),
                });
            }

            let body = response.text().await?;
            let parsed: ReverseResponse = serde_json::from_str(&body)?;
            parsed.into_placemarks(coordinate)
        }
    }
}

/// `/reverse?format=jsonv2` response body
#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    hamlet: Option<String>,
    country: Option<String>,
    ocean: Option<String>,
    sea: Option<String>,
    water: Option<String>,
    lake: Option<String>,
    river: Option<String>,
    bay: Option<String>,
}

impl ReverseResponse {
    fn into_placemarks(self, coordinate: Coordinate) -> GeocodeResult<Vec<Placemark>> {
        if let Some(reason) = self.error {
            tracing::debug!("Geocoder found nothing: {reason}");
            return Err(GeocodeError::NotFound {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            });
        }

        let Some(address) = self.address else {
            return Ok(Vec::new());
        };

        Ok(vec![Placemark {
            locality: address
                .city
                .or(address.town)
                .or(address.village)
                .or(address.municipality)
                .or(address.hamlet),
            country: address.country,
            ocean: address.ocean.or(address.sea),
            inland_water: address
                .water
                .or(address.lake)
                .or(address.river)
                .or(address.bay),
        }])
    }
}
