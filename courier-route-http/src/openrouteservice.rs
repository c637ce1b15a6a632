//! OpenRouteService Directions API adapter (GeoJSON GET endpoint).
//!
//! See: <https://openrouteservice.org/dev/#/api-docs/v2/directions>

use async_trait::async_trait;
use courier_route_core::provider::ensure_routable;
use courier_route_core::{Coordinate, ProviderError, RouteProvider, RouteResult, TravelMode};
use serde::Deserialize;
use url::Url;

use crate::client::{HttpProviderConfig, ProviderBuildError, ProviderClient};
use crate::geometry::{LineString, authoritative_route};

/// Hosted OpenRouteService API.
pub const OPENROUTESERVICE_DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

const NAME: &str = "openrouteservice";

/// Directions response as a GeoJSON `FeatureCollection`.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    /// One feature per route.
    #[serde(default)]
    pub features: Vec<DirectionsFeature>,
    /// Error object, present on failure.
    pub error: Option<DirectionsError>,
}

/// One route of a [`DirectionsResponse`].
#[derive(Debug, Deserialize)]
pub struct DirectionsFeature {
    /// Route geometry.
    pub geometry: LineString,
    /// Route metadata.
    pub properties: FeatureProperties,
}

/// Properties of a [`DirectionsFeature`].
#[derive(Debug, Deserialize)]
pub struct FeatureProperties {
    /// Totals for the whole route.
    pub summary: Summary,
}

/// Route totals. Zero values are omitted by the service.
#[derive(Debug, Default, Deserialize)]
pub struct Summary {
    /// Length in metres.
    #[serde(default)]
    pub distance: f64,
    /// Travel time in seconds.
    #[serde(default)]
    pub duration: f64,
}

/// Error body returned by OpenRouteService.
///
/// The service sends either `{"code": 2010, "message": "..."}` or a bare
/// string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DirectionsError {
    /// Structured error.
    Detailed {
        /// Numeric error code.
        code: i64,
        /// Human-readable description.
        #[serde(default)]
        message: String,
    },
    /// Plain text error.
    Text(String),
}

/// Routes from the OpenRouteService API. Requires an API key.
///
/// # Example
///
/// ```
/// use courier_route_core::{Coordinate, TravelMode};
/// use courier_route_http::OpenRouteServiceProvider;
///
/// let provider = OpenRouteServiceProvider::new("secret")?;
/// let url = provider.build_url(
///     Coordinate::new(36.8065, 10.1815),
///     Coordinate::new(36.8188, 10.1658),
///     TravelMode::Driving,
/// );
/// assert!(url.path().ends_with("/v2/directions/driving-car"));
/// # Ok::<(), courier_route_http::ProviderBuildError>(())
/// ```
#[derive(Debug)]
pub struct OpenRouteServiceProvider {
    client: ProviderClient,
}

impl OpenRouteServiceProvider {
    /// Create a provider for the hosted API with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client fails to
    /// build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(
            HttpProviderConfig::new(OPENROUTESERVICE_DEFAULT_BASE_URL).with_api_key(api_key),
        )
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError::MissingApiKey`] when no key is
    /// configured, or an error if the base URL is invalid or the HTTP client
    /// fails to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            client: ProviderClient::build_keyed(NAME, config)?,
        })
    }

    /// OpenRouteService profile name for `mode`.
    #[must_use]
    pub const fn profile(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Driving => "driving-car",
            TravelMode::Cycling => "cycling-regular",
            TravelMode::Walking => "foot-walking",
        }
    }

    /// Build the directions request URL.
    #[must_use]
    pub fn build_url(&self, start: Coordinate, end: Coordinate, mode: TravelMode) -> Url {
        let mut url = self
            .client
            .endpoint(["v2", "directions", Self::profile(mode)]);
        url.query_pairs_mut()
            .append_pair("api_key", self.client.api_key())
            .append_pair(
                "start",
                &format!("{},{}", start.longitude, start.latitude),
            )
            .append_pair("end", &format!("{},{}", end.longitude, end.latitude));
        url
    }

    /// Convert a directions response to a [`RouteResult`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Service`] when the body carries an error,
    /// [`ProviderError::NoRoute`] when no feature is present and
    /// [`ProviderError::Parse`] for malformed values.
    pub fn convert_response(
        start: Coordinate,
        end: Coordinate,
        response: DirectionsResponse,
    ) -> Result<RouteResult, ProviderError> {
        if let Some(error) = response.error {
            let (code, message) = match error {
                DirectionsError::Detailed { code, message } => (code.to_string(), message),
                DirectionsError::Text(message) => ("error".to_owned(), message),
            };
            return Err(ProviderError::Service {
                provider: NAME.to_owned(),
                code,
                message,
            });
        }
        let feature = response
            .features
            .first()
            .ok_or_else(|| ProviderError::NoRoute {
                provider: NAME.to_owned(),
            })?;
        let summary = &feature.properties.summary;
        authoritative_route(
            NAME,
            start,
            end,
            &feature.geometry,
            summary.distance,
            summary.duration,
        )
    }
}

#[async_trait]
impl RouteProvider for OpenRouteServiceProvider {
    fn name(&self) -> &str {
        self.client.name()
    }

    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteResult, ProviderError> {
        ensure_routable(start, end)?;
        let response: DirectionsResponse = self
            .client
            .get_json(self.build_url(start, end, mode))
            .await?;
        Self::convert_response(start, end, response)
    }
}
