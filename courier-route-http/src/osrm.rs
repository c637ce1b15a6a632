//! OSRM Route service adapter.
//!
//! Issues `GET {base}/route/v1/{profile}/{lng},{lat};{lng},{lat}` with full
//! GeoJSON overview geometry and reads the first route of the response.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use async_trait::async_trait;
use courier_route_core::provider::ensure_routable;
use courier_route_core::{Coordinate, ProviderError, RouteProvider, RouteResult, TravelMode};
use serde::Deserialize;
use url::Url;

use crate::client::{HttpProviderConfig, ProviderBuildError, ProviderClient};
use crate::geometry::{LineString, authoritative_route};

/// Public OSRM demo server.
pub const OSRM_DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

const NAME: &str = "osrm";

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route found between the points
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route of a [`RouteResponse`].
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Overview geometry.
    pub geometry: LineString,
    /// Length in metres.
    pub distance: f64,
    /// Travel time in seconds.
    pub duration: f64,
}

/// Routes from an OSRM server.
///
/// # Example
///
/// ```
/// use courier_route_core::{Coordinate, TravelMode};
/// use courier_route_http::OsrmProvider;
///
/// let provider = OsrmProvider::new("http://localhost:5000")?;
/// let url = provider.build_url(
///     Coordinate::new(36.8065, 10.1815),
///     Coordinate::new(36.8188, 10.1658),
///     TravelMode::Walking,
/// );
/// assert_eq!(
///     url.as_str(),
///     "http://localhost:5000/route/v1/foot/10.1815,36.8065;10.1658,36.8188?overview=full&geometries=geojson",
/// );
/// # Ok::<(), courier_route_http::ProviderBuildError>(())
/// ```
#[derive(Debug)]
pub struct OsrmProvider {
    client: ProviderClient,
}

impl OsrmProvider {
    /// Create a provider with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration. No API key is needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            client: ProviderClient::build(NAME, config)?,
        })
    }

    /// OSRM profile name for `mode`.
    #[must_use]
    pub const fn profile(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Driving => "driving",
            TravelMode::Cycling => "cycling",
            TravelMode::Walking => "foot",
        }
    }

    /// Build the Route API URL for a single leg.
    #[must_use]
    pub fn build_url(&self, start: Coordinate, end: Coordinate, mode: TravelMode) -> Url {
        let coordinates = format!(
            "{},{};{},{}",
            start.longitude, start.latitude, end.longitude, end.latitude
        );
        let mut url = self
            .client
            .endpoint(["route", "v1", Self::profile(mode), coordinates.as_str()]);
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson");
        url
    }

    /// Convert an OSRM response to a [`RouteResult`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Service`] for a non-`"Ok"` code,
    /// [`ProviderError::NoRoute`] when no route is present and
    /// [`ProviderError::Parse`] for malformed values.
    pub fn convert_response(
        start: Coordinate,
        end: Coordinate,
        response: RouteResponse,
    ) -> Result<RouteResult, ProviderError> {
        if !response.is_ok() {
            return Err(ProviderError::Service {
                provider: NAME.to_owned(),
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }
        let route = response
            .routes
            .first()
            .ok_or_else(|| ProviderError::NoRoute {
                provider: NAME.to_owned(),
            })?;
        authoritative_route(
            NAME,
            start,
            end,
            &route.geometry,
            route.distance,
            route.duration,
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmProvider {
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
        let response: RouteResponse = self
            .client
            .get_json(self.build_url(start, end, mode))
            .await?;
        Self::convert_response(start, end, response)
    }
}
