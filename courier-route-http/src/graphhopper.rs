//! GraphHopper Routing API adapter.
//!
//! See: <https://docs.graphhopper.com/#tag/Routing-API>

use async_trait::async_trait;
use courier_route_core::provider::ensure_routable;
use courier_route_core::{Coordinate, ProviderError, RouteProvider, RouteResult, TravelMode};
use serde::Deserialize;
use url::Url;

use crate::client::{HttpProviderConfig, ProviderBuildError, ProviderClient};
use crate::geometry::{LineString, authoritative_route};

/// Hosted GraphHopper API.
pub const GRAPHHOPPER_DEFAULT_BASE_URL: &str = "https://graphhopper.com/api/1";

const NAME: &str = "graphhopper";

/// GraphHopper route response.
#[derive(Debug, Deserialize)]
pub struct GraphHopperResponse {
    /// Alternative paths, best first.
    #[serde(default)]
    pub paths: Vec<GraphHopperPath>,
    /// Error description, present on failure.
    pub message: Option<String>,
}

/// One path of a [`GraphHopperResponse`].
#[derive(Debug, Deserialize)]
pub struct GraphHopperPath {
    /// Unencoded geometry (`points_encoded=false`).
    pub points: LineString,
    /// Length in metres.
    pub distance: f64,
    /// Travel time in milliseconds.
    pub time: f64,
}

/// Routes from the GraphHopper API. Requires an API key.
///
/// # Example
///
/// ```
/// use courier_route_http::{GraphHopperProvider, HttpProviderConfig};
///
/// let missing_key = GraphHopperProvider::with_config(HttpProviderConfig::new(
///     "https://graphhopper.com/api/1",
/// ));
/// assert!(missing_key.is_err());
/// ```
#[derive(Debug)]
pub struct GraphHopperProvider {
    client: ProviderClient,
}

impl GraphHopperProvider {
    /// Create a provider for the hosted API with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client fails to
    /// build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(
            HttpProviderConfig::new(GRAPHHOPPER_DEFAULT_BASE_URL).with_api_key(api_key),
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

    /// GraphHopper profile name for `mode`.
    #[must_use]
    pub const fn profile(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Driving => "car",
            TravelMode::Cycling => "bike",
            TravelMode::Walking => "foot",
        }
    }

    /// Build the route request URL.
    #[must_use]
    pub fn build_url(&self, start: Coordinate, end: Coordinate, mode: TravelMode) -> Url {
        let mut url = self.client.endpoint(["route"]);
        url.query_pairs_mut()
            .append_pair(
                "point",
                &format!("{},{}", start.latitude, start.longitude),
            )
            .append_pair("point", &format!("{},{}", end.latitude, end.longitude))
            .append_pair("profile", Self::profile(mode))
            .append_pair("points_encoded", "false")
            .append_pair("key", self.client.api_key());
        url
    }

    /// Convert a GraphHopper response to a [`RouteResult`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Service`] when the body carries an error
    /// message, [`ProviderError::NoRoute`] when no path is present and
    /// [`ProviderError::Parse`] for malformed values.
    pub fn convert_response(
        start: Coordinate,
        end: Coordinate,
        response: GraphHopperResponse,
    ) -> Result<RouteResult, ProviderError> {
        let Some(path) = response.paths.first() else {
            return Err(match response.message {
                Some(message) => ProviderError::Service {
                    provider: NAME.to_owned(),
                    code: "error".to_owned(),
                    message,
                },
                None => ProviderError::NoRoute {
                    provider: NAME.to_owned(),
                },
            });
        };
        authoritative_route(
            NAME,
            start,
            end,
            &path.points,
            path.distance,
            path.time / 1000.0,
        )
    }
}

#[async_trait]
impl RouteProvider for GraphHopperProvider {
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
        let response: GraphHopperResponse = self
            .client
            .get_json(self.build_url(start, end, mode))
            .await?;
        Self::convert_response(start, end, response)
    }
}
