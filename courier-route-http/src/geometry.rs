//! GeoJSON geometry shared by the provider payloads.

use std::time::Duration;

use courier_route_core::provider::duration_from_secs;
use courier_route_core::{Coordinate, ProviderError, RouteResult};
use serde::Deserialize;

/// A GeoJSON `LineString`: `[longitude, latitude]` pairs, optionally with
/// elevation as a third element.
#[derive(Debug, Deserialize)]
pub struct LineString {
    /// Positions in longitude-first order.
    pub coordinates: Vec<Vec<f64>>,
}

impl LineString {
    /// Convert the positions into coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Parse`] when a position has fewer than two
    /// elements.
    pub fn to_coordinates(&self, provider: &str) -> Result<Vec<Coordinate>, ProviderError> {
        self.coordinates
            .iter()
            .enumerate()
            .map(|(index, position)| match position.as_slice() {
                [longitude, latitude, ..] => Ok(Coordinate::new(*latitude, *longitude)),
                _ => Err(ProviderError::Parse {
                    provider: provider.to_owned(),
                    message: format!("position {index} has fewer than two elements"),
                }),
            })
            .collect()
    }
}

/// Validate a decoded route and anchor it onto the requested endpoints.
pub(crate) fn authoritative_route(
    provider: &str,
    start: Coordinate,
    end: Coordinate,
    geometry: &LineString,
    distance_meters: f64,
    duration_secs: f64,
) -> Result<RouteResult, ProviderError> {
    let points = geometry.to_coordinates(provider)?;
    if points.len() < 2 {
        return Err(ProviderError::NoRoute {
            provider: provider.to_owned(),
        });
    }
    let duration: Duration =
        duration_from_secs(duration_secs).ok_or_else(|| ProviderError::Parse {
            provider: provider.to_owned(),
            message: format!("duration {duration_secs} is not a non-negative finite number"),
        })?;
    RouteResult::authoritative(start, end, points, distance_meters, duration)
        .map_err(|err| ProviderError::geometry(provider, &err))
}
