//! Resolved routes and the outcome of a resolution.
//!
//! A [`RouteResult`] always holds at least two points whose ends match the
//! requested pickup and drop-off. Provider geometry enters through
//! [`RouteResult::authoritative`]; locally generated paths come from the
//! [`FallbackSynthesizer`](crate::FallbackSynthesizer).

use std::time::Duration;

use geo::{BoundingRect, LineString, Rect};
use thiserror::Error;

use crate::{Coordinate, distance_meters};

/// Snapped provider endpoints closer than this to the requested point are
/// replaced by it; further ones get the requested point prepended/appended.
pub const ENDPOINT_TOLERANCE_M: f64 = 1.0;

/// Errors returned by [`RouteResult::authoritative`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteGeometryError {
    /// The provider returned no coordinates.
    #[error("route geometry is empty")]
    Empty,
    /// A coordinate was out of range or not finite.
    #[error("route geometry contains an invalid coordinate at index {index}")]
    InvalidPoint {
        /// Position of the first offending coordinate.
        index: usize,
    },
    /// The reported distance was negative or not finite.
    #[error("route distance {0} is not a non-negative finite number")]
    InvalidDistance(f64),
    /// A stored route held fewer than two points.
    #[error("route needs at least two points, got {0}")]
    TooFewPoints(usize),
}

/// A travel path with its length and expected travel time.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use courier_route_core::{Coordinate, RouteResult};
///
/// let start = Coordinate::new(36.8065, 10.1815);
/// let end = Coordinate::new(36.8188, 10.1658);
/// let route = RouteResult::authoritative(
///     start,
///     end,
///     vec![start, Coordinate::new(36.81, 10.17), end],
///     2_100.0,
///     Duration::from_secs(300),
/// )?;
/// assert!(route.is_authoritative());
/// assert_eq!(route.polyline().first(), Some(&start));
/// assert_eq!(route.polyline().last(), Some(&end));
/// # Ok::<(), courier_route_core::RouteGeometryError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "StoredRoute"))]
pub struct RouteResult {
    polyline: Vec<Coordinate>,
    distance_meters: f64,
    duration: Duration,
    is_authoritative: bool,
}

impl RouteResult {
    /// Build a route from provider geometry.
    ///
    /// The requested `start` and `end` are anchored onto the geometry: a
    /// snapped endpoint within [`ENDPOINT_TOLERANCE_M`] is replaced by the
    /// requested point, a more distant one is kept and the requested point
    /// added beyond it.
    ///
    /// # Errors
    ///
    /// Returns [`RouteGeometryError`] when the geometry is empty, contains an
    /// invalid coordinate, or the distance is negative or not finite.
    pub fn authoritative(
        start: Coordinate,
        end: Coordinate,
        geometry: Vec<Coordinate>,
        distance_meters: f64,
        duration: Duration,
    ) -> Result<Self, RouteGeometryError> {
        if geometry.is_empty() {
            return Err(RouteGeometryError::Empty);
        }
        check_geometry(&geometry, distance_meters)?;
        Ok(Self {
            polyline: anchor_endpoints(start, end, geometry),
            distance_meters,
            duration,
            is_authoritative: true,
        })
    }

    /// Build a locally generated route. The polyline is taken as-is.
    pub(crate) fn synthesized(
        polyline: Vec<Coordinate>,
        distance_meters: f64,
        duration: Duration,
    ) -> Self {
        Self::from_parts(polyline, distance_meters, duration, false)
    }

    pub(crate) const fn from_parts(
        polyline: Vec<Coordinate>,
        distance_meters: f64,
        duration: Duration,
        is_authoritative: bool,
    ) -> Self {
        Self {
            polyline,
            distance_meters,
            duration,
            is_authoritative,
        }
    }

    /// Ordered points from pickup to drop-off.
    #[must_use]
    pub fn polyline(&self) -> &[Coordinate] {
        &self.polyline
    }

    /// Consume the route, returning its points.
    #[must_use]
    pub fn into_polyline(self) -> Vec<Coordinate> {
        self.polyline
    }

    /// Travel distance in metres.
    #[must_use]
    pub const fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Expected travel time.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Expected travel time in (fractional) seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    /// `true` when a routing provider produced the route, `false` when it
    /// was synthesised locally.
    #[must_use]
    pub const fn is_authoritative(&self) -> bool {
        self.is_authoritative
    }

    /// The polyline as a `geo` line string (`x = longitude`).
    #[must_use]
    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.polyline.iter().copied().map(Into::into).collect())
    }

    /// Smallest rectangle enclosing the polyline, for fitting a map view.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.to_line_string().bounding_rect()
    }
}

fn check_geometry(points: &[Coordinate], distance_meters: f64) -> Result<(), RouteGeometryError> {
    if let Some(index) = points.iter().position(|point| !point.is_valid()) {
        return Err(RouteGeometryError::InvalidPoint { index });
    }
    if !distance_meters.is_finite() || distance_meters < 0.0 {
        return Err(RouteGeometryError::InvalidDistance(distance_meters));
    }
    Ok(())
}

/// Wire shape of a [`RouteResult`], checked before it becomes one.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct StoredRoute {
    polyline: Vec<Coordinate>,
    distance_meters: f64,
    duration: Duration,
    is_authoritative: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<StoredRoute> for RouteResult {
    type Error = RouteGeometryError;

    fn try_from(stored: StoredRoute) -> Result<Self, Self::Error> {
        if stored.polyline.len() < 2 {
            return Err(RouteGeometryError::TooFewPoints(stored.polyline.len()));
        }
        check_geometry(&stored.polyline, stored.distance_meters)?;
        Ok(Self::from_parts(
            stored.polyline,
            stored.distance_meters,
            stored.duration,
            stored.is_authoritative,
        ))
    }
}

fn anchor_endpoints(
    start: Coordinate,
    end: Coordinate,
    geometry: Vec<Coordinate>,
) -> Vec<Coordinate> {
    let mut polyline = Vec::with_capacity(geometry.len() + 2);
    polyline.push(start);
    let mut points = geometry.into_iter().peekable();
    if points
        .peek()
        .is_some_and(|first| distance_meters(*first, start) <= ENDPOINT_TOLERANCE_M)
    {
        points.next();
    }
    polyline.extend(points);
    if polyline.len() > 1
        && polyline
            .last()
            .is_some_and(|last| distance_meters(*last, end) <= ENDPOINT_TOLERANCE_M)
    {
        polyline.pop();
    }
    polyline.push(end);
    polyline
}

/// What [`RouteResolver`](crate::RouteResolver) produced.
///
/// There is no failure variant: when every provider fails the resolver
/// synthesises a route and reports it as [`ResolutionOutcome::Degraded`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// A provider answered.
    Success(RouteResult),
    /// Every provider failed or the input was unusable; the route is an
    /// approximation.
    Degraded(RouteResult),
}

impl ResolutionOutcome {
    /// Borrow the route regardless of how it was obtained.
    #[must_use]
    pub const fn route(&self) -> &RouteResult {
        match self {
            Self::Success(route) | Self::Degraded(route) => route,
        }
    }

    /// Take the route regardless of how it was obtained.
    #[must_use]
    pub fn into_route(self) -> RouteResult {
        match self {
            Self::Success(route) | Self::Degraded(route) => route,
        }
    }

    /// Whether the route had to be synthesised.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}
