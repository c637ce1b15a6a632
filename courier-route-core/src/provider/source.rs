//! Route provider trait and shared normalisation helpers.

use std::time::Duration;

use async_trait::async_trait;

use crate::{Coordinate, RouteResult, TravelMode};

use super::error::ProviderError;

/// Fetch a road route between two coordinates from one routing backend.
///
/// Implementations issue at most one request per call and never retry;
/// retries and fallbacks belong to the
/// [`RouteResolver`](crate::RouteResolver). They must reject invalid
/// endpoints with [`ProviderError::InvalidCoordinate`] before touching the
/// network (see [`ensure_routable`]) and report every other failure as an
/// `Err` rather than panicking. Providers hold no per-call state, so a
/// single instance may serve concurrent resolutions.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use courier_route_core::{Coordinate, RouteResult, TravelMode, distance_meters};
/// use courier_route_core::provider::{ProviderError, RouteProvider, ensure_routable};
///
/// struct StraightLine;
///
/// #[async_trait]
/// impl RouteProvider for StraightLine {
///     fn name(&self) -> &str {
///         "straight-line"
///     }
///
///     async fn fetch_route(
///         &self,
///         start: Coordinate,
///         end: Coordinate,
///         _mode: TravelMode,
///     ) -> Result<RouteResult, ProviderError> {
///         ensure_routable(start, end)?;
///         RouteResult::authoritative(
///             start,
///             end,
///             vec![start, end],
///             distance_meters(start, end),
///             Duration::from_secs(60),
///         )
///         .map_err(|err| ProviderError::geometry(self.name(), &err))
///     }
/// }
/// ```
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Short, stable identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch a route from `start` to `end` for `mode`.
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteResult, ProviderError>;
}

#[async_trait]
impl<P> RouteProvider for Box<P>
where
    P: RouteProvider + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteResult, ProviderError> {
        (**self).fetch_route(start, end, mode).await
    }
}

/// Fail with [`ProviderError::InvalidCoordinate`] unless both endpoints are
/// valid.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidCoordinate`] when either coordinate fails
/// [`is_valid`](crate::is_valid).
pub fn ensure_routable(start: Coordinate, end: Coordinate) -> Result<(), ProviderError> {
    if start.is_valid() && end.is_valid() {
        Ok(())
    } else {
        Err(ProviderError::InvalidCoordinate)
    }
}

/// Convert a provider-reported number of seconds into a [`Duration`].
///
/// Negative, NaN and infinite values yield `None` instead of panicking in
/// [`Duration::from_secs_f64`].
#[must_use]
pub fn duration_from_secs(seconds: f64) -> Option<Duration> {
    Some(seconds)
        .filter(|&v| v >= 0.0 && v.is_finite())
        .and_then(|v| Duration::try_from_secs_f64(v).ok())
}
