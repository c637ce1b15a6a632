//! Test doubles for [`RouteProvider`].
//!
//! [`StubRouteProvider`] answers every request with a canned route or error;
//! [`StallingProvider`] sleeps before failing so timeout handling can be
//! exercised. Neither touches the network.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::provider::{ProviderError, RouteProvider, ensure_routable};
use crate::{Coordinate, RouteResult, TravelMode, distance_meters};

/// Shared count of `fetch_route` calls made on a stub.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Number of calls seen so far.
    #[must_use]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
enum StubResponse {
    StraightLine,
    Route(RouteResult),
    Error(ProviderError),
}

/// Provider returning pre-configured responses.
///
/// # Example
///
/// ```
/// use courier_route_core::test_support::StubRouteProvider;
/// use courier_route_core::provider::RouteProvider;
///
/// let provider = StubRouteProvider::straight_line("stub");
/// assert_eq!(provider.name(), "stub");
/// assert_eq!(provider.call_counter().get(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct StubRouteProvider {
    name: String,
    response: StubResponse,
    calls: CallCounter,
}

impl StubRouteProvider {
    /// Answer with a two-point route straight between the endpoints,
    /// travelled at one metre per second.
    #[must_use]
    pub fn straight_line(name: impl Into<String>) -> Self {
        Self::new(name, StubResponse::StraightLine)
    }

    /// Answer every request with `route`, whatever the endpoints.
    #[must_use]
    pub fn with_route(name: impl Into<String>, route: RouteResult) -> Self {
        Self::new(name, StubResponse::Route(route))
    }

    /// Answer every valid request with `error`.
    #[must_use]
    pub fn failing(name: impl Into<String>, error: ProviderError) -> Self {
        Self::new(name, StubResponse::Error(error))
    }

    /// Handle observing how often this stub was called.
    #[must_use]
    pub fn call_counter(&self) -> CallCounter {
        self.calls.clone()
    }

    fn new(name: impl Into<String>, response: StubResponse) -> Self {
        Self {
            name: name.into(),
            response,
            calls: CallCounter::default(),
        }
    }
}

#[async_trait]
impl RouteProvider for StubRouteProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        _mode: TravelMode,
    ) -> Result<RouteResult, ProviderError> {
        self.calls.bump();
        ensure_routable(start, end)?;
        match &self.response {
            StubResponse::StraightLine => {
                let distance = distance_meters(start, end);
                RouteResult::authoritative(
                    start,
                    end,
                    vec![start, end],
                    distance,
                    Duration::from_secs_f64(distance),
                )
                .map_err(|err| ProviderError::geometry(&self.name, &err))
            }
            StubResponse::Route(route) => Ok(route.clone()),
            StubResponse::Error(err) => Err(err.clone()),
        }
    }
}

/// Provider that waits before reporting a network error.
#[derive(Debug, Clone)]
pub struct StallingProvider {
    name: String,
    delay: Duration,
}

impl StallingProvider {
    /// Stall for `delay` on every request.
    #[must_use]
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

#[async_trait]
impl RouteProvider for StallingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_route(
        &self,
        _start: Coordinate,
        _end: Coordinate,
        _mode: TravelMode,
    ) -> Result<RouteResult, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Err(ProviderError::Network {
            provider: self.name.clone(),
            message: "stalled".to_owned(),
        })
    }
}

/// An authoritative route holding a single point, which the resolver must
/// reject.
#[must_use]
pub fn single_point_route(point: Coordinate) -> RouteResult {
    RouteResult::from_parts(vec![point], 0.0, Duration::ZERO, true)
}
