//! Provider chain with guaranteed fallback.

use std::time::Duration;

use log::{debug, info, warn};

use crate::provider::{ProviderError, RouteProvider};
use crate::{Coordinate, FallbackSynthesizer, ResolutionOutcome, RouteResult, TravelMode};

/// Per-provider time budget used unless [`RouteResolver::with_timeout`]
/// overrides it.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(8);

/// Resolves routes by trying providers in order and synthesising a path
/// when none of them answers.
///
/// Providers are consulted one at a time, in the order given, and the first
/// success wins. A provider that errors, exceeds the timeout or returns a
/// polyline with fewer than two points is skipped. When the endpoints are
/// invalid the chain is not consulted at all.
///
/// Dropping the future returned by [`RouteResolver::resolve`] cancels any
/// request in flight.
///
/// # Examples
/// ```
/// use courier_route_core::{Coordinate, RouteResolver, TravelMode};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
/// let resolver = RouteResolver::new(Vec::new());
/// let route = resolver
///     .resolve(
///         Coordinate::new(36.8065, 10.1815),
///         Coordinate::new(36.8188, 10.1658),
///         TravelMode::Walking,
///     )
///     .await;
/// assert!(!route.is_authoritative());
/// # });
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RouteResolver {
    providers: Vec<Box<dyn RouteProvider>>,
    timeout: Duration,
    synthesizer: FallbackSynthesizer,
}

impl std::fmt::Debug for RouteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteResolver")
            .field("providers", &self.provider_names())
            .field("timeout", &self.timeout)
            .field("synthesizer", &self.synthesizer)
            .finish()
    }
}

impl RouteResolver {
    /// Create a resolver over `providers`, highest priority first.
    #[must_use]
    pub fn new(providers: Vec<Box<dyn RouteProvider>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            synthesizer: FallbackSynthesizer::default(),
        }
    }

    /// Bound every provider call by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use `synthesizer` for fallback routes.
    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: FallbackSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Provider names in the order they are tried.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    /// The per-provider timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The fallback synthesizer.
    #[must_use]
    pub const fn synthesizer(&self) -> &FallbackSynthesizer {
        &self.synthesizer
    }

    /// Resolve a route, discarding whether it was degraded.
    pub async fn resolve(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TravelMode,
    ) -> RouteResult {
        self.resolve_outcome(start, end, mode).await.into_route()
    }

    /// Resolve a route and report whether a provider produced it.
    ///
    /// Never fails: exhaustion of the chain yields
    /// [`ResolutionOutcome::Degraded`].
    pub async fn resolve_outcome(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TravelMode,
    ) -> ResolutionOutcome {
        if !(start.is_valid() && end.is_valid()) {
            warn!("invalid endpoints {start:?} -> {end:?}; synthesising route");
            return ResolutionOutcome::Degraded(self.synthesizer.synthesize(start, end, mode));
        }

        for provider in &self.providers {
            match self.attempt(provider.as_ref(), start, end, mode).await {
                Ok(route) => {
                    info!(
                        "{} resolved {mode} route: {:.0} m, {} points",
                        provider.name(),
                        route.distance_meters(),
                        route.polyline().len()
                    );
                    return ResolutionOutcome::Success(route);
                }
                Err(err) => warn!("{} failed: {err}", provider.name()),
            }
        }

        warn!(
            "all {} providers failed; synthesising {mode} route",
            self.providers.len()
        );
        ResolutionOutcome::Degraded(self.synthesizer.synthesize(start, end, mode))
    }

    async fn attempt(
        &self,
        provider: &dyn RouteProvider,
        start: Coordinate,
        end: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteResult, ProviderError> {
        debug!("trying {} for {mode} route", provider.name());
        let route = tokio::time::timeout(self.timeout, provider.fetch_route(start, end, mode))
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: provider.name().to_owned(),
                timeout_secs: self.timeout.as_secs(),
            })??;
        if route.polyline().len() < 2 {
            return Err(ProviderError::NoRoute {
                provider: provider.name().to_owned(),
            });
        }
        Ok(route)
    }
}
