//! Synchronous access to [`RouteResolver`].
//!
//! Callers without an async context wrap a resolver in
//! [`BlockingRouteResolver`]. When invoked from inside a multi-threaded
//! Tokio runtime it reuses that runtime through
//! [`tokio::task::block_in_place`]; everywhere else it drives the request on
//! a private `current_thread` runtime built once at construction.

use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use crate::{Coordinate, ResolutionOutcome, RouteResolver, RouteResult, TravelMode};

/// Error returned when the private Tokio runtime cannot be built.
#[derive(Debug, Error)]
#[error("failed to build Tokio runtime: {0}")]
pub struct RuntimeBuildError(#[source] std::io::Error);

/// Blocking facade over a [`RouteResolver`].
///
/// # Runtime requirements
///
/// Inside a `current_thread` runtime the call falls back to the private
/// runtime, blocking the caller's executor until the request completes.
/// Providers that depend on IO driven by that executor will then time out
/// and the result degrades to a synthesised route.
///
/// # Examples
/// ```
/// use courier_route_core::{BlockingRouteResolver, Coordinate, RouteResolver, TravelMode};
///
/// let resolver = BlockingRouteResolver::new(RouteResolver::new(Vec::new()))?;
/// let route = resolver.resolve(
///     Coordinate::new(36.8065, 10.1815),
///     Coordinate::new(36.8188, 10.1658),
///     TravelMode::Cycling,
/// );
/// assert!(route.polyline().len() >= 2);
/// # Ok::<(), courier_route_core::RuntimeBuildError>(())
/// ```
pub struct BlockingRouteResolver {
    inner: RouteResolver,
    runtime: Runtime,
}

impl std::fmt::Debug for BlockingRouteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingRouteResolver")
            .field("inner", &self.inner)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BlockingRouteResolver {
    /// Wrap `inner`, building the fallback runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeBuildError`] if the Tokio runtime fails to build.
    pub fn new(inner: RouteResolver) -> Result<Self, RuntimeBuildError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RuntimeBuildError)?;
        Ok(Self { inner, runtime })
    }

    /// The wrapped async resolver.
    #[must_use]
    pub const fn inner(&self) -> &RouteResolver {
        &self.inner
    }

    /// Blocking [`RouteResolver::resolve`].
    #[must_use]
    pub fn resolve(&self, start: Coordinate, end: Coordinate, mode: TravelMode) -> RouteResult {
        self.resolve_outcome(start, end, mode).into_route()
    }

    /// Blocking [`RouteResolver::resolve_outcome`].
    #[must_use]
    pub fn resolve_outcome(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: TravelMode,
    ) -> ResolutionOutcome {
        let future = self.inner.resolve_outcome(start, end, mode);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime, or a current_thread one: block_in_place would panic.
            _ => self.runtime.block_on(future),
        }
    }
}
