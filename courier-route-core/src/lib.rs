//! Core route resolution for courier deliveries.
//!
//! Given a pickup, a drop-off and a [`TravelMode`], the
//! [`RouteResolver`] asks each configured [`provider::RouteProvider`] in
//! turn for a road route and, when every one of them fails, falls back to a
//! deterministic [`FallbackSynthesizer`] path. Resolution never fails: the
//! caller always receives a [`RouteResult`] with at least two points.
//!
//! Supporting pieces are usable on their own: [`distance_meters`] and the
//! formatting helpers in [`geodesy`], coordinate validation with
//! [`is_valid`], and polyline densification with [`densify`].
//!
//! HTTP adapters for concrete routing services live in the
//! `courier-route-http` crate.

#![forbid(unsafe_code)]

mod blocking;
mod coordinate;
pub mod geodesy;
mod interpolate;
mod mode;
pub mod provider;
mod resolver;
mod route;
mod synthesis;

#[doc(hidden)]
pub mod test_support;

pub use blocking::{BlockingRouteResolver, RuntimeBuildError};
pub use coordinate::{Coordinate, is_valid};
pub use geodesy::{
    EARTH_RADIUS_M, distance_meters, format_distance, format_duration, polyline_length_meters,
};
pub use interpolate::densify;
pub use mode::TravelMode;
pub use provider::{ProviderError, RouteProvider};
pub use resolver::{DEFAULT_PROVIDER_TIMEOUT, RouteResolver};
pub use route::{ENDPOINT_TOLERANCE_M, ResolutionOutcome, RouteGeometryError, RouteResult};
pub use synthesis::{DEFAULT_REFERENCE, FallbackSynthesizer, SynthesisConfig, synthesize};
