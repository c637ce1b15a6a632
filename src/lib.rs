//! Facade crate for courier route resolution.
//!
//! This crate re-exports the core domain types and, behind the `http`
//! feature, the HTTP routing providers.

#![forbid(unsafe_code)]

pub use courier_route_core::{
    BlockingRouteResolver, Coordinate, DEFAULT_PROVIDER_TIMEOUT, FallbackSynthesizer,
    ProviderError, ResolutionOutcome, RouteGeometryError, RouteProvider, RouteResolver,
    RouteResult, RuntimeBuildError, SynthesisConfig, TravelMode, densify, distance_meters,
    format_distance, format_duration, is_valid, polyline_length_meters, synthesize,
};

#[cfg(feature = "http")]
pub use courier_route_http::{
    GraphHopperProvider, HttpProviderConfig, OpenRouteServiceProvider, OsrmProvider,
    ProviderBuildError, ProviderChainConfig, ProviderSettings,
};
