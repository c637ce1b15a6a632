//! HTTP routing providers for `courier-route-core`.
//!
//! Each adapter implements [`courier_route_core::RouteProvider`] for one
//! service:
//!
//! - [`OsrmProvider`]: OSRM Route service, no key required.
//! - [`GraphHopperProvider`]: GraphHopper Routing API, key required.
//! - [`OpenRouteServiceProvider`]: OpenRouteService Directions API, key
//!   required.
//!
//! Adapters send one GET per call, bounded by
//! [`HttpProviderConfig::timeout`], and never retry. [`ProviderChainConfig`]
//! assembles them into a ready-to-use
//! [`RouteResolver`](courier_route_core::RouteResolver).
//!
//! # Example
//!
//! ```no_run
//! use courier_route_core::{Coordinate, TravelMode};
//! use courier_route_http::ProviderChainConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ProviderChainConfig::from_env().build_resolver()?;
//! let route = resolver
//!     .resolve(
//!         Coordinate::new(36.8065, 10.1815),
//!         Coordinate::new(36.8188, 10.1658),
//!         TravelMode::Cycling,
//!     )
//!     .await;
//! println!("{} points", route.polyline().len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod chain;
mod client;
pub mod geometry;
mod graphhopper;
mod openrouteservice;
mod osrm;

pub use chain::{ProviderChainConfig, ProviderSettings};
pub use client::{
    DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpProviderConfig,
    ProviderBuildError,
};
pub use graphhopper::{
    GRAPHHOPPER_DEFAULT_BASE_URL, GraphHopperPath, GraphHopperProvider, GraphHopperResponse,
};
pub use openrouteservice::{
    DirectionsError, DirectionsFeature, DirectionsResponse, FeatureProperties,
    OPENROUTESERVICE_DEFAULT_BASE_URL, OpenRouteServiceProvider, Summary,
};
pub use osrm::{OSRM_DEFAULT_BASE_URL, OsrmProvider, OsrmRoute, RouteResponse};
