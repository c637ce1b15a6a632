//! Fetch road routes from external routing services.
//!
//! The [`RouteProvider`] trait abstracts one routing backend. Adapters take
//! a pickup, a drop-off and a [`TravelMode`](crate::TravelMode) and return a
//! normalised [`RouteResult`](crate::RouteResult) or a [`ProviderError`].
//!
//! Failures are expected and recoverable: the
//! [`RouteResolver`](crate::RouteResolver) moves on to the next provider.

mod error;
mod source;

pub use error::ProviderError;
pub use source::{RouteProvider, duration_from_secs, ensure_routable};
