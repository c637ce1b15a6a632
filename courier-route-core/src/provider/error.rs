use thiserror::Error;

use crate::RouteGeometryError;

/// Errors from [`crate::provider::RouteProvider::fetch_route`].
///
/// Every variant is recoverable from the resolver's point of view; the
/// distinction only matters for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// An endpoint failed coordinate validation; no request was sent.
    #[error("start or end coordinate is invalid")]
    InvalidCoordinate,
    /// The provider did not answer within the per-call timeout.
    #[error("{provider} did not respond within {timeout_secs}s")]
    Timeout {
        /// Provider name.
        provider: String,
        /// Timeout that elapsed, in whole seconds.
        timeout_secs: u64,
    },
    /// The request could not be sent or the connection failed.
    #[error("{provider} request failed: {message}")]
    Network {
        /// Provider name.
        provider: String,
        /// Transport error description.
        message: String,
    },
    /// The provider answered with a non-success HTTP status.
    #[error("{provider} returned HTTP {status}")]
    HttpStatus {
        /// Provider name.
        provider: String,
        /// HTTP status code.
        status: u16,
    },
    /// The provider reported an error in its response body.
    #[error("{provider} reported {code}: {message}")]
    Service {
        /// Provider name.
        provider: String,
        /// Provider-specific error code.
        code: String,
        /// Provider-supplied message, possibly empty.
        message: String,
    },
    /// The response body could not be decoded or held unusable values.
    #[error("{provider} returned an unreadable response: {message}")]
    Parse {
        /// Provider name.
        provider: String,
        /// Decoder or validation message.
        message: String,
    },
    /// The response decoded but contained no route.
    #[error("{provider} found no route")]
    NoRoute {
        /// Provider name.
        provider: String,
    },
}

impl ProviderError {
    /// Wrap a geometry validation failure as a parse error for `provider`.
    #[must_use]
    pub fn geometry(provider: &str, err: &RouteGeometryError) -> Self {
        match err {
            RouteGeometryError::Empty => Self::NoRoute {
                provider: provider.to_owned(),
            },
            other => Self::Parse {
                provider: provider.to_owned(),
                message: other.to_string(),
            },
        }
    }
}
