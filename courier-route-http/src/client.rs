//! Shared HTTP plumbing for the provider adapters.

use std::time::Duration;

use courier_route_core::ProviderError;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

/// Default user agent for routing requests.
pub const DEFAULT_USER_AGENT: &str = "courier-route/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Default cap on response bodies. A single route is far below this.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Query parameters whose values must never reach the logs.
const SECRET_PARAMS: [&str; 2] = ["key", "api_key"];

/// Error type for provider construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// The configured base URL does not parse.
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
    /// The provider requires an API key and none was configured.
    MissingApiKey {
        /// Provider name.
        provider: &'static str,
    },
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::InvalidBaseUrl { url, source } => {
                write!(f, "invalid base URL '{url}': {source}")
            }
            Self::MissingApiKey { provider } => write!(f, "{provider} requires an API key"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::InvalidBaseUrl { source, .. } => Some(source),
            Self::MissingApiKey { .. } => None,
        }
    }
}

/// Connection settings shared by every adapter.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use courier_route_http::HttpProviderConfig;
///
/// let config = HttpProviderConfig::new("https://api.openrouteservice.org")
///     .with_api_key("secret")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// assert_eq!(config.api_key.as_deref(), Some("secret"));
/// ```
#[derive(Clone)]
pub struct HttpProviderConfig {
    /// Service root, e.g. `"https://router.project-osrm.org"`.
    pub base_url: String,
    /// Request timeout, applied to connecting and to the whole exchange.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Credential for services that need one.
    pub api_key: Option<String>,
    /// Responses larger than this are rejected before decoding.
    pub max_body_bytes: usize,
}

impl std::fmt::Debug for HttpProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProviderConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl HttpProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            api_key: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the largest accepted response body in bytes.
    #[must_use]
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

/// A configured reqwest client bound to one provider.
#[derive(Debug)]
pub(crate) struct ProviderClient {
    name: &'static str,
    client: Client,
    base_url: Url,
    timeout: Duration,
    api_key: Option<String>,
    max_body_bytes: usize,
}

impl ProviderClient {
    pub(crate) fn build(
        name: &'static str,
        config: HttpProviderConfig,
    ) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            name,
            client,
            base_url,
            timeout: config.timeout,
            api_key: config.api_key.filter(|key| !key.is_empty()),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Like [`ProviderClient::build`] but fails without an API key.
    pub(crate) fn build_keyed(
        name: &'static str,
        config: HttpProviderConfig,
    ) -> Result<Self, ProviderBuildError> {
        let client = Self::build(name, config)?;
        if client.api_key.is_none() {
            return Err(ProviderBuildError::MissingApiKey { provider: name });
        }
        Ok(client)
    }

    pub(crate) const fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    /// The base URL with `segments` appended to its path.
    pub(crate) fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET `url` and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        debug!("{} GET {}", self.name, redact(&url));
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                provider: self.name.to_owned(),
                status: status.as_u16(),
            });
        }
        let declared = response
            .content_length()
            .and_then(|len| usize::try_from(len).ok());
        if declared.is_some_and(|len| len > self.max_body_bytes) {
            return Err(self.oversized_body());
        }
        let mut body = Vec::with_capacity(declared.unwrap_or_default().min(self.max_body_bytes));
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.oversized_body());
            }
            body.extend_from_slice(&chunk);
        }
        serde_json::from_slice(&body).map_err(|err| ProviderError::Parse {
            provider: self.name.to_owned(),
            message: err.to_string(),
        })
    }

    fn oversized_body(&self) -> ProviderError {
        ProviderError::Parse {
            provider: self.name.to_owned(),
            message: format!("response body exceeds {} bytes", self.max_body_bytes),
        }
    }

    /// Convert a reqwest error to a [`ProviderError`].
    ///
    /// Messages are built without the request URL so credentials carried in
    /// the query string never surface in errors.
    fn convert_reqwest_error(&self, error: &reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                provider: self.name.to_owned(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProviderError::HttpStatus {
                provider: self.name.to_owned(),
                status: status.as_u16(),
            };
        }

        let kind = if error.is_connect() {
            "connection failed"
        } else if error.is_decode() || error.is_body() {
            "response body could not be read"
        } else {
            "request failed"
        };
        ProviderError::Network {
            provider: self.name.to_owned(),
            message: kind.to_owned(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ProviderBuildError> {
    let url = Url::parse(raw).map_err(|source| ProviderBuildError::InvalidBaseUrl {
        url: raw.to_owned(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ProviderBuildError::InvalidBaseUrl {
            url: raw.to_owned(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }
    Ok(url)
}

/// Render `url` with secret query values replaced.
pub(crate) fn redact(url: &Url) -> String {
    let mut safe = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if SECRET_PARAMS.iter().any(|secret| *secret == name) {
                "REDACTED".to_owned()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    if !pairs.is_empty() {
        safe.query_pairs_mut().clear().extend_pairs(pairs);
    }
    safe.to_string()
}
