//! Provider chain configuration.
//!
//! [`ProviderChainConfig`] describes which services to call and how. It
//! deserialises from any serde format and can be overlaid with
//! `COURIER_ROUTE_*` environment variables:
//!
//! | Variable | Effect |
//! | --- | --- |
//! | `COURIER_ROUTE_ORS_API_KEY` | Enables OpenRouteService with this key |
//! | `COURIER_ROUTE_ORS_URL` | OpenRouteService base URL |
//! | `COURIER_ROUTE_GRAPHHOPPER_API_KEY` | Enables GraphHopper with this key |
//! | `COURIER_ROUTE_GRAPHHOPPER_URL` | GraphHopper base URL |
//! | `COURIER_ROUTE_OSRM_URL` | OSRM base URL |
//! | `COURIER_ROUTE_TIMEOUT_SECS` | Per-provider timeout |
//! | `COURIER_ROUTE_USER_AGENT` | User agent for every request |
//! | `COURIER_ROUTE_SYNTHESIS_SEED` | Fixed seed for fallback routes |

use std::time::Duration;

use courier_route_core::{FallbackSynthesizer, RouteProvider, RouteResolver, SynthesisConfig};
use log::{debug, warn};
use serde::Deserialize;

use crate::client::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpProviderConfig, ProviderBuildError};
use crate::graphhopper::{GRAPHHOPPER_DEFAULT_BASE_URL, GraphHopperProvider};
use crate::openrouteservice::{OPENROUTESERVICE_DEFAULT_BASE_URL, OpenRouteServiceProvider};
use crate::osrm::{OSRM_DEFAULT_BASE_URL, OsrmProvider};

/// Settings for one provider. Missing values fall back to the provider's
/// defaults.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Service root overriding the public endpoint.
    pub base_url: Option<String>,
    /// Credential for keyed services.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ProviderSettings {
    fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// Which providers to call, in the fixed order OpenRouteService,
/// GraphHopper, OSRM, and how to reach them.
///
/// # Examples
/// ```
/// use courier_route_http::ProviderChainConfig;
///
/// let config: ProviderChainConfig = serde_json::from_str(
///     r#"{"osrm": {"base_url": "http://localhost:5000"}, "timeout_secs": 4}"#,
/// )?;
/// let resolver = config.build_resolver()?;
/// assert_eq!(resolver.provider_names(), vec!["osrm"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderChainConfig {
    /// OpenRouteService section; skipped without an API key.
    pub openrouteservice: Option<ProviderSettings>,
    /// GraphHopper section; skipped without an API key.
    pub graphhopper: Option<ProviderSettings>,
    /// OSRM section.
    pub osrm: Option<ProviderSettings>,
    /// Per-provider timeout in seconds.
    pub timeout_secs: u64,
    /// User agent for every request.
    pub user_agent: String,
    /// Fallback route tuning.
    pub synthesis: SynthesisConfig,
}

impl Default for ProviderChainConfig {
    /// Only the public OSRM server, with default timeouts.
    fn default() -> Self {
        Self {
            openrouteservice: None,
            graphhopper: None,
            osrm: Some(ProviderSettings::default()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl ProviderChainConfig {
    /// Defaults overlaid with `COURIER_ROUTE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().overlay(|name| std::env::var(name).ok())
    }

    /// Overlay values produced by `lookup`, keyed by environment variable
    /// name. Unparseable numbers are logged and ignored.
    #[must_use]
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let section = |slot: &mut Option<ProviderSettings>, url_var: &str, key_var: &str| {
            let base_url = lookup(url_var);
            let api_key = lookup(key_var);
            if base_url.is_none() && api_key.is_none() {
                return;
            }
            let settings = slot.get_or_insert_with(ProviderSettings::default);
            if base_url.is_some() {
                settings.base_url = base_url;
            }
            if api_key.is_some() {
                settings.api_key = api_key;
            }
        };
        section(
            &mut self.openrouteservice,
            "COURIER_ROUTE_ORS_URL",
            "COURIER_ROUTE_ORS_API_KEY",
        );
        section(
            &mut self.graphhopper,
            "COURIER_ROUTE_GRAPHHOPPER_URL",
            "COURIER_ROUTE_GRAPHHOPPER_API_KEY",
        );
        if let Some(base_url) = lookup("COURIER_ROUTE_OSRM_URL") {
            self.osrm.get_or_insert_with(ProviderSettings::default).base_url = Some(base_url);
        }
        if let Some(secs) = parse_var(&lookup, "COURIER_ROUTE_TIMEOUT_SECS") {
            self.timeout_secs = secs;
        }
        if let Some(user_agent) = lookup("COURIER_ROUTE_USER_AGENT") {
            self.user_agent = user_agent;
        }
        if let Some(seed) = parse_var(&lookup, "COURIER_ROUTE_SYNTHESIS_SEED") {
            self.synthesis.seed = Some(seed);
        }
        self
    }

    /// Per-provider timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Instantiate the configured providers in priority order.
    ///
    /// # Errors
    ///
    /// Returns an error if a base URL is invalid or an HTTP client fails to
    /// build.
    pub fn build_chain(&self) -> Result<Vec<Box<dyn RouteProvider>>, ProviderBuildError> {
        let mut chain: Vec<Box<dyn RouteProvider>> = Vec::new();
        if let Some(settings) = self.keyed("openrouteservice", self.openrouteservice.as_ref()) {
            let config = self.http_config(settings, OPENROUTESERVICE_DEFAULT_BASE_URL);
            chain.push(Box::new(OpenRouteServiceProvider::with_config(config)?));
        }
        if let Some(settings) = self.keyed("graphhopper", self.graphhopper.as_ref()) {
            let config = self.http_config(settings, GRAPHHOPPER_DEFAULT_BASE_URL);
            chain.push(Box::new(GraphHopperProvider::with_config(config)?));
        }
        if let Some(settings) = &self.osrm {
            let config = self.http_config(settings, OSRM_DEFAULT_BASE_URL);
            chain.push(Box::new(OsrmProvider::with_config(config)?));
        }
        debug!(
            "provider chain: [{}]",
            chain
                .iter()
                .map(|provider| provider.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(chain)
    }

    /// Build a [`RouteResolver`] over [`ProviderChainConfig::build_chain`].
    ///
    /// # Errors
    ///
    /// See [`ProviderChainConfig::build_chain`].
    pub fn build_resolver(&self) -> Result<RouteResolver, ProviderBuildError> {
        Ok(RouteResolver::new(self.build_chain()?)
            .with_timeout(self.timeout())
            .with_synthesizer(FallbackSynthesizer::new(self.synthesis.clone())))
    }

    fn keyed<'a>(
        &self,
        name: &str,
        settings: Option<&'a ProviderSettings>,
    ) -> Option<&'a ProviderSettings> {
        let settings = settings?;
        if settings.has_key() {
            Some(settings)
        } else {
            warn!("{name} configured without an API key; skipping");
            None
        }
    }

    fn http_config(&self, settings: &ProviderSettings, default_url: &str) -> HttpProviderConfig {
        let base_url = settings.base_url.as_deref().unwrap_or(default_url);
        let config = HttpProviderConfig::new(base_url)
            .with_timeout(self.timeout())
            .with_user_agent(self.user_agent.as_str());
        match &settings.api_key {
            Some(key) => config.with_api_key(key.as_str()),
            None => config,
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {name}: '{raw}' is not a valid number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use rstest::rstest;

    fn overlay(vars: &[(&str, &str)]) -> ProviderChainConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ProviderChainConfig::default().overlay(|name| vars.get(name).cloned())
    }

    fn names(config: &ProviderChainConfig) -> Vec<String> {
        config
            .build_chain()
            .expect("chain should build")
            .iter()
            .map(|provider| provider.name().to_owned())
            .collect()
    }

    #[rstest]
    fn default_chain_is_public_osrm() {
        let config = ProviderChainConfig::default();
        assert_eq!(names(&config), vec!["osrm"]);
        assert_eq!(config.timeout(), Duration::from_secs(8));
    }

    #[rstest]
    fn keys_enable_providers_in_priority_order() {
        let config = overlay(&[
            ("COURIER_ROUTE_GRAPHHOPPER_API_KEY", "gh"),
            ("COURIER_ROUTE_ORS_API_KEY", "ors"),
        ]);
        assert_eq!(names(&config), vec!["openrouteservice", "graphhopper", "osrm"]);
    }

    #[rstest]
    fn keyed_provider_without_key_is_skipped() {
        let config = overlay(&[("COURIER_ROUTE_ORS_URL", "http://ors.internal")]);
        assert!(config.openrouteservice.is_some());
        assert_eq!(names(&config), vec!["osrm"]);
    }

    #[rstest]
    fn overlay_sets_scalars() {
        let config = overlay(&[
            ("COURIER_ROUTE_TIMEOUT_SECS", " 3 "),
            ("COURIER_ROUTE_USER_AGENT", "dispatch/2.0"),
            ("COURIER_ROUTE_SYNTHESIS_SEED", "99"),
            ("COURIER_ROUTE_OSRM_URL", "http://localhost:5000"),
        ]);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent, "dispatch/2.0");
        assert_eq!(config.synthesis.seed, Some(99));
        assert_eq!(
            config.osrm.and_then(|osrm| osrm.base_url).as_deref(),
            Some("http://localhost:5000")
        );
    }

    #[rstest]
    fn bad_numbers_are_ignored() {
        let config = overlay(&[("COURIER_ROUTE_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[rstest]
    fn deserialises_partial_document() {
        let config: ProviderChainConfig = serde_json::from_str(
            r#"{
                "graphhopper": {"api_key": "gh"},
                "osrm": null,
                "synthesis": {"seed": 5}
            }"#,
        )
        .expect("config should deserialise");
        assert_eq!(names(&config), vec!["graphhopper"]);
        assert_eq!(config.synthesis.seed, Some(5));
        assert_eq!(config.synthesis.detour_factor, 1.4);
    }

    #[rstest]
    fn invalid_base_url_fails_to_build() {
        let config = overlay(&[("COURIER_ROUTE_OSRM_URL", "::nope::")]);
        assert!(matches!(
            config.build_chain(),
            Err(ProviderBuildError::InvalidBaseUrl { .. })
        ));
    }

    #[rstest]
    fn resolver_carries_timeout() {
        let config = overlay(&[("COURIER_ROUTE_TIMEOUT_SECS", "2")]);
        let resolver = config.build_resolver().expect("resolver should build");
        assert_eq!(resolver.timeout(), Duration::from_secs(2));
    }

    #[rstest]
    fn debug_hides_keys() {
        let config = overlay(&[("COURIER_ROUTE_ORS_API_KEY", "hunter2")]);
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
