//! Transport configuration.
//!
//! The base endpoint is injected into a transport when it is constructed;
//! nothing in the crate reads it from global state. A config can be built in
//! code, parsed from TOML, or read from the environment.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::TransportError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "CATALOG_TIMEOUT_SECS";

/// Settings for constructing a transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Base endpoint every resource path is resolved against,
    /// e.g. `https://api.example.com/api/v1/`.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Millisecond-precision timeout; takes precedence over `timeout_secs`.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            timeout_ms: None,
            user_agent: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        // Sub-millisecond durations round up so only a true zero is rejected.
        self.timeout_ms = Some(if millis == 0 && !timeout.is_zero() { 1 } else { millis });
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Parse a config from a TOML document. Unknown keys are rejected.
    pub fn from_toml_str(source: &str) -> Result<Self, TransportError> {
        toml::from_str(source).map_err(|e| invalid(format!("config: {e}")))
    }

    /// Read `CATALOG_BASE_URL` and optionally `CATALOG_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, TransportError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TransportError> {
        let base_url = lookup(ENV_BASE_URL).ok_or_else(|| invalid(format!("{ENV_BASE_URL} is not set")))?;
        let mut config = Self::new(base_url);
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|e| invalid(format!("{ENV_TIMEOUT_SECS}={raw:?}: {e}")))?;
        }
        Ok(config)
    }

    /// The validated base endpoint, normalized to end with `/` so relative
    /// resource paths resolve beneath it.
    pub fn endpoint(&self) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("base url {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "base url {:?}: unsupported scheme {:?}",
                self.base_url,
                url.scheme()
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid(format!(
                "base url {:?}: must not carry a query or fragment",
                self.base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Result<Duration, TransportError> {
        match self.timeout_ms {
            Some(0) => Err(invalid("timeout_ms must be greater than zero".to_string())),
            Some(ms) => Ok(Duration::from_millis(ms)),
            None if self.timeout_secs == 0 => Err(invalid("timeout_secs must be greater than zero".to_string())),
            None => Ok(Duration::from_secs(self.timeout_secs)),
        }
    }
}

fn invalid(msg: String) -> TransportError {
    TransportError::InvalidConfiguration(msg)
}
