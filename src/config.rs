//! Configuration types for the lazylink client.
//!
//! [`ClientConfig`] holds everything a client needs before it makes its
//! first request: the API version advertised in the `Accept` header, an
//! optional base URL for resolving path-absolute links, the connect/read
//! timeout pair, and the debug switch that short-circuits the transport
//! with stubbed fixtures.
//!
//! # Example
//!
//! ```rust
//! use lazylink::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .api_version("2")
//!     .base_url("https://api.example/api/v2/")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url(), Some("https://api.example/api/v2"));
//! ```

use std::time::Duration;

use crate::error::UrlError;
use crate::urls;

/// Default connect timeout applied when building the HTTP client.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3200);
/// Default per-request read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(9600);

/// Configuration for an [`ApiClient`](crate::ApiClient).
///
/// Construct via [`ClientConfig::builder`]; the builder validates the base
/// URL at build time so a misconfigured client fails fast instead of on
/// its first request.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_version: Option<String>,
    base_url: Option<String>,
    connect_timeout: Duration,
    read_timeout: Duration,
    debug_enabled: bool,
}

impl ClientConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API version string, if configured.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Returns the canonical base URL, if configured.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the per-request read timeout.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Returns `true` if stubbed fixtures short-circuit the transport.
    #[must_use]
    pub const fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_version: None,
            base_url: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            debug_enabled: false,
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug, Default)]
pub struct ClientConfigBuilder {
    api_version: Option<String>,
    base_url: Option<String>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    debug_enabled: bool,
}

impl ClientConfigBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API version advertised in the `Accept` header.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the base URL. Any full URL works; it is truncated to its API
    /// base (first three path segments) at build time.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the per-request read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Enables the debug transport short-circuit.
    #[must_use]
    pub const fn debug_enabled(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError`] if the base URL cannot be validated.
    pub fn build(self) -> Result<ClientConfig, UrlError> {
        let base_url = match self.base_url {
            Some(url) => Some(urls::api_base(&url)?),
            None => None,
        };
        Ok(ClientConfig {
            api_version: self.api_version,
            base_url,
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT),
            debug_enabled: self.debug_enabled,
        })
    }
}
