//! Configuration for the HAL client.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `root_endpoint` | `""` | Absolute URI of the API entry point (required) |
//! | `max_retries` | 3 | Maximum retry attempts |
//! | `retry_delay_ms` | 1000 | Base delay between retries |
//! | `request_timeout_ms` | 30000 | Per-attempt timeout |
//! | `enable_logging` | false | Log retried requests |
//! | `proxy_url` | `""` | Proxy for all requests, if set |
//! | `max_total_connections` | 100 | Idle connections kept per host |
//! | `resolve_relative_links` | true | Resolve hrefs against `root_endpoint` |
//!
//! # Examples
//!
//! ```
//! use hal_http::ClientConfig;
//!
//! let config = ClientConfig {
//!     root_endpoint: "http://host.com/api/".into(),
//!     max_retries: 5,
//!     ..Default::default()
//! };
//! assert_eq!(config.retry_delay_ms, 1000);
//! assert!(config.root_uri().is_ok());
//! ```

use crate::error::{HalError, Result};
use std::time::Duration;
use url::Url;

/// Configuration for a [`HalClient`](crate::HalClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute URI of the API root. Relative hrefs are resolved against it.
    pub root_endpoint: String,

    /// Maximum retries for failed requests.
    ///
    /// Only retryable failures (timeouts, transport errors, 408/425/429/502/503/504)
    /// are retried.
    pub max_retries: u32,

    /// Base retry delay in milliseconds, doubled on every attempt.
    pub retry_delay_ms: u64,

    /// Timeout for a single attempt in milliseconds.
    pub request_timeout_ms: u64,

    /// Log a warning for every retried request.
    pub enable_logging: bool,

    /// Proxy URL applied to all requests. Empty means no proxy.
    pub proxy_url: String,

    /// Maximum idle connections kept per host.
    pub max_total_connections: u32,

    /// Resolve link hrefs against `root_endpoint` before use.
    pub resolve_relative_links: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            root_endpoint: String::new(),
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_ms: 30000,
            enable_logging: false,
            proxy_url: String::new(),
            max_total_connections: 100,
            resolve_relative_links: true,
        }
    }
}

impl ClientConfig {
    /// Config for the given root endpoint with every other option at its default.
    pub fn for_root(root_endpoint: impl Into<String>) -> Self {
        ClientConfig {
            root_endpoint: root_endpoint.into(),
            ..Default::default()
        }
    }

    /// Parse `root_endpoint`.
    ///
    /// # Errors
    ///
    /// [`HalError::Configuration`] when it is empty or not an absolute URI.
    pub fn root_uri(&self) -> Result<Url> {
        if self.root_endpoint.is_empty() {
            return Err(HalError::Configuration(
                "root_endpoint must be set".to_string(),
            ));
        }
        Url::parse(&self.root_endpoint).map_err(|e| {
            HalError::Configuration(format!(
                "root_endpoint '{}' is not an absolute URI: {}",
                self.root_endpoint, e
            ))
        })
    }

    /// `request_timeout_ms` as a [`Duration`].
    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 1000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_total_connections, 100);
        assert!(config.resolve_relative_links);
        assert!(!config.enable_logging);
    }

    #[test]
    fn test_missing_root_is_configuration_error() {
        assert!(matches!(
            ClientConfig::default().root_uri(),
            Err(HalError::Configuration(_))
        ));
        assert!(matches!(
            ClientConfig::for_root("/relative/only").root_uri(),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_root_uri_parses() {
        let root = ClientConfig::for_root("https://host.com/api").root_uri().unwrap();
        assert_eq!(root.path(), "/api");
    }
}
