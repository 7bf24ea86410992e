//! Transport seam between [`HalClient`](crate::HalClient) and the network.

use crate::client::ClientConfig;
use crate::error::{HalError, Result};
use crate::types::{ApiRequest, ApiResponse};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

/// Sends fully resolved requests.
///
/// Implementations report transport failures as [`HalError::Http`] or
/// [`HalError::Timeout`], requests that cannot be built as
/// [`HalError::Configuration`], and return every HTTP status as a response; status
/// handling is left to the client.
#[async_trait]
pub trait HttpConnection: Send + Sync {
    /// Send `request` and read the whole response body.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// [`HttpConnection`] backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestConnection {
    client: reqwest::Client,
}

impl ReqwestConnection {
    /// Wrap an existing `reqwest` client.
    pub fn new(client: reqwest::Client) -> Self {
        ReqwestConnection { client }
    }

    /// Build a client from the timeout, pool and proxy settings of `config`.
    ///
    /// # Errors
    ///
    /// [`HalError::Configuration`] for an invalid proxy URL or when the client
    /// cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(config.max_total_connections as usize);

        if !config.proxy_url.is_empty() {
            let proxy = reqwest::Proxy::all(&config.proxy_url).map_err(|e| {
                HalError::Configuration(format!("invalid proxy '{}': {}", config.proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| HalError::Configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(ReqwestConnection { client })
    }

    /// The underlying `reqwest` client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl HttpConnection for ReqwestConnection {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut req_builder = self.client.request(request.method, request.uri);

        for (name, values) in &request.headers {
            for value in values {
                req_builder = req_builder.header(name.as_str(), value.as_str());
            }
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(transport_error)?;

        let status = response.status().as_u16();
        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response.bytes().await.map_err(transport_error)?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(err: reqwest::Error) -> HalError {
    if err.is_timeout() {
        HalError::Timeout
    } else if err.is_builder() {
        // Malformed header or URL: the request never left, and never will.
        HalError::Configuration(format!("invalid request: {}", err))
    } else {
        HalError::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        assert!(ReqwestConnection::from_config(&ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_malformed_header_is_not_retryable() {
        let connection = ReqwestConnection::from_config(&ClientConfig::default()).unwrap();
        let request = ApiRequest::new(
            reqwest::Method::GET,
            url::Url::parse("http://127.0.0.1:9/").unwrap(),
        )
        .with_header("bad header", "x");

        let err = connection.send(request).await.unwrap_err();
        assert!(matches!(err, HalError::Configuration(_)), "got {:?}", err);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_invalid_proxy_is_configuration_error() {
        let config = ClientConfig {
            proxy_url: "not a proxy".into(),
            ..Default::default()
        };
        assert!(matches!(
            ReqwestConnection::from_config(&config),
            Err(HalError::Configuration(_))
        ));
    }
}
