//! The HAL client: resolve a link, send the request, decode the response.
//!
//! # Examples
//!
//! ## Walking from the root
//!
//! ```ignore
//! use hal_http::{HalClient, RequestParameters, RootResource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HalClient::new("http://host.com/api/")?;
//!     let root = client.get_root().await?;
//!
//!     let orders = root.links.require("orders")?;
//!     let page: RootResource = client
//!         .get(orders, &RequestParameters::new().with_parameter("page", "2"))
//!         .await?;
//!     println!("{:?}", page.properties);
//!     Ok(())
//! }
//! ```

use crate::client::utils::exponential_backoff;
use crate::client::{ClientConfig, HttpConnection, ReqwestConnection};
use crate::codec::{decode_slice, decode_value, encode, HalResource, RootResource};
use crate::error::{HalError, Result};
use crate::protocol::constants::{headers, media_types};
use crate::protocol::{contains_header, is_json_media_type};
use crate::resolver::{DefaultLinkResolver, LinkResolver};
use crate::types::{ApiRequest, ApiResponse, Bytes, Link, RequestParameters};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use url::Url;

/// Client for a HAL+JSON API.
///
/// Cheap to clone; clones share the connection and the resolver.
#[derive(Clone)]
pub struct HalClient {
    connection: Arc<dyn HttpConnection>,
    resolver: Arc<dyn LinkResolver>,
    config: Arc<ClientConfig>,
    root: Url,
}

impl HalClient {
    /// Create a client for `root_endpoint` with default configuration.
    ///
    /// # Errors
    ///
    /// [`HalError::Configuration`] when `root_endpoint` is not an absolute URI.
    pub fn new(root_endpoint: &str) -> Result<Self> {
        Self::with_config(ClientConfig::for_root(root_endpoint))
    }

    /// Create a client with custom configuration, sending over `reqwest`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let connection = ReqwestConnection::from_config(&config)?;
        Self::with_connection(config, Arc::new(connection))
    }

    /// Create a client that sends over `connection`.
    pub fn with_connection(
        config: ClientConfig,
        connection: Arc<dyn HttpConnection>,
    ) -> Result<Self> {
        let root = config.root_uri()?;
        Ok(HalClient {
            connection,
            resolver: Arc::new(DefaultLinkResolver),
            config: Arc::new(config),
            root,
        })
    }

    /// Replace the link resolver.
    pub fn with_resolver(mut self, resolver: impl LinkResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Fetch the API root.
    pub async fn get_root(&self) -> Result<RootResource> {
        self.get_root_with(&RequestParameters::new()).await
    }

    /// Fetch the API root as `T`, with extra parameters and headers.
    pub async fn get_root_with<T: HalResource>(&self, request: &RequestParameters) -> Result<T> {
        self.get(&Link::new(self.root.as_str()), request).await
    }

    /// GET `link` and decode the response as `T`.
    pub async fn get<T: HalResource>(&self, link: &Link, request: &RequestParameters) -> Result<T> {
        let response = self.execute(Method::GET, link, None, request).await?;
        decode_response(&response)
    }

    /// POST a plain JSON `body` to `link` and decode the response as `T`.
    ///
    /// Use [`post_resource`](HalClient::post_resource) to send a HAL document.
    pub async fn post<T, B>(&self, link: &Link, body: &B, request: &RequestParameters) -> Result<T>
    where
        T: HalResource,
        B: Serialize + ?Sized,
    {
        self.send_body(Method::POST, link, json_body(body)?, request).await
    }

    /// PUT a plain JSON `body` to `link` and decode the response as `T`.
    pub async fn put<T, B>(&self, link: &Link, body: &B, request: &RequestParameters) -> Result<T>
    where
        T: HalResource,
        B: Serialize + ?Sized,
    {
        self.send_body(Method::PUT, link, json_body(body)?, request).await
    }

    /// PATCH `link` with a plain JSON `body` and decode the response as `T`.
    pub async fn patch<T, B>(&self, link: &Link, body: &B, request: &RequestParameters) -> Result<T>
    where
        T: HalResource,
        B: Serialize + ?Sized,
    {
        self.send_body(Method::PATCH, link, json_body(body)?, request).await
    }

    /// POST `body` encoded as a HAL document and decode the response as `T`.
    pub async fn post_resource<T, B>(&self, link: &Link, body: &B, request: &RequestParameters) -> Result<T>
    where
        T: HalResource,
        B: HalResource,
    {
        self.send_body(Method::POST, link, hal_body(body)?, request).await
    }

    /// PUT `body` encoded as a HAL document and decode the response as `T`.
    pub async fn put_resource<T, B>(&self, link: &Link, body: &B, request: &RequestParameters) -> Result<T>
    where
        T: HalResource,
        B: HalResource,
    {
        self.send_body(Method::PUT, link, hal_body(body)?, request).await
    }

    /// PATCH `link` with `body` encoded as a HAL document and decode the response as `T`.
    pub async fn patch_resource<T, B>(&self, link: &Link, body: &B, request: &RequestParameters) -> Result<T>
    where
        T: HalResource,
        B: HalResource,
    {
        self.send_body(Method::PATCH, link, hal_body(body)?, request).await
    }

    /// DELETE `link`. The response is returned undecoded.
    pub async fn delete(&self, link: &Link, request: &RequestParameters) -> Result<ApiResponse> {
        self.execute(Method::DELETE, link, None, request).await
    }

    /// Resolve `link` the way requests from this client do.
    pub fn resolve(&self, link: &Link, request: &RequestParameters) -> Result<Url> {
        if self.config.resolve_relative_links {
            self.resolver
                .resolve_relative(&self.root, link, &request.parameters)
        } else {
            self.resolver.resolve(link, &request.parameters)
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The parsed root endpoint.
    pub fn root_endpoint(&self) -> &Url {
        &self.root
    }

    async fn send_body<T: HalResource>(
        &self,
        method: Method,
        link: &Link,
        body: Body,
        request: &RequestParameters,
    ) -> Result<T> {
        let response = self.execute(method, link, Some(body), request).await?;
        decode_response(&response)
    }

    async fn execute(
        &self,
        method: Method,
        link: &Link,
        body: Option<Body>,
        request: &RequestParameters,
    ) -> Result<ApiResponse> {
        let uri = self.resolve(link, request)?;
        let api_request = build_request(method, uri, body, request);
        self.send_with_retries(api_request).await
    }

    async fn send_with_retries(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut attempt = 0;
        loop {
            match self.send_once(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = exponential_backoff(attempt, self.config.retry_delay_ms);
                    if self.config.enable_logging {
                        tracing::warn!(
                            "Request failed (attempt {}), retrying after {:?}: {}",
                            attempt + 1,
                            delay,
                            e
                        );
                    }
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, request: ApiRequest) -> Result<ApiResponse> {
        tracing::debug!("{} {}", request.method, request.uri);

        let response = timeout(self.config.request_timeout(), self.connection.send(request))
            .await
            .map_err(|_| HalError::Timeout)??;

        if !response.is_success() {
            return Err(HalError::Status {
                status: response.status,
                body: response.text(),
            });
        }
        Ok(response)
    }
}

/// An encoded request body and its media type.
struct Body {
    bytes: Bytes,
    media_type: &'static str,
}

fn build_request(
    method: Method,
    uri: Url,
    body: Option<Body>,
    request: &RequestParameters,
) -> ApiRequest {
    let mut api_request = ApiRequest::new(method, uri);
    api_request.headers = request.headers.clone();

    if !contains_header(&api_request.headers, headers::ACCEPT) {
        api_request = api_request.with_header(headers::ACCEPT, media_types::HAL_JSON);
    }

    if let Some(body) = body {
        if !contains_header(&api_request.headers, headers::CONTENT_TYPE) {
            api_request = api_request.with_header(headers::CONTENT_TYPE, body.media_type);
        }
        api_request = api_request.with_body(body.bytes);
    }

    api_request
}

fn hal_body<B: HalResource>(body: &B) -> Result<Body> {
    Ok(Body {
        bytes: Bytes::from(encode(body)?),
        media_type: media_types::HAL_JSON,
    })
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body> {
    Ok(Body {
        bytes: Bytes::from(serde_json::to_vec(body)?),
        media_type: media_types::JSON,
    })
}

fn decode_response<T: HalResource>(response: &ApiResponse) -> Result<T> {
    if let Some(content_type) = response.header(headers::CONTENT_TYPE) {
        if !is_json_media_type(content_type) {
            tracing::debug!("Decoding response with content type '{}' as HAL", content_type);
        }
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return decode_value(Value::Object(Map::new()));
    }
    decode_slice(&response.body)
}
