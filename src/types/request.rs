//! Per-request parameters and the transport-level request.

use bytes::Bytes;
use reqwest::Method;
use std::collections::BTreeMap;
use url::Url;

/// Template/query parameters and extra headers for a single request.
///
/// # Examples
///
/// ```
/// use hal_http::RequestParameters;
///
/// let request = RequestParameters::new()
///     .with_parameter("page", "2")
///     .with_header("X-Trace", "abc");
/// assert_eq!(request.parameters["page"], "2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    /// Variables for templated links, query parameters for plain ones
    pub parameters: BTreeMap<String, String>,
    /// Extra request headers; a name may carry several values
    pub headers: BTreeMap<String, Vec<String>>,
}

impl RequestParameters {
    /// No parameters, no headers.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one parameter, replacing an earlier value.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Merge a whole parameter map.
    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Add a header value. Repeated calls with the same name accumulate values.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }
}

/// A fully resolved request handed to an [`HttpConnection`](crate::client::HttpConnection).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URI
    pub uri: Url,
    /// Header name to values
    pub headers: BTreeMap<String, Vec<String>>,
    /// Encoded request body, if any
    pub body: Option<Bytes>,
}

impl ApiRequest {
    /// A request with no headers and no body.
    pub fn new(method: Method, uri: Url) -> Self {
        ApiRequest {
            method,
            uri,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Add a header value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}
