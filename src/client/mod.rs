//! HAL HTTP client.
//!
//! A thin layer over the codec and the resolver: it resolves a [`Link`](crate::Link)
//! into a URI, sends the request through an [`HttpConnection`], retries transient
//! failures with exponential backoff and decodes the body as a typed resource.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch      - HalClient and HTTP operations
//! ├── connection - HttpConnection trait and the reqwest implementation
//! ├── config     - Client configuration
//! └── utils      - Status classification and backoff
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HalClient`] | Resolves links, sends requests, decodes responses |
//! | [`HttpConnection`] | Transport abstraction, swappable in tests |
//! | [`ReqwestConnection`] | Default transport |
//! | [`ClientConfig`] | Client configuration options |
//!
//! # Examples
//!
//! ```
//! use hal_http::client::{exponential_backoff, is_retryable_status};
//! use std::time::Duration;
//!
//! assert!(is_retryable_status(503));
//! assert!(!is_retryable_status(404));
//!
//! let delay = exponential_backoff(2, 100);
//! assert_eq!(delay, Duration::from_millis(400));
//! ```

mod config;
mod connection;
mod fetch;
mod utils;

pub use config::ClientConfig;
pub use connection::{HttpConnection, ReqwestConnection};
pub use fetch::HalClient;
pub use utils::*;
