#![warn(missing_docs)]

//! # hal_http: a HAL+JSON hypermedia client
//!
//! This crate reads and writes [HAL+JSON](https://datatracker.ietf.org/doc/html/draft-kelly-json-hal)
//! documents as typed Rust values and follows their links.
//!
//! ## Overview
//!
//! A HAL resource is a JSON object with two reserved keys:
//!
//! 1. **`_links`** - link relation (rel) → link object, or array of link objects
//! 2. **`_embedded`** - rel → nested resource, or array of nested resources
//!
//! The crate is built from four pieces:
//!
//! - **[`LinkCollection`]** - the decoded links of a resource, grouped by rel in
//!   first-seen order, with curies kept aside
//! - **[`RelPropertyIndex`](codec::RelPropertyIndex)** - per-type rel → field bindings,
//!   built once from a declarative [`ResourceSchema`](codec::ResourceSchema) and cached
//! - **[`codec`]** - `decode` / `encode` between JSON and any [`HalResource`]
//! - **[`resolver`]** - RFC 6570 template expansion and query appending that turns a
//!   [`Link`] plus parameters into a request URI
//!
//! [`HalClient`] ties them to an HTTP transport.
//!
//! ## Wire Format Rules
//!
//! - `self` is always the first rel written, the other rels follow in ordinal order
//! - a field bound as a single link takes the first link of its rel; a list field
//!   takes all of them in document order
//! - rels without a bound field stay reachable through [`HalResource::links`]
//! - unset bound fields are never written, and empty reserved sections are omitted
//! - curie-prefixed rels such as `docs:orders` are matched literally
//!
//! ## Decoding a Resource
//!
//! ```
//! use hal_http::codec::{decode, encode, HalResource, ResourceSchema};
//! use hal_http::{Link, LinkCollection};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Order {
//!     total: f64,
//!     #[serde(skip)]
//!     links: LinkCollection,
//!     #[serde(skip)]
//!     self_link: Option<Link>,
//! }
//!
//! impl HalResource for Order {
//!     fn schema() -> ResourceSchema<Self> {
//!         Self::schema_builder()
//!             .link("self_link", "self", |o| o.self_link.as_ref(), |o, l| o.self_link = Some(l))
//!     }
//!
//!     fn links(&self) -> &LinkCollection {
//!         &self.links
//!     }
//!
//!     fn set_links(&mut self, links: LinkCollection) {
//!         self.links = links;
//!     }
//! }
//!
//! let order: Order = decode(r#"{
//!     "total": 30.0,
//!     "_links": {
//!         "warehouse": {"href": "/warehouses/56"},
//!         "self": {"href": "/orders/123"}
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(order.self_link.as_ref().unwrap().href, "/orders/123");
//! assert_eq!(order.links().require("warehouse").unwrap().href, "/warehouses/56");
//!
//! let json = encode(&order).unwrap();
//! assert_eq!(json, r#"{"total":30.0,"_links":{"self":{"href":"/orders/123"}}}"#);
//! ```
//!
//! ## Following a Link
//!
//! ```
//! use hal_http::{DefaultLinkResolver, Link, LinkResolver};
//! use std::collections::BTreeMap;
//!
//! let mut params = BTreeMap::new();
//! params.insert("page".to_string(), "2".to_string());
//!
//! let uri = DefaultLinkResolver
//!     .resolve(&Link::templated("http://host.com/orders{?page}"), &params)
//!     .unwrap();
//! assert_eq!(uri.as_str(), "http://host.com/orders?page=2");
//! ```
//!
//! ## Client Usage
//!
//! ```ignore
//! use hal_http::{HalClient, RequestParameters, RootResource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HalClient::new("http://host.com/api/")?;
//!     let root = client.get_root().await?;
//!
//!     let orders: RootResource = client
//!         .get(root.links.require("orders")?, &RequestParameters::new())
//!         .await?;
//!     println!("{:?}", orders.properties);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Links, link collections, requests and responses
//! - **[error]** - Error types and result handling
//! - **[codec]** - Resource schemas, the rel index and the HAL document codec
//! - **[resolver]** - URI templates and link resolution
//! - **[client]** - HTTP client over the codec and resolver
//! - **[protocol]** - Wire constants, rel ordering and header helpers

pub mod client;
pub mod codec;
pub mod error;
pub mod protocol;
pub mod resolver;
pub mod types;

pub use client::{ClientConfig, HalClient};
pub use codec::{decode, encode, HalResource, RootResource};
pub use error::{HalError, Result};
pub use resolver::{DefaultLinkResolver, LinkResolver, UriTemplate};
pub use types::{CurieLink, Link, LinkCollection, RequestParameters};
