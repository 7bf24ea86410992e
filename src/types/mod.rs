//! Core data types: links, link collections, requests and responses.

mod link;
mod link_collection;
mod request;
mod response;

pub use bytes::Bytes;
pub use link::{CurieLink, Link};
pub use link_collection::{Iter, LinkCollection};
pub use request::{ApiRequest, RequestParameters};
pub use response::ApiResponse;
