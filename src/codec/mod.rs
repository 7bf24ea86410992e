//! Typed HAL+JSON codec.
//!
//! A resource type is an ordinary serde struct. Its `_links` and `_embedded` fields
//! are marked `#[serde(skip)]` and declared in a [`ResourceSchema`]; everything else
//! is a plain property handled by serde.
//!
//! ```text
//! {                                  struct Order {
//!   "total": 30.0,           ──────►     total: f64,
//!   "_links": {
//!     "self": {...},         ──────►     self_link: Option<Link>,   (schema: link)
//!     "docs:invoice": {...}  ──────►     links: LinkCollection,     (unbound rels)
//!   },
//!   "_embedded": {
//!     "customer": {...}      ──────►     customer: Option<Customer>, (schema: embedded)
//!   }
//! }                                  }
//! ```

mod document;
mod index;
mod schema;

pub use document::{decode, decode_slice, decode_value, encode, encode_pretty, encode_value, parse_links};
pub use index::RelPropertyIndex;
pub use schema::{BindingKind, Cardinality, EmbeddedBinding, LinkBinding, RelBinding, ResourceSchema};

use crate::protocol::constants::SELF_REL;
use crate::types::{Link, LinkCollection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A type that can be read from and written as a HAL document.
pub trait HalResource: Serialize + DeserializeOwned + Sized + 'static {
    /// Rel bindings for this type. Defaults to none, in which case every `_links`
    /// entry is only reachable through [`links`](HalResource::links).
    fn schema() -> ResourceSchema<Self> {
        Self::schema_builder()
    }

    /// An empty schema for this type, to chain bindings onto.
    ///
    /// Starting from here rather than `ResourceSchema::new()` fixes the schema's
    /// type before the accessor closures are checked.
    fn schema_builder() -> ResourceSchema<Self> {
        ResourceSchema::new()
    }

    /// All links decoded for this resource.
    fn links(&self) -> &LinkCollection;

    /// Store the links decoded for this resource.
    fn set_links(&mut self, links: LinkCollection);
}

/// An API entry point: its self link, every other link, and whatever plain
/// properties the server sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootResource {
    /// Every link of the root, bound or not
    #[serde(skip)]
    pub links: LinkCollection,

    /// The `self` link
    #[serde(skip)]
    pub self_link: Option<Link>,

    /// Plain properties, in document order
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl HalResource for RootResource {
    fn schema() -> ResourceSchema<Self> {
        Self::schema_builder().link(
            "self_link",
            SELF_REL,
            |r| r.self_link.as_ref(),
            |r, l| r.self_link = Some(l),
        )
    }

    fn links(&self) -> &LinkCollection {
        &self.links
    }

    fn set_links(&mut self, links: LinkCollection) {
        self.links = links;
    }
}
