//! Declarative rel bindings for a resource type.
//!
//! A resource lists which of its fields live under `_links` or `_embedded`, the rel
//! each one is bound to, and plain accessor functions to read and write it. The
//! table is evaluated once per type by [`RelPropertyIndex`](super::RelPropertyIndex).
//!
//! ```
//! use hal_http::codec::{HalResource, ResourceSchema};
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
//!     #[serde(skip)]
//!     items: Option<Vec<Link>>,
//! }
//!
//! impl HalResource for Order {
//!     fn schema() -> ResourceSchema<Self> {
//!         Self::schema_builder()
//!             .link("self_link", "self", |o| o.self_link.as_ref(), |o, l| o.self_link = Some(l))
//!             .links("items", "item", |o| o.items.as_deref(), |o, l| o.items = Some(l))
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
//! ```

use super::document::{decode_value, encode_value, describe};
use super::HalResource;
use crate::error::{HalError, Result};
use crate::types::Link;
use serde_json::Value;

/// Which reserved section a property is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `_links`
    Link,
    /// `_embedded`
    Embedded,
}

/// Whether a property holds one value or an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// A single value
    One,
    /// An ordered list
    Many,
}

enum LinkAccess<T> {
    One {
        get: fn(&T) -> Option<&Link>,
        set: fn(&mut T, Link),
    },
    Many {
        get: fn(&T) -> Option<&[Link]>,
        set: fn(&mut T, Vec<Link>),
    },
}

type EncodeFn<T> = Box<dyn Fn(&T) -> Result<Option<Value>> + Send + Sync>;
type DecodeFn<T> = Box<dyn Fn(&mut T, &str, Value) -> Result<()> + Send + Sync>;

/// A property bound to a rel under `_links`.
pub struct LinkBinding<T> {
    property: &'static str,
    rel: String,
    access: LinkAccess<T>,
}

impl<T> LinkBinding<T> {
    /// Name of the bound property.
    pub fn property(&self) -> &'static str {
        self.property
    }

    /// The rel the property is bound to.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// One value or a list.
    pub fn cardinality(&self) -> Cardinality {
        match self.access {
            LinkAccess::One { .. } => Cardinality::One,
            LinkAccess::Many { .. } => Cardinality::Many,
        }
    }

    /// Assign the links decoded for this rel. A singular property takes the first one.
    pub(crate) fn assign(&self, target: &mut T, links: &[Link]) {
        match &self.access {
            LinkAccess::One { set, .. } => {
                if let Some(first) = links.first() {
                    set(target, first.clone());
                }
            }
            LinkAccess::Many { set, .. } => set(target, links.to_vec()),
        }
    }

    /// JSON for the property, or `None` when it is unset.
    pub(crate) fn read(&self, source: &T) -> Result<Option<Value>> {
        let value = match &self.access {
            LinkAccess::One { get, .. } => get(source).map(serde_json::to_value),
            LinkAccess::Many { get, .. } => get(source).map(serde_json::to_value),
        };
        Ok(value.transpose()?)
    }
}

/// A property bound to a rel under `_embedded`.
pub struct EmbeddedBinding<T> {
    property: &'static str,
    rel: String,
    cardinality: Cardinality,
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

impl<T> EmbeddedBinding<T> {
    /// Name of the bound property.
    pub fn property(&self) -> &'static str {
        self.property
    }

    /// The rel the property is bound to.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// One value or a list.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub(crate) fn assign(&self, target: &mut T, value: Value) -> Result<()> {
        (self.decode)(target, &self.rel, value)
    }

    pub(crate) fn read(&self, source: &T) -> Result<Option<Value>> {
        (self.encode)(source)
    }
}

/// One row of a [`ResourceSchema`].
pub enum RelBinding<T> {
    /// Bound under `_links`
    Link(LinkBinding<T>),
    /// Bound under `_embedded`
    Embedded(EmbeddedBinding<T>),
}

impl<T> RelBinding<T> {
    /// Name of the bound property.
    pub fn property(&self) -> &'static str {
        match self {
            RelBinding::Link(binding) => binding.property,
            RelBinding::Embedded(binding) => binding.property,
        }
    }

    /// The rel the property is bound to.
    pub fn rel(&self) -> &str {
        match self {
            RelBinding::Link(binding) => &binding.rel,
            RelBinding::Embedded(binding) => &binding.rel,
        }
    }

    /// Which reserved section the binding belongs to.
    pub fn kind(&self) -> BindingKind {
        match self {
            RelBinding::Link(_) => BindingKind::Link,
            RelBinding::Embedded(_) => BindingKind::Embedded,
        }
    }
}

/// The rel bindings declared by a resource type.
///
/// Properties that do not appear here are plain properties and go through serde
/// under their own JSON names.
pub struct ResourceSchema<T> {
    bindings: Vec<RelBinding<T>>,
}

impl<T> Default for ResourceSchema<T> {
    fn default() -> Self {
        ResourceSchema {
            bindings: Vec::new(),
        }
    }
}

impl<T: 'static> ResourceSchema<T> {
    /// An empty schema (no reserved-section properties).
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a single [`Link`] property to `rel` under `_links`.
    pub fn link(
        mut self,
        property: &'static str,
        rel: impl Into<String>,
        get: fn(&T) -> Option<&Link>,
        set: fn(&mut T, Link),
    ) -> Self {
        self.bindings.push(RelBinding::Link(LinkBinding {
            property,
            rel: rel.into(),
            access: LinkAccess::One { get, set },
        }));
        self
    }

    /// Bind an ordered list of links to `rel` under `_links`.
    pub fn links(
        mut self,
        property: &'static str,
        rel: impl Into<String>,
        get: fn(&T) -> Option<&[Link]>,
        set: fn(&mut T, Vec<Link>),
    ) -> Self {
        self.bindings.push(RelBinding::Link(LinkBinding {
            property,
            rel: rel.into(),
            access: LinkAccess::Many { get, set },
        }));
        self
    }

    /// Bind a single nested resource to `rel` under `_embedded`.
    pub fn embedded<R: HalResource>(
        mut self,
        property: &'static str,
        rel: impl Into<String>,
        get: fn(&T) -> Option<&R>,
        set: fn(&mut T, R),
    ) -> Self {
        let encode: EncodeFn<T> = Box::new(move |source: &T| get(source).map(encode_value).transpose());
        let decode: DecodeFn<T> = Box::new(move |target: &mut T, rel: &str, value: Value| match value {
            Value::Object(_) => {
                set(target, decode_value::<R>(value)?);
                Ok(())
            }
            other => Err(HalError::decode(
                rel,
                format!("expected an embedded resource object, found {}", describe(&other)),
            )),
        });

        self.bindings.push(RelBinding::Embedded(EmbeddedBinding {
            property,
            rel: rel.into(),
            cardinality: Cardinality::One,
            encode,
            decode,
        }));
        self
    }

    /// Bind an ordered list of nested resources to `rel` under `_embedded`.
    pub fn embedded_many<R: HalResource>(
        mut self,
        property: &'static str,
        rel: impl Into<String>,
        get: fn(&T) -> Option<&[R]>,
        set: fn(&mut T, Vec<R>),
    ) -> Self {
        let encode: EncodeFn<T> = Box::new(move |source: &T| {
            get(source)
                .map(|items| {
                    items
                        .iter()
                        .map(encode_value)
                        .collect::<Result<Vec<_>>>()
                        .map(Value::Array)
                })
                .transpose()
        });
        let decode: DecodeFn<T> = Box::new(move |target: &mut T, rel: &str, value: Value| match value {
            Value::Array(items) => {
                let resources = items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(_) => decode_value::<R>(item),
                        other => Err(HalError::decode(
                            rel,
                            format!("expected embedded resource objects, found {}", describe(&other)),
                        )),
                    })
                    .collect::<Result<Vec<R>>>()?;
                set(target, resources);
                Ok(())
            }
            other => Err(HalError::decode(
                rel,
                format!("expected an array of embedded resources, found {}", describe(&other)),
            )),
        });

        self.bindings.push(RelBinding::Embedded(EmbeddedBinding {
            property,
            rel: rel.into(),
            cardinality: Cardinality::Many,
            encode,
            decode,
        }));
        self
    }

    /// Bindings in declaration order.
    pub fn bindings(&self) -> &[RelBinding<T>] {
        &self.bindings
    }

    pub(crate) fn into_bindings(self) -> Vec<RelBinding<T>> {
        self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkCollection;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Shelf {
        #[serde(skip)]
        links: LinkCollection,
        #[serde(skip)]
        self_link: Option<Link>,
        #[serde(skip)]
        books: Option<Vec<Link>>,
        #[serde(skip)]
        neighbour: Option<Box<Shelf>>,
        #[serde(skip)]
        stacked: Option<Vec<Shelf>>,
    }

    impl HalResource for Shelf {
        fn schema() -> ResourceSchema<Self> {
            Self::schema_builder()
                .link("self_link", "self", |s| s.self_link.as_ref(), |s, l| s.self_link = Some(l))
                .links("books", "book", |s| s.books.as_deref(), |s, l| s.books = Some(l))
                .embedded(
                    "neighbour",
                    "neighbour",
                    |s| s.neighbour.as_deref(),
                    |s, n| s.neighbour = Some(Box::new(n)),
                )
                .embedded_many("stacked", "stacked", |s| s.stacked.as_deref(), |s, v| s.stacked = Some(v))
        }

        fn links(&self) -> &LinkCollection {
            &self.links
        }

        fn set_links(&mut self, links: LinkCollection) {
            self.links = links;
        }
    }

    #[test]
    fn test_chained_builder_keeps_declaration_order() {
        let schema = Shelf::schema();
        let rows: Vec<(&str, &str, BindingKind)> = schema
            .bindings()
            .iter()
            .map(|b| (b.property(), b.rel(), b.kind()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("self_link", "self", BindingKind::Link),
                ("books", "book", BindingKind::Link),
                ("neighbour", "neighbour", BindingKind::Embedded),
                ("stacked", "stacked", BindingKind::Embedded),
            ]
        );
    }

    #[test]
    fn test_cardinality_follows_builder_method() {
        let schema = Shelf::schema();
        let cardinalities: Vec<Cardinality> = schema
            .bindings()
            .iter()
            .map(|b| match b {
                RelBinding::Link(link) => link.cardinality(),
                RelBinding::Embedded(embedded) => embedded.cardinality(),
            })
            .collect();
        assert_eq!(
            cardinalities,
            vec![Cardinality::One, Cardinality::Many, Cardinality::One, Cardinality::Many]
        );
    }

    #[test]
    fn test_default_schema_is_empty() {
        assert!(crate::codec::RootResource::schema_builder().bindings().is_empty());
    }
}
