//! HAL document encoding and decoding.
//!
//! # Decoding
//!
//! 1. `_links` and `_embedded` are lifted out and the rest of the object goes through
//!    serde, populating plain properties.
//! 2. Every `_links` entry except `curies` becomes one or more [`Link`]s tagged with
//!    their rel; `curies` becomes the curie list. The result is the resource's
//!    [`LinkCollection`].
//! 3. Rels with a bound link property are assigned: singular properties take the
//!    first link, list properties take all of them in order.
//! 4. Each `_embedded` entry with a bound property is decoded recursively as the
//!    property's resource type.
//!
//! Rels without a bound property stay reachable through the link collection only.
//!
//! # Encoding
//!
//! Plain properties are written by serde, then `_links` and `_embedded` are built from
//! the bound properties that are set, `self` first and the remaining rels in ordinal
//! order. Empty sections are omitted.

use super::{HalResource, RelPropertyIndex};
use crate::error::{HalError, Result};
use crate::protocol::constants::{CURIES, EMBEDDED, LINKS};
use crate::types::{CurieLink, Link, LinkCollection};
use serde_json::{Map, Value};
use std::any::type_name;

/// Decode a HAL+JSON document.
///
/// # Examples
///
/// ```
/// use hal_http::codec::{decode, RootResource};
///
/// let root: RootResource = decode(r#"{
///     "version": "1.0",
///     "_links": {
///         "self": {"href": "http://host.com/"},
///         "orders": {"href": "http://host.com/orders{?page}", "templated": true}
///     }
/// }"#).unwrap();
///
/// assert_eq!(root.self_link.unwrap().href, "http://host.com/");
/// assert!(root.links.require("orders").unwrap().templated);
/// assert_eq!(root.properties["version"], "1.0");
/// ```
pub fn decode<T: HalResource>(json: &str) -> Result<T> {
    decode_value(serde_json::from_str(json)?)
}

/// Decode a HAL+JSON document from raw bytes.
pub fn decode_slice<T: HalResource>(bytes: &[u8]) -> Result<T> {
    decode_value(serde_json::from_slice(bytes)?)
}

/// Decode an already parsed HAL+JSON value.
pub fn decode_value<T: HalResource>(value: Value) -> Result<T> {
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(HalError::decode(
                "$",
                format!("expected a resource object, found {}", describe(&other)),
            ))
        }
    };

    let links = object.shift_remove(LINKS).filter(|v| !v.is_null());
    let embedded = object.shift_remove(EMBEDDED).filter(|v| !v.is_null());

    let mut resource: T = serde_json::from_value(Value::Object(object))?;

    if links.is_none() && embedded.is_none() {
        return Ok(resource);
    }

    let index = RelPropertyIndex::<T>::for_type()?;

    if let Some(links) = links {
        let collection = parse_links(links)?;
        for rel in collection.rels() {
            match (index.link_property(rel), collection.get_all(rel)) {
                (Some(binding), Some(found)) => binding.assign(&mut resource, found),
                _ => tracing::trace!("No {} property bound to rel '{}'", type_name::<T>(), rel),
            }
        }
        resource.set_links(collection);
    }

    if let Some(embedded) = embedded {
        let sections = match embedded {
            Value::Object(sections) => sections,
            other => {
                return Err(HalError::decode(
                    EMBEDDED,
                    format!("expected an object, found {}", describe(&other)),
                ))
            }
        };

        for (rel, nested) in sections {
            match index.embedded_property(&rel) {
                Some(binding) => binding.assign(&mut resource, nested)?,
                None => tracing::trace!(
                    "No {} property bound to embedded rel '{}'",
                    type_name::<T>(),
                    rel
                ),
            }
        }
    }

    Ok(resource)
}

/// Parse a `_links` object into a [`LinkCollection`].
///
/// # Errors
///
/// [`HalError::Decode`] when the section or one of its entries has the wrong shape,
/// [`HalError::InvalidLink`] when a rel key is empty.
pub fn parse_links(value: Value) -> Result<LinkCollection> {
    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            return Err(HalError::decode(
                LINKS,
                format!("expected an object, found {}", describe(&other)),
            ))
        }
    };

    let mut links = Vec::new();
    let mut curies = Vec::new();

    for (rel, entry) in entries {
        if rel == CURIES {
            let items = match entry {
                Value::Array(items) => items,
                other => {
                    return Err(HalError::decode(
                        CURIES,
                        format!("expected an array, found {}", describe(&other)),
                    ))
                }
            };
            for item in items {
                let curie: CurieLink = serde_json::from_value(item)
                    .map_err(|e| HalError::decode(CURIES, e.to_string()))?;
                curies.push(curie);
            }
            continue;
        }

        match entry {
            Value::Array(items) => {
                for item in items {
                    links.push(parse_link(&rel, item)?);
                }
            }
            Value::Object(_) => links.push(parse_link(&rel, entry)?),
            other => {
                return Err(HalError::decode(
                    rel,
                    format!("expected a link object or array, found {}", describe(&other)),
                ))
            }
        }
    }

    LinkCollection::new(links, curies)
}

fn parse_link(rel: &str, value: Value) -> Result<Link> {
    let mut link: Link =
        serde_json::from_value(value).map_err(|e| HalError::decode(rel, e.to_string()))?;
    if link.href.is_empty() {
        return Err(HalError::decode(rel, "link href must not be empty"));
    }
    link.rel = rel.to_string();
    Ok(link)
}

/// Encode a resource as a compact HAL+JSON string.
pub fn encode<T: HalResource>(resource: &T) -> Result<String> {
    Ok(serde_json::to_string(&encode_value(resource)?)?)
}

/// Encode a resource as an indented HAL+JSON string.
pub fn encode_pretty<T: HalResource>(resource: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode_value(resource)?)?)
}

/// Encode a resource as a HAL+JSON value.
///
/// # Examples
///
/// ```
/// use hal_http::codec::{encode_value, RootResource};
/// use hal_http::Link;
///
/// let mut root = RootResource::default();
/// root.self_link = Some(Link::new("http://host.com/"));
/// root.properties.insert("version".into(), "1.0".into());
///
/// let json = encode_value(&root).unwrap();
/// assert_eq!(json["_links"]["self"]["href"], "http://host.com/");
/// assert!(json.get("_embedded").is_none());
/// ```
pub fn encode_value<T: HalResource>(resource: &T) -> Result<Value> {
    let index = RelPropertyIndex::<T>::for_type()?;

    let mut object = match serde_json::to_value(resource)? {
        Value::Object(object) => object,
        other => {
            return Err(HalError::Encode(format!(
                "{} serialized to {}, expected an object",
                type_name::<T>(),
                describe(&other)
            )))
        }
    };
    object.shift_remove(LINKS);
    object.shift_remove(EMBEDDED);

    let mut links = Map::new();
    for binding in index.link_properties() {
        if let Some(value) = binding.read(resource)? {
            links.insert(binding.rel().to_string(), value);
        }
    }
    if !links.is_empty() {
        object.insert(LINKS.to_string(), Value::Object(links));
    }

    let mut embedded = Map::new();
    for binding in index.embedded_properties() {
        if let Some(value) = binding.read(resource)? {
            embedded.insert(binding.rel().to_string(), value);
        }
    }
    if !embedded.is_empty() {
        object.insert(EMBEDDED.to_string(), Value::Object(embedded));
    }

    Ok(Value::Object(object))
}

pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
