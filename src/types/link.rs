//! Link objects as they appear under `_links`.

use serde::{Deserialize, Serialize};

/// A hyperlink between API resources.
///
/// Serialized as a HAL link object: `href` is required, `title` and `templated`
/// are optional. The `rel` is not part of the link object itself; it is the key
/// the link was found under and is assigned while decoding.
///
/// # Examples
///
/// ```
/// use hal_http::Link;
///
/// let link = Link::templated("http://host.com/orders{?page}").with_title("Orders");
/// assert!(link.is_templated());
/// assert_eq!(link.title.as_deref(), Some("Orders"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URI or URI template
    pub href: String,

    /// Human-readable description of the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Whether `href` is an RFC 6570 URI template
    #[serde(default, skip_serializing_if = "is_false")]
    pub templated: bool,

    /// Link relation this link was found under
    #[serde(skip)]
    pub rel: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Link {
    /// Create a plain (non-templated) link.
    pub fn new(href: impl Into<String>) -> Self {
        Link {
            href: href.into(),
            ..Default::default()
        }
    }

    /// Create a templated link.
    pub fn templated(href: impl Into<String>) -> Self {
        Link {
            href: href.into(),
            templated: true,
            ..Default::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the link relation.
    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = rel.into();
        self
    }

    /// Whether `href` is an RFC 6570 template.
    #[inline]
    pub fn is_templated(&self) -> bool {
        self.templated
    }
}

/// A curie (compact URI) declaration from `_links.curies`.
///
/// `href` carries a `{rel}` placeholder. Prefixed rels such as `docs:orders` are
/// matched as literal strings; curies are collected but never expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurieLink {
    /// Curie prefix, e.g. `docs`
    pub name: String,

    /// The `href`/`templated`/`title` part of the declaration
    #[serde(flatten)]
    pub link: Link,
}

impl CurieLink {
    /// Declare curie `name` with a templated `href`.
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        CurieLink {
            name: name.into(),
            link: Link::templated(href),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_omits_defaults() {
        let value = serde_json::to_value(Link::new("http://host.com/self")).unwrap();
        assert_eq!(value, json!({"href": "http://host.com/self"}));
    }

    #[test]
    fn test_rel_is_not_serialized() {
        let link = Link::templated("/orders{?page}").with_rel("orders");
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value, json!({"href": "/orders{?page}", "templated": true}));
    }

    #[test]
    fn test_link_defaults_on_read() {
        let link: Link = serde_json::from_value(json!({"href": "/a"})).unwrap();
        assert!(!link.templated);
        assert!(link.title.is_none());
        assert!(link.rel.is_empty());
    }

    #[test]
    fn test_curie_link_shape() {
        let curie: CurieLink = serde_json::from_value(json!({
            "name": "docs",
            "href": "http://docs.host.com/{rel}",
            "templated": true
        }))
        .unwrap();
        assert_eq!(curie.name, "docs");
        assert_eq!(curie.link.href, "http://docs.host.com/{rel}");
        assert!(curie.link.is_templated());
    }
}
