//! Link resolution: turning a [`Link`] and caller parameters into a request URI.
//!
//! Templated links are expanded as RFC 6570 URI templates; plain links get the
//! parameters appended as a query string. With no parameters the href is used as is.
//!
//! ```
//! use hal_http::{DefaultLinkResolver, Link, LinkResolver};
//! use std::collections::BTreeMap;
//!
//! let resolver = DefaultLinkResolver;
//! let mut params = BTreeMap::new();
//! params.insert("var".to_string(), "value".to_string());
//!
//! let uri = resolver
//!     .resolve(&Link::templated("http://host.com/path/{var}"), &params)
//!     .unwrap();
//! assert_eq!(uri.as_str(), "http://host.com/path/value");
//! ```

mod query;
mod template;

pub use query::append_query;
pub use template::UriTemplate;

use crate::error::{HalError, Result};
use crate::types::Link;
use std::collections::BTreeMap;
use url::Url;

/// Resolves links into absolute request URIs.
pub trait LinkResolver: Send + Sync {
    /// Resolve `link` with `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidUri`] when the template is malformed or the result
    /// is not an absolute URI.
    fn resolve(&self, link: &Link, parameters: &BTreeMap<String, String>) -> Result<Url>;

    /// Resolve `link` against `root` first, so root-relative hrefs become absolute.
    ///
    /// Hrefs that already contain the root URI, or any other absolute URI, are
    /// left untouched.
    fn resolve_relative(
        &self,
        root: &Url,
        link: &Link,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Url> {
        let rebased = Link {
            href: rebase_href(root, &link.href),
            ..link.clone()
        };
        self.resolve(&rebased, parameters)
    }
}

/// The stock resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLinkResolver;

impl LinkResolver for DefaultLinkResolver {
    fn resolve(&self, link: &Link, parameters: &BTreeMap<String, String>) -> Result<Url> {
        if parameters.is_empty() {
            return parse_uri(&link.href);
        }

        if link.templated {
            let expanded = UriTemplate::parse(&link.href)?.expand(parameters);
            return parse_uri(&expanded);
        }

        let mut uri = parse_uri(&link.href)?;
        append_query(&mut uri, parameters);
        Ok(uri)
    }
}

/// Prefix a root-relative `href` with `root`.
///
/// The root's own path is stripped from the href first, so `/api/orders` and
/// `/orders` both map to `{root}/orders` for a root of `http://host.com/api`.
pub fn rebase_href(root: &Url, href: &str) -> String {
    let root_str = root.as_str().trim_end_matches('/');
    if href.contains(root_str) || href.contains("://") {
        return href.to_string();
    }

    let root_path = root.path().trim_end_matches('/');
    let relative = match href.strip_prefix(root_path) {
        Some(rest)
            if !root_path.is_empty()
                && (rest.is_empty() || rest.starts_with(['/', '?', '#', '{'])) =>
        {
            rest
        }
        _ => href,
    };

    format!("{}/{}", root_str, relative.trim_start_matches('/'))
}

fn parse_uri(href: &str) -> Result<Url> {
    Url::parse(href).map_err(|e| HalError::InvalidUri(format!("'{}': {}", href, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn template_vars() -> BTreeMap<String, String> {
        params(&[
            ("var", "value"),
            ("hello", "Hello World!"),
            ("path", "/foo/bar"),
            ("empty", ""),
            ("x", "1024"),
            ("y", "768"),
        ])
    }

    #[test]
    fn test_empty_parameters_return_href_unchanged() {
        let uri = DefaultLinkResolver
            .resolve(&Link::new("https://host.com/"), &BTreeMap::new())
            .unwrap();
        assert_eq!(uri, Url::parse("https://host.com/").unwrap());
    }

    #[test]
    fn test_non_templated_link_gets_query() {
        let resolver = DefaultLinkResolver;
        let link = Link::new("http://host.com/path");

        let uri = resolver.resolve(&link, &params(&[("foo", "foo value!")])).unwrap();
        assert_eq!(uri.as_str(), "http://host.com/path?foo=foo%20value%21");

        let uri = resolver
            .resolve(&link, &params(&[("foo", "foovalue"), ("bar", "barvalue")]))
            .unwrap();
        assert_eq!(uri.as_str(), "http://host.com/path?bar=barvalue&foo=foovalue");

        let existing = Link::new("http://host.com/path?existing=true");
        let uri = resolver.resolve(&existing, &params(&[("foo", "foovalue")])).unwrap();
        assert_eq!(uri.as_str(), "http://host.com/path?existing=true&foo=foovalue");
    }

    #[test]
    fn test_templated_link_expansion() {
        let resolver = DefaultLinkResolver;
        let vars = template_vars();
        let cases = [
            ("http://host.com/path/{var}", "http://host.com/path/value"),
            ("http://host.com/path/{+var}", "http://host.com/path/value"),
            ("http://host.com/path/{hello}", "http://host.com/path/Hello%20World%21"),
            ("http://host.com/path/{+hello}", "http://host.com/path/Hello%20World!"),
            ("http://host.com{+path}/here", "http://host.com/foo/bar/here"),
            ("http://host.com/path/{#x,hello,y}", "http://host.com/path/#1024,Hello%20World!,768"),
            ("http://host.com/map?{x,y}", "http://host.com/map?1024,768"),
            ("http://host.com/X{.x,y}", "http://host.com/X.1024.768"),
            ("http://host.com/path{/var,x}/here", "http://host.com/path/value/1024/here"),
            ("http://host.com/path{;x,y,empty}", "http://host.com/path;x=1024;y=768;empty"),
            ("http://host.com/path{?x,y,empty}", "http://host.com/path?x=1024&y=768&empty="),
            ("http://host.com/path?fixed=yes{&x}", "http://host.com/path?fixed=yes&x=1024"),
        ];

        for (template, expected) in cases {
            let uri = resolver.resolve(&Link::templated(template), &vars).unwrap();
            assert_eq!(uri.as_str(), expected, "template {}", template);
        }
    }

    #[test]
    fn test_undefined_template_variables_are_dropped() {
        let uri = DefaultLinkResolver
            .resolve(
                &Link::templated("http://host.com/orders{?page,size}"),
                &params(&[("size", "10")]),
            )
            .unwrap();
        assert_eq!(uri.as_str(), "http://host.com/orders?size=10");
    }

    #[test]
    fn test_relative_href_is_invalid_without_root() {
        let result = DefaultLinkResolver.resolve(&Link::new("/orders"), &BTreeMap::new());
        assert!(matches!(result, Err(HalError::InvalidUri(_))));
    }

    #[test]
    fn test_malformed_template_is_invalid_uri() {
        let result = DefaultLinkResolver
            .resolve(&Link::templated("http://host.com/{oops"), &params(&[("oops", "1")]));
        assert!(matches!(result, Err(HalError::InvalidUri(_))));
    }

    #[test]
    fn test_resolve_relative_rebases_hrefs() {
        let resolver = DefaultLinkResolver;
        let root = Url::parse("http://host.com/api/").unwrap();
        let none = BTreeMap::new();

        let uri = resolver.resolve_relative(&root, &Link::new("/api/orders"), &none).unwrap();
        assert_eq!(uri.as_str(), "http://host.com/api/orders");

        let uri = resolver.resolve_relative(&root, &Link::new("/orders"), &none).unwrap();
        assert_eq!(uri.as_str(), "http://host.com/api/orders");

        let uri = resolver
            .resolve_relative(&root, &Link::new("http://host.com/api/orders/1"), &none)
            .unwrap();
        assert_eq!(uri.as_str(), "http://host.com/api/orders/1");

        let uri = resolver
            .resolve_relative(&root, &Link::new("https://cdn.other.com/img.png"), &none)
            .unwrap();
        assert_eq!(uri.as_str(), "https://cdn.other.com/img.png");
    }

    #[test]
    fn test_resolve_relative_expands_templates() {
        let root = Url::parse("http://host.com").unwrap();
        let uri = DefaultLinkResolver
            .resolve_relative(
                &root,
                &Link::templated("/orders/{id}{?expand}"),
                &params(&[("id", "42"), ("expand", "lines")]),
            )
            .unwrap();
        assert_eq!(uri.as_str(), "http://host.com/orders/42?expand=lines");
    }

    #[test]
    fn test_rebase_does_not_strip_partial_segments() {
        let root = Url::parse("http://host.com/api").unwrap();
        assert_eq!(rebase_href(&root, "/apiary"), "http://host.com/api/apiary");
        assert_eq!(rebase_href(&root, "/api"), "http://host.com/api/");
    }
}
