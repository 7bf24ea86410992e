//! Query-string appending for non-templated links.

use super::template::UNRESERVED;
use percent_encoding::utf8_percent_encode;
use std::collections::BTreeMap;
use url::Url;

/// Append `parameters` to the query of `url`, keeping any query it already has.
///
/// Parameters with empty values are dropped. Keys and values are percent-encoded and
/// written in key order.
pub fn append_query(url: &mut Url, parameters: &BTreeMap<String, String>) {
    let pairs: Vec<String> = parameters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, UNRESERVED),
                utf8_percent_encode(value, UNRESERVED)
            )
        })
        .collect();

    if pairs.is_empty() {
        return;
    }

    let mut query = url.query().unwrap_or_default().to_string();
    if !query.is_empty() && !query.ends_with('&') {
        query.push('&');
    }
    query.push_str(&pairs.join("&"));

    url.set_query(Some(&query));
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

    #[test]
    fn test_appends_to_url_without_query() {
        let mut url = Url::parse("http://host.com/path").unwrap();
        append_query(&mut url, &params(&[("foo", "foovalue"), ("bar", "barvalue")]));
        assert_eq!(url.as_str(), "http://host.com/path?bar=barvalue&foo=foovalue");
    }

    #[test]
    fn test_keeps_existing_query() {
        let mut url = Url::parse("http://host.com/path?existing=true").unwrap();
        append_query(&mut url, &params(&[("foo", "foovalue")]));
        assert_eq!(url.as_str(), "http://host.com/path?existing=true&foo=foovalue");

        let mut url = Url::parse("http://host.com/path?existing=true&").unwrap();
        append_query(&mut url, &params(&[("foo", "foovalue")]));
        assert_eq!(url.as_str(), "http://host.com/path?existing=true&foo=foovalue");
    }

    #[test]
    fn test_encodes_values() {
        let mut url = Url::parse("http://host.com/path").unwrap();
        append_query(&mut url, &params(&[("foo", "foo value!")]));
        assert_eq!(url.as_str(), "http://host.com/path?foo=foo%20value%21");
    }

    #[test]
    fn test_skips_empty_values() {
        let mut url = Url::parse("http://host.com/path").unwrap();
        append_query(&mut url, &params(&[("empty", ""), ("x", "1")]));
        assert_eq!(url.as_str(), "http://host.com/path?x=1");

        let mut url = Url::parse("http://host.com/path").unwrap();
        append_query(&mut url, &params(&[("empty", "")]));
        assert_eq!(url.as_str(), "http://host.com/path");
    }
}
