//! Header parsing helpers.
//!
//! # Examples
//!
//! ```
//! use hal_http::protocol::{is_json_media_type, parse_media_type};
//!
//! assert_eq!(parse_media_type("application/HAL+json; charset=utf-8"), "application/hal+json");
//! assert!(is_json_media_type("application/vnd.api+json"));
//! assert!(!is_json_media_type("text/html"));
//! ```

use std::collections::BTreeMap;

/// Extract the lowercased `type/subtype` part of a media type, dropping parameters.
pub fn parse_media_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a `Content-Type` value denotes JSON (`application/json`, `application/hal+json`
/// or any `+json` suffix).
pub fn is_json_media_type(value: &str) -> bool {
    let media_type = parse_media_type(value);
    media_type == super::constants::media_types::JSON || media_type.ends_with("+json")
}

/// Whether `headers` already has `name`, compared case-insensitively.
pub fn contains_header<V>(headers: &BTreeMap<String, V>, name: &str) -> bool {
    headers.keys().any(|key| key.eq_ignore_ascii_case(name))
}
