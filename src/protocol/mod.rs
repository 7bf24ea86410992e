//! HAL+JSON wire-format constants, rel ordering and header helpers.
//!
//! # Reserved Keys
//!
//! | Key | Holds |
//! |-----|-------|
//! | `_links` | rel → link object or array of link objects |
//! | `_links.curies` | array of curie objects |
//! | `_embedded` | rel → resource object or array of resource objects |
//!
//! # Ordering
//!
//! When a resource is written, the `self` rel always comes first and every other rel
//! follows in ordinal (byte-wise) order. See [`compare_rels`].

pub mod constants;
mod headers;

pub use headers::{contains_header, is_json_media_type, parse_media_type};

use std::cmp::Ordering;

/// Order two rels for emission: `self` first, then ordinal string order.
///
/// # Examples
///
/// ```
/// use hal_http::protocol::compare_rels;
///
/// let mut rels = vec!["orders", "self", "customer", "Zed"];
/// rels.sort_by(|a, b| compare_rels(a, b));
/// assert_eq!(rels, vec!["self", "Zed", "customer", "orders"]);
/// ```
pub fn compare_rels(rel: &str, other: &str) -> Ordering {
    match (rel == constants::SELF_REL, other == constants::SELF_REL) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => rel.cmp(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_sorts_first() {
        assert_eq!(compare_rels("self", "a"), Ordering::Less);
        assert_eq!(compare_rels("a", "self"), Ordering::Greater);
        assert_eq!(compare_rels("self", "self"), Ordering::Equal);
    }

    #[test]
    fn test_ordinal_order() {
        assert_eq!(compare_rels("B", "a"), Ordering::Less);
        assert_eq!(compare_rels("docs:b", "docs:a"), Ordering::Greater);
        assert_eq!(compare_rels("selfie", "self"), Ordering::Greater);
    }
}
