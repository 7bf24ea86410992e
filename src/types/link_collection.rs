//! Rel-indexed, ordered collection of decoded links.

use super::{CurieLink, Link};
use crate::error::{HalError, Result};
use std::collections::HashMap;

/// Links of a resource grouped by link relation.
///
/// Rels keep the order in which they were first seen, and links within a rel keep
/// the order they were supplied in, so a templated multi-link such as
/// `[{"title": "Bar 1"}, {"title": "Bar 2"}]` comes back in the same order.
/// Curies are held separately and never take part in rel lookup.
///
/// A collection is immutable once constructed.
///
/// # Examples
///
/// ```
/// use hal_http::{Link, LinkCollection};
///
/// let links = LinkCollection::new(
///     vec![
///         Link::new("/orders/1").with_rel("self"),
///         Link::new("/customers/7").with_rel("customer"),
///     ],
///     vec![],
/// ).unwrap();
///
/// assert_eq!(links.get("customer").unwrap().href, "/customers/7");
/// assert!(links.require("missing-rel").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkCollection {
    /// Rel groups in first-seen order
    groups: Vec<(String, Vec<Link>)>,
    /// Rel -> position in `groups`
    positions: HashMap<String, usize>,
    curies: Vec<CurieLink>,
}

impl LinkCollection {
    /// Build a collection from links that already carry their rel.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidLink`] if any link has an empty rel.
    pub fn new(
        links: impl IntoIterator<Item = Link>,
        curies: impl IntoIterator<Item = CurieLink>,
    ) -> Result<Self> {
        let mut groups: Vec<(String, Vec<Link>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for link in links {
            if link.rel.is_empty() {
                return Err(HalError::InvalidLink(format!(
                    "all links must have a link relation (href '{}')",
                    link.href
                )));
            }

            match positions.get(&link.rel) {
                Some(&position) => groups[position].1.push(link),
                None => {
                    positions.insert(link.rel.clone(), groups.len());
                    groups.push((link.rel.clone(), vec![link]));
                }
            }
        }

        Ok(LinkCollection {
            groups,
            positions,
            curies: curies.into_iter().collect(),
        })
    }

    /// First link for `rel`, if any.
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.get_all(rel).and_then(|links| links.first())
    }

    /// All links for `rel` in their original order, if any.
    pub fn get_all(&self, rel: &str) -> Option<&[Link]> {
        self.positions
            .get(rel)
            .map(|&position| self.groups[position].1.as_slice())
    }

    /// First link for `rel`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::LinkNotFound`] when the rel is absent.
    pub fn require(&self, rel: &str) -> Result<&Link> {
        self.get(rel)
            .ok_or_else(|| HalError::LinkNotFound(rel.to_string()))
    }

    /// All links for `rel`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::LinkNotFound`] when the rel is absent.
    pub fn require_all(&self, rel: &str) -> Result<&[Link]> {
        self.get_all(rel)
            .ok_or_else(|| HalError::LinkNotFound(rel.to_string()))
    }

    /// Whether any link has `rel`.
    pub fn contains(&self, rel: &str) -> bool {
        self.positions.contains_key(rel)
    }

    /// Rels in first-seen order.
    pub fn rels(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|(rel, _)| rel.as_str())
    }

    /// Curie declarations exactly as they were supplied.
    pub fn curies(&self) -> &[CurieLink] {
        &self.curies
    }

    /// Iterate every link. Each rel's links are contiguous and in original order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            groups: self.groups.iter(),
            current: Default::default(),
        }
    }

    /// Total number of links, curies excluded.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, links)| links.len()).sum()
    }

    /// No links at all. Curies are not counted.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Iterator over all links of a [`LinkCollection`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    groups: std::slice::Iter<'a, (String, Vec<Link>)>,
    current: std::slice::Iter<'a, Link>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(link) = self.current.next() {
                return Some(link);
            }
            let (_, links) = self.groups.next()?;
            self.current = links.iter();
        }
    }
}

impl<'a> IntoIterator for &'a LinkCollection {
    type Item = &'a Link;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
