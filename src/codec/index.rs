//! Per-type rel → property index with a process-wide cache.
//!
//! The index for a resource type is built from its [`ResourceSchema`] the first time
//! the codec needs it and then shared by every thread. Lookups take a shared read
//! lock; a missing entry is built outside the lock and published with an
//! insert-if-absent, so concurrent first requests may build twice but every caller
//! ends up holding the same, fully built entry.

use super::schema::{EmbeddedBinding, LinkBinding, RelBinding, ResourceSchema};
use super::HalResource;
use crate::error::{HalError, Result};
use crate::protocol::compare_rels;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

type CacheEntry = Arc<dyn Any + Send + Sync>;

/// TypeId → `Arc<RelPropertyIndex<T>>`
static INDEX_CACHE: Lazy<RwLock<HashMap<TypeId, CacheEntry>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Rel bindings of one resource type, split by reserved section.
///
/// Bindings are stored in emission order: `self` first, then ordinal rel order.
///
/// # Examples
///
/// ```
/// use hal_http::codec::{RelPropertyIndex, RootResource};
///
/// let index = RelPropertyIndex::<RootResource>::for_type().unwrap();
/// assert!(index.link_property("self").is_some());
/// assert!(index.embedded_property("self").is_none());
/// ```
pub struct RelPropertyIndex<T> {
    link_props: Vec<LinkBinding<T>>,
    embedded_props: Vec<EmbeddedBinding<T>>,
    link_positions: HashMap<String, usize>,
    embedded_positions: HashMap<String, usize>,
}

impl<T: HalResource> RelPropertyIndex<T> {
    /// Cached index for `T`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Configuration`] when `T`'s schema is inconsistent. Failed
    /// builds are not cached.
    pub fn for_type() -> Result<Arc<Self>> {
        let key = TypeId::of::<T>();

        if let Some(entry) = INDEX_CACHE.read().get(&key) {
            return Self::downcast(entry.clone());
        }

        let built: CacheEntry = Arc::new(Self::build(T::schema())?);

        let entry = INDEX_CACHE
            .write()
            .entry(key)
            .or_insert(built)
            .clone();
        Self::downcast(entry)
    }

    fn downcast(entry: CacheEntry) -> Result<Arc<Self>> {
        entry.downcast::<Self>().map_err(|_| {
            HalError::Configuration(format!(
                "cached rel index does not belong to {}",
                type_name::<T>()
            ))
        })
    }
}

impl<T: 'static> RelPropertyIndex<T> {
    /// Build an index from a schema without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Configuration`] when a rel is empty, a property is bound
    /// more than once (for example to both `_links` and `_embedded`), or a rel is
    /// bound twice within the same section.
    pub fn build(schema: ResourceSchema<T>) -> Result<Self> {
        let mut properties: HashSet<&'static str> = HashSet::new();
        let mut link_props = Vec::new();
        let mut embedded_props = Vec::new();

        for binding in schema.into_bindings() {
            if binding.rel().is_empty() {
                return Err(HalError::Configuration(format!(
                    "property '{}' of {} is bound to an empty rel",
                    binding.property(),
                    type_name::<T>()
                )));
            }
            if !properties.insert(binding.property()) {
                return Err(HalError::Configuration(format!(
                    "property '{}' of {} is bound more than once",
                    binding.property(),
                    type_name::<T>()
                )));
            }

            match binding {
                RelBinding::Link(binding) => link_props.push(binding),
                RelBinding::Embedded(binding) => embedded_props.push(binding),
            }
        }

        link_props.sort_by(|a, b| compare_rels(a.rel(), b.rel()));
        embedded_props.sort_by(|a, b| compare_rels(a.rel(), b.rel()));

        let link_positions = positions(link_props.iter().map(LinkBinding::rel), "_links")?;
        let embedded_positions =
            positions(embedded_props.iter().map(EmbeddedBinding::rel), "_embedded")?;

        tracing::debug!(
            "Built rel index for {}: {} link rels, {} embedded rels",
            type_name::<T>(),
            link_props.len(),
            embedded_props.len()
        );

        Ok(RelPropertyIndex {
            link_props,
            embedded_props,
            link_positions,
            embedded_positions,
        })
    }

    /// Property bound to `rel` under `_links`.
    pub fn link_property(&self, rel: &str) -> Option<&LinkBinding<T>> {
        self.link_positions.get(rel).map(|&i| &self.link_props[i])
    }

    /// Property bound to `rel` under `_embedded`.
    pub fn embedded_property(&self, rel: &str) -> Option<&EmbeddedBinding<T>> {
        self.embedded_positions.get(rel).map(|&i| &self.embedded_props[i])
    }

    /// Link bindings in emission order.
    pub fn link_properties(&self) -> &[LinkBinding<T>] {
        &self.link_props
    }

    /// Embedded bindings in emission order.
    pub fn embedded_properties(&self) -> &[EmbeddedBinding<T>] {
        &self.embedded_props
    }
}

fn positions<'a>(
    rels: impl Iterator<Item = &'a str>,
    section: &str,
) -> Result<HashMap<String, usize>> {
    let mut map: HashMap<String, usize> = HashMap::new();
    for (i, rel) in rels.enumerate() {
        if map.insert(rel.to_string(), i).is_some() {
            return Err(HalError::Configuration(format!(
                "rel '{}' is bound more than once under {}",
                rel, section
            )));
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Link, LinkCollection};
    use serde::{Deserialize, Serialize};
    use std::sync::Barrier;
    use std::thread;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Widget {
        name: String,
        #[serde(skip)]
        links: LinkCollection,
        #[serde(skip)]
        self_link: Option<Link>,
        #[serde(skip)]
        parts: Option<Vec<Link>>,
        #[serde(skip)]
        maker: Option<Link>,
    }

    impl HalResource for Widget {
        fn schema() -> ResourceSchema<Self> {
            Self::schema_builder()
                .links("parts", "parts", |w| w.parts.as_deref(), |w, l| w.parts = Some(l))
                .link("maker", "maker", |w| w.maker.as_ref(), |w, l| w.maker = Some(l))
                .link("self_link", "self", |w| w.self_link.as_ref(), |w, l| w.self_link = Some(l))
        }

        fn links(&self) -> &LinkCollection {
            &self.links
        }

        fn set_links(&mut self, links: LinkCollection) {
            self.links = links;
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Conflicted {
        #[serde(skip)]
        links: LinkCollection,
        #[serde(skip)]
        thing: Option<Link>,
        #[serde(skip)]
        nested: Option<Box<Conflicted>>,
    }

    impl HalResource for Conflicted {
        fn schema() -> ResourceSchema<Self> {
            Self::schema_builder()
                .link("thing", "thing", |c| c.thing.as_ref(), |c, l| c.thing = Some(l))
                .embedded(
                    "thing",
                    "thing",
                    |c| c.nested.as_deref(),
                    |c, n| c.nested = Some(Box::new(n)),
                )
        }

        fn links(&self) -> &LinkCollection {
            &self.links
        }

        fn set_links(&mut self, links: LinkCollection) {
            self.links = links;
        }
    }

    /// Only touched by the concurrency test, so its cache entry starts out empty.
    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Gadget {
        #[serde(skip)]
        links: LinkCollection,
        #[serde(skip)]
        self_link: Option<Link>,
        #[serde(skip)]
        docs: Option<Link>,
    }

    impl HalResource for Gadget {
        fn schema() -> ResourceSchema<Self> {
            Self::schema_builder()
                .link("docs", "docs", |g| g.docs.as_ref(), |g, l| g.docs = Some(l))
                .link("self_link", "self", |g| g.self_link.as_ref(), |g, l| g.self_link = Some(l))
        }

        fn links(&self) -> &LinkCollection {
            &self.links
        }

        fn set_links(&mut self, links: LinkCollection) {
            self.links = links;
        }
    }

    #[test]
    fn test_emission_order_is_self_first_then_ordinal() {
        let index = RelPropertyIndex::<Widget>::for_type().unwrap();
        let rels: Vec<&str> = index.link_properties().iter().map(|b| b.rel()).collect();
        assert_eq!(rels, vec!["self", "maker", "parts"]);
    }

    #[test]
    fn test_lookup_by_rel() {
        let index = RelPropertyIndex::<Widget>::for_type().unwrap();
        assert_eq!(index.link_property("parts").unwrap().property(), "parts");
        assert!(index.link_property("unknown").is_none());
        assert!(index.embedded_properties().is_empty());
    }

    #[test]
    fn test_property_bound_to_links_and_embedded_is_rejected() {
        match RelPropertyIndex::<Conflicted>::for_type() {
            Err(HalError::Configuration(msg)) => assert!(msg.contains("thing")),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("conflicting bindings were accepted"),
        }
    }

    #[test]
    fn test_duplicate_rel_in_section_is_rejected() {
        let schema = ResourceSchema::<Widget>::new()
            .link("maker", "maker", |w| w.maker.as_ref(), |w, l| w.maker = Some(l))
            .link("self_link", "maker", |w| w.self_link.as_ref(), |w, l| w.self_link = Some(l));
        assert!(matches!(
            RelPropertyIndex::build(schema),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_rel_is_rejected() {
        let schema = ResourceSchema::<Widget>::new()
            .link("maker", "", |w| w.maker.as_ref(), |w, l| w.maker = Some(l));
        assert!(matches!(
            RelPropertyIndex::build(schema),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_concurrent_first_access_shares_one_entry() {
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    RelPropertyIndex::<Gadget>::for_type().unwrap()
                })
            })
            .collect();

        let indexes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for index in &indexes[1..] {
            assert!(Arc::ptr_eq(&indexes[0], index));
            assert_eq!(index.link_properties().len(), 2);
        }
        assert!(Arc::ptr_eq(&indexes[0], &RelPropertyIndex::<Gadget>::for_type().unwrap()));
    }
}
