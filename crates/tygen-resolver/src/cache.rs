//! The resolution cache.
//!
//! Three independently-sized LRU stores memoize the three expensive lookups
//! of a resolution run: resolved descriptors by logical key, provider
//! declaration handles by the same logical key, and parsed source artifacts
//! by path.
//!
//! The logical key is a structured composite ([`DescriptorKey`]), never a
//! concatenated string or a hashed scalar: `{source: "a", name: "X::Y"}` and
//! `{source: "a::X", name: "Y"}` must never collapse into one entry, and a
//! struct key makes that unambiguous by construction.
//!
//! Lifecycle: populated lazily on first resolution of each entity,
//! invalidated wholesale by [`ResolutionCache::clear`], never partially.

use indexmap::IndexMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::provider::{ParsedSource, SourceId, TypeDecl};
use tygen_ir::{limits, TypeDescriptor};

/// Logical key for a resolved-descriptor lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorKey {
    pub source: SourceId,
    pub name: String,
}

impl DescriptorKey {
    pub fn new(source: SourceId, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
        }
    }
}

/// A bounded map with strict least-recently-used eviction.
///
/// Reading an entry promotes it; inserting past capacity evicts the
/// least-recently-used entry first. A capacity of zero retains nothing.
/// Updating an existing key's value does not change occupancy.
#[derive(Debug)]
pub struct LruStore<K, V> {
    map: IndexMap<K, V>,
    capacity: usize,
}

impl<K: Hash + Eq, V> LruStore<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up an entry, promoting it to most-recently-used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = self.map.get_index_of(key)?;
        let last = self.map.len() - 1;
        self.map.move_index(index, last);
        self.map.get(key)
    }

    /// Containment check without promotion.
    pub fn has(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or update an entry.
    ///
    /// With capacity zero this is a no-op. An update of an existing key
    /// replaces the value and promotes the entry without evicting anything.
    pub fn set(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(index) = self.map.get_index_of(&key) {
            let last = self.map.len() - 1;
            self.map[index] = value;
            self.map.move_index(index, last);
            return;
        }
        if self.map.len() == self.capacity {
            // Front of the map is the least-recently-used entry.
            self.map.shift_remove_index(0);
        }
        self.map.insert(key, value);
    }

    /// Remove an entry, returning its value if present.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.map.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

/// The three stores owned by one dispatcher.
#[derive(Debug)]
pub struct ResolutionCache {
    /// Resolved IR by (source, name) logical key.
    descriptors: LruStore<DescriptorKey, TypeDescriptor>,
    /// Provider declaration handles, keyed the same way.
    decls: LruStore<DescriptorKey, TypeDecl>,
    /// Parsed source artifacts by file path.
    sources: LruStore<String, Arc<ParsedSource>>,
}

impl ResolutionCache {
    pub fn new(
        descriptor_capacity: usize,
        handle_capacity: usize,
        source_capacity: usize,
    ) -> Self {
        Self {
            descriptors: LruStore::new(descriptor_capacity),
            decls: LruStore::new(handle_capacity),
            sources: LruStore::new(source_capacity),
        }
    }

    pub fn with_default_capacities() -> Self {
        Self::new(
            limits::DESCRIPTOR_CACHE_CAPACITY,
            limits::HANDLE_CACHE_CAPACITY,
            limits::SOURCE_CACHE_CAPACITY,
        )
    }

    pub fn descriptors(&mut self) -> &mut LruStore<DescriptorKey, TypeDescriptor> {
        &mut self.descriptors
    }

    pub fn decls(&mut self) -> &mut LruStore<DescriptorKey, TypeDecl> {
        &mut self.decls
    }

    pub fn sources(&mut self) -> &mut LruStore<String, Arc<ParsedSource>> {
        &mut self.sources
    }

    /// Wholesale invalidation of every store. The cache is never partially
    /// invalidated.
    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.decls.clear();
        self.sources.clear();
        tracing::debug!("resolution cache cleared");
    }
}
