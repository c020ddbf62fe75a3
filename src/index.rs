// Component G: coordinator façade.
//
// `SearchIndex<T>` is a thin, cheaply-cloneable handle onto shared
// state: every clone sees the same items, fragments and cache.

use crate::cache::CacheStats;
use crate::config::Config;
use crate::index_inner::{IndexStats, SearchIndexInner};
use std::hash::Hash;
use std::sync::Arc;

/// An in-memory, incrementally-updatable keyword search index.
///
/// Build one with [`Config`]:
///
/// ```
/// use kwsearch::Config;
///
/// let index = Config::<String>::new().build().unwrap();
/// index.add_item("doc-1".to_string(), "keyword another");
/// assert_eq!(index.find_item("key").as_deref(), Some(&"doc-1".to_string()));
/// ```
#[derive(Clone)]
pub struct SearchIndex<T>(pub(crate) Arc<SearchIndexInner<T>>);

impl<T> std::ops::Deref for SearchIndex<T> {
    type Target = SearchIndexInner<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> SearchIndex<T> {
    pub(crate) fn new(config: Config<T>) -> Self {
        Self(Arc::new(SearchIndexInner::new(config)))
    }
}

impl<T> SearchIndex<T>
where
    T: Eq + Hash + Send + Sync + 'static,
{
    /// Extracts, normalises and filters `raw_keywords` exactly as a
    /// query string, then registers `item` under the surviving tokens,
    /// merging with any keywords already on record for this item.
    ///
    /// Returns `false` if no keyword survived preparation; nothing is
    /// mutated in that case.
    pub fn add_item(&self, item: T, raw_keywords: &str) -> bool {
        self.0.add_item(item, raw_keywords)
    }

    /// Unregisters `item`. Returns `false` if it was not registered.
    pub fn remove_item(&self, item: &T) -> bool {
        self.0.remove_item(item)
    }

    /// Drops every registered item and fragment, and resets the cache.
    pub fn clear(&self) {
        self.0.clear();
    }

    /// Returns the single best match for `query`, if any.
    pub fn find_item(&self, query: &str) -> Option<Arc<T>> {
        self.0.find_item(query)
    }

    /// Returns the single best match for `query` with its score, if any.
    pub fn find_item_with_detail(&self, query: &str) -> Option<(Arc<T>, f64)> {
        self.0.find_item_with_detail(query)
    }

    /// Returns up to `k` matches for `query`, best first.
    pub fn find_items(&self, query: &str, k: usize) -> Vec<Arc<T>> {
        self.0.find_items(query, k)
    }

    /// Returns up to `k` matches for `query` with their scores, best first.
    pub fn find_items_with_detail(&self, query: &str, k: usize) -> Vec<(Arc<T>, f64)> {
        self.0.find_items_with_detail(query, k)
    }

    /// Returns a point-in-time snapshot of the index's size.
    #[must_use]
    pub fn get_stats(&self) -> IndexStats {
        self.0.get_stats()
    }

    /// Returns a best-effort snapshot of the cache's counters.
    #[must_use]
    pub fn get_cache_stats(&self) -> CacheStats {
        self.0.get_cache_stats()
    }
}
