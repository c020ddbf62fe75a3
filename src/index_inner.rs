// Component G: coordinator internals.
//
// Holds the mutable state (fragment graph plus the reverse item ->
// keywords index needed to support re-adding and removing items) behind
// a single `RwLock`, plus the cache, which synchronises itself
// independently so that concurrent readers holding only a shared lock
// can still populate it.

use crate::cache::{AdaptiveCache, CacheStats};
use crate::config::Config;
use crate::graph::Graph;
use crate::keyed_set::KeyedSet;
use crate::query::{combine, prepare_tokens};
use crate::topk::top_k;
use crate::walk::walk_and_score;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

type FxBuildHasher = rustc_hash::FxBuildHasher;

/// Point-in-time counts describing the index's internal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub item_count: usize,
    pub fragment_count: usize,
}

struct State<T> {
    graph: Graph<T>,
    keywords_of: HashMap<Arc<T>, KeyedSet<String>, FxBuildHasher>,
}

impl<T> State<T> {
    fn new() -> Self {
        Self {
            graph: Graph::new(),
            keywords_of: HashMap::default(),
        }
    }
}

pub struct SearchIndexInner<T> {
    pub(crate) config: Config<T>,
    state: RwLock<State<T>>,
    cache: AdaptiveCache<T>,
}

impl<T> SearchIndexInner<T> {
    pub(crate) fn new(config: Config<T>) -> Self {
        let cache = AdaptiveCache::with_byte_budget(config.cache_byte_budget);
        Self {
            config,
            state: RwLock::new(State::new()),
            cache,
        }
    }
}

impl<T> SearchIndexInner<T>
where
    T: Eq + Hash + Send + Sync + 'static,
{
    /// Extracts, normalises and filters `raw_keywords` exactly as a
    /// query string is prepared, then registers `item` under whatever
    /// tokens survive, merging with any keywords already on record for
    /// this item. Returns `false` (without mutating anything) if no
    /// keyword survives preparation.
    pub fn add_item(&self, item: T, raw_keywords: &str) -> bool {
        let new_keywords = prepare_tokens(raw_keywords, &self.config);
        if new_keywords.is_empty() {
            return false;
        }
        let keyword_count = new_keywords.len();

        let mut state = self.state.write().expect("lock is poisoned");

        let (item_arc, previous_keywords) = match state.keywords_of.get_key_value(&item) {
            Some((arc, kws)) => (arc.clone(), Some(kws.clone())),
            None => (Arc::new(item), None),
        };

        let merged = match &previous_keywords {
            Some(previous) => {
                new_keywords.for_each(|keyword| {
                    if !previous.contains(keyword) {
                        state.graph.register_keyword(keyword, &item_arc);
                    }
                });
                KeyedSet::from_union(previous, &new_keywords)
            }
            None => {
                new_keywords.for_each(|keyword| state.graph.register_keyword(keyword, &item_arc));
                new_keywords
            }
        };

        state.keywords_of.insert(item_arc, merged);

        drop(state);
        self.cache.invalidate();
        log::debug!("registered item with {keyword_count} new admissible keyword(s)");
        true
    }

    /// Unregisters `item` and all of its keywords. Returns `false` if
    /// the item was not registered.
    pub fn remove_item(&self, item: &T) -> bool {
        let mut state = self.state.write().expect("lock is poisoned");

        let Some((item_arc, keywords)) = state.keywords_of.remove_entry(item) else {
            return false;
        };

        keywords.for_each(|keyword| state.graph.unregister_keyword(keyword, &item_arc));

        drop(state);
        self.cache.invalidate();
        log::debug!("removed item");
        true
    }

    /// Drops every registered item and fragment, and resets the cache.
    pub fn clear(&self) {
        let mut state = self.state.write().expect("lock is poisoned");
        state.graph.clear();
        state.keywords_of.clear();
        drop(state);
        self.cache.invalidate();
        log::debug!("cleared index");
    }

    /// Runs `query` through the planner and returns the top `k` items
    /// with their scores, best first.
    pub fn find_items_with_detail(&self, query: &str, k: usize) -> Vec<(Arc<T>, f64)> {
        log::trace!("query {query:?} (k={k})");
        if k == 0 {
            return Vec::new();
        }

        let state = self.state.read().expect("lock is poisoned");
        let tokens = prepare_tokens(query, &self.config);
        if tokens.is_empty() {
            return Vec::new();
        }

        let graph = &state.graph;
        let scorer = &self.config.scorer;
        let walk = |fragment: &str| {
            self.cache
                .get_or_compute(fragment, || walk_and_score(graph, fragment, |q, s| scorer(q, s)))
        };

        let scores = combine(&tokens, self.config.merge_policy, self.config.unmatched_policy, &walk);
        let ranked = scores.into_iter().map(|(item, score)| ((item, score), score));
        top_k(ranked, k)
    }

    /// Runs `query` through the planner and returns the top `k` items,
    /// best first, discarding scores.
    pub fn find_items(&self, query: &str, k: usize) -> Vec<Arc<T>> {
        self.find_items_with_detail(query, k)
            .into_iter()
            .map(|(item, _)| item)
            .collect()
    }

    /// Convenience for `find_items_with_detail(query, 1)`'s single result.
    pub fn find_item_with_detail(&self, query: &str) -> Option<(Arc<T>, f64)> {
        self.find_items_with_detail(query, 1).into_iter().next()
    }

    /// Convenience for `find_items(query, 1)`'s single result.
    pub fn find_item(&self, query: &str) -> Option<Arc<T>> {
        self.find_items(query, 1).into_iter().next()
    }

    /// Returns a point-in-time snapshot of the index's size.
    pub fn get_stats(&self) -> IndexStats {
        let state = self.state.read().expect("lock is poisoned");
        IndexStats {
            item_count: state.keywords_of.len(),
            fragment_count: state.graph.fragment_count(),
        }
    }

    /// Returns a best-effort snapshot of the cache's counters.
    pub fn get_cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
