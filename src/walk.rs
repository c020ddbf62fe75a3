// Component D: walk engine.
//
// Walks the fragment graph upward from a starting fragment, scoring
// every keyword-bearing node encountered, and max-aggregates scores
// per item. The walk is commutative (parent visitation order is
// unspecified) because of the max aggregation, so callers may run it
// from either end of a fork-join split without changing the result.

use crate::graph::{Graph, NodeId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::Ordering;
use std::sync::Arc;

type FxHashSet<K> = HashSet<K, rustc_hash::FxBuildHasher>;

/// A per-fragment score map: item -> best score seen so far.
pub type ScoreMap<T> = HashMap<Arc<T>, f64, rustc_hash::FxBuildHasher>;

/// Walks the graph upward from `start_fragment`, scoring every
/// keyword-bearing node reached along parent edges.
///
/// Returns an empty map if no node exists for `start_fragment`. The
/// scorer is called as `scorer(start_fragment, node_fragment)` for
/// every visited node that carries at least one item; if it panics,
/// the panic propagates to the caller unchanged.
pub fn walk_and_score<T, F>(graph: &Graph<T>, start_fragment: &str, scorer: F) -> ScoreMap<T>
where
    T: Eq + std::hash::Hash,
    F: Fn(&str, &str) -> f64,
{
    let Some(start_id) = graph.node_of(start_fragment) else {
        return ScoreMap::default();
    };

    let start_node = graph.node(start_id);
    let result_hint = start_node.result_size_hint.load(Ordering::Relaxed);
    let visited_hint = start_node.visited_size_hint.load(Ordering::Relaxed);

    let mut visited: FxHashSet<NodeId> =
        FxHashSet::with_capacity_and_hasher(visited_hint.max(8), Default::default());
    let mut result: ScoreMap<T> = HashMap::with_capacity_and_hasher(result_hint, Default::default());

    let mut stack = vec![start_id];
    visited.insert(start_id);

    while let Some(id) = stack.pop() {
        let node = graph.node(id);

        if !node.items.is_empty() {
            let score = scorer(start_fragment, &node.fragment);
            node.items.for_each(|item| {
                result
                    .entry(item.clone())
                    .and_modify(|best| {
                        if score > *best {
                            *best = score;
                        }
                    })
                    .or_insert(score);
            });
        }

        node.parents.for_each(|&parent_id| {
            if visited.insert(parent_id) {
                stack.push(parent_id);
            }
        });
    }

    start_node
        .result_size_hint
        .store(result.len(), Ordering::Relaxed);
    start_node
        .visited_size_hint
        .store(visited.len(), Ordering::Relaxed);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: u32) -> Arc<u32> {
        Arc::new(n)
    }

    fn default_scorer(query: &str, stored: &str) -> f64 {
        let base = query.len() as f64 / stored.len() as f64;
        if stored.starts_with(query) {
            base + 1.0
        } else {
            base
        }
    }

    #[test]
    fn missing_fragment_yields_empty() {
        let g: Graph<u32> = Graph::new();
        let result = walk_and_score(&g, "nope", default_scorer);
        assert!(result.is_empty());
    }

    #[test]
    fn walk_reaches_keyword_from_any_substring_position() {
        let mut g: Graph<u32> = Graph::new();
        let x = item(1);
        g.register_keyword("onex", &x);

        // "ne" is a substring in the middle of "onex".
        let result = walk_and_score(&g, "ne", default_scorer);
        assert_eq!(result.get(&x), Some(&(2.0 / 4.0)));
    }

    #[test]
    fn exact_match_gets_prefix_boost() {
        let mut g: Graph<u32> = Graph::new();
        let x = item(1);
        g.register_keyword("one", &x);

        let result = walk_and_score(&g, "one", default_scorer);
        assert_eq!(result.get(&x), Some(&(1.0 + 1.0)));
    }

    #[test]
    fn max_aggregation_keeps_the_best_score_per_item() {
        let mut g: Graph<u32> = Graph::new();
        let x = item(1);
        // Both "one" and "onex" share the item; walking from "on" must
        // see both and keep the higher score.
        g.register_keyword("one", &x);
        g.register_keyword("onex", &x);

        let result = walk_and_score(&g, "on", default_scorer);
        let expected_from_one = default_scorer("on", "one");
        let expected_from_onex = default_scorer("on", "onex");
        assert_eq!(
            result.get(&x),
            Some(&expected_from_one.max(expected_from_onex))
        );
    }

    #[test]
    fn size_hints_are_updated_after_a_walk() {
        let mut g: Graph<u32> = Graph::new();
        g.register_keyword("one", &item(1));
        g.register_keyword("one", &item(2));

        let _ = walk_and_score(&g, "one", default_scorer);

        let id = g.node_of("one").unwrap();
        let node = g.node(id);
        assert_eq!(node.result_size_hint.load(Ordering::Relaxed), 2);
    }
}
