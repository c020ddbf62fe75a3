// Component E: query planner.
//
// Turns a raw query string into prepared tokens, resolves each token
// to a score map (direct walk, or BACKTRACKING shortening on a miss),
// and combines the per-token maps under the configured merge policy
// using a fork-join reduction over a halveable token set (A).

use crate::config::{Config, MergePolicy, UnmatchedPolicy};
use crate::frag::{prefix_of, suffix_of};
use crate::keyed_set::KeyedSet;
use crate::walk::ScoreMap;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Extracts, normalises, filters and deduplicates a raw query string
/// into the set of tokens the planner will resolve.
pub fn prepare_tokens<T>(raw_query: &str, config: &Config<T>) -> KeyedSet<String> {
    let extracted = (config.extractor)(raw_query);
    extracted
        .into_iter()
        .map(|token| (config.normaliser)(&token))
        .filter(|token| !token.is_empty() && token.chars().count() >= config.min_keyword_length)
        .collect()
}

/// Resolves a single prepared token to a score map, honouring the
/// unmatched policy on a miss.
pub fn resolve_token<T, F>(token: &str, policy: UnmatchedPolicy, walk: &F) -> ScoreMap<T>
where
    T: Eq + std::hash::Hash,
    F: Fn(&str) -> ScoreMap<T> + Sync,
{
    let direct = walk(token);
    if !direct.is_empty() {
        return direct;
    }
    if policy == UnmatchedPolicy::Exact || token.chars().count() <= 1 {
        return direct;
    }

    let prefix = prefix_of(token);
    let suffix = suffix_of(token);

    let prefix_result = resolve_token(prefix, policy, walk);
    let suffix_result = if suffix == prefix {
        ScoreMap::default()
    } else {
        resolve_token(suffix, policy, walk)
    };

    union_sum(prefix_result, suffix_result)
}

/// Merges two score maps by summing scores for shared items.
fn union_sum<T: Eq + std::hash::Hash>(mut a: ScoreMap<T>, b: ScoreMap<T>) -> ScoreMap<T> {
    for (item, score) in b {
        a.entry(item)
            .and_modify(|existing| *existing += score)
            .or_insert(score);
    }
    a
}

/// Keeps only items present in both maps, summing their scores.
fn intersect_sum<T: Eq + std::hash::Hash>(a: ScoreMap<T>, b: ScoreMap<T>) -> ScoreMap<T> {
    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    smaller
        .into_iter()
        .filter_map(|(item, score)| {
            larger
                .get(&item)
                .map(|other_score| (item.clone(), score + other_score))
        })
        .collect()
}

/// Combines every prepared token's score map under the configured
/// merge policy, using a work-stealing fork-join reduction.
pub fn combine<T, F>(
    tokens: &KeyedSet<String>,
    merge_policy: MergePolicy,
    unmatched_policy: UnmatchedPolicy,
    walk: &F,
) -> ScoreMap<T>
where
    T: Eq + std::hash::Hash + Send + Sync,
    F: Fn(&str) -> ScoreMap<T> + Sync,
{
    match merge_policy {
        MergePolicy::Union => {
            let acc: DashMap<Arc<T>, f64, rustc_hash::FxBuildHasher> = DashMap::default();
            union_fork_join(tokens, unmatched_policy, walk, &acc);
            acc.into_iter().collect()
        }
        MergePolicy::Intersection => {
            let cancelled = AtomicBool::new(false);
            intersection_fork_join(tokens, unmatched_policy, walk, &cancelled)
        }
    }
}

fn union_fork_join<T, F>(
    tokens: &KeyedSet<String>,
    policy: UnmatchedPolicy,
    walk: &F,
    acc: &DashMap<Arc<T>, f64, rustc_hash::FxBuildHasher>,
) where
    T: Eq + std::hash::Hash + Send + Sync,
    F: Fn(&str) -> ScoreMap<T> + Sync,
{
    if tokens.is_empty() {
        return;
    }

    if tokens.len() == 1 {
        let token = tokens.iter().next().expect("len == 1");
        let result = resolve_token(token, policy, walk);
        for (item, score) in result {
            acc.entry(item)
                .and_modify(|existing| *existing += score)
                .or_insert(score);
        }
        return;
    }

    let halves = tokens.split();
    let (left, right) = (&halves[0], &halves[1]);
    rayon::join(
        || union_fork_join(left, policy, walk, acc),
        || union_fork_join(right, policy, walk, acc),
    );
}

fn intersection_fork_join<T, F>(
    tokens: &KeyedSet<String>,
    policy: UnmatchedPolicy,
    walk: &F,
    cancelled: &AtomicBool,
) -> ScoreMap<T>
where
    T: Eq + std::hash::Hash + Send + Sync,
    F: Fn(&str) -> ScoreMap<T> + Sync,
{
    if cancelled.load(Ordering::Relaxed) || tokens.is_empty() {
        return ScoreMap::default();
    }

    if tokens.len() == 1 {
        let token = tokens.iter().next().expect("len == 1");
        return resolve_token(token, policy, walk);
    }

    let halves = tokens.split();
    let (left, right) = rayon::join(
        || intersection_fork_join(&halves[0], policy, walk, cancelled),
        || intersection_fork_join(&halves[1], policy, walk, cancelled),
    );

    if cancelled.load(Ordering::Relaxed) {
        return ScoreMap::default();
    }

    let merged = intersect_sum(left, right);
    if merged.is_empty() {
        cancelled.store(true, Ordering::Relaxed);
    }
    merged
}
