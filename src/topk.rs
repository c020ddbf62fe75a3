// Component B: partial top-k selector.
//
// Returns the k highest-scoring elements of a stream without sorting
// the whole stream. Below `SMALL_K_THRESHOLD` a sorted `Vec` kept via
// binary-search insertion is fastest (no tree overhead, cache-friendly);
// above it a `BTreeSet` avoids the O(k) shift cost of vector insertion.

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Below this limit, use a flat sorted-`Vec` insertion buffer.
/// Above it, switch to a `BTreeSet` to avoid O(k) shifts per insert.
const SMALL_K_THRESHOLD: usize = 100;

#[derive(Clone, Copy, PartialEq)]
struct OrderedScore(f64);

impl Eq for OrderedScore {}

impl PartialOrd for OrderedScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// An entry carries its first-seen sequence number so ties break in
/// arrival order rather than arbitrarily.
struct Entry<T> {
    score: OrderedScore,
    seq: u64,
    value: T,
}

/// Returns the `k` highest-scoring elements of `items`, best-to-worst.
///
/// `k == 0` or an empty input yields an empty vector. Ties preserve
/// the order in which elements were first seen.
pub fn top_k<T, I>(items: I, k: usize) -> Vec<T>
where
    I: IntoIterator<Item = (T, f64)>,
{
    if k == 0 {
        return Vec::new();
    }

    if k <= SMALL_K_THRESHOLD {
        top_k_small(items, k)
    } else {
        top_k_large(items, k)
    }
}

fn top_k_small<T, I>(items: I, k: usize) -> Vec<T>
where
    I: IntoIterator<Item = (T, f64)>,
{
    // Kept sorted ascending by score so the worst tenant sits at index 0
    // and insertion position is found by binary search.
    let mut buf: Vec<Entry<T>> = Vec::with_capacity(k);
    let mut seq = 0u64;

    for (value, score) in items {
        let entry = Entry {
            score: OrderedScore(score),
            seq,
            value,
        };
        seq += 1;

        if buf.len() < k {
            let pos = insertion_point(&buf, &entry);
            buf.insert(pos, entry);
        } else if entry.score.cmp_entries(&buf[0]) == Ordering::Greater {
            buf.remove(0);
            let pos = insertion_point(&buf, &entry);
            buf.insert(pos, entry);
        }
    }

    buf.into_iter().rev().map(|e| e.value).collect()
}

impl<T> Entry<T> {
    /// Compares by score, then by reversed sequence so that among equal
    /// scores earlier arrivals sort "greater" (survive eviction, and
    /// appear first in the final best-to-worst order).
    fn cmp_entries(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn insertion_point<T>(buf: &[Entry<T>], entry: &Entry<T>) -> usize {
    buf.partition_point(|existing| existing.cmp_entries(entry) == Ordering::Less)
}

fn top_k_large<T, I>(items: I, k: usize) -> Vec<T>
where
    I: IntoIterator<Item = (T, f64)>,
{
    struct Ranked<T> {
        score: OrderedScore,
        seq: u64,
        value: T,
    }

    impl<T> PartialEq for Ranked<T> {
        fn eq(&self, other: &Self) -> bool {
            self.score == other.score && self.seq == other.seq
        }
    }
    impl<T> Eq for Ranked<T> {}
    impl<T> PartialOrd for Ranked<T> {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }
    impl<T> Ord for Ranked<T> {
        fn cmp(&self, other: &Self) -> Ordering {
            // Ascending order: worst element is `.first()` in the set.
            self.score
                .cmp(&other.score)
                .then_with(|| other.seq.cmp(&self.seq))
        }
    }

    let mut set: BTreeSet<Ranked<T>> = BTreeSet::new();
    let mut seq = 0u64;

    for (value, score) in items {
        let candidate = Ranked {
            score: OrderedScore(score),
            seq,
            value,
        };
        seq += 1;

        if set.len() < k {
            set.insert(candidate);
        } else {
            // `pop_first` removes the current worst tenant; put it back
            // unless the candidate strictly beats it.
            let worst = set.pop_first().expect("set holds k > 0 elements");
            if candidate.cmp(&worst) == Ordering::Greater {
                set.insert(candidate);
            } else {
                set.insert(worst);
            }
        }
    }

    set.into_iter().rev().map(|e| e.value).collect()
}
