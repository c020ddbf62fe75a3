// Component A: immutable keyed set.
//
// A copy-on-write collection of unique elements backed by a single
// contiguous `Arc<[T]>` allocation. Reads are O(n) but cache-friendly;
// writes never mutate the receiver and instead return a new set.
//
// `split()` hands out two windows into the *same* backing allocation,
// so halving a set for fork-join work-stealing is O(1) rather than a copy.

use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// An immutable, copy-on-write set of unique elements.
///
/// Equality and hashing are order-independent (set semantics), even
/// though the underlying representation is a flat, ordered buffer.
pub struct KeyedSet<T> {
    items: Arc<[T]>,
    range: std::ops::Range<usize>,
    hash: OnceLock<u64>,
}

impl<T> Clone for KeyedSet<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            range: self.range.clone(),
            hash: self.hash.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for KeyedSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Eq + Hash + Clone> KeyedSet<T> {
    /// Returns the empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Arc::from(Vec::new().into_boxed_slice()),
            range: 0..0,
            hash: OnceLock::new(),
        }
    }

    /// Returns a set containing exactly one element.
    #[must_use]
    pub fn singleton(x: T) -> Self {
        Self::from_collection(std::iter::once(x))
    }

    /// Builds a set from an arbitrary collection, de-duplicating as it goes.
    pub fn from_collection<I: IntoIterator<Item = T>>(xs: I) -> Self {
        let mut buf: Vec<T> = Vec::new();
        for x in xs {
            if !buf.contains(&x) {
                buf.push(x);
            }
        }
        let len = buf.len();
        Self {
            items: Arc::from(buf.into_boxed_slice()),
            range: 0..len,
            hash: OnceLock::new(),
        }
    }

    /// Builds the union of two sets, de-duplicating shared elements.
    #[must_use]
    pub fn from_union(xs: &Self, ys: &Self) -> Self {
        let mut buf: Vec<T> = xs.iter().cloned().collect();
        for y in ys.iter() {
            if !buf.contains(y) {
                buf.push(y.clone());
            }
        }
        let len = buf.len();
        Self {
            items: Arc::from(buf.into_boxed_slice()),
            range: 0..len,
            hash: OnceLock::new(),
        }
    }

    /// Returns a new set with `x` inserted, or `self` unchanged if already present.
    #[must_use]
    pub fn add(&self, x: T) -> Self {
        if self.contains(&x) {
            return self.clone();
        }
        let mut buf: Vec<T> = self.iter().cloned().collect();
        buf.push(x);
        Self::from_collection(buf)
    }

    /// Returns a new set with `x` removed, or `self` unchanged if absent.
    #[must_use]
    pub fn remove(&self, x: &T) -> Self {
        if !self.contains(x) {
            return self.clone();
        }
        let buf: Vec<T> = self.iter().filter(|item| *item != x).cloned().collect();
        if buf.is_empty() {
            Self::empty()
        } else {
            Self::from_collection(buf)
        }
    }

    /// Returns `true` if `x` is a member of the set.
    #[must_use]
    pub fn contains(&self, x: &T) -> bool {
        self.iter().any(|item| item == x)
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Returns `true` if the set has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Iterates over the elements of the set in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items[self.range.clone()].iter()
    }

    /// Applies `f` to every element.
    pub fn for_each<F: FnMut(&T)>(&self, mut f: F) {
        for item in self.iter() {
            f(item);
        }
    }

    /// Splits the set into zero, one or two independent work units.
    ///
    /// The halves are windows into the same backing allocation: no
    /// elements are copied. Each half is small enough to recurse on
    /// further via another call to `split`.
    #[must_use]
    pub fn split(&self) -> Vec<Self> {
        match self.len() {
            0 => Vec::new(),
            1 => vec![self.clone()],
            n => {
                let mid = self.range.start + n / 2;
                let left = Self {
                    items: self.items.clone(),
                    range: self.range.start..mid,
                    hash: OnceLock::new(),
                };
                let right = Self {
                    items: self.items.clone(),
                    range: mid..self.range.end,
                    hash: OnceLock::new(),
                };
                vec![left, right]
            }
        }
    }

    /// Order-independent hash of the set's contents, cached after first use.
    #[must_use]
    pub fn set_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            use std::collections::hash_map::DefaultHasher;
            self.iter().fold(0u64, |acc, item| {
                let mut hasher = DefaultHasher::new();
                item.hash(&mut hasher);
                acc ^ hasher.finish()
            })
        })
    }
}

impl<T: Eq + Hash + Clone> PartialEq for KeyedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|item| other.contains(item))
    }
}

impl<T: Eq + Hash + Clone> Eq for KeyedSet<T> {}

impl<T: Eq + Hash + Clone> Hash for KeyedSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.set_hash());
    }
}

impl<T: Eq + Hash + Clone> Default for KeyedSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for KeyedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_collection(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_empty() {
        let set: KeyedSet<u32> = KeyedSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn add_dedupes() {
        let set = KeyedSet::singleton(1u32);
        let set = set.add(1);
        assert_eq!(set.len(), 1);
        let set = set.add(2);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
    }

    #[test]
    fn remove_last_yields_empty() {
        let set = KeyedSet::singleton("a".to_string());
        let set = set.remove(&"a".to_string());
        assert!(set.is_empty());
    }

    #[test]
    fn remove_absent_is_noop() {
        let set = KeyedSet::singleton(1u32);
        let same = set.remove(&2);
        assert_eq!(same.len(), 1);
    }

    #[test]
    fn equality_is_order_independent() {
        let a: KeyedSet<u32> = KeyedSet::from_collection([1, 2, 3]);
        let b: KeyedSet<u32> = KeyedSet::from_collection([3, 2, 1]);
        assert_eq!(a, b);
        assert_eq!(a.set_hash(), b.set_hash());
    }

    #[test]
    fn split_is_zero_copy_windows() {
        let set: KeyedSet<u32> = KeyedSet::from_collection(0..10);
        let halves = set.split();
        assert_eq!(halves.len(), 2);
        let total: usize = halves.iter().map(KeyedSet::len).sum();
        assert_eq!(total, 10);

        let singleton = KeyedSet::singleton(1u32);
        assert_eq!(singleton.split().len(), 1);

        let empty: KeyedSet<u32> = KeyedSet::empty();
        assert!(empty.split().is_empty());
    }

    #[test]
    fn split_recurses_to_singletons() {
        let set: KeyedSet<u32> = KeyedSet::from_collection(0..5);
        let mut stack = vec![set];
        let mut singles = 0;
        while let Some(s) = stack.pop() {
            if s.len() <= 1 {
                singles += s.len();
            } else {
                stack.extend(s.split());
            }
        }
        assert_eq!(singles, 5);
    }
}
