use crate::keyed_set::KeyedSet;
use std::hash::Hash;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

/// Dense index into the fragment graph's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// A single materialised fragment of some keyword.
///
/// `items` holds only the items whose *keyword is exactly* `fragment`
/// (direct membership); `parents` points to the nodes one character
/// longer that this fragment was derived from.
pub struct GraphNode<T> {
    pub fragment: Box<str>,
    pub items: KeyedSet<Arc<T>>,
    pub parents: KeyedSet<NodeId>,

    /// Advisory size hints used to pre-size the walk accumulator on the
    /// next walk rooted at this node. Updated racily (see design notes);
    /// ordering is `Relaxed` throughout.
    pub(crate) result_size_hint: AtomicUsize,
    pub(crate) visited_size_hint: AtomicUsize,
}

impl<T: Eq + Hash> GraphNode<T> {
    pub(crate) fn new(fragment: Box<str>) -> Self {
        Self {
            fragment,
            items: KeyedSet::empty(),
            parents: KeyedSet::empty(),
            result_size_hint: AtomicUsize::new(0),
            visited_size_hint: AtomicUsize::new(0),
        }
    }

    pub(crate) fn is_orphan(&self) -> bool {
        self.items.is_empty() && self.parents.is_empty()
    }
}
