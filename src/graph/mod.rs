// Component C: substring fragment graph.
//
// Every keyword registered with the index materialises a node for
// itself and, recursively, for its length-one-shorter prefix and
// suffix, down to length 1. Because every suffix and every prefix is
// materialised, any contiguous substring of a keyword is reachable
// from that keyword's node by walking parent links one step at a
// time from either end — this is the property the walk engine (D)
// relies on.
//
// Nodes live in a single arena (`Vec<Option<GraphNode<T>>>`); this
// gives fragment interning, O(1) lookup by id, and free-list reuse of
// vacated slots without any unsafe code or reference-counted node
// pointers.

mod node;

pub use node::NodeId;

use crate::frag::{prefix_of, suffix_of};
use node::GraphNode;
use std::collections::HashMap;
use std::sync::Arc;

type FxBuildHasher = rustc_hash::FxBuildHasher;

/// The substring fragment graph.
///
/// Holds one node per distinct materialised fragment across the whole
/// population of registered keywords.
pub struct Graph<T> {
    arena: Vec<Option<GraphNode<T>>>,
    fragments: HashMap<Box<str>, NodeId, FxBuildHasher>,
    free_list: Vec<NodeId>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            fragments: HashMap::default(),
            free_list: Vec::new(),
        }
    }

    /// Drops all nodes, returning the graph to its freshly-constructed state.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.fragments.clear();
        self.free_list.clear();
    }

    /// Looks up the node for an exact fragment, if materialised.
    #[must_use]
    pub fn node_of(&self, fragment: &str) -> Option<NodeId> {
        self.fragments.get(fragment).copied()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &GraphNode<T> {
        self.arena[id.0 as usize]
            .as_ref()
            .expect("NodeId must reference a live node")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut GraphNode<T> {
        self.arena[id.0 as usize]
            .as_mut()
            .expect("NodeId must reference a live node")
    }

    fn alloc_node(&mut self, fragment: Box<str>) -> NodeId
    where
        T: Eq + std::hash::Hash,
    {
        let id = if let Some(id) = self.free_list.pop() {
            self.arena[id.0 as usize] = Some(GraphNode::new(fragment.clone()));
            id
        } else {
            let id = NodeId(self.arena.len() as u32);
            self.arena.push(Some(GraphNode::new(fragment.clone())));
            id
        };
        self.fragments.insert(fragment, id);
        id
    }

    fn free_node(&mut self, id: NodeId)
    where
        T: Eq + std::hash::Hash,
    {
        let fragment = self.arena[id.0 as usize]
            .take()
            .expect("NodeId must reference a live node")
            .fragment;
        self.fragments.remove(&fragment);
        self.free_list.push(id);
    }

    /// Ensures a node exists for `fragment`, recursively materialising
    /// its prefix and suffix children (down to length 1) the first
    /// time the fragment is seen.
    fn intern(&mut self, fragment: &str) -> NodeId
    where
        T: Eq + std::hash::Hash,
    {
        if let Some(id) = self.node_of(fragment) {
            return id;
        }

        let id = self.alloc_node(fragment.into());

        if fragment.chars().count() > 1 {
            let prefix = prefix_of(fragment).to_string();
            let suffix = suffix_of(fragment).to_string();

            let prefix_id = self.intern(&prefix);
            self.link_parent(prefix_id, id);

            if suffix != prefix {
                let suffix_id = self.intern(&suffix);
                self.link_parent(suffix_id, id);
            }
        }

        id
    }

    /// Records `parent` as a parent of `child`.
    fn link_parent(&mut self, child: NodeId, parent: NodeId)
    where
        T: Eq + std::hash::Hash,
    {
        let node = self.node_mut(child);
        node.parents = node.parents.add(parent);
    }

    /// Registers `item` under `keyword`, materialising whatever
    /// fragment nodes are missing.
    pub fn register_keyword(&mut self, keyword: &str, item: &Arc<T>)
    where
        T: Eq + std::hash::Hash,
    {
        let id = self.intern(keyword);
        let node = self.node_mut(id);
        node.items = node.items.add(item.clone());
    }

    /// Unregisters `item` from `keyword`'s node, pruning the node (and
    /// any now-orphaned ancestry) if it no longer holds items or parents.
    pub fn unregister_keyword(&mut self, keyword: &str, item: &Arc<T>)
    where
        T: Eq + std::hash::Hash,
    {
        let Some(id) = self.node_of(keyword) else {
            return;
        };

        let node = self.node_mut(id);
        node.items = node.items.remove(item);

        self.prune_if_orphan(id);
    }

    /// If `id`'s node has become orphaned (no items, no parents),
    /// unlinks it and recurses into its prefix/suffix children.
    fn prune_if_orphan(&mut self, id: NodeId)
    where
        T: Eq + std::hash::Hash,
    {
        let (is_orphan, fragment) = {
            let node = self.node(id);
            (node.is_orphan(), node.fragment.clone())
        };

        if !is_orphan {
            return;
        }

        let children: Vec<NodeId> = if fragment.chars().count() > 1 {
            let prefix_id = self.node_of(&prefix_of(&fragment).to_string());
            let suffix_id = self.node_of(&suffix_of(&fragment).to_string());
            [prefix_id, suffix_id]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
        } else {
            Vec::new()
        };
        let mut children = children;
        children.dedup();

        self.free_node(id);

        for child_id in children {
            let node = self.node_mut(child_id);
            node.parents = node.parents.remove(&id);
            self.prune_if_orphan(child_id);
        }
    }

    /// Total number of live fragment nodes. Exposed for statistics and tests.
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: u32) -> Arc<u32> {
        Arc::new(n)
    }

    #[test]
    fn registering_a_keyword_materialises_all_substring_boundaries() {
        let mut g: Graph<u32> = Graph::new();
        g.register_keyword("word", &item(1));

        // Every suffix reachable by trimming from the front, every
        // prefix reachable by trimming from the back.
        for frag in ["word", "ord", "rd", "d", "wor", "wo", "w"] {
            assert!(g.node_of(frag).is_some(), "missing fragment {frag}");
        }
    }

    #[test]
    fn shared_fragments_are_deduplicated() {
        let mut g: Graph<u32> = Graph::new();
        g.register_keyword("keyword", &item(1));
        let count_after_first = g.fragment_count();

        g.register_keyword("keyboard", &item(2));
        // "key" (and "k", "ke") are shared between both keywords.
        let key_node = g.node_of("key").expect("key node must exist");
        assert_eq!(g.node(key_node).parents.len(), 2);

        assert!(g.fragment_count() > count_after_first);
    }

    #[test]
    fn removing_the_only_item_prunes_the_whole_ancestry() {
        let mut g: Graph<u32> = Graph::new();
        let x = item(1);
        g.register_keyword("ab", &x);
        assert!(g.node_of("ab").is_some());
        assert!(g.node_of("a").is_some());
        assert!(g.node_of("b").is_some());

        g.unregister_keyword("ab", &x);

        assert!(g.node_of("ab").is_none());
        assert!(g.node_of("a").is_none());
        assert!(g.node_of("b").is_none());
        assert_eq!(g.fragment_count(), 0);
    }

    #[test]
    fn removing_one_of_several_items_keeps_the_node() {
        let mut g: Graph<u32> = Graph::new();
        let x = item(1);
        let y = item(2);
        g.register_keyword("cat", &x);
        g.register_keyword("cat", &y);

        g.unregister_keyword("cat", &x);

        let id = g.node_of("cat").expect("cat node must survive");
        assert_eq!(g.node(id).items.len(), 1);
    }

    #[test]
    fn shared_ancestor_survives_until_last_dependent_keyword_is_gone() {
        let mut g: Graph<u32> = Graph::new();
        let x = item(1);
        let y = item(2);
        g.register_keyword("keyword", &x);
        g.register_keyword("keyboard", &y);

        g.unregister_keyword("keyword", &x);

        // "key" is still a parent of "keyboard"'s ancestry, so it survives.
        assert!(g.node_of("key").is_some());
        assert!(g.node_of("keyword").is_none());

        g.unregister_keyword("keyboard", &y);
        assert_eq!(g.fragment_count(), 0);
    }

    #[test]
    fn double_letter_fragment_has_a_single_shared_child() {
        let mut g: Graph<u32> = Graph::new();
        let x = item(1);
        g.register_keyword("aa", &x);

        let a = g.node_of("a").expect("a node must exist");
        assert_eq!(g.node(a).parents.len(), 1);

        g.unregister_keyword("aa", &x);
        assert_eq!(g.fragment_count(), 0);
    }

    #[test]
    fn single_character_keyword_has_no_children() {
        let mut g: Graph<u32> = Graph::new();
        let x = item(1);
        g.register_keyword("a", &x);
        assert_eq!(g.fragment_count(), 1);

        g.unregister_keyword("a", &x);
        assert_eq!(g.fragment_count(), 0);
    }
}
