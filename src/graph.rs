//! Generic directed graph keyed by node identity.
//!
//! The resolver builds one graph per resolution call: an edge `a -> b`
//! means `a` needs `b` before it can be produced. Nodes without outgoing
//! edges are leaves and can be produced immediately; removing a produced
//! node unblocks its parents.

use std::hash::Hash;

use crate::internal::{Map, Set};

/// Node of a [`DependencyGraph`].
#[derive(Debug, Clone)]
pub struct GraphNode<K, T> {
    key: K,
    data: T,
    seq: u64,
    incoming: Set<K>,
    outgoing: Set<K>,
}

impl<K, T> GraphNode<K, T> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    /// Keys of nodes with an edge into this node.
    pub fn incoming(&self) -> &Set<K> {
        &self.incoming
    }

    /// Keys of nodes this node has an edge to.
    pub fn outgoing(&self) -> &Set<K> {
        &self.outgoing
    }
}

/// Directed graph over nodes identified by an injective projection of
/// their data.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::DependencyGraph;
///
/// let mut graph: DependencyGraph<&str, &str> = DependencyGraph::new(|name| *name);
/// graph.insert_edge("app", "db");
/// graph.insert_edge("app", "cache");
/// graph.insert_edge("cache", "db");
///
/// let leaves: Vec<_> = graph.leaves().iter().map(|n| *n.key()).collect();
/// assert_eq!(leaves, vec!["db"]);
///
/// graph.remove_node(&"db");
/// let leaves: Vec<_> = graph.leaves().iter().map(|n| *n.key()).collect();
/// assert_eq!(leaves, vec!["cache"]);
/// ```
#[derive(Clone)]
pub struct DependencyGraph<K, T> {
    nodes: Map<K, GraphNode<K, T>>,
    key_of: fn(&T) -> K,
    next_seq: u64,
}

impl<K, T> DependencyGraph<K, T>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty graph keyed by `key_of`.
    pub fn new(key_of: fn(&T) -> K) -> Self {
        Self {
            nodes: Map::default(),
            key_of,
            next_seq: 0,
        }
    }

    /// Returns the node for `data`'s key, inserting it if absent.
    ///
    /// When a node already exists the supplied `data` is dropped and the
    /// stored data is kept.
    pub fn lookup_or_insert(&mut self, data: T) -> &mut GraphNode<K, T> {
        let key = (self.key_of)(&data);
        let seq = self.next_seq;
        let node = self.nodes.entry(key.clone()).or_insert_with(|| GraphNode {
            key,
            data,
            seq,
            incoming: Set::default(),
            outgoing: Set::default(),
        });
        if node.seq == seq {
            self.next_seq += 1;
        }
        node
    }

    /// Adds the edge `from -> to`, inserting missing nodes.
    pub fn insert_edge(&mut self, from: T, to: T) {
        let from_key = self.lookup_or_insert(from).key.clone();
        let to_key = self.lookup_or_insert(to).key.clone();

        if let Some(node) = self.nodes.get_mut(&from_key) {
            node.outgoing.insert(to_key.clone());
        }
        if let Some(node) = self.nodes.get_mut(&to_key) {
            node.incoming.insert(from_key);
        }
    }

    /// Deletes the node and purges its key from every neighbour.
    pub fn remove_node(&mut self, key: &K) -> Option<T> {
        let node = self.nodes.remove(key)?;
        for parent in &node.incoming {
            if let Some(parent) = self.nodes.get_mut(parent) {
                parent.outgoing.remove(key);
            }
        }
        for child in &node.outgoing {
            if let Some(child) = self.nodes.get_mut(child) {
                child.incoming.remove(key);
            }
        }
        Some(node.data)
    }

    /// Nodes with no outgoing edges, in insertion order.
    pub fn leaves(&self) -> Vec<&GraphNode<K, T>> {
        let mut leaves: Vec<_> = self
            .nodes
            .values()
            .filter(|node| node.outgoing.is_empty())
            .collect();
        leaves.sort_by_key(|node| node.seq);
        leaves
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> Vec<&GraphNode<K, T>> {
        let mut nodes: Vec<_> = self.nodes.values().collect();
        nodes.sort_by_key(|node| node.seq);
        nodes
    }

    pub fn get(&self, key: &K) -> Option<&GraphNode<K, T>> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
