//! Arena-allocated search tree.
//!
//! Nodes live in a contiguous vector and reference each other by index.
//! The store owns the memory and the links; it never touches statistics,
//! which belong to the engine.

use crate::node::{state_hash, Node, NodeId};
use conquest_core::Game;
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Arena-allocated MCTS tree.
#[derive(Debug)]
pub struct SearchTree<G: Game> {
    nodes: Vec<Node<G>>,
}

impl<G: Game> SearchTree<G> {
    /// Create a tree holding only a root for the given state.
    pub fn new(root_state: G::State) -> Self {
        Self {
            nodes: vec![Node::root(root_state)],
        }
    }

    /// Get a reference to a node.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node<G> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<G> {
        &mut self.nodes[id.0]
    }

    /// The root node.
    pub fn root(&self) -> &Node<G> {
        self.get(NodeId::ROOT)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a root exists from construction on.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child under `parent`, returning the new node's id.
    ///
    /// Children keep their insertion order; the caller controls it.
    pub fn add_child(&mut self, parent: NodeId, action: G::Action, state: G::State) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::child(state, action, parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Sort the children of `id` with a stable sort.
    pub fn sort_children_by<F>(&mut self, id: NodeId, mut cmp: F)
    where
        F: FnMut(&Node<G>, &Node<G>) -> Ordering,
    {
        let mut children = self.nodes[id.0].children.clone();
        children.sort_by(|a, b| cmp(&self.nodes[a.0], &self.nodes[b.0]));
        self.nodes[id.0].children = children;
    }

    /// Search the arena for a node whose state equals `state`.
    ///
    /// Linear over the arena with a hash pre-filter; used once per turn
    /// when trying to reuse the previous tree.
    pub fn find(&self, state: &G::State) -> Option<NodeId> {
        let hash = state_hash(state);
        self.nodes
            .iter()
            .position(|n| n.state_hash() == hash && n.state() == state)
            .map(NodeId)
    }

    /// Make `new_root` the root, dropping everything outside its subtree.
    ///
    /// The retained nodes are copied into a fresh arena; their statistics,
    /// cached scores, and child order are preserved. The new root's parent
    /// link is cleared; it keeps the action that produced its state.
    pub fn reroot(&mut self, new_root: NodeId) {
        if new_root == NodeId::ROOT {
            return;
        }

        let mut fresh: Vec<Node<G>> = Vec::new();
        let mut queue: VecDeque<(NodeId, Option<NodeId>)> = VecDeque::new();
        queue.push_back((new_root, None));

        while let Some((old_id, new_parent)) = queue.pop_front() {
            let mut node = self.nodes[old_id.0].clone();
            let old_children = std::mem::take(&mut node.children);
            node.parent = new_parent;
            let new_id = NodeId(fresh.len());
            fresh.push(node);
            if let Some(p) = new_parent {
                fresh[p.0].children.push(new_id);
            }
            for child in old_children {
                queue.push_back((child, Some(new_id)));
            }
        }

        self.nodes = fresh;
    }
}
