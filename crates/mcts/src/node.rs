//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices for cache locality and simpler
//! memory management.

use conquest_core::{Game, Score};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Index into the node arena.
///
/// A lightweight handle referencing a node in the tree. Using indices
/// instead of pointers avoids Rc/RefCell overhead and makes re-rooting a
/// bulk copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// Structural hash of a game state.
///
/// Deterministic within a process; used as the stable last tie-break in
/// every comparator and as a pre-filter when searching the arena for a
/// state during re-rooting.
pub fn state_hash<S: Hash>(state: &S) -> u64 {
    let mut hasher = DefaultHasher::new();
    state.hash(&mut hasher);
    hasher.finish()
}

/// A node in the MCTS tree.
///
/// Each node owns the game state it represents and the rollout statistics
/// gathered for it. Child order is stable: children appear in the order
/// they were created during expansion.
#[derive(Clone, Debug)]
pub struct Node<G: Game> {
    state: G::State,
    action: Option<G::Action>,
    state_hash: u64,
    /// Rollouts that passed through this node.
    pub plays: u32,
    /// Rollouts credited as a win for the searching player.
    pub wins: u32,
    /// Cached evaluator value; set at most once.
    pub score: Option<Score>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl<G: Game> Node<G> {
    /// Create a root node for the given state.
    pub fn root(state: G::State) -> Self {
        Self::new(state, None, None)
    }

    /// Create a child node reached by `action`.
    pub fn child(state: G::State, action: G::Action, parent: NodeId) -> Self {
        Self::new(state, Some(action), Some(parent))
    }

    fn new(state: G::State, action: Option<G::Action>, parent: Option<NodeId>) -> Self {
        let state_hash = state_hash(&state);
        Self {
            state,
            action,
            state_hash,
            plays: 0,
            wins: 0,
            score: None,
            parent,
            children: Vec::new(),
        }
    }

    /// The game state at this node.
    pub fn state(&self) -> &G::State {
        &self.state
    }

    /// The action that produced this state (`None` for the root).
    pub fn action(&self) -> Option<&G::Action> {
        self.action.as_ref()
    }

    /// Structural hash of the state, computed once at creation.
    pub fn state_hash(&self) -> u64 {
        self.state_hash
    }

    /// Parent link (`None` for the root).
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in stable insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True if the node has no children yet.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Record one rollout result. `plays` is bumped before `wins` so the
    /// `wins <= plays` invariant holds even if the update is interrupted.
    pub fn record(&mut self, won: bool) {
        self.plays += 1;
        if won {
            self.wins += 1;
        }
    }
}
