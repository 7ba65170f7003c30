//! The four MCTS phases under a deadline.
//!
//! The engine owns the tree and is the only component mutating its
//! statistics. Each phase is a separate operation so the caller can check
//! the deadline between them; every inner traversal checks it again.

use crate::config::SearchConfig;
use crate::deadline::Deadline;
use crate::heuristic::Heuristic;
use crate::node::{state_hash, Node, NodeId};
use crate::rollout;
use crate::tree::SearchTree;
use conquest_core::{scalar_score, Actor, Game, PlayerId, Score};
use rand::Rng;
use std::cmp::Ordering;
use tracing::trace;

/// Decide whether a finished (or depth-cut) rollout counts as a win for
/// `player`.
///
/// The utility vector is projected to a scalar (strict unique maximum →
/// 1.0, k-way tie → 1/k, otherwise 0). A positive scalar on a
/// non-terminal state is refined through the heuristic vector. Ties are
/// credited as wins with probability one half, so tied outcomes are not
/// systematically discarded from the statistics.
pub fn judge_win<G: Game, R: Rng>(
    game: &G,
    state: &G::State,
    player: PlayerId,
    rng: &mut R,
) -> bool {
    let mut score = scalar_score(&game.utility_vector(state), player);
    if !game.is_terminal(state) && score > 0.0 {
        score = scalar_score(&game.heuristic_vector(state), player);
    }
    score == 1.0 || (score > 0.0 && rng.gen_bool(0.5))
}

/// The MCTS engine: tree, statistics, and the four phases.
///
/// Persisted across turns by the agent so the tree can be reused when the
/// live game reaches a state already in it.
pub struct Engine<G: Game> {
    config: SearchConfig,
    player: PlayerId,
    tree: SearchTree<G>,
}

impl<G: Game> Engine<G> {
    /// Create an engine rooted at the given state.
    pub fn new(config: SearchConfig, player: PlayerId, root_state: G::State) -> Self {
        Self {
            config,
            player,
            tree: SearchTree::new(root_state),
        }
    }

    /// The player this engine searches for.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// The search tree.
    pub fn tree(&self) -> &SearchTree<G> {
        &self.tree
    }

    /// Mutable access to the search tree.
    pub fn tree_mut(&mut self) -> &mut SearchTree<G> {
        &mut self.tree
    }

    /// Point the tree at the live state.
    ///
    /// If the state is found in the arena, the tree is re-rooted there and
    /// the subtree's statistics survive; otherwise the tree is rebuilt
    /// from scratch. Returns whether the tree was reused.
    pub fn adopt(&mut self, state: &G::State) -> bool {
        match self.tree.find(state) {
            Some(id) => {
                self.tree.reroot(id);
                true
            }
            None => {
                self.tree = SearchTree::new(state.clone());
                false
            }
        }
    }

    /// Selection phase: descend from the root to a leaf.
    ///
    /// Chance states follow the child matching the engine-determined
    /// action (first child if none matches); player states maximize UCT
    /// with the stable state hash as tie-break.
    pub fn select(&self, game: &G, deadline: &Deadline) -> NodeId {
        let mut id = NodeId::ROOT;
        while !self.tree.get(id).is_leaf() && !deadline.expired() {
            let node = self.tree.get(id);
            let next = match game.current_actor(node.state()) {
                Actor::Chance => {
                    let determined = game.determine_next_action(node.state());
                    node.children()
                        .iter()
                        .copied()
                        .find(|&c| match (&determined, self.tree.get(c).action()) {
                            (Some(a), Some(b)) => a == b,
                            _ => false,
                        })
                        .or_else(|| node.children().first().copied())
                }
                Actor::Player(_) => self.best_child_by_uct(id),
            };
            match next {
                Some(child) => id = child,
                None => break,
            }
        }
        id
    }

    /// Expansion phase: create one child per legal action.
    ///
    /// No-op on non-leaves and terminal states. Children are evaluated
    /// lazily later; expansion only applies actions. The deadline is
    /// checked per action.
    pub fn expand(&mut self, game: &G, id: NodeId, deadline: &Deadline) {
        if !self.tree.get(id).is_leaf() {
            return;
        }
        let state = self.tree.get(id).state().clone();
        if game.is_terminal(&state) {
            return;
        }
        for action in game.legal_actions(&state) {
            if deadline.expired() {
                break;
            }
            let successor = game.apply(&state, &action);
            self.tree.add_child(id, action, successor);
        }
    }

    /// Simulation phase: play out from the node and judge the result.
    ///
    /// Chance states resolve automatically; player states follow the
    /// heuristic rollout policy (uniform when the heuristic declines).
    /// The rollout stops on terminal states, the depth bound (halved once
    /// most of the budget is gone), the deadline, an invalid action, or
    /// an empty action set, and the reached state is judged as-is.
    pub fn simulate<H, R>(
        &self,
        game: &G,
        id: NodeId,
        heuristic: &H,
        rng: &mut R,
        deadline: &Deadline,
    ) -> bool
    where
        H: Heuristic<G>,
        R: Rng,
    {
        let depth_bound = if deadline.expired_scaled(self.config.late_rollout_proportion) {
            self.config.max_rollout_depth / 2
        } else {
            self.config.max_rollout_depth
        };

        let mut state = self.tree.get(id).state().clone();
        let mut depth = 0;
        while !game.is_terminal(&state) && depth < depth_bound && !deadline.expired() {
            match game.current_actor(&state) {
                Actor::Chance => state = game.apply_auto(&state),
                Actor::Player(_) => {
                    let picked = rollout::pick_action(
                        game,
                        &state,
                        heuristic,
                        self.player,
                        self.config.exploration,
                        self.config.rollout_action_cap,
                        rng,
                    );
                    // An empty action set or an action the rules engine
                    // rejects ends the rollout; the pre-terminal state is
                    // judged instead.
                    let Some(action) = picked else { break };
                    if !game.is_valid_action(&state, &action) {
                        break;
                    }
                    state = game.apply(&state, &action);
                }
            }
            depth += 1;
        }

        let won = judge_win(game, &state, self.player, rng);
        trace!(depth, won, "rollout finished");
        won
    }

    /// Backpropagation phase: credit the rollout along the path to the
    /// root.
    ///
    /// `plays` is incremented before `wins`, and the walk stops early when
    /// the deadline fires; a partial update keeps `wins <= plays` intact.
    pub fn backpropagate(&mut self, id: NodeId, won: bool, deadline: &Deadline) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if deadline.expired() {
                break;
            }
            let node = self.tree.get_mut(node_id);
            node.record(won);
            current = node.parent();
        }
    }

    /// Pre-search terminal shortcut.
    ///
    /// Walks down the tree while every sibling level is free of chance
    /// states, sorting each level (descending cached evaluator score when
    /// the heuristic applies, otherwise by the move comparator: best
    /// first on the engine's turns, worst first on opponents') and
    /// descending into the first child. Returns true when the walk ends
    /// on a terminal node with every level determined: the best root
    /// move then forces the end of the game.
    pub fn sort_promising_candidates<H>(
        &mut self,
        game: &G,
        heuristic: &H,
        deadline: &Deadline,
    ) -> bool
    where
        H: Heuristic<G>,
    {
        let mut id = NodeId::ROOT;
        let mut determined = true;
        while determined && !self.tree.get(id).is_leaf() && !deadline.expired() {
            let children: Vec<NodeId> = self.tree.get(id).children().to_vec();
            determined = children
                .iter()
                .all(|&c| !game.current_actor(self.tree.get(c).state()).is_chance());

            let mut scored = true;
            for &child in &children {
                if deadline.expired() {
                    scored = false;
                    break;
                }
                if self.cached_score(game, heuristic, child).is_none() {
                    scored = false;
                    break;
                }
            }

            if scored {
                self.tree.sort_children_by(id, |a, b| {
                    let a_score = a.score.map(Score::get).unwrap_or(0.0);
                    let b_score = b.score.map(Score::get).unwrap_or(0.0);
                    b_score.partial_cmp(&a_score).unwrap_or(Ordering::Equal)
                });
            } else {
                let my_turn = matches!(
                    game.current_actor(self.tree.get(id).state()),
                    Actor::Player(p) if p == self.player
                );
                if my_turn {
                    self.tree
                        .sort_children_by(id, |a, b| move_order(a, b).reverse());
                } else {
                    self.tree.sort_children_by(id, move_order);
                }
            }

            id = self.tree.get(id).children()[0];
        }
        determined && game.is_terminal(self.tree.get(id).state())
    }

    /// Best root move under the move comparator (plays, then wins, then
    /// state hash). `None` while the root is still a leaf.
    pub fn best_root_action(&self) -> Option<G::Action> {
        self.tree
            .root()
            .children()
            .iter()
            .copied()
            .max_by(|&a, &b| move_order(self.tree.get(a), self.tree.get(b)))
            .and_then(|id| self.tree.get(id).action().cloned())
    }

    /// Evaluator value of a node, computed through the heuristic on first
    /// use and cached on the node afterwards.
    fn cached_score<H>(&mut self, game: &G, heuristic: &H, id: NodeId) -> Option<Score>
    where
        H: Heuristic<G>,
    {
        if let Some(score) = self.tree.get(id).score {
            return Some(score);
        }
        let score = heuristic.evaluate(game, self.tree.get(id).state(), self.player)?;
        self.tree.get_mut(id).score = Some(score);
        Some(score)
    }

    fn best_child_by_uct(&self, id: NodeId) -> Option<NodeId> {
        let parent_plays = self.tree.get(id).plays;
        self.tree
            .get(id)
            .children()
            .iter()
            .copied()
            .max_by(|&a, &b| {
                let node_a = self.tree.get(a);
                let node_b = self.tree.get(b);
                self.uct(node_a, parent_plays)
                    .partial_cmp(&self.uct(node_b, parent_plays))
                    .unwrap_or(Ordering::Equal)
                    .then(node_a.state_hash().cmp(&node_b.state_hash()))
            })
    }

    /// UCT value: `w/n + c * sqrt(ln N / n)` with `n = max(plays, 1)` and
    /// `N = max(parent plays, 1)`.
    fn uct(&self, node: &Node<G>, parent_plays: u32) -> f64 {
        let n = node.plays.max(1) as f64;
        let w = node.wins as f64;
        let parent = parent_plays.max(1) as f64;
        w / n + self.config.exploration * (parent.ln() / n).sqrt()
    }
}

/// The move comparator: plays, then wins, then state hash, ascending.
/// The hash keeps the ordering total and deterministic for equal
/// statistics.
pub(crate) fn move_order<G: Game>(a: &Node<G>, b: &Node<G>) -> Ordering {
    a.plays
        .cmp(&b.plays)
        .then(a.wins.cmp(&b.wins))
        .then(a.state_hash().cmp(&b.state_hash()))
}

/// Greedy one-ply choice: apply every legal action and keep the successor
/// ranked highest by the utility projection for `player` (state hash as
/// tie-break). Used when no search iteration completed.
pub(crate) fn greedy_action<G: Game>(
    game: &G,
    state: &G::State,
    player: PlayerId,
) -> Option<G::Action> {
    let mut best: Option<(f64, u64, G::Action)> = None;
    for action in game.legal_actions(state) {
        let successor = game.apply(state, &action);
        let value = scalar_score(&game.utility_vector(&successor), player);
        let hash = state_hash(&successor);
        let better = match &best {
            None => true,
            Some((b_value, b_hash, _)) => {
                value > *b_value || (value == *b_value && hash > *b_hash)
            }
        };
        if better {
            best = Some((value, hash, action));
        }
    }
    best.map(|(_, _, action)| action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{Frontier, FrontierAction, FrontierState};
    use crate::heuristic::{PositionHeuristic, UniformPolicy};
    use conquest_core::MapBoard;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    fn far_deadline() -> Deadline {
        Deadline::start(Duration::from_secs(60), Duration::ZERO)
    }

    /// Six territories in one continent, all held by `winner`.
    fn decided_state(winner: usize) -> FrontierState {
        let mut board = MapBoard::new();
        let c = board.add_continent(3);
        let mut ids = Vec::new();
        for _ in 0..6 {
            ids.push(board.add_territory(c, winner, 2).unwrap());
        }
        for i in 0..6 {
            board.connect(ids[i], ids[(i + 1) % 6]).unwrap();
        }
        FrontierState::from_board(board, winner)
    }

    fn engine_at_start() -> (Frontier, Engine<Frontier>) {
        let game = Frontier::two_players();
        let state = game.initial_state();
        let engine = Engine::new(SearchConfig::default(), 0, state);
        (game, engine)
    }

    #[test]
    fn test_expand_covers_legal_actions() {
        let (game, mut engine) = engine_at_start();
        let deadline = far_deadline();
        engine.expand(&game, NodeId::ROOT, &deadline);

        let expected = game.legal_actions(engine.tree().root().state());
        let actions: Vec<_> = engine
            .tree()
            .root()
            .children()
            .iter()
            .map(|&c| engine.tree().get(c).action().cloned().unwrap())
            .collect();
        assert_eq!(actions, expected);

        // Expanding again is a no-op.
        engine.expand(&game, NodeId::ROOT, &deadline);
        assert_eq!(engine.tree().root().children().len(), expected.len());
    }

    #[test]
    fn test_select_prefers_less_visited_children() {
        let (game, mut engine) = engine_at_start();
        let deadline = far_deadline();
        engine.expand(&game, NodeId::ROOT, &deadline);

        // Every child except the first carries two winless visits; the
        // first child's exploration term dominates.
        let children: Vec<_> = engine.tree().root().children().to_vec();
        engine.tree_mut().get_mut(NodeId::ROOT).plays = 2 * (children.len() as u32 - 1);
        for &c in children.iter().skip(1) {
            engine.tree_mut().get_mut(c).plays = 2;
        }

        let selected = engine.select(&game, &deadline);
        assert_eq!(selected, children[0]);
    }

    #[test]
    fn test_select_follows_determined_chance_child() {
        let game = Frontier::two_players();
        let start = game.initial_state();
        let attack = game
            .legal_actions(&start)
            .into_iter()
            .find(|a| matches!(a, FrontierAction::Attack { .. }))
            .unwrap();
        let pending = game.apply(&start, &attack);

        let mut engine = Engine::new(SearchConfig::default(), 0, pending);
        let deadline = far_deadline();
        engine.expand(&game, NodeId::ROOT, &deadline);

        let selected = engine.select(&game, &deadline);
        assert_eq!(
            engine.tree().get(selected).action(),
            Some(&FrontierAction::Resolve)
        );
    }

    #[test]
    fn test_backpropagate_walks_to_root() {
        let (game, mut engine) = engine_at_start();
        let deadline = far_deadline();
        engine.expand(&game, NodeId::ROOT, &deadline);
        let leaf = engine.tree().root().children()[0];

        engine.backpropagate(leaf, true, &deadline);
        engine.backpropagate(leaf, false, &deadline);

        assert_eq!(engine.tree().get(leaf).plays, 2);
        assert_eq!(engine.tree().get(leaf).wins, 1);
        assert_eq!(engine.tree().root().plays, 2);
        assert_eq!(engine.tree().root().wins, 1);
    }

    #[test]
    fn test_adopt_reuses_matching_subtree() {
        let (game, mut engine) = engine_at_start();
        let deadline = far_deadline();
        engine.expand(&game, NodeId::ROOT, &deadline);

        let child = engine.tree().root().children()[0];
        engine.tree_mut().get_mut(child).plays = 5;
        engine.tree_mut().get_mut(child).wins = 4;
        let child_state = engine.tree().get(child).state().clone();

        assert!(engine.adopt(&child_state));
        assert_eq!(engine.tree().root().plays, 5);
        assert_eq!(engine.tree().root().wins, 4);

        // A state nowhere in the tree rebuilds it.
        let fresh = game.initial_state();
        let other = game.apply(&fresh, &FrontierAction::Reinforce(2));
        let other = game.apply(&other, &FrontierAction::Reinforce(1));
        assert!(!engine.adopt(&other));
        assert_eq!(engine.tree().len(), 1);
        assert_eq!(engine.tree().root().plays, 0);
    }

    #[test]
    fn test_simulate_judges_with_either_policy() {
        let (game, engine) = engine_at_start();
        let deadline = far_deadline();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        // Both policies must finish within the depth bound and return a
        // verdict without panicking.
        let _ = engine.simulate(&game, NodeId::ROOT, &PositionHeuristic::new(), &mut rng, &deadline);
        let _ = engine.simulate(&game, NodeId::ROOT, &UniformPolicy, &mut rng, &deadline);
    }

    #[test]
    fn test_judge_win_on_decided_states() {
        let game = Frontier::two_players();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let won = decided_state(0);
        let lost = decided_state(1);

        for _ in 0..32 {
            assert!(judge_win(&game, &won, 0, &mut rng));
            assert!(!judge_win(&game, &lost, 0, &mut rng));
        }
    }

    #[test]
    fn test_greedy_action_returns_legal_move() {
        let game = Frontier::two_players();
        let state = game.initial_state();
        let action = greedy_action(&game, &state, 0).unwrap();
        assert!(game.is_valid_action(&state, &action));
    }

    #[test]
    fn test_greedy_action_none_without_actions() {
        let game = Frontier::two_players();
        let state = decided_state(0);
        assert_eq!(greedy_action(&game, &state, 0), None);
    }
}
