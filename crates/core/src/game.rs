use crate::board::Board;
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier of a real player. Player ids are dense and start at 0; they
/// index the utility and heuristic vectors.
pub type PlayerId = usize;

/// Who acts in a given state.
///
/// Risk interleaves real decisions with automatic resolution (dice, forced
/// card draws). States in the latter category have no player to move; the
/// rules engine resolves them deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Actor {
    /// A real player must choose an action.
    Player(PlayerId),
    /// The rules engine resolves the state automatically.
    Chance,
}

impl Actor {
    /// True if this is an automatic-resolution state.
    pub fn is_chance(self) -> bool {
        matches!(self, Actor::Chance)
    }

    /// The acting player, if any.
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Actor::Player(p) => Some(p),
            Actor::Chance => None,
        }
    }
}

/// A game abstraction for Monte Carlo planning.
///
/// This trait defines the interface a rules engine must provide for the
/// search to plan over it. It is designed for n-player games with chance
/// states; the search never inspects a state directly, it only queries.
///
/// States are immutable values: `apply` returns a fresh state and the
/// search stores them in its tree. Engines that mutate in place must clone
/// defensively before returning.
pub trait Game: Clone {
    /// The game state. `Eq + Hash` are required so the search can re-root
    /// an existing tree onto the live state between turns.
    type State: Clone + Eq + Hash + Debug;

    /// A game action.
    type Action: Clone + Eq + Hash + Debug;

    /// Number of players in the match. Utility and heuristic vectors have
    /// exactly this length.
    fn player_count(&self) -> usize;

    /// Who acts in the given state.
    fn current_actor(&self, state: &Self::State) -> Actor;

    /// All legal actions in the given state. Empty for terminal states.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Applies an action, returning the successor state.
    fn apply(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Resolves an automatic state, returning the successor state.
    ///
    /// Only meaningful when `current_actor` is [`Actor::Chance`];
    /// implementations may return the state unchanged otherwise.
    fn apply_auto(&self, state: &Self::State) -> Self::State;

    /// The action the rules engine will take in an automatic state.
    ///
    /// Deterministic for chance states; `None` when a real player acts.
    fn determine_next_action(&self, state: &Self::State) -> Option<Self::Action>;

    /// The action that produced this state, when the engine records it.
    fn previous_action(&self, _state: &Self::State) -> Option<Self::Action> {
        None
    }

    /// Returns true if the game has ended.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Returns true if the action is legal in the given state.
    fn is_valid_action(&self, state: &Self::State, action: &Self::Action) -> bool {
        self.legal_actions(state).contains(action)
    }

    /// Normalized utility per player. Exact for terminal states, a coarse
    /// standing otherwise.
    fn utility_vector(&self, state: &Self::State) -> Vec<f64>;

    /// Heuristic standing per player for non-terminal states.
    fn heuristic_vector(&self, state: &Self::State) -> Vec<f64>;
}

/// A [`Game`] whose states expose a Risk board.
///
/// The position evaluator works exclusively through the board view, so any
/// game implementing this trait gets heuristic-guided search for free.
pub trait RiskGame: Game {
    /// The board view type.
    type Board: Board;

    /// The board reached in the given state.
    fn board<'s>(&self, state: &'s Self::State) -> &'s Self::Board;
}
