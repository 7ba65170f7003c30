//! Evaluation abstraction for the search.
//!
//! The `Heuristic` trait is the seam between the generic search and the
//! Risk-specific position evaluator. The engine works with or without
//! domain knowledge: [`PositionHeuristic`] scores Risk boards, while
//! [`UniformPolicy`] declines to score anything, which drops rollouts back
//! to uniformly random action choice.

use conquest_core::{Game, PlayerId, RiskGame, Score};
use conquest_eval::{EvalConfig, Evaluator};

/// Trait for scoring game states during search.
pub trait Heuristic<G: Game> {
    /// Score the state in [0, 1] for `player`, or `None` when this
    /// heuristic has no opinion on the game at hand.
    fn evaluate(&self, game: &G, state: &G::State, player: PlayerId) -> Option<Score>;
}

/// No domain knowledge: every state is unscored.
///
/// With this policy rollouts pick uniformly at random and the pre-search
/// shortcut orders children by their statistics alone. Kept as the
/// baseline for testing the bare search.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformPolicy;

impl<G: Game> Heuristic<G> for UniformPolicy {
    fn evaluate(&self, _game: &G, _state: &G::State, _player: PlayerId) -> Option<Score> {
        None
    }
}

/// The adaptive Risk position evaluator as a search heuristic.
///
/// Builds a fresh, short-lived [`Evaluator`] per evaluated state; caches
/// never outlive a single state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PositionHeuristic {
    config: EvalConfig,
}

impl PositionHeuristic {
    /// Heuristic with the default (position-adaptive) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Heuristic with an explicit evaluator configuration.
    pub fn with_config(config: EvalConfig) -> Self {
        Self { config }
    }
}

impl<G: RiskGame> Heuristic<G> for PositionHeuristic {
    fn evaluate(&self, game: &G, state: &G::State, player: PlayerId) -> Option<Score> {
        let evaluator = Evaluator::with_config(game.board(state), player, self.config);
        Some(evaluator.score())
    }
}
