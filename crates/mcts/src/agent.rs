//! The per-turn agent facade.
//!
//! Owns the engine, the heuristic, and the RNG across a whole match. Each
//! turn it re-points the tree at the live state (reusing the previous
//! subtree when possible), checks for an already-determined winning line,
//! runs the phase loop until the deadline, and emits the chosen action.

use crate::config::SearchConfig;
use crate::deadline::Deadline;
use crate::heuristic::Heuristic;
use crate::search::{greedy_action, Engine};
use conquest_core::{Game, PlayerId};
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can surface from the agent facade.
///
/// Budget exhaustion is never an error; the search returns the best move
/// found so far.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("select_action called before set_up")]
    NotSetUp,

    #[error("no legal actions available")]
    NoLegalActions,
}

/// A Monte Carlo Tree Search agent.
///
/// Generic over the game, the heuristic biasing rollouts, and the RNG.
pub struct Agent<G: Game, H: Heuristic<G>, R: Rng> {
    config: SearchConfig,
    heuristic: H,
    rng: R,
    num_players: usize,
    player: Option<PlayerId>,
    engine: Option<Engine<G>>,
}

impl<G, H, R> Agent<G, H, R>
where
    G: Game,
    H: Heuristic<G>,
    R: Rng,
{
    /// Create an agent. It must be [`set_up`] before its first turn.
    ///
    /// [`set_up`]: Agent::set_up
    pub fn new(config: SearchConfig, heuristic: H, rng: R) -> Self {
        Self {
            config,
            heuristic,
            rng,
            num_players: 0,
            player: None,
            engine: None,
        }
    }

    /// Initialize for a new match. Drops any tree from a previous match.
    pub fn set_up(&mut self, num_players: usize, player: PlayerId) {
        debug!(num_players, player, "set_up");
        self.num_players = num_players;
        self.player = Some(player);
        self.engine = None;
    }

    /// Number of players configured at set-up.
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// The engine, once the first turn installed it. Exposed for
    /// inspection of the tree and its statistics.
    pub fn engine(&self) -> Option<&Engine<G>> {
        self.engine.as_ref()
    }

    /// Choose an action for the live state within the wall-clock budget.
    ///
    /// Returns within `budget + safety_buffer`; under extreme time
    /// pressure (no iteration completed) a greedy one-ply choice is made
    /// instead.
    ///
    /// # Errors
    /// [`AgentError::NotSetUp`] before [`set_up`], and
    /// [`AgentError::NoLegalActions`] when the state offers no action at
    /// all.
    ///
    /// [`set_up`]: Agent::set_up
    pub fn select_action(
        &mut self,
        game: &G,
        state: &G::State,
        budget: Duration,
    ) -> Result<G::Action, AgentError> {
        let player = self.player.ok_or(AgentError::NotSetUp)?;
        let deadline = Deadline::start(budget, self.config.safety_buffer);

        let reused = match self.engine.as_mut() {
            Some(engine) => engine.adopt(state),
            None => {
                self.engine = Some(Engine::new(self.config.clone(), player, state.clone()));
                false
            }
        };
        let engine = self.engine.as_mut().expect("BUG: engine installed above");
        debug!(
            reused,
            plays = engine.tree().root().plays,
            "starting search"
        );

        if engine.sort_promising_candidates(game, &self.heuristic, &deadline) {
            if let Some(action) = engine.best_root_action() {
                debug!("determined winning line, skipping search");
                return Ok(action);
            }
        }

        let mut iterations = 0u32;
        while !deadline.expired() {
            let leaf = engine.select(game, &deadline);
            if deadline.expired() {
                break;
            }
            engine.expand(game, leaf, &deadline);
            if deadline.expired() {
                break;
            }
            let won = engine.simulate(game, leaf, &self.heuristic, &mut self.rng, &deadline);
            engine.backpropagate(leaf, won, &deadline);
            iterations += 1;
            trace!(iteration = iterations, "iteration complete");
        }

        let root = engine.tree().root();
        debug!(
            iterations,
            plays = root.plays,
            wins = root.wins,
            elapsed_ms = deadline.elapsed().as_millis() as u64,
            "search finished"
        );

        match engine.best_root_action() {
            Some(action) => Ok(action),
            // The root never got expanded: fall back to a one-ply greedy
            // choice.
            None => greedy_action(game, state, player).ok_or(AgentError::NoLegalActions),
        }
    }

    /// Release the tree between matches.
    pub fn tear_down(&mut self) {
        debug!("tear_down");
        self.engine = None;
    }

    /// Pondering hook; currently a no-op.
    pub fn ponder_start(&self) {
        debug!("ponder_start");
    }

    /// Pondering hook; currently a no-op.
    pub fn ponder_stop(&self) {
        debug!("ponder_stop");
    }

    /// Final lifecycle hook; currently a no-op.
    pub fn destroy(&self) {
        debug!("destroy");
    }
}
