//! Frontier: a pocket Risk for search validation.
//!
//! Six territories in two continents, full conquest as the goal, and a
//! deliberately deterministic battle resolution hidden behind a chance
//! step: enough surface to exercise every part of the search (board
//! queries, heuristic evaluation, chance handling, terminal shortcuts)
//! while staying small enough for tests to reason about exactly.
//!
//! A turn is a single action:
//! - `Reinforce(t)` places one troop on an owned territory;
//! - `Attack { from, to }` opens a battle against an enemy neighbor,
//!   handing the state to automatic resolution;
//! - `Resolve` (automatic) settles the battle: the attack succeeds iff
//!   the attacking force (all troops but one) exceeds the defenders.

use conquest_core::{Actor, Board, Game, MapBoard, PlayerId, RiskGame, TerritoryId};
use std::fmt;

/// Troop ceiling for reinforcement, keeping the branching factor finite.
const REINFORCE_CAP: u32 = 9;

/// A Frontier action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrontierAction {
    /// Place one troop on an owned territory.
    Reinforce(TerritoryId),
    /// Open a battle against an enemy neighbor.
    Attack { from: TerritoryId, to: TerritoryId },
    /// Settle the pending battle (automatic resolution only).
    Resolve,
}

impl fmt::Display for FrontierAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontierAction::Reinforce(t) => write!(f, "reinforce {}", t),
            FrontierAction::Attack { from, to } => write!(f, "attack {} -> {}", from, to),
            FrontierAction::Resolve => write!(f, "resolve"),
        }
    }
}

/// A Frontier game state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrontierState {
    board: MapBoard,
    turn: PlayerId,
    pending: Option<(TerritoryId, TerritoryId)>,
    last: Option<FrontierAction>,
}

impl FrontierState {
    /// Build a state from an arbitrary board with `turn` to move.
    ///
    /// Intended for scenario setups; the standard opening comes from
    /// [`Frontier::initial_state`].
    pub fn from_board(board: MapBoard, turn: PlayerId) -> Self {
        Self {
            board,
            turn,
            pending: None,
            last: None,
        }
    }

    /// The board reached in this state.
    pub fn board(&self) -> &MapBoard {
        &self.board
    }

    /// The battle awaiting resolution, if any.
    pub fn pending_battle(&self) -> Option<(TerritoryId, TerritoryId)> {
        self.pending
    }
}

impl fmt::Display for FrontierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in self.board.territories() {
            if t > 0 {
                write!(f, " ")?;
            }
            match self.board.owner(t) {
                Some(p) => write!(f, "{}:P{}({})", t, p, self.board.troops(t))?,
                None => write!(f, "{}:-", t)?,
            }
        }
        if let Some((from, to)) = self.pending {
            write!(f, " [battle {} -> {}]", from, to)?;
        }
        Ok(())
    }
}

/// The Frontier game.
#[derive(Clone, Debug)]
pub struct Frontier {
    players: usize,
}

impl Frontier {
    /// A Frontier match for the given number of players (at least 2).
    pub fn new(players: usize) -> Self {
        Self {
            players: players.max(2),
        }
    }

    /// The standard two-player match.
    pub fn two_players() -> Self {
        Self::new(2)
    }

    /// The standard opening: a six-territory ring in two continents,
    /// ownership interleaved among the players, three troops everywhere,
    /// player 0 to move.
    pub fn initial_state(&self) -> FrontierState {
        let mut board = MapBoard::new();
        let west = board.add_continent(3);
        let east = board.add_continent(2);
        let mut ids = Vec::new();
        for i in 0..6 {
            let continent = if i < 3 { west } else { east };
            let owner = i % self.players;
            let id = board
                .add_territory(continent, owner, 3)
                .expect("BUG: standard map references its own continents");
            ids.push(id);
        }
        for i in 0..6 {
            board
                .connect(ids[i], ids[(i + 1) % 6])
                .expect("BUG: standard map references its own territories");
        }
        board
            .connect(ids[1], ids[4])
            .expect("BUG: standard map references its own territories");
        FrontierState::from_board(board, 0)
    }

    fn advance_turn(&self, state: &mut FrontierState) {
        for offset in 1..=self.players {
            let candidate = (state.turn + offset) % self.players;
            if !state.board.territories_owned_by(candidate).is_empty() {
                state.turn = candidate;
                return;
            }
        }
    }

    fn resolve_battle(&self, state: &mut FrontierState) {
        let Some((from, to)) = state.pending.take() else {
            return;
        };
        let attack_force = state.board.troops(from).saturating_sub(1);
        let defense = state.board.troops(to);
        if attack_force > defense {
            let attacker = state.board.owner(from);
            if let Some(p) = attacker {
                state.board.set_owner(to, p);
            }
            state.board.set_troops(to, attack_force - defense);
            state.board.set_troops(from, 1);
        } else {
            // Repelled: the attacker is ground down to a garrison.
            state.board.set_troops(from, 1);
        }
        self.advance_turn(state);
    }
}

impl Game for Frontier {
    type State = FrontierState;
    type Action = FrontierAction;

    fn player_count(&self) -> usize {
        self.players
    }

    fn current_actor(&self, state: &Self::State) -> Actor {
        if state.pending.is_some() {
            Actor::Chance
        } else {
            Actor::Player(state.turn)
        }
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        if state.pending.is_some() {
            return vec![FrontierAction::Resolve];
        }
        if self.is_terminal(state) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        for t in state.board.territories_owned_by(state.turn) {
            if state.board.troops(t) < REINFORCE_CAP {
                actions.push(FrontierAction::Reinforce(t));
            }
        }
        for from in state.board.territories_owned_by(state.turn) {
            if state.board.troops(from) <= 1 {
                continue;
            }
            for to in state.board.enemy_neighbors(from) {
                actions.push(FrontierAction::Attack { from, to });
            }
        }
        actions
    }

    fn apply(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        let mut next = state.clone();
        match *action {
            FrontierAction::Reinforce(t) => {
                next.board.set_troops(t, state.board.troops(t) + 1);
                self.advance_turn(&mut next);
            }
            FrontierAction::Attack { from, to } => {
                next.pending = Some((from, to));
            }
            FrontierAction::Resolve => {
                self.resolve_battle(&mut next);
            }
        }
        next.last = Some(*action);
        next
    }

    fn apply_auto(&self, state: &Self::State) -> Self::State {
        if state.pending.is_some() {
            self.apply(state, &FrontierAction::Resolve)
        } else {
            state.clone()
        }
    }

    fn determine_next_action(&self, state: &Self::State) -> Option<Self::Action> {
        state.pending.map(|_| FrontierAction::Resolve)
    }

    fn previous_action(&self, state: &Self::State) -> Option<Self::Action> {
        state.last
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        let total = state.board.territory_count();
        (0..self.players).any(|p| state.board.territories_owned_by(p).len() == total)
    }

    fn utility_vector(&self, state: &Self::State) -> Vec<f64> {
        let total = state.board.territory_count().max(1) as f64;
        (0..self.players)
            .map(|p| state.board.territories_owned_by(p).len() as f64 / total)
            .collect()
    }

    fn heuristic_vector(&self, state: &Self::State) -> Vec<f64> {
        let total = state.board.total_troops().max(1) as f64;
        (0..self.players)
            .map(|p| state.board.player_troops(p) as f64 / total)
            .collect()
    }
}

impl RiskGame for Frontier {
    type Board = MapBoard;

    fn board<'s>(&self, state: &'s Self::State) -> &'s Self::Board {
        &state.board
    }
}
