//! Risk board view.
//!
//! The evaluator and the rollout policy never touch game rules directly;
//! everything they need is behind the [`Board`] trait: territory ownership
//! and troops, continent membership and bonuses, adjacency, and the card
//! state relevant to reinforcement planning.

use crate::error::{CoreError, Result};
use crate::game::PlayerId;

/// Identifier of a territory on a board. Dense, starting at 0.
pub type TerritoryId = usize;

/// Identifier of a continent on a board. Dense, starting at 0.
pub type ContinentId = usize;

/// Read-only view of a Risk board.
///
/// Methods taking a territory or continent id may panic when handed an id
/// that does not exist on this board; ids are produced by the board itself
/// and are not expected to be guessed.
pub trait Board {
    /// All territory ids on the board.
    fn territories(&self) -> Vec<TerritoryId>;

    /// Number of territories on the board.
    fn territory_count(&self) -> usize {
        self.territories().len()
    }

    /// Occupant of a territory, if any.
    fn owner(&self, territory: TerritoryId) -> Option<PlayerId>;

    /// Troops stationed on a territory.
    fn troops(&self, territory: TerritoryId) -> u32;

    /// Continent a territory belongs to.
    fn continent_of(&self, territory: TerritoryId) -> ContinentId;

    /// All continent ids on the board.
    fn continents(&self) -> Vec<ContinentId>;

    /// Reinforcement bonus for holding a continent completely.
    fn continent_bonus(&self, continent: ContinentId) -> u32;

    /// Territories belonging to a continent.
    fn continent_members(&self, continent: ContinentId) -> Vec<TerritoryId>;

    /// Territories adjacent to the given one.
    fn neighbors(&self, territory: TerritoryId) -> Vec<TerritoryId>;

    /// Adjacent territories held by a different occupant.
    fn enemy_neighbors(&self, territory: TerritoryId) -> Vec<TerritoryId> {
        let own = self.owner(territory);
        self.neighbors(territory)
            .into_iter()
            .filter(|&n| self.owner(n) != own)
            .collect()
    }

    /// Territories held by the given player.
    fn territories_owned_by(&self, player: PlayerId) -> Vec<TerritoryId> {
        self.territories()
            .into_iter()
            .filter(|&t| self.owner(t) == Some(player))
            .collect()
    }

    /// Total troops on the board.
    fn total_troops(&self) -> u32 {
        self.territories().into_iter().map(|t| self.troops(t)).sum()
    }

    /// Total troops held by the given player.
    fn player_troops(&self, player: PlayerId) -> u32 {
        self.territories_owned_by(player)
            .into_iter()
            .map(|t| self.troops(t))
            .sum()
    }

    /// Number of cards the player holds.
    fn cards_held(&self, _player: PlayerId) -> usize {
        0
    }

    /// Reinforcements granted by the next card trade-in.
    fn trade_in_bonus(&self) -> u32 {
        0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Territory {
    owner: Option<PlayerId>,
    troops: u32,
    continent: ContinentId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Continent {
    bonus: u32,
    members: Vec<TerritoryId>,
}

/// A concrete board backed by adjacency lists.
///
/// Built incrementally: continents first, then territories, then
/// connections. Used by the bundled validation game and by evaluator
/// tests; an external rules engine would instead implement [`Board`] on
/// its own representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapBoard {
    territories: Vec<Territory>,
    continents: Vec<Continent>,
    adjacency: Vec<Vec<TerritoryId>>,
    cards: Vec<usize>,
    trade_in_bonus: u32,
}

impl MapBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a continent with the given bonus, returning its id.
    pub fn add_continent(&mut self, bonus: u32) -> ContinentId {
        self.continents.push(Continent {
            bonus,
            members: Vec::new(),
        });
        self.continents.len() - 1
    }

    /// Add a territory to a continent, returning its id.
    ///
    /// # Errors
    /// Returns `CoreError::UnknownContinent` if the continent id does not
    /// exist.
    pub fn add_territory(
        &mut self,
        continent: ContinentId,
        owner: PlayerId,
        troops: u32,
    ) -> Result<TerritoryId> {
        if continent >= self.continents.len() {
            return Err(CoreError::UnknownContinent(continent));
        }
        let id = self.territories.len();
        self.territories.push(Territory {
            owner: Some(owner),
            troops,
            continent,
        });
        self.adjacency.push(Vec::new());
        self.continents[continent].members.push(id);
        Ok(id)
    }

    /// Connect two territories (adjacency is symmetric).
    ///
    /// # Errors
    /// Returns `CoreError::UnknownTerritory` if either id does not exist.
    pub fn connect(&mut self, a: TerritoryId, b: TerritoryId) -> Result<()> {
        let n = self.territories.len();
        for id in [a, b] {
            if id >= n {
                return Err(CoreError::UnknownTerritory(id));
            }
        }
        if !self.adjacency[a].contains(&b) {
            self.adjacency[a].push(b);
            self.adjacency[b].push(a);
        }
        Ok(())
    }

    /// Change the occupant of a territory.
    ///
    /// # Panics
    /// Panics if the territory id does not exist.
    pub fn set_owner(&mut self, territory: TerritoryId, owner: PlayerId) {
        self.territories[territory].owner = Some(owner);
    }

    /// Set the troops stationed on a territory.
    ///
    /// # Panics
    /// Panics if the territory id does not exist.
    pub fn set_troops(&mut self, territory: TerritoryId, troops: u32) {
        self.territories[territory].troops = troops;
    }

    /// Set the number of cards a player holds.
    pub fn set_cards(&mut self, player: PlayerId, cards: usize) {
        if self.cards.len() <= player {
            self.cards.resize(player + 1, 0);
        }
        self.cards[player] = cards;
    }

    /// Set the reinforcements of the next card trade-in.
    pub fn set_trade_in_bonus(&mut self, bonus: u32) {
        self.trade_in_bonus = bonus;
    }
}

impl Board for MapBoard {
    fn territories(&self) -> Vec<TerritoryId> {
        (0..self.territories.len()).collect()
    }

    fn territory_count(&self) -> usize {
        self.territories.len()
    }

    fn owner(&self, territory: TerritoryId) -> Option<PlayerId> {
        self.territories[territory].owner
    }

    fn troops(&self, territory: TerritoryId) -> u32 {
        self.territories[territory].troops
    }

    fn continent_of(&self, territory: TerritoryId) -> ContinentId {
        self.territories[territory].continent
    }

    fn continents(&self) -> Vec<ContinentId> {
        (0..self.continents.len()).collect()
    }

    fn continent_bonus(&self, continent: ContinentId) -> u32 {
        self.continents[continent].bonus
    }

    fn continent_members(&self, continent: ContinentId) -> Vec<TerritoryId> {
        self.continents[continent].members.clone()
    }

    fn neighbors(&self, territory: TerritoryId) -> Vec<TerritoryId> {
        self.adjacency[territory].clone()
    }

    fn cards_held(&self, player: PlayerId) -> usize {
        self.cards.get(player).copied().unwrap_or(0)
    }

    fn trade_in_bonus(&self) -> u32 {
        self.trade_in_bonus
    }
}
