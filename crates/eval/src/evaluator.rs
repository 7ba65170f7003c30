//! The memoized per-position evaluator.

use crate::position::{Position, Weights};
use conquest_core::{Board, ContinentId, PlayerId, Score, TerritoryId};
use std::cell::OnceCell;

/// Floor for ratio denominators. An empty "rest of the world" reads as
/// total domination rather than a division by zero.
const RATIO_EPSILON: f64 = 1e-9;

/// How the sub-metric weights are chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Weighting {
    /// Weights follow the detected [`Position`] (the default).
    Adaptive,
    /// A fixed weight set, e.g. [`Weights::CLASSIC`] or
    /// [`Weights::MATERIAL`].
    Fixed(Weights),
}

/// Evaluator configuration: weighting scheme plus per-metric toggles.
///
/// A disabled metric drops out of the score together with its weight; the
/// remaining metrics are renormalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvalConfig {
    pub weighting: Weighting,
    pub use_territory: bool,
    pub use_troop: bool,
    pub use_continent: bool,
    pub use_attack: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            weighting: Weighting::Adaptive,
            use_territory: true,
            use_troop: true,
            use_continent: true,
            use_attack: true,
        }
    }
}

impl EvalConfig {
    /// Config with a fixed weight set instead of position-adaptive ones.
    pub fn fixed(weights: Weights) -> Self {
        Self {
            weighting: Weighting::Fixed(weights),
            ..Self::default()
        }
    }

    /// Enable or disable the territory-share metric.
    pub fn with_territory(mut self, enabled: bool) -> Self {
        self.use_territory = enabled;
        self
    }

    /// Enable or disable the troop-share metric.
    pub fn with_troop(mut self, enabled: bool) -> Self {
        self.use_troop = enabled;
        self
    }

    /// Enable or disable the continent-progress metric.
    pub fn with_continent(mut self, enabled: bool) -> Self {
        self.use_continent = enabled;
        self
    }

    /// Enable or disable the attack-potential metric.
    pub fn with_attack(mut self, enabled: bool) -> Self {
        self.use_attack = enabled;
        self
    }
}

/// Quality of an attack from a territory onto one enemy neighbor, in
/// [0, 1].
///
/// Under a significant advantage the thresholds loosen: the evaluator
/// rewards pressing smaller edges to finish the game.
pub fn raw_attack(position: Position, attacker_troops: u32, defender_troops: u32) -> f64 {
    let ratio = attacker_troops as f64 / defender_troops.max(1) as f64;
    match position {
        Position::SignificantAdvantage => {
            if ratio >= 1.5 {
                1.0
            } else if ratio >= 1.0 {
                if attacker_troops >= 4 {
                    0.9
                } else {
                    0.5
                }
            } else {
                0.3
            }
        }
        Position::BehindInTroops | Position::Balanced => {
            if ratio >= 2.0 {
                1.0
            } else if ratio >= 1.0 {
                if attacker_troops >= 5 {
                    0.8
                } else {
                    0.3
                }
            } else {
                0.1
            }
        }
    }
}

/// Scores a Risk board in [0, 1] for one player.
///
/// An evaluator is constructed per (board, player) pair and is pure: for
/// the same inputs every method returns the same value, and all
/// intermediate results are computed at most once. Construct a fresh
/// instance for every new board; caches are never shared.
pub struct Evaluator<'b, B: Board> {
    board: &'b B,
    player: PlayerId,
    config: EvalConfig,
    my_territories: OnceCell<Vec<TerritoryId>>,
    my_troops: OnceCell<u32>,
    total_troops: OnceCell<u32>,
    ratios: OnceCell<(f64, f64)>,
    position: OnceCell<Position>,
    attack_map: OnceCell<Vec<(TerritoryId, f64)>>,
    overall_attack: OnceCell<f64>,
    continent: OnceCell<f64>,
}

impl<'b, B: Board> Evaluator<'b, B> {
    /// Create an evaluator with the default configuration.
    pub fn new(board: &'b B, player: PlayerId) -> Self {
        Self::with_config(board, player, EvalConfig::default())
    }

    /// Create an evaluator with an explicit configuration.
    pub fn with_config(board: &'b B, player: PlayerId, config: EvalConfig) -> Self {
        Self {
            board,
            player,
            config,
            my_territories: OnceCell::new(),
            my_troops: OnceCell::new(),
            total_troops: OnceCell::new(),
            ratios: OnceCell::new(),
            position: OnceCell::new(),
            attack_map: OnceCell::new(),
            overall_attack: OnceCell::new(),
            continent: OnceCell::new(),
        }
    }

    /// The player this evaluator scores for.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    fn my_territories(&self) -> &[TerritoryId] {
        self.my_territories
            .get_or_init(|| self.board.territories_owned_by(self.player))
    }

    fn my_troops(&self) -> u32 {
        *self
            .my_troops
            .get_or_init(|| self.board.player_troops(self.player))
    }

    fn total_troops(&self) -> u32 {
        *self.total_troops.get_or_init(|| self.board.total_troops())
    }

    /// Owned territories relative to the rest of the world.
    pub fn territory_ratio(&self) -> f64 {
        self.ratios().0
    }

    /// Owned troops relative to the rest of the world.
    pub fn troop_ratio(&self) -> f64 {
        self.ratios().1
    }

    fn ratios(&self) -> (f64, f64) {
        *self.ratios.get_or_init(|| {
            let owned = self.my_territories().len() as f64;
            let rest = (self.board.territory_count() - self.my_territories().len()) as f64;
            let mine = self.my_troops() as f64;
            let others = (self.total_troops() - self.my_troops()) as f64;
            (
                owned / rest.max(RATIO_EPSILON),
                mine / others.max(RATIO_EPSILON),
            )
        })
    }

    /// The detected position category for this board.
    pub fn position(&self) -> Position {
        *self.position.get_or_init(|| {
            let (territory_ratio, troop_ratio) = self.ratios();
            Position::detect(territory_ratio, troop_ratio)
        })
    }

    /// Share of territories owned, in [0, 1].
    pub fn territory_score(&self) -> f64 {
        let total = self.board.territory_count();
        if total == 0 {
            return 0.0;
        }
        self.my_territories().len() as f64 / total as f64
    }

    /// Share of all troops owned, in [0, 1].
    pub fn troop_score(&self) -> f64 {
        let total = self.total_troops();
        if total == 0 {
            return 0.0;
        }
        self.my_troops() as f64 / total as f64
    }

    /// Continent progress, in [0, 1].
    ///
    /// Mean over non-empty continents of the owned share scaled by
    /// `bonus / 10`; bonuses above 10 are why the mean is clamped.
    pub fn continent_score(&self) -> f64 {
        *self.continent.get_or_init(|| {
            let mut sum = 0.0;
            let mut counted = 0usize;
            for c in self.board.continents() {
                let members = self.board.continent_members(c);
                if members.is_empty() {
                    continue;
                }
                let owned = members
                    .iter()
                    .filter(|&&t| self.board.owner(t) == Some(self.player))
                    .count();
                let share = owned as f64 / members.len() as f64;
                sum += share * (self.board.continent_bonus(c) as f64 / 10.0);
                counted += 1;
            }
            if counted == 0 {
                0.0
            } else {
                (sum / counted as f64).clamp(0.0, 1.0)
            }
        })
    }

    /// Attack potential of one owned territory, averaged over its enemy
    /// borders. `None` if the territory does not qualify (not owned,
    /// a single troop, or no enemy neighbor).
    pub fn territory_attack_potential(&self, territory: TerritoryId) -> Option<f64> {
        self.attack_map()
            .iter()
            .find(|(t, _)| *t == territory)
            .map(|(_, v)| *v)
    }

    /// Overall attack potential, in [0, 1]: the per-territory potential
    /// averaged over all qualifying territories. 0 when nothing qualifies.
    pub fn attack_potential(&self) -> f64 {
        *self.overall_attack.get_or_init(|| {
            let map = self.attack_map();
            if map.is_empty() {
                return 0.0;
            }
            map.iter().map(|(_, v)| v).sum::<f64>() / map.len() as f64
        })
    }

    fn attack_map(&self) -> &[(TerritoryId, f64)] {
        self.attack_map.get_or_init(|| {
            let position = self.position();
            let mut map = Vec::new();
            for &t in self.my_territories() {
                let attacker = self.board.troops(t);
                if attacker <= 1 {
                    continue;
                }
                let enemies = self.board.enemy_neighbors(t);
                if enemies.is_empty() {
                    continue;
                }
                let sum: f64 = enemies
                    .iter()
                    .map(|&n| raw_attack(position, attacker, self.board.troops(n)))
                    .sum();
                map.push((t, sum / enemies.len() as f64));
            }
            map
        })
    }

    /// The combined position score, in [0, 1].
    ///
    /// Weight-normalized combination of the enabled sub-metrics. With
    /// every metric disabled there is nothing to measure and the neutral
    /// score is returned.
    pub fn score(&self) -> Score {
        let weights = match self.config.weighting {
            Weighting::Adaptive => self.position().weights(),
            Weighting::Fixed(w) => w,
        };

        let mut value = 0.0;
        let mut total_weight = 0.0;
        if self.config.use_territory {
            value += weights.territory * self.territory_score();
            total_weight += weights.territory;
        }
        if self.config.use_troop {
            value += weights.troop * self.troop_score();
            total_weight += weights.troop;
        }
        if self.config.use_continent {
            value += weights.continent * self.continent_score();
            total_weight += weights.continent;
        }
        if self.config.use_attack {
            value += weights.attack * self.attack_potential();
            total_weight += weights.attack;
        }

        if total_weight == 0.0 {
            Score::NEUTRAL
        } else {
            Score::clamped(value / total_weight)
        }
    }

    /// Troops stationed on owned territories that border an enemy.
    pub fn border_strength(&self) -> u32 {
        self.my_territories()
            .iter()
            .filter(|&&t| !self.board.enemy_neighbors(t).is_empty())
            .map(|&t| self.board.troops(t))
            .sum()
    }

    /// Enemy troops adjacent to owned territory, counted per border.
    pub fn threat_level(&self) -> u32 {
        self.my_territories()
            .iter()
            .flat_map(|&t| self.board.enemy_neighbors(t))
            .map(|n| self.board.troops(n))
            .sum()
    }

    /// Per continent, the number of territories still needed for full
    /// control. Continents already controlled (or empty) are omitted.
    pub fn continent_gap(&self) -> Vec<(ContinentId, usize)> {
        self.board
            .continents()
            .into_iter()
            .filter_map(|c| {
                let needed = self
                    .board
                    .continent_members(c)
                    .iter()
                    .filter(|&&t| self.board.owner(t) != Some(self.player))
                    .count();
                (needed > 0).then_some((c, needed))
            })
            .collect()
    }

    /// Reinforcements a pending card trade-in would grant: the trade-in
    /// bonus once the player holds a full set, 0 otherwise.
    pub fn card_bonus_outlook(&self) -> u32 {
        if self.board.cards_held(self.player) >= 3 {
            self.board.trade_in_bonus()
        } else {
            0
        }
    }
}
