//! Position categories and metric weights.

/// Ratio above which a player counts as dominating in territories or
/// troops.
const ADVANTAGE_THRESHOLD: f64 = 1.5;

/// Troop ratio below which a player counts as behind.
const BEHIND_THRESHOLD: f64 = 0.8;

/// The detected standing of a player, derived from the territory and troop
/// ratios against the rest of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    /// Both ratios above 1.5: play to finish.
    SignificantAdvantage = 0,
    /// Troop ratio below 0.8: play to consolidate.
    BehindInTroops = 1,
    /// Neither of the above.
    Balanced = 2,
}

impl Position {
    /// Classify a position from its ratios.
    ///
    /// Both ratios relate the player to the rest of the world combined,
    /// so 1.0 means parity and the 0.8 / 1.5 thresholds are symmetric
    /// around it.
    pub fn detect(territory_ratio: f64, troop_ratio: f64) -> Self {
        if territory_ratio > ADVANTAGE_THRESHOLD && troop_ratio > ADVANTAGE_THRESHOLD {
            Position::SignificantAdvantage
        } else if troop_ratio < BEHIND_THRESHOLD {
            Position::BehindInTroops
        } else {
            Position::Balanced
        }
    }

    /// The adaptive metric weights for this position.
    pub fn weights(self) -> Weights {
        ADAPTIVE_WEIGHTS[self as usize]
    }
}

/// Relative importance of the four sub-metrics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    pub territory: f64,
    pub troop: f64,
    pub continent: f64,
    pub attack: f64,
}

impl Weights {
    /// Fixed weighting from the evaluator's pre-adaptive lineage.
    pub const CLASSIC: Weights = Weights {
        territory: 0.3,
        troop: 0.3,
        continent: 0.2,
        attack: 0.2,
    };

    /// Material-only weighting: territory and troop share.
    pub const MATERIAL: Weights = Weights {
        territory: 0.4,
        troop: 0.6,
        continent: 0.0,
        attack: 0.0,
    };

    /// Sum of all four weights.
    pub fn total(&self) -> f64 {
        self.territory + self.troop + self.continent + self.attack
    }
}

/// Adaptive weight table, indexed by `Position as usize`.
const ADAPTIVE_WEIGHTS: [Weights; 3] = [
    // SignificantAdvantage: nearly everything on attack potential.
    Weights {
        territory: 0.05,
        troop: 0.10,
        continent: 0.05,
        attack: 0.80,
    },
    // BehindInTroops: hold ground, rebuild material.
    Weights {
        territory: 0.30,
        troop: 0.40,
        continent: 0.20,
        attack: 0.10,
    },
    // Balanced.
    Weights {
        territory: 0.20,
        troop: 0.30,
        continent: 0.10,
        attack: 0.40,
    },
];
