//! Search configuration parameters.

use std::time::Duration;

/// Search configuration parameters.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// UCT exploration constant `c`.
    pub exploration: f64,

    /// Maximum number of steps in a single rollout.
    pub max_rollout_depth: usize,

    /// Maximum number of actions scored per rollout step. Legal action
    /// sets in Risk can run into the hundreds; the rollout policy
    /// shuffles and evaluates at most this many. `None` scores all.
    pub rollout_action_cap: Option<usize>,

    /// Subtracted from every budget so the search returns in time.
    pub safety_buffer: Duration,

    /// Once `elapsed * late_rollout_proportion` exceeds the budget, the
    /// rollout depth bound is halved to squeeze more iterations out of
    /// the remaining time.
    pub late_rollout_proportion: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: std::f64::consts::SQRT_2,
            max_rollout_depth: 50,
            rollout_action_cap: Some(20),
            safety_buffer: Duration::from_millis(100),
            late_rollout_proportion: 2.0,
        }
    }
}

impl SearchConfig {
    /// Create a config with the specified exploration constant.
    pub fn with_exploration(exploration: f64) -> Self {
        Self {
            exploration,
            ..Default::default()
        }
    }

    /// Set the rollout depth bound.
    pub fn with_rollout_depth(mut self, depth: usize) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Set or clear the per-step action cap.
    pub fn with_action_cap(mut self, cap: Option<usize>) -> Self {
        self.rollout_action_cap = cap;
        self
    }

    /// Set the safety buffer.
    pub fn with_safety_buffer(mut self, buffer: Duration) -> Self {
        self.safety_buffer = buffer;
        self
    }
}
