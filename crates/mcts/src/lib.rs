//! Conquest MCTS - Time-bounded Monte Carlo Tree Search for Risk.
//!
//! This crate provides the search half of the Conquest engine: an
//! arena-allocated game tree, the four MCTS phases run under a strict
//! wall-clock deadline, UCT selection with stable tie-breaks, rollouts
//! biased by the adaptive position evaluator, and the per-turn agent
//! facade.
//!
//! # Features
//!
//! - **Generic**: Works with any `conquest_core::Game`; Risk knowledge
//!   enters only through the [`Heuristic`] seam
//! - **Time-bounded**: Every phase and inner loop checks the [`Deadline`];
//!   a safety buffer guarantees timely return
//! - **Tree reuse**: Between turns the tree is re-rooted onto the live
//!   state when it is found in the arena, preserving statistics
//! - **Terminal shortcut**: Determined winning lines are detected before
//!   the search loop starts
//!
//! # Example
//!
//! ```
//! use conquest_core::Game;
//! use conquest_mcts::games::Frontier;
//! use conquest_mcts::{Agent, PositionHeuristic, SearchConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use std::time::Duration;
//!
//! let game = Frontier::two_players();
//! let state = game.initial_state();
//!
//! let config = SearchConfig::default().with_safety_buffer(Duration::from_millis(10));
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut agent = Agent::new(config, PositionHeuristic::new(), rng);
//! agent.set_up(2, 0);
//!
//! let action = agent
//!     .select_action(&game, &state, Duration::from_millis(100))
//!     .unwrap();
//! assert!(game.is_valid_action(&state, &action));
//! ```

pub mod agent;
pub mod config;
pub mod deadline;
pub mod games;
pub mod heuristic;
mod node;
mod rollout;
pub mod search;
mod tree;

pub use agent::{Agent, AgentError};
pub use config::SearchConfig;
pub use deadline::Deadline;
pub use heuristic::{Heuristic, PositionHeuristic, UniformPolicy};
pub use node::{Node, NodeId};
pub use search::{judge_win, Engine};
pub use tree::SearchTree;
