//! Conquest Eval - Adaptive Risk position evaluation.
//!
//! This crate scores a Risk board in [0, 1] for one player. The score is a
//! weight-normalized combination of four sub-metrics (territory share,
//! troop share, continent progress, attack potential), with the weights
//! chosen by the detected position category:
//!
//! - **Significant advantage** - both the territory and troop ratio exceed
//!   1.5; the weighting shifts almost entirely onto attack potential to
//!   finish the game.
//! - **Behind in troops** - the troop ratio falls below 0.8; the weighting
//!   favors consolidation (territory and troop share).
//! - **Balanced** - everything else.
//!
//! One [`Evaluator`] is constructed per (board, player) pair and memoizes
//! every intermediate result, so repeated metric queries are free.
//!
//! # Example
//! ```
//! use conquest_core::MapBoard;
//! use conquest_eval::Evaluator;
//!
//! let mut board = MapBoard::new();
//! let c = board.add_continent(5);
//! let a = board.add_territory(c, 0, 6).unwrap();
//! let b = board.add_territory(c, 1, 3).unwrap();
//! board.connect(a, b).unwrap();
//!
//! let eval = Evaluator::new(&board, 0);
//! let score = eval.score().get();
//! assert!((0.0..=1.0).contains(&score));
//! ```

mod evaluator;
mod position;

pub use evaluator::{raw_attack, EvalConfig, Evaluator, Weighting};
pub use position::{Position, Weights};
