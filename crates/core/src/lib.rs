//! Conquest Core - Game and board abstractions
//!
//! This crate provides the capability traits the Conquest decision engine
//! consumes: the [`Game`] trait for turn-based multi-player games with
//! automatic (chance) resolution, the [`RiskGame`] extension exposing a
//! [`Board`] view, and the common value types.
//!
//! # Types
//!
//! - [`Game`] / [`RiskGame`] - Traits for game implementations
//! - [`Board`] / [`MapBoard`] - Risk board view and a concrete map
//! - [`Score`] - Position evaluation in [0, 1]
//! - [`Actor`] - Player to move, or automatic (chance) resolution

mod board;
mod error;
mod game;
mod score;

pub use board::{Board, ContinentId, MapBoard, TerritoryId};
pub use error::{CoreError, Result};
pub use game::{Actor, Game, PlayerId, RiskGame};
pub use score::{scalar_score, Score};
