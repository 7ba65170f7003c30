//! Game implementations bundled for search validation.

mod frontier;

pub use frontier::{Frontier, FrontierAction, FrontierState};
