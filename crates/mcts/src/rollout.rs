//! Rollout action choice.
//!
//! Risk rollouts are not uniformly random: each candidate action is
//! scored by the heuristic on its successor state, with a one-shot UCT
//! bonus (every candidate counts as having one prior visit) keeping a
//! sliver of exploration. Action sets in Risk can be huge, so candidates
//! are shuffled and capped before scoring.

use crate::heuristic::Heuristic;
use conquest_core::{Game, PlayerId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick the next rollout action, or `None` when the state offers no
/// actions (the rollout then ends as if terminal).
///
/// Falls back to a uniformly random choice as soon as the heuristic
/// declines to score a successor.
pub(crate) fn pick_action<G, H, R>(
    game: &G,
    state: &G::State,
    heuristic: &H,
    player: PlayerId,
    exploration: f64,
    action_cap: Option<usize>,
    rng: &mut R,
) -> Option<G::Action>
where
    G: Game,
    H: Heuristic<G>,
    R: Rng,
{
    let mut actions = game.legal_actions(state);
    if actions.is_empty() {
        return None;
    }
    actions.shuffle(rng);

    let mut candidates = actions.clone();
    if let Some(cap) = action_cap {
        candidates.truncate(cap);
    }

    // One prior visit per candidate: the exploration bonus is
    // c * sqrt(ln(k) / 1) across the board, so ties fall to the shuffle.
    let bonus = exploration * (candidates.len() as f64).ln().max(0.0).sqrt();

    let mut best: Option<(f64, G::Action)> = None;
    for action in candidates {
        if !game.is_valid_action(state, &action) {
            continue;
        }
        let successor = game.apply(state, &action);
        let Some(score) = heuristic.evaluate(game, &successor, player) else {
            // No domain knowledge for this game: uniform random (the
            // list is already shuffled).
            return actions.into_iter().next();
        };
        let value = score.get() + bonus;
        if best.as_ref().map_or(true, |(b, _)| value > *b) {
            best = Some((value, action));
        }
    }

    best.map(|(_, action)| action)
        .or_else(|| actions.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{Frontier, FrontierAction};
    use crate::heuristic::{PositionHeuristic, UniformPolicy};
    use conquest_core::Game;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pick_action_returns_legal_action() {
        let game = Frontier::two_players();
        let state = game.initial_state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..20 {
            let action = pick_action(
                &game,
                &state,
                &PositionHeuristic::new(),
                0,
                std::f64::consts::SQRT_2,
                Some(20),
                &mut rng,
            )
            .unwrap();
            assert!(game.is_valid_action(&state, &action));
        }
    }

    #[test]
    fn test_uniform_fallback_still_legal() {
        let game = Frontier::two_players();
        let state = game.initial_state();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let action = pick_action(
            &game,
            &state,
            &UniformPolicy,
            0,
            std::f64::consts::SQRT_2,
            Some(20),
            &mut rng,
        )
        .unwrap();
        assert!(game.is_valid_action(&state, &action));
    }

    #[test]
    fn test_chance_state_offers_resolution_only() {
        let game = Frontier::two_players();
        let state = game.initial_state();
        // Player 0 starts an attack; the only action left is resolution.
        let attack = game
            .legal_actions(&state)
            .into_iter()
            .find(|a| matches!(a, FrontierAction::Attack { .. }))
            .unwrap();
        let pending = game.apply(&state, &attack);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let action = pick_action(
            &game,
            &pending,
            &PositionHeuristic::new(),
            0,
            std::f64::consts::SQRT_2,
            None,
            &mut rng,
        );
        assert_eq!(action, Some(FrontierAction::Resolve));
    }
}
