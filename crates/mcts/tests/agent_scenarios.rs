//! Scenario tests for the agent facade and engine shortcuts.

use conquest_core::{Game, MapBoard};
use conquest_mcts::games::{Frontier, FrontierAction, FrontierState};
use conquest_mcts::{
    judge_win, Agent, Engine, NodeId, PositionHeuristic, SearchConfig, UniformPolicy,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

fn make_agent(seed: u64) -> Agent<Frontier, PositionHeuristic, ChaCha8Rng> {
    let mut agent = Agent::new(
        SearchConfig::default(),
        PositionHeuristic::new(),
        ChaCha8Rng::seed_from_u64(seed),
    );
    agent.set_up(2, 0);
    agent
}

/// A three-territory board: `winner` holds everything when `won` is true,
/// otherwise ownership is split with `turn` to move.
fn tiny_state(owners: [usize; 3], troops: [u32; 3], turn: usize) -> FrontierState {
    let mut board = MapBoard::new();
    let c = board.add_continent(3);
    let mut ids = Vec::new();
    for (owner, troop) in owners.iter().zip(troops) {
        ids.push(board.add_territory(c, *owner, troop).unwrap());
    }
    board.connect(ids[0], ids[1]).unwrap();
    board.connect(ids[1], ids[2]).unwrap();
    FrontierState::from_board(board, turn)
}

/// A hand-built two-ply tree in which every line ends in a win forces the
/// root action without running the search loop.
#[test]
fn test_terminal_shortcut_forces_root_action() {
    let game = Frontier::two_players();
    let root_state = tiny_state([0, 0, 1], [5, 5, 1], 0);
    let mut engine = Engine::new(SearchConfig::default(), 0, root_state);
    let deadline = conquest_mcts::Deadline::start(Duration::from_secs(60), Duration::ZERO);

    // Two root moves for player 0, each answered by one opponent reply,
    // each reply ending with player 0 holding the whole board.
    let mut root_actions = Vec::new();
    for (i, reply_troops) in [(0usize, 4u32), (1usize, 3u32)] {
        let action = FrontierAction::Reinforce(i);
        root_actions.push(action);
        let mid_state = tiny_state([0, 0, 1], [5, 5, 1], 1);
        let mid = engine.tree_mut().add_child(NodeId::ROOT, action, mid_state);
        let won_state = tiny_state([0, 0, 0], [5, 5, reply_troops], 0);
        engine
            .tree_mut()
            .add_child(mid, FrontierAction::Attack { from: 1, to: 2 }, won_state);
    }

    let forced = engine.sort_promising_candidates(&game, &PositionHeuristic::new(), &deadline);
    assert!(forced, "every line wins: the shortcut must fire");

    // No rollout ran: statistics are untouched.
    assert_eq!(engine.tree().root().plays, 0);

    let action = engine.best_root_action().unwrap();
    assert!(root_actions.contains(&action));
}

/// The shortcut must not fire when a chance node interrupts the line.
#[test]
fn test_terminal_shortcut_blocked_by_chance() {
    let game = Frontier::two_players();
    let root_state = tiny_state([0, 0, 1], [5, 5, 1], 0);
    let mut engine = Engine::new(SearchConfig::default(), 0, root_state.clone());
    let deadline = conquest_mcts::Deadline::start(Duration::from_secs(60), Duration::ZERO);

    // The only child is an unresolved battle (a chance state).
    let attack = FrontierAction::Attack { from: 1, to: 2 };
    let pending = game.apply(&root_state, &attack);
    let mid = engine.tree_mut().add_child(NodeId::ROOT, attack, pending.clone());
    let resolved = game.apply_auto(&pending);
    engine
        .tree_mut()
        .add_child(mid, FrontierAction::Resolve, resolved);

    assert!(!engine.sort_promising_candidates(&game, &PositionHeuristic::new(), &deadline));
}

/// A 500 ms budget returns within 700 ms with work done (the safety
/// buffer is 100 ms, so the allowance is budget + 2 * buffer).
#[test]
fn test_deadline_compliance() {
    let game = Frontier::two_players();
    let state = game.initial_state();
    let mut agent = make_agent(5);

    let started = Instant::now();
    let action = agent
        .select_action(&game, &state, Duration::from_millis(500))
        .unwrap();
    let elapsed = started.elapsed();

    assert!(game.is_valid_action(&state, &action));
    assert!(
        elapsed < Duration::from_millis(700),
        "search took {:?}",
        elapsed
    );
    assert!(agent.engine().unwrap().tree().root().plays > 0);
}

/// A tied utility vector credits a win about half the time over many
/// judgements.
#[test]
fn test_tied_outcome_credits_half() {
    let game = Frontier::two_players();
    // The opening is symmetric: utility and heuristic vectors are both
    // [0.5, 0.5].
    let state = game.initial_state();
    assert_eq!(game.utility_vector(&state), vec![0.5, 0.5]);

    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let rounds = 10_000;
    let wins = (0..rounds)
        .filter(|_| judge_win(&game, &state, 0, &mut rng))
        .count();

    let frequency = wins as f64 / rounds as f64;
    assert!(
        (0.48..=0.52).contains(&frequency),
        "tie win frequency {} outside 0.5 +/- 0.02",
        frequency
    );
}

/// With an effectively zero budget the greedy one-ply fallback still
/// produces a legal action.
#[test]
fn test_zero_budget_falls_back_to_greedy() {
    let game = Frontier::two_players();
    let state = game.initial_state();
    let mut agent = make_agent(7);

    let action = agent
        .select_action(&game, &state, Duration::ZERO)
        .unwrap();
    assert!(game.is_valid_action(&state, &action));
}

/// Zero budget on a terminal state is the one case with nothing to play.
#[test]
fn test_no_legal_actions_error() {
    let game = Frontier::two_players();
    let state = tiny_state([0, 0, 0], [2, 2, 2], 0);
    assert!(game.is_terminal(&state));

    let mut agent = make_agent(8);
    let result = agent.select_action(&game, &state, Duration::ZERO);
    assert!(result.is_err());
}

/// Statistics gathered in a previous turn survive when the next live
/// state is found in the tree.
#[test]
fn test_tree_reuse_preserves_statistics() {
    let game = Frontier::two_players();
    let state = game.initial_state();
    let mut agent = make_agent(9);

    agent
        .select_action(&game, &state, Duration::from_millis(200))
        .unwrap();

    // Pretend the match reached the first root child's state.
    let (child_state, child_plays) = {
        let tree = agent.engine().unwrap().tree();
        let child = tree.root().children()[0];
        (tree.get(child).state().clone(), tree.get(child).plays)
    };

    agent
        .select_action(&game, &child_state, Duration::from_millis(100))
        .unwrap();

    let tree = agent.engine().unwrap().tree();
    assert_eq!(tree.root().state(), &child_state);
    assert!(
        tree.root().plays >= child_plays,
        "reused root lost statistics: {} < {}",
        tree.root().plays,
        child_plays
    );
}

/// The uniform fallback policy also drives a full search to a legal
/// action.
#[test]
fn test_uniform_policy_search() {
    let game = Frontier::two_players();
    let state = game.initial_state();
    let mut agent: Agent<Frontier, UniformPolicy, ChaCha8Rng> = Agent::new(
        SearchConfig::default(),
        UniformPolicy,
        ChaCha8Rng::seed_from_u64(10),
    );
    agent.set_up(2, 1);

    let action = agent
        .select_action(&game, &state, Duration::from_millis(150))
        .unwrap();
    assert!(game.is_valid_action(&state, &action));
}
