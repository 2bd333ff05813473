//! Property-based tests for the turn engine.
//!
//! Run with: cargo test --release prop_engine

#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;

use grid_escape::game::{apply_tile_effect, river_sweep};
use grid_escape::{
    Board, Command, Direction, FixedClock, GameConfig, GameEvent, GameState, Position,
    RuleEngine, TileKind, TileWeights,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const LAYOUT_CHARS: [char; 9] = ['.', 'q', 'w', '#', 'c', '+', '-', 'b', '~'];
const SIZE: usize = 6;

fn board_strategy() -> impl Strategy<Value = Board> {
    prop::collection::vec(0usize..LAYOUT_CHARS.len(), SIZE * SIZE).prop_map(|cells| {
        let rows: Vec<String> = cells
            .chunks(SIZE)
            .map(|row| row.iter().map(|i| LAYOUT_CHARS[*i]).collect())
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        Board::from_ascii(&refs).expect("generated layout is square")
    })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Right),
        Just(Direction::Up),
        Just(Direction::Down),
    ]
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => direction_strategy().prop_map(|direction| Command::Move { direction }),
        1 => Just(Command::Advance),
    ]
}

fn small_config() -> GameConfig {
    GameConfig {
        grid_size: SIZE,
        ..GameConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Rejected moves leave everything but the log untouched.
    #[test]
    fn prop_rejected_move_is_idempotent(seed in any::<u64>(), y in 0i32..12) {
        let mut engine = RuleEngine::with_seed(GameConfig::default(), seed)
            .with_clock(FixedClock(5.0));
        let state = engine.new_game().with_player(Position::new(0, y)).with_moves(3);
        let command = Command::Move { direction: Direction::Left };

        let first = engine.apply(&state, command.clone());
        let second = engine.apply(&first.state, command);

        prop_assert!(first.rejected.is_some());
        prop_assert!(second.rejected.is_some());
        let mut a = first.state.clone();
        let mut b = second.state.clone();
        prop_assert_eq!(b.log.len(), a.log.len() + 1);
        a.log.clear();
        b.log.clear();
        let mut untouched = state.clone();
        untouched.log.clear();
        prop_assert_eq!(&a, &untouched);
        prop_assert_eq!(&a, &b);
    }

    /// Health stays within [0, max] and game over is set exactly when it hits zero.
    #[test]
    fn prop_health_is_clamped(changes in prop::collection::vec((any::<bool>(), 0u32..60), 0..40)) {
        let config = GameConfig::default();
        let mut state = GameState::new(Board::empty(12), &config);
        for (heal, amount) in changes {
            let was_over = state.is_game_over();
            if heal {
                state.heal(amount, config.max_health);
            } else {
                state.damage(amount);
            }
            prop_assert!(state.health <= config.max_health);
            if !was_over {
                prop_assert_eq!(state.is_game_over(), state.health == 0);
            }
        }
    }

    /// After a guard cycle on a rock-free world, no guard shares the player's cell.
    #[test]
    fn prop_guards_never_land_on_player(
        seed in any::<u64>(),
        commands in prop::collection::vec(command_strategy(), 1..60),
    ) {
        let config = GameConfig {
            tile_weights: TileWeights { rock: 0.0, ..TileWeights::default() },
            ..small_config()
        };
        let mut engine = RuleEngine::with_seed(config, seed).with_clock(FixedClock(0.0));
        let mut state = engine.new_game();
        for command in commands {
            let Ok(events) = engine.execute(&mut state, command) else { continue };
            if events.iter().any(|e| matches!(e, GameEvent::GuardsMoved { .. })) {
                prop_assert!(!state.guard_at(state.player));
                prop_assert!(state.guards.len() <= engine.config().num_guards);
            }
            prop_assert!(state.integrity_check(engine.config()).is_ok());
        }
    }

    /// River sweeps terminate in bounds and only rest on a river in front of rock or the board edge.
    #[test]
    fn prop_river_sweep_terminates(
        board in board_strategy(),
        x in 0i32..SIZE as i32,
        y in 0i32..SIZE as i32,
        direction in direction_strategy(),
    ) {
        let entry = Position::new(x, y);
        let landing = river_sweep(&board, entry, direction);
        prop_assert!(board.in_bounds(landing));
        if landing != entry {
            prop_assert_ne!(board.get(landing), Some(TileKind::Rock));
        }
        if landing != entry && board.get(landing) == Some(TileKind::River) {
            let (dx, dy) = direction.delta();
            let next = board.get(landing.offset(dx, dy));
            prop_assert!(next.is_none() || next == Some(TileKind::Rock));
        }

        let config = small_config();
        let mut state = GameState::new(board.clone(), &config).with_player(entry).with_moves(3);
        let mut rng = SmallRng::seed_from_u64(u64::from(x as u32 * 31 + y as u32));
        let mut events = Vec::new();
        apply_tile_effect(&mut state, &config, &mut rng, direction, &mut events);
        prop_assert!(board.in_bounds(state.player));
        prop_assert!(events.len() <= SIZE * 2 + 2);
    }

    /// Advancing from the left edge ends the game without shifting the world.
    #[test]
    fn prop_edge_fall_preserves_world(seed in any::<u64>(), y in 0i32..12, moves in 0u32..7) {
        let mut engine = RuleEngine::with_seed(GameConfig::default(), seed)
            .with_clock(FixedClock(0.0));
        let mut state = engine.new_game().with_player(Position::new(0, y)).with_moves(moves);
        let before = state.clone();

        prop_assert!(engine.advance(&mut state).is_ok());
        prop_assert!(state.is_game_over());
        prop_assert_eq!(&state.board, &before.board);
        prop_assert_eq!(&state.guards, &before.guards);
        prop_assert_eq!(state.turn, before.turn);
        prop_assert_eq!(state.moves_left, before.moves_left);
        prop_assert_eq!(state.world_offset, before.world_offset);
    }
}
