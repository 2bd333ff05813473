//! End-to-end turn scenarios driven through the rule engine.

use grid_escape::{
    Board, Direction, FixedClock, GameConfig, GameEvent, GameOverReason, GameState, Position,
    RuleEngine, TileKind,
};

fn engine() -> RuleEngine {
    RuleEngine::with_seed(GameConfig::default(), 2024).with_clock(FixedClock(0.0))
}

fn open_field() -> GameState {
    GameState::new(Board::empty(12), &GameConfig::default())
}

#[test]
fn scenario_a_single_step_on_empty_board() {
    let mut engine = engine();
    let mut state = open_field().with_moves(4);

    engine
        .move_player(&mut state, Direction::Right)
        .expect("move should succeed");

    assert_eq!(state.player, Position::new(7, 6));
    assert_eq!(state.moves_left, 3);
    assert_eq!(state.log[0].text, "🏃 Moved to 7,6");
}

#[test]
fn scenario_b_two_guards_hit_once_for_combined_damage() {
    let mut engine = engine();
    let mut state = open_field()
        .with_moves(1)
        .with_guards(vec![Position::new(5, 5), Position::new(5, 7)]);

    let events = engine
        .move_player(&mut state, Direction::Right)
        .expect("move should succeed");

    assert_eq!(state.health, 50);
    assert!(!state.is_game_over());
    let attacks: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, GameEvent::GuardsAttack { .. }))
        .collect();
    assert_eq!(
        attacks,
        vec![&GameEvent::GuardsAttack {
            guards: 2,
            damage: 50
        }]
    );
    assert_eq!(state.log[0].text, "💂 Guards deal 50 damage!");
}

#[test]
fn scenario_c_heal_mushroom_caps_and_is_consumed() {
    let mut engine = engine();
    let mut state = open_field().with_moves(3).with_health(90);
    state.board.set(Position::new(7, 6), TileKind::HealMushroom);

    engine
        .move_player(&mut state, Direction::Right)
        .expect("first visit");
    assert_eq!(state.health, 100);
    assert_eq!(state.board.get(Position::new(7, 6)), Some(TileKind::Empty));

    state.health = 80;
    engine
        .move_player(&mut state, Direction::Left)
        .expect("step away");
    engine
        .move_player(&mut state, Direction::Right)
        .expect("second visit");
    assert_eq!(state.health, 80, "consumed mushroom does not heal again");
}

#[test]
fn scenario_d_advance_at_left_edge_is_fatal() {
    let mut engine = engine();
    let mut state = open_field()
        .with_player(Position::new(0, 6))
        .with_moves(2)
        .with_guards(vec![Position::new(0, 1)]);
    let before = state.clone();

    let events = engine.advance(&mut state).expect("edge fall is applied");

    assert!(state.is_game_over());
    assert_eq!(state.turn, before.turn);
    assert_eq!(state.moves_left, before.moves_left);
    assert_eq!(state.world_offset, before.world_offset);
    assert_eq!(state.board, before.board);
    assert_eq!(state.guards, before.guards);
    assert_eq!(
        events,
        vec![GameEvent::GameOver {
            reason: GameOverReason::FellOffEdge
        }]
    );
}

#[test]
fn wolf_death_skips_guard_phase() {
    let mut engine = engine();
    let mut state = open_field()
        .with_moves(1)
        .with_health(15)
        .with_guards(vec![Position::new(5, 6)]);
    state.board.set(Position::new(8, 6), TileKind::Wolf);

    let events = engine
        .move_player(&mut state, Direction::Right)
        .expect("move should succeed");

    assert_eq!(state.health, 0);
    assert!(state.is_game_over());
    assert_eq!(state.guards, vec![Position::new(5, 6)]);
    assert!(!events
        .iter()
        .any(|event| matches!(event, GameEvent::GuardsMoved { .. } | GameEvent::GuardsAttack { .. })));
    assert_eq!(state.log[0].text, "💀 Killed by wolves! Game Over!");
    assert_eq!(state.log[1].text, "🐺 Wolf attacks from 8,6!");
}

#[test]
fn river_sweeps_into_quicksand() {
    let mut engine = engine();
    let mut state = open_field().with_moves(5);
    state.board.set(Position::new(6, 5), TileKind::River);
    state.board.set(Position::new(6, 4), TileKind::River);
    state.board.set(Position::new(6, 3), TileKind::Quicksand);

    let events = engine
        .move_player(&mut state, Direction::Up)
        .expect("move should succeed");

    assert_eq!(state.player, Position::new(6, 3));
    assert_eq!(state.moves_left, 0);
    assert!(events.contains(&GameEvent::SweptByRiver {
        from: Position::new(6, 5),
        to: Position::new(6, 3)
    }));
}

#[test]
fn cave_teleport_is_reported_as_event() {
    let mut engine = engine();
    let mut state = open_field().with_moves(2);
    state.board.set(Position::new(5, 6), TileKind::Cave);
    state.board.set(Position::new(10, 10), TileKind::Cave);

    let events = engine
        .move_player(&mut state, Direction::Left)
        .expect("move should succeed");

    assert_eq!(state.player, Position::new(10, 10));
    assert!(events.contains(&GameEvent::Teleported {
        from: Position::new(5, 6),
        to: Position::new(10, 10)
    }));
    assert_eq!(state.board.get(Position::new(5, 6)), Some(TileKind::Cave));
}

#[test]
fn seeded_games_replay_identically() {
    let play = |seed: u64| {
        let mut engine = RuleEngine::with_seed(GameConfig::default(), seed).with_clock(FixedClock(0.0));
        let mut state = engine.new_game();
        for _ in 0..5 {
            if engine.advance(&mut state).is_err() {
                break;
            }
            for direction in [Direction::Right, Direction::Up, Direction::Right] {
                let _ = engine.move_player(&mut state, direction);
            }
        }
        state
    };

    assert_eq!(play(77), play(77));
}
