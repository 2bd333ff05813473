use rand::seq::SliceRandom;
use rand::Rng;

use super::board::{Board, Direction, Position};
use super::config::GameConfig;
use super::state::{GameEvent, GameOverReason, GameState};
use super::tiles::TileKind;

/// 结算玩家当前所在格子的落地效果。
///
/// `direction` 是玩家进入该格子的方向，河流冲刷沿此方向进行。河流把玩家
/// 送到新格子后会继续结算新格子的效果；洞穴传送则到此为止。
pub fn apply_tile_effect<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    direction: Direction,
    events: &mut Vec<GameEvent>,
) {
    if state.is_game_over() {
        return;
    }

    let at = state.player;
    let Some(tile) = state.board.get(at) else {
        return;
    };

    match tile {
        TileKind::Quicksand => {
            state.moves_left = 0;
            events.push(GameEvent::StuckInQuicksand { at });
        }
        TileKind::Cave => {
            let exits = cave_exits(&state.board, at);
            if let Some(exit) = exits.choose(rng) {
                state.player = *exit;
                events.push(GameEvent::Teleported { from: at, to: *exit });
            }
        }
        TileKind::HealMushroom => {
            state.heal(config.mushroom_amount, config.max_health);
            state.board.set(at, TileKind::Empty);
            events.push(GameEvent::Healed {
                amount: config.mushroom_amount,
                health: state.health,
            });
        }
        TileKind::DamageMushroom => {
            state.board.set(at, TileKind::Empty);
            let fatal = state.damage(config.mushroom_amount);
            events.push(GameEvent::Poisoned {
                amount: config.mushroom_amount,
                health: state.health,
            });
            if fatal {
                events.push(GameEvent::GameOver {
                    reason: GameOverReason::Poison,
                });
            }
        }
        TileKind::Bush => {
            state.concealed = true;
            events.push(GameEvent::Hidden { at });
        }
        TileKind::River => {
            let landing = river_sweep(&state.board, at, direction);
            if landing != at {
                state.player = landing;
                events.push(GameEvent::SweptByRiver {
                    from: at,
                    to: landing,
                });
                apply_tile_effect(state, config, rng, direction, events);
            }
        }
        TileKind::Empty | TileKind::Player | TileKind::Guard | TileKind::Wolf | TileKind::Rock => {}
    }
}

/// 沿 `direction` 顺流而下，返回最终落点。
///
/// 连续的河流格子都会被穿过；遇到岩石停在岩石前，遇到其它地形则落在
/// 该格子上，遇到边界则停在最后一个河流格子上。
pub fn river_sweep(board: &Board, entry: Position, direction: Direction) -> Position {
    let (dx, dy) = direction.delta();
    let mut current = entry;
    loop {
        let next = current.offset(dx, dy);
        match board.get(next) {
            None | Some(TileKind::Rock) => break,
            Some(TileKind::River) => current = next,
            Some(_) => {
                current = next;
                break;
            }
        }
    }
    current
}

pub fn cave_exits(board: &Board, from: Position) -> Vec<Position> {
    board
        .positions_of(TileKind::Cave)
        .filter(|pos| *pos != from)
        .collect()
}

pub fn resolve_wolf_attack(state: &mut GameState, config: &GameConfig, events: &mut Vec<GameEvent>) {
    if state.is_game_over() {
        return;
    }

    let mut total = 0;
    for neighbor in state.player.orthogonal_neighbors() {
        if state.board.get(neighbor) == Some(TileKind::Wolf) {
            total += config.wolf_damage;
            events.push(GameEvent::WolfAttack {
                from: neighbor,
                damage: config.wolf_damage,
            });
        }
    }

    if state.damage(total) {
        events.push(GameEvent::GameOver {
            reason: GameOverReason::Wolves,
        });
    }
}

/// 守卫捕获：切比雪夫距离 1 以内的守卫各造成一次伤害，合并后一次性扣除。
/// 玩家隐藏时不生效。
pub fn resolve_guard_capture(
    state: &mut GameState,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    if state.is_game_over() || state.concealed {
        return;
    }

    let attackers = state
        .guards
        .iter()
        .filter(|guard| guard.chebyshev_distance(state.player) <= 1)
        .count();
    if attackers == 0 {
        return;
    }

    let damage = config.guard_damage * attackers as u32;
    events.push(GameEvent::GuardsAttack {
        guards: attackers,
        damage,
    });
    if state.damage(damage) {
        events.push(GameEvent::GameOver {
            reason: GameOverReason::Guards,
        });
    }
}
