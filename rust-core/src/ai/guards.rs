use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::{Board, GameConfig, Guard, Position};

const SPAWN_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuardCycle {
    pub guards: Vec<Guard>,
    pub spawned: Vec<Guard>,
}

/// 计算单个守卫的下一步。返回 `None` 表示守卫走出了棋盘右侧。
///
/// 守卫总是向右漂移一列，同时向玩家所在的行靠近一格。纵向移动只检查
/// 当前列中目标行的格子是否为岩石；目标格越界、是玩家本人或是岩石时，
/// 守卫原地不动。
pub fn step_guard(guard: Guard, player: Position, board: &Board) -> Option<Guard> {
    let size = board.size() as i32;
    let dy = (player.y - guard.y).signum();
    let new_x = guard.x + 1;
    let mut new_y = guard.y;

    if dy != 0 && !board.is_rock(Position::new(guard.x, guard.y + dy)) {
        new_y = guard.y + dy;
    }

    if new_y < 0 || new_y >= size {
        return Some(guard);
    }

    let destination = Position::new(new_x, new_y);
    if destination == player || board.is_rock(destination) {
        return Some(guard);
    }
    if new_x >= size {
        return None;
    }
    Some(destination)
}

pub fn advance_guards<R: Rng + ?Sized>(
    guards: &[Guard],
    player: Position,
    board: &Board,
    config: &GameConfig,
    rng: &mut R,
) -> GuardCycle {
    let mut next: Vec<Guard> = guards
        .iter()
        .filter_map(|guard| step_guard(*guard, player, board))
        .collect();
    next.truncate(config.num_guards);

    let spawned = replenish_guards(&mut next, player, board, config, rng);
    GuardCycle {
        guards: next,
        spawned,
    }
}

/// 在前几列中随机补充守卫，直到达到配置人数。
///
/// 候选格子为出生列中既不是岩石也不是玩家所在的格子，每个新守卫在候选
/// 格子中均匀抽取。没有候选格子时本轮不补充。
pub fn replenish_guards<R: Rng + ?Sized>(
    guards: &mut Vec<Guard>,
    player: Position,
    board: &Board,
    config: &GameConfig,
    rng: &mut R,
) -> Vec<Guard> {
    let mut spawned = Vec::new();
    if guards.len() >= config.num_guards {
        return spawned;
    }

    let columns = config.guard_spawn_columns.min(board.size()) as i32;
    let rows = board.size() as i32;
    let candidates: Vec<Position> = (0..columns)
        .flat_map(|x| (0..rows).map(move |y| Position::new(x, y)))
        .filter(|pos| *pos != player && !board.is_rock(*pos))
        .collect();

    while guards.len() < config.num_guards {
        let Some(pos) = candidates.choose(rng) else {
            log::warn!("no free cell in the first {columns} columns to spawn a guard");
            break;
        };
        guards.push(*pos);
        spawned.push(*pos);
    }
    spawned
}

/// 开局时放置守卫。每个守卫最多尝试若干次随机位置，全部失败则不放置。
pub fn spawn_guards<R: Rng + ?Sized>(
    board: &Board,
    player: Position,
    config: &GameConfig,
    rng: &mut R,
) -> Vec<Guard> {
    let columns = config.guard_spawn_columns.min(board.size()) as i32;
    let rows = board.size() as i32;
    let mut guards = Vec::with_capacity(config.num_guards);

    for _ in 0..config.num_guards {
        for _ in 0..SPAWN_ATTEMPTS {
            let pos = Position::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
            if pos != player && !board.is_rock(pos) {
                guards.push(pos);
                break;
            }
        }
    }
    guards
}
