use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::guards::{advance_guards, spawn_guards};

use super::{
    board::{generate_board, generate_column, Direction},
    config::GameConfig,
    effects::{apply_tile_effect, resolve_guard_capture, resolve_wolf_attack},
    state::{GameEvent, GameOverReason, GameState},
};

pub trait Clock {
    fn now_ms(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Command {
    Move {
        direction: Direction,
    },
    Advance,
    Reset {
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(direction) = s.parse::<Direction>() {
            return Ok(Command::Move { direction });
        }
        match s.to_ascii_lowercase().as_str() {
            "r" | "roll" | "advance" => Ok(Command::Advance),
            "reset" => Ok(Command::Reset { seed: None }),
            _ => Err(()),
        }
    }
}

/// 被拒绝的玩家操作。`Display` 文本即写入活动日志的那一行。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(tag = "type")]
pub enum RuleError {
    #[error("💀 Game over! Reset to play again.")]
    GameOver,
    #[error("❌ No moves left!")]
    NoMovesLeft,
    #[error("❌ Can't move out of bounds!")]
    OutOfBounds { x: i32, y: i32 },
    #[error("🪨 Blocked by rock!")]
    BlockedByRock { x: i32, y: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResolution {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<RuleError>,
    pub absolute_position: u32,
}

impl RuleResolution {
    pub fn new(state: GameState, outcome: Result<Vec<GameEvent>, RuleError>) -> Self {
        let absolute_position = state.absolute_position();
        match outcome {
            Ok(events) => Self {
                state,
                events,
                rejected: None,
                absolute_position,
            },
            Err(error) => Self {
                state,
                events: vec![GameEvent::Rejected {
                    message: error.to_string(),
                }],
                rejected: Some(error),
                absolute_position,
            },
        }
    }
}

/// 回合控制器：校验并执行玩家指令，驱动效果结算、守卫行动与世界平移。
pub struct RuleEngine {
    config: GameConfig,
    rng: SmallRng,
    clock: Box<dyn Clock>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl RuleEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub fn new_game(&mut self) -> GameState {
        let board = generate_board(
            self.config.grid_size,
            &mut self.rng,
            &self.config.tile_weights,
        );
        let mut state = GameState::new(board, &self.config);
        state.guards = spawn_guards(&state.board, state.player, &self.config, &mut self.rng);
        state
    }

    pub fn execute(
        &mut self,
        state: &mut GameState,
        command: Command,
    ) -> Result<Vec<GameEvent>, RuleError> {
        match command {
            Command::Move { direction } => self.move_player(state, direction),
            Command::Advance => self.advance(state),
            Command::Reset { seed } => Ok(self.reset(state, seed)),
        }
    }

    /// `(State, Command) → State` 形式的转移，不修改传入的状态。
    pub fn apply(&mut self, state: &GameState, command: Command) -> RuleResolution {
        let mut next = state.clone();
        let outcome = self.execute(&mut next, command);
        RuleResolution::new(next, outcome)
    }

    pub fn move_player(
        &mut self,
        state: &mut GameState,
        direction: Direction,
    ) -> Result<Vec<GameEvent>, RuleError> {
        if state.is_game_over() {
            return Err(self.reject(state, RuleError::GameOver));
        }
        if state.moves_left == 0 {
            return Err(self.reject(state, RuleError::NoMovesLeft));
        }

        let (dx, dy) = direction.delta();
        let from = state.player;
        let to = from.offset(dx, dy);
        if !state.board.in_bounds(to) {
            return Err(self.reject(state, RuleError::OutOfBounds { x: to.x, y: to.y }));
        }
        if state.board.is_rock(to) {
            return Err(self.reject(state, RuleError::BlockedByRock { x: to.x, y: to.y }));
        }

        state.player = to;
        state.moves_left -= 1;
        state.concealed = false;
        let mut events = vec![GameEvent::Moved { from, to }];

        apply_tile_effect(state, &self.config, &mut self.rng, direction, &mut events);
        resolve_wolf_attack(state, &self.config, &mut events);

        if !state.is_game_over() && !state.concealed {
            let cycle = advance_guards(
                &state.guards,
                state.player,
                &state.board,
                &self.config,
                &mut self.rng,
            );
            state.guards = cycle.guards;
            events.push(GameEvent::GuardsMoved {
                guards: state.guards.clone(),
            });
            if !cycle.spawned.is_empty() {
                log::debug!("spawned {} guard(s): {:?}", cycle.spawned.len(), cycle.spawned);
                events.push(GameEvent::GuardsSpawned {
                    spawned: cycle.spawned,
                });
            }
            resolve_guard_capture(state, &self.config, &mut events);
        }

        self.finish(state, &events);
        Ok(events)
    }

    /// 掷骰：先平移世界，玩家未掉出边缘时再发放新的步数。
    pub fn advance(&mut self, state: &mut GameState) -> Result<Vec<GameEvent>, RuleError> {
        if state.is_game_over() {
            return Err(self.reject(state, RuleError::GameOver));
        }

        if state.player.x == 0 {
            state.end_game();
            let events = vec![GameEvent::GameOver {
                reason: GameOverReason::FellOffEdge,
            }];
            self.finish(state, &events);
            return Ok(events);
        }

        let column = generate_column(
            state.board.size(),
            &mut self.rng,
            &self.config.tile_weights,
        );
        state.board.shift_left(column);
        state.player.x -= 1;
        state.guards.retain(|guard| guard.x > 0);
        for guard in &mut state.guards {
            guard.x -= 1;
        }
        state.world_offset += 1;
        state.turn += 1;

        let value = self.rng.gen_range(1..=self.config.dice_sides.max(1));
        state.moves_left = value;
        log::debug!(
            "turn {}: world offset {}, rolled {value}",
            state.turn,
            state.world_offset
        );

        let events = vec![
            GameEvent::WorldShifted {
                offset: state.world_offset,
            },
            GameEvent::DiceRolled { value },
        ];
        self.finish(state, &events);
        Ok(events)
    }

    pub fn reset(&mut self, state: &mut GameState, seed: Option<u64>) -> Vec<GameEvent> {
        if let Some(seed) = seed {
            self.reseed(seed);
        }
        *state = self.new_game();
        log::info!("new game started with {} guard(s)", state.guards.len());
        vec![
            GameEvent::GameReset,
            GameEvent::GuardsSpawned {
                spawned: state.guards.clone(),
            },
        ]
    }

    fn finish(&self, state: &mut GameState, events: &[GameEvent]) {
        let now = self.clock.now_ms();
        for event in events {
            if let Some(text) = event.log_text() {
                state.push_log(text, now, self.config.log_capacity);
            }
            if let GameEvent::GameOver { reason } = event {
                log::info!("game over: {reason:?} at turn {}", state.turn);
            }
        }
    }

    fn reject(&self, state: &mut GameState, error: RuleError) -> RuleError {
        log::warn!("rejected: {error:?}");
        state.push_log(
            error.to_string(),
            self.clock.now_ms(),
            self.config.log_capacity,
        );
        error
    }
}

/// 把界面上的种子文本转换成随机源种子：纯数字直接使用，其余文本做 FNV-1a 散列。
pub fn seed_from_str(seed: &str) -> u64 {
    let trimmed = seed.trim();
    if let Ok(value) = trimmed.parse::<u64>() {
        return value;
    }
    trimmed.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
