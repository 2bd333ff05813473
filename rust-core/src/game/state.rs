use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::{Board, Position};
use super::config::GameConfig;

pub type Guard = Position;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    GameOver,
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Playing
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameOverReason {
    Wolves,
    Guards,
    Poison,
    FellOffEdge,
}

impl GameOverReason {
    fn message(self) -> &'static str {
        match self {
            GameOverReason::Wolves => "💀 Killed by wolves! Game Over!",
            GameOverReason::Guards => "💀 Defeated by guards! Game Over!",
            GameOverReason::Poison => "💀 Poisoned! Game Over!",
            GameOverReason::FellOffEdge => "💀 Fell off the edge! Game Over!",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub timestamp_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    Moved {
        from: Position,
        to: Position,
    },
    Rejected {
        message: String,
    },
    StuckInQuicksand {
        at: Position,
    },
    Teleported {
        from: Position,
        to: Position,
    },
    Healed {
        amount: u32,
        health: u32,
    },
    Poisoned {
        amount: u32,
        health: u32,
    },
    Hidden {
        at: Position,
    },
    SweptByRiver {
        from: Position,
        to: Position,
    },
    WolfAttack {
        from: Position,
        damage: u32,
    },
    GuardsAttack {
        guards: usize,
        damage: u32,
    },
    GuardsMoved {
        guards: Vec<Guard>,
    },
    GuardsSpawned {
        spawned: Vec<Guard>,
    },
    WorldShifted {
        offset: u32,
    },
    DiceRolled {
        value: u32,
    },
    GameOver {
        reason: GameOverReason,
    },
    GameReset,
}

impl GameEvent {
    /// 事件在活动日志中的文本；纯动画事件返回 `None`。
    pub fn log_text(&self) -> Option<String> {
        match self {
            GameEvent::Moved { to, .. } => Some(format!("🏃 Moved to {},{}", to.x, to.y)),
            GameEvent::Rejected { message } => Some(message.clone()),
            GameEvent::StuckInQuicksand { .. } => Some("🕸️ Caught in web!".into()),
            GameEvent::Teleported { to, .. } => {
                Some(format!("🕳️ Teleported to cave at {},{}!", to.x, to.y))
            }
            GameEvent::Healed { .. } => Some("🍄 Healed by mushroom!".into()),
            GameEvent::Poisoned { .. } => Some("🔴 Hurt by mushroom!".into()),
            GameEvent::Hidden { .. } => Some("🌳 Hidden in bush!".into()),
            GameEvent::SweptByRiver { .. } => Some("💧 Swept through the river!".into()),
            GameEvent::WolfAttack { from, .. } => {
                Some(format!("🐺 Wolf attacks from {},{}!", from.x, from.y))
            }
            GameEvent::GuardsAttack { damage, .. } => {
                Some(format!("💂 Guards deal {damage} damage!"))
            }
            GameEvent::WorldShifted { .. } => Some("⬅️ The world shifts left...".into()),
            GameEvent::DiceRolled { value } => Some(format!("🎲 Rolled a {value}")),
            GameEvent::GameOver { reason } => Some(reason.message().into()),
            GameEvent::GuardsMoved { .. } | GameEvent::GuardsSpawned { .. } | GameEvent::GameReset => {
                None
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(tag = "type")]
pub enum IntegrityError {
    #[error("board must be a {expected}x{expected} square")]
    BoardNotSquare { expected: usize },
    #[error("player at {position:?} is off the board")]
    PlayerOutOfBounds { position: Position },
    #[error("guard at {position:?} is off the board")]
    GuardOutOfBounds { position: Position },
    #[error("{count} guards exceed the limit of {max}")]
    TooManyGuards { count: usize, max: usize },
    #[error("health {value} exceeds the maximum {max}")]
    HealthOutOfRange { value: u32, max: u32 },
    #[error("health is zero but the game is still running")]
    DeadButPlaying,
    #[error("log holds {len} entries, capacity is {capacity}")]
    LogOverflow { len: usize, capacity: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub player: Position,
    #[serde(default)]
    pub guards: Vec<Guard>,
    pub health: u32,
    #[serde(default)]
    pub moves_left: u32,
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub world_offset: u32,
    #[serde(default)]
    pub concealed: bool,
    #[serde(default)]
    pub phase: GamePhase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub log: Vec<LogEntry>,
}

impl GameState {
    pub fn new(board: Board, config: &GameConfig) -> Self {
        let (x, y) = config.start_position();
        Self {
            board,
            player: Position::new(x, y),
            guards: Vec::new(),
            health: config.max_health,
            moves_left: 0,
            turn: 0,
            world_offset: 0,
            concealed: false,
            phase: GamePhase::Playing,
            log: Vec::new(),
        }
    }

    pub fn with_player(mut self, player: Position) -> Self {
        self.player = player;
        self
    }

    pub fn with_guards(mut self, guards: Vec<Guard>) -> Self {
        self.guards = guards;
        self
    }

    pub fn with_moves(mut self, moves_left: u32) -> Self {
        self.moves_left = moves_left;
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn absolute_position(&self) -> u32 {
        self.world_offset + self.player.x.max(0) as u32
    }

    pub fn push_log(&mut self, text: impl Into<String>, timestamp_ms: f64, capacity: usize) {
        self.log.insert(
            0,
            LogEntry {
                text: text.into(),
                timestamp_ms,
            },
        );
        self.log.truncate(capacity);
    }

    /// 治疗，结果不超过上限。返回实际恢复量。
    pub fn heal(&mut self, amount: u32, max_health: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(max_health);
        self.health - before
    }

    /// 扣血，下限为 0。返回 `true` 表示这次伤害导致死亡。
    pub fn damage(&mut self, amount: u32) -> bool {
        if amount == 0 || self.is_game_over() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.phase = GamePhase::GameOver;
            return true;
        }
        false
    }

    pub fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
    }

    pub fn guard_at(&self, pos: Position) -> bool {
        self.guards.iter().any(|guard| *guard == pos)
    }

    pub fn integrity_check(&self, config: &GameConfig) -> Result<(), IntegrityError> {
        if self.board.size() != config.grid_size || !self.board.is_square() {
            return Err(IntegrityError::BoardNotSquare {
                expected: config.grid_size,
            });
        }
        if !self.board.in_bounds(self.player) {
            return Err(IntegrityError::PlayerOutOfBounds {
                position: self.player,
            });
        }
        if let Some(guard) = self.guards.iter().find(|g| !self.board.in_bounds(**g)) {
            return Err(IntegrityError::GuardOutOfBounds { position: *guard });
        }
        if self.guards.len() > config.num_guards {
            return Err(IntegrityError::TooManyGuards {
                count: self.guards.len(),
                max: config.num_guards,
            });
        }
        if self.health > config.max_health {
            return Err(IntegrityError::HealthOutOfRange {
                value: self.health,
                max: config.max_health,
            });
        }
        if self.health == 0 && !self.is_game_over() {
            return Err(IntegrityError::DeadButPlaying);
        }
        if self.log.len() > config.log_capacity {
            return Err(IntegrityError::LogOverflow {
                len: self.log.len(),
                capacity: config.log_capacity,
            });
        }
        Ok(())
    }
}
