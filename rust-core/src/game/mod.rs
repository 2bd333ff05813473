//! 游戏核心逻辑模块（地形目录、棋盘生成、效果结算、回合控制）。

pub mod board;
pub mod config;
pub mod effects;
pub mod rules;
pub mod state;
pub mod tiles;

pub use board::{generate_board, generate_column, generate_tile, Board, Direction, Position};
pub use config::{ConfigError, GameConfig, TileWeights};
pub use effects::{
    apply_tile_effect,
    cave_exits,
    resolve_guard_capture,
    resolve_wolf_attack,
    river_sweep,
};
pub use rules::{
    seed_from_str,
    Clock,
    Command,
    FixedClock,
    RuleEngine,
    RuleError,
    RuleResolution,
    SystemClock,
};
pub use state::{
    GameEvent,
    GameOverReason,
    GamePhase,
    GameState,
    Guard,
    IntegrityError,
    LogEntry,
};
pub use tiles::{EffectCategory, TileKind};
