use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_GRID_SIZE: usize = 12;
const DEFAULT_NUM_GUARDS: usize = 3;
const DEFAULT_GUARD_SPAWN_COLUMNS: usize = 3;
const DEFAULT_MAX_HEALTH: u32 = 100;
const DEFAULT_MUSHROOM_AMOUNT: u32 = 20;
const DEFAULT_WOLF_DAMAGE: u32 = 15;
const DEFAULT_GUARD_DAMAGE: u32 = 25;
const DEFAULT_DICE_SIDES: u32 = 6;
const DEFAULT_LOG_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TileWeights {
    pub quicksand: f64,
    pub wolf: f64,
    pub rock: f64,
    pub cave: f64,
    pub heal_mushroom: f64,
    pub damage_mushroom: f64,
    pub bush: f64,
    pub river: f64,
}

impl TileWeights {
    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }

    pub(crate) fn as_array(&self) -> [f64; 8] {
        [
            self.quicksand,
            self.wolf,
            self.rock,
            self.cave,
            self.heal_mushroom,
            self.damage_mushroom,
            self.bush,
            self.river,
        ]
    }
}

impl Default for TileWeights {
    fn default() -> Self {
        Self {
            quicksand: 0.10,
            wolf: 0.05,
            rock: 0.05,
            cave: 0.05,
            heal_mushroom: 0.05,
            damage_mushroom: 0.05,
            bush: 0.05,
            river: 0.05,
        }
    }
}

/// 可调参数。创建引擎时确定，运行期间不可修改。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: usize,
    pub num_guards: usize,
    pub guard_spawn_columns: usize,
    pub max_health: u32,
    pub mushroom_amount: u32,
    pub wolf_damage: u32,
    pub guard_damage: u32,
    pub dice_sides: u32,
    pub log_capacity: usize,
    pub tile_weights: TileWeights,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json).map_err(|err| ConfigError::Malformed {
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn start_position(&self) -> (i32, i32) {
        let centre = (self.grid_size / 2) as i32;
        (centre, centre)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 3 {
            return Err(ConfigError::GridTooSmall {
                size: self.grid_size,
            });
        }
        if self.guard_spawn_columns == 0 || self.guard_spawn_columns > self.grid_size {
            return Err(ConfigError::SpawnColumnsOutOfRange {
                columns: self.guard_spawn_columns,
                grid_size: self.grid_size,
            });
        }
        if self.dice_sides == 0 {
            return Err(ConfigError::ZeroDiceSides);
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        if self.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }
        let weights = self.tile_weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::InvalidWeight);
        }
        let total = self.tile_weights.total();
        if total > 1.0 + f64::EPSILON {
            return Err(ConfigError::WeightsExceedOne { total });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            num_guards: DEFAULT_NUM_GUARDS,
            guard_spawn_columns: DEFAULT_GUARD_SPAWN_COLUMNS,
            max_health: DEFAULT_MAX_HEALTH,
            mushroom_amount: DEFAULT_MUSHROOM_AMOUNT,
            wolf_damage: DEFAULT_WOLF_DAMAGE,
            guard_damage: DEFAULT_GUARD_DAMAGE,
            dice_sides: DEFAULT_DICE_SIDES,
            log_capacity: DEFAULT_LOG_CAPACITY,
            tile_weights: TileWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Error)]
#[serde(tag = "type")]
pub enum ConfigError {
    #[error("malformed config: {message}")]
    Malformed { message: String },
    #[error("grid size {size} is too small (minimum 3)")]
    GridTooSmall { size: usize },
    #[error("guard spawn columns {columns} must be within 1..={grid_size}")]
    SpawnColumnsOutOfRange { columns: usize, grid_size: usize },
    #[error("dice must have at least one side")]
    ZeroDiceSides,
    #[error("log capacity must be positive")]
    ZeroLogCapacity,
    #[error("max health must be positive")]
    ZeroMaxHealth,
    #[error("tile weights must be finite and non-negative")]
    InvalidWeight,
    #[error("tile weights sum to {total}, more than 1")]
    WeightsExceedOne { total: f64 },
}
