pub mod ai;
pub mod game;

use std::str::FromStr;

use gloo_timers::future::TimeoutFuture;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::{Date, Promise};

pub use ai::{advance_guards, replenish_guards, spawn_guards, step_guard, GuardCycle};
pub use game::{
    seed_from_str, Board, Clock, Command, ConfigError, Direction, EffectCategory, FixedClock,
    GameConfig, GameEvent, GameOverReason, GamePhase, GameState, Guard, IntegrityError, LogEntry,
    Position, RuleEngine, RuleError, RuleResolution, SystemClock, TileKind, TileWeights,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

const TELEPORT_FLASH_MS: u32 = 200;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> f64 {
        Date::now()
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

#[wasm_bindgen(js_name = "setLogLevel")]
pub fn set_log_level(level: &str) -> bool {
    match LevelFilter::from_str(level) {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn make_resolution_json(resolution: RuleResolution) -> Result<String, JsValue> {
    serde_json::to_string(&resolution).map_err(serde_to_js_error)
}

fn parse_config(config_json: Option<String>) -> Result<GameConfig, JsValue> {
    match config_json {
        Some(json) => GameConfig::from_json(&json).map_err(serde_to_js_error),
        None => Ok(GameConfig::default()),
    }
}

fn build_engine(config: GameConfig, seed: Option<&str>) -> RuleEngine {
    let engine = match seed {
        Some(seed) => RuleEngine::with_seed(config, seed_from_str(seed)),
        None => RuleEngine::new(config),
    };
    engine.with_clock(JsClock)
}

#[wasm_bindgen]
pub struct GameEngine {
    engine: RuleEngine,
    state: GameState,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: Option<String>) -> Result<GameEngine, JsValue> {
        let config = parse_config(config_json)?;
        let mut engine = build_engine(config, seed.as_deref());
        let state = engine.new_game();
        log::info!(
            "engine ready: {}x{} board, {} guard(s)",
            engine.config().grid_size,
            engine.config().grid_size,
            state.guards.len()
        );
        Ok(GameEngine { engine, state })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        integrity_to_js(&state, self.engine.config())?;
        self.state = state;
        Ok(())
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        make_resolution_json(RuleResolution::new(self.state.clone(), Ok(Vec::new())))
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.config()).map_err(serde_to_js_error)
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn move_player(&mut self, direction: &str) -> Result<String, JsValue> {
        let direction = Direction::from_str(direction)
            .map_err(|_| JsValue::from_str(&format!("unknown direction: {direction}")))?;
        self.run(Command::Move { direction })
    }

    pub fn advance(&mut self) -> Result<String, JsValue> {
        self.run(Command::Advance)
    }

    pub fn reset(&mut self, seed: Option<String>) -> Result<String, JsValue> {
        self.run(Command::Reset {
            seed: seed.as_deref().map(seed_from_str),
        })
    }

    /// 键盘输入：方向键移动，`r` 掷骰。未绑定的按键返回 `None`。
    pub fn handle_key(&mut self, key: &str) -> Result<Option<String>, JsValue> {
        match Command::from_str(key) {
            Ok(command @ (Command::Move { .. } | Command::Advance)) => self.run(command).map(Some),
            _ => Ok(None),
        }
    }

    pub fn apply_command_json(&mut self, command_json: &str) -> Result<String, JsValue> {
        let command: Command = serde_json::from_str(command_json).map_err(serde_to_js_error)?;
        self.run(command)
    }

    fn run(&mut self, command: Command) -> Result<String, JsValue> {
        let outcome = self.engine.execute(&mut self.state, command);
        make_resolution_json(RuleResolution::new(self.state.clone(), outcome))
    }
}

#[wasm_bindgen(js_name = "createGameState")]
pub fn create_game_state(
    config_json: Option<String>,
    seed: Option<String>,
) -> Result<JsValue, JsValue> {
    let config = parse_config(config_json)?;
    let mut engine = build_engine(config, seed.as_deref());
    to_value(&engine.new_game()).map_err(JsValue::from)
}

fn integrity_to_js(state: &GameState, config: &GameConfig) -> Result<(), JsValue> {
    state
        .integrity_check(config)
        .map_err(|error| to_value(&error).unwrap_or_else(serde_to_js_error))
}

#[wasm_bindgen(js_name = "applyCommand")]
pub fn apply_command(
    state: JsValue,
    command: JsValue,
    config_json: Option<String>,
    seed: Option<String>,
) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    let command: Command = from_value(command).map_err(JsValue::from)?;
    let config = parse_config(config_json)?;
    integrity_to_js(&state, &config)?;
    let mut engine = build_engine(config, seed.as_deref());
    to_value(&engine.apply(&state, command)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue, config_json: Option<String>) -> Result<(), JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    let config = parse_config(config_json)?;
    integrity_to_js(&state, &config)
}

#[wasm_bindgen(js_name = "tileGlyph")]
pub fn tile_glyph(kind: &str) -> Option<String> {
    TileKind::from_str(kind)
        .ok()
        .map(|kind| kind.glyph().to_string())
}

/// 传送闪烁的计时：返回的 Promise 在 `delay_ms` 毫秒后 resolve。
#[wasm_bindgen(js_name = "teleportFlash")]
pub fn teleport_flash(delay_ms: Option<u32>) -> Promise {
    let delay = delay_ms.unwrap_or(TELEPORT_FLASH_MS);
    future_to_promise(async move {
        if delay > 0 {
            TimeoutFuture::new(delay).await;
        }
        Ok(JsValue::UNDEFINED)
    })
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
