//! 守卫 AI：追击、右移与补充。

pub mod guards;

pub use guards::{advance_guards, replenish_guards, spawn_guards, step_guard, GuardCycle};
