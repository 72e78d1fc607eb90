//! Space Shooter - A vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, spawning, session state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    /// Pixels per tick
    pub const BULLET_SPEED: f32 = 7.0;

    /// Power-up capsule size and fall speed (pixels per tick)
    pub const POWER_UP_SIZE: f32 = 25.0;
    pub const POWER_UP_SPEED: f32 = 3.0;

    /// Shortest enemy weapon cooldown reachable through level scaling (seconds)
    pub const MIN_ENEMY_COOLDOWN: f32 = 0.25;
    /// Baseline enemy speed at level 1 (enemy speeds scale by baseline / this)
    pub const BASE_ENEMY_SPEED: f32 = 2.0;
}

/// Convert a millisecond duration into whole simulation ticks (rounded)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    ((ms as f32 / 1000.0) / consts::SIM_DT).round() as u32
}

/// Unit vector for an angle in radians (screen space, +y points down)
#[inline]
pub fn heading(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Linear remap of `value` from [in_min, in_max] to [out_min, out_max].
/// A degenerate input range maps to the midpoint of the output range.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span.abs() < f32::EPSILON {
        return (out_min + out_max) * 0.5;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}
