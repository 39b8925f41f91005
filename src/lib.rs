//! Sandlot - arcade baseball play-resolution engine
//!
//! Core modules:
//! - `sim`: Step-driven simulation (field geometry, pursuit, play selection, throws, runners)
//! - `settings`: Data-driven tuning constants loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Logical steps per second, used to turn message durations into step delays
    pub const STEPS_PER_SECOND: u32 = 60;

    /// Pitch speed (units per step)
    pub const BALL_SPEED_INITIAL: f32 = 5.0;
    /// Exit speed of a perfect hit (units per step)
    pub const HIT_MAX_SPEED: f32 = 24.75;
    /// Relay throw speed (units per step)
    pub const THROW_SPEED: f32 = 5.5;
    /// Widest spray angle of a poorly timed hit (radians)
    pub const MAX_SPREAD_ANGLE: f32 = std::f32::consts::PI / 3.75;

    pub const BALL_RADIUS: f32 = 8.0;

    pub const RUNNER_RADIUS: f32 = 12.0;
    pub const RUNNER_SPEED: f32 = 5.0;

    pub const FIELDER_RADIUS: f32 = 12.0;
    pub const FIELDER_SPEED: f32 = 4.0;

    /// Hit distance range as fractions of the diamond height
    pub const MIN_HIT_FRACTION: f32 = 0.4;
    pub const MAX_HIT_FRACTION: f32 = 2.5;

    /// Pause between a verdict and its announcement (ms)
    pub const RESULT_DELAY_MS: u32 = 500;

    pub const OUTS_PER_GAME: u32 = 3;
    pub const STRIKES_PER_OUT: u32 = 3;
}

/// 2D cross product (z component of a × b)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Unit vector from `from` toward `to` (zero if they coincide)
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Move `pos` one step of length `speed` toward `target` (may overshoot like the
/// rest of the fixed-step movement code)
#[inline]
pub fn step_toward(pos: Vec2, target: Vec2, speed: f32) -> Vec2 {
    pos + direction_to(pos, target) * speed
}

/// Convert a millisecond duration into whole simulation steps (rounded up)
#[inline]
pub fn ms_to_steps(ms: u32, steps_per_second: u32) -> u64 {
    (ms as u64 * steps_per_second as u64).div_ceil(1000)
}
