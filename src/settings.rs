//! Game settings and tuning
//!
//! All speeds are in field units per simulation step, all durations in
//! milliseconds. Loaded from JSON; any missing field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tuning constants for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Logical steps per second (only used to convert ms delays)
    pub steps_per_second: u32,
    /// Pause between a verdict and its announcement
    pub result_delay_ms: u32,

    // === Ball ===
    pub pitch_speed: f32,
    pub hit_max_speed: f32,
    pub throw_speed: f32,
    /// Widest spray angle (radians)
    pub max_spread_angle: f32,
    pub ball_radius: f32,
    /// Hit distance range as fractions of the diamond height
    pub min_hit_fraction: f32,
    pub max_hit_fraction: f32,

    // === Players ===
    pub runner_speed: f32,
    pub runner_radius: f32,
    pub fielder_speed: f32,
    pub fielder_radius: f32,

    // === Rules ===
    pub outs_per_game: u32,
    pub strikes_per_out: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            steps_per_second: STEPS_PER_SECOND,
            result_delay_ms: RESULT_DELAY_MS,

            pitch_speed: BALL_SPEED_INITIAL,
            hit_max_speed: HIT_MAX_SPEED,
            throw_speed: THROW_SPEED,
            max_spread_angle: MAX_SPREAD_ANGLE,
            ball_radius: BALL_RADIUS,
            min_hit_fraction: MIN_HIT_FRACTION,
            max_hit_fraction: MAX_HIT_FRACTION,

            runner_speed: RUNNER_SPEED,
            runner_radius: RUNNER_RADIUS,
            fielder_speed: FIELDER_SPEED,
            fielder_radius: FIELDER_RADIUS,

            outs_per_game: OUTS_PER_GAME,
            strikes_per_out: STRIKES_PER_OUT,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {err}");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let speeds = [
            ("pitch_speed", self.pitch_speed),
            ("hit_max_speed", self.hit_max_speed),
            ("throw_speed", self.throw_speed),
            ("runner_speed", self.runner_speed),
            ("fielder_speed", self.fielder_speed),
        ];
        for (field, value) in speeds {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "speed must be a positive number",
                });
            }
        }

        let radii = [
            ("ball_radius", self.ball_radius),
            ("runner_radius", self.runner_radius),
            ("fielder_radius", self.fielder_radius),
        ];
        for (field, value) in radii {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "radius must be a positive number",
                });
            }
        }

        if self.steps_per_second == 0 {
            return Err(SettingsError::Invalid {
                field: "steps_per_second",
                reason: "must be at least 1",
            });
        }
        if !(self.min_hit_fraction >= 0.0 && self.min_hit_fraction <= self.max_hit_fraction) {
            return Err(SettingsError::Invalid {
                field: "min_hit_fraction",
                reason: "must be non-negative and not above max_hit_fraction",
            });
        }
        if !(self.max_spread_angle >= 0.0 && self.max_spread_angle < std::f32::consts::FRAC_PI_2) {
            return Err(SettingsError::Invalid {
                field: "max_spread_angle",
                reason: "must be in [0, pi/2)",
            });
        }
        if self.outs_per_game == 0 || self.strikes_per_out == 0 {
            return Err(SettingsError::Invalid {
                field: "outs_per_game",
                reason: "outs and strikes per out must be at least 1",
            });
        }
        Ok(())
    }

    /// Convert a millisecond duration into simulation steps
    pub fn steps_for(&self, ms: u32) -> u64 {
        crate::ms_to_steps(ms, self.steps_per_second)
    }
}
