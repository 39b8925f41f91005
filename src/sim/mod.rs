//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (delays are counted in steps)
//! - Seeded RNG only
//! - Stable iteration order (roster order, runner order)
//! - No rendering or platform dependencies

pub mod field;
pub mod pursuit;
pub mod runners;
pub mod select;
pub mod state;
pub mod swing;
pub mod throw;
pub mod tick;
pub mod timer;
pub mod zone;

pub use field::{Base, BaseName, FieldGeometry, FieldPolygon, GeometryError, default_roster};
pub use pursuit::{intercept_point, intercept_time};
pub use select::{PlayChoice, assign_play, closest_fielder, select_play};
pub use state::{
    BASE_PATH, Ball, BallFlight, Fielder, FielderRole, GameEvent, GameState, PlayOutcome,
    PlayState, PlayType, Runner, RunnerId, Scoreboard, ThrowPhase,
};
pub use swing::{HitTier, SwingResult, judge_swing, swing};
pub use tick::{TickInput, end_play, land_ball, tick};
pub use timer::{TimerCategory, TimerEvent, TimerHandle, TimerQueue};
pub use zone::{ZoneLabel, classify};
