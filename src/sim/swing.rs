//! Swing resolution: timing → hit quality → batted ball and runners
//!
//! Timing is judged by how far the pitch is from home plate (along the pitch
//! line) at the moment of the swing, measured against the plate radius and the
//! three accuracy rings.

use std::fmt;

use glam::Vec2;
use rand::Rng;

use super::state::{BallFlight, GameEvent, GameState, Runner};

/// Hit quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTier {
    Perfect,
    Good,
    Okay,
    Poor,
}

impl HitTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitTier::Perfect => "Perfect!",
            HitTier::Good => "Good!",
            HitTier::Okay => "Okay!",
            HitTier::Poor => "Poor!",
        }
    }

    /// Fraction of the maximum exit speed (and hit distance spread)
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            HitTier::Perfect => 1.0,
            HitTier::Good => 0.8,
            HitTier::Okay => 0.6,
            HitTier::Poor => 0.4,
        }
    }
}

impl fmt::Display for HitTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing verdict for one swing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingResult {
    pub tier: HitTier,
    /// Spray angle away from straight up the middle (radians, signed)
    pub angle_offset: f32,
}

/// Judge a swing from the signed pitch offset at swing time.
///
/// `rings` are the plate radius followed by the three accuracy ring radii.
/// Returns `None` for a whiff (pitch outside the outer ring).
pub fn judge_swing(offset: f32, rings: [f32; 4], max_spread: f32) -> Option<SwingResult> {
    let miss = offset.abs();
    let [perfect, good, okay, poor] = rings;
    let third = max_spread / 3.0;

    let (tier, spread) = if miss < perfect {
        (HitTier::Perfect, 0.0)
    } else if miss < good {
        (HitTier::Good, (miss - perfect) / (good - perfect) * third)
    } else if miss < okay {
        (HitTier::Okay, third + (miss - good) / (okay - good) * third)
    } else if miss < poor {
        (HitTier::Poor, 2.0 * third + (miss - okay) / (poor - okay) * third)
    } else {
        return None;
    };

    // Early swings pull one way, late swings the other
    let angle_offset = if offset < 0.0 { -spread } else { spread };
    Some(SwingResult { tier, angle_offset })
}

/// Rotate a vector by `angle` radians
fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Handle a swing at the live pitch. Returns the hit tier, or `None` when the
/// swing missed (the pitch stays live).
pub fn swing(state: &mut GameState) -> Option<HitTier> {
    if !state.pitching {
        return None;
    }

    // Offset of the ball from the plate along the up-field axis; negative is
    // short of the plate (early), positive is past it (late)
    let up = state.field.up_field();
    let offset = -(state.ball.pos - state.field.home.pos).dot(up);
    let rings = [
        state.field.home.radius,
        state.field.accuracy_rings[0],
        state.field.accuracy_rings[1],
        state.field.accuracy_rings[2],
    ];
    let result = judge_swing(offset, rings, state.settings.max_spread_angle)?;
    let multiplier = result.tier.speed_multiplier();

    state.pitching = false;
    if !state.play.is_clear() {
        log::warn!("Stale play state at play start: {:?}", state.play);
        state.play.clear();
    }

    // Batted ball
    let dir = rotate(up, result.angle_offset);
    state.ball.dir = dir;
    state.ball.speed = state.settings.hit_max_speed * multiplier;

    let height = state.field.diamond_height();
    let min_hit = height * state.settings.min_hit_fraction;
    let max_hit = height * state.settings.max_hit_fraction;
    let roll: f32 = state.rng().random();
    let distance = min_hit + (max_hit - min_hit) * multiplier * roll;
    state.flight = Some(BallFlight {
        start: state.ball.pos,
        distance,
    });

    // Runners already on base take off for the next one
    for runner in state.runners.iter_mut().filter(|r| r.active) {
        if runner.next_base().is_some() {
            runner.pos = state.field.base_pos(runner.current_base());
            runner.head_for_next_base(&state.field);
        }
    }

    let id = state.next_runner_id();
    let mut batter = Runner::batter(id, &state.field, &state.settings);
    batter.head_for_next_base(&state.field);
    state.runners.push(batter);

    state.play.active = true;
    state.score.strikes = 0;
    state.score.last_result = result.tier.as_str().to_string();
    log::info!(
        "{} angle {:.3} speed {:.2} distance {:.1}",
        result.tier,
        result.angle_offset,
        state.ball.speed,
        distance
    );
    state.emit(GameEvent::Hit { tier: result.tier });
    state.show_message(result.tier.as_str(), 1000);

    Some(result.tier)
}
