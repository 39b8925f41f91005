//! Fielder behaviour during a live play
//!
//! The designated fielder runs to the ball, then either chases the targeted
//! runner to a fixed intercept point, throws to the fielder covering the
//! runner's next base, or carries the ball to that base when it is the cover.
//! Basemen not involved drift back to their bags.

use glam::Vec2;

use super::pursuit::intercept_point;
use super::state::{FielderRole, GameState, PlayOutcome, PlayType, ThrowPhase};
use super::tick::end_play;
use crate::step_toward;

/// Advance the fielders one step
pub fn advance_fielders(state: &mut GameState) {
    if !state.play.active || state.play.is_home_run {
        return;
    }
    if state.play.phase == ThrowPhase::Idle {
        return;
    }

    drift_basemen(state);

    match state.play.phase {
        ThrowPhase::Idle => {}
        ThrowPhase::Retrieve => retrieve(state),
        ThrowPhase::Relay => relay(state),
        ThrowPhase::SelfCarry => self_carry(state),
        ThrowPhase::TagChase => tag_chase(state),
    }
}

/// Basemen with nothing to do walk back toward their bag
fn drift_basemen(state: &mut GameState) {
    let holder = state.play.fielder_holding_ball;
    let cover = state.play.covering_fielder;
    let field = &state.field;

    for fielder in &mut state.fielders {
        if Some(fielder.role) == holder || Some(fielder.role) == cover {
            continue;
        }
        let Some(base) = fielder.role.assigned_base() else {
            continue;
        };
        let target = field.base_pos(base);
        if fielder.pos.distance(target) > fielder.speed {
            fielder.pos = step_toward(fielder.pos, target, fielder.speed);
        }
    }
}

/// Index of the fielder holding (or going for) the ball
fn holder_index(state: &GameState) -> Option<usize> {
    state
        .play
        .fielder_holding_ball
        .and_then(|role| state.fielder_index(role))
}

fn retrieve(state: &mut GameState) {
    let (Some(idx), Some(landed)) = (holder_index(state), state.play.ball_landed_position) else {
        log::warn!("Retrieve phase without a fielder or a landing point");
        end_play(state, PlayOutcome::safe());
        return;
    };

    let fielder = &mut state.fielders[idx];
    fielder.pos = step_toward(fielder.pos, landed, fielder.speed);
    if fielder.pos.distance(landed) >= fielder.radius {
        return;
    }

    let pos = fielder.pos;
    state.ball.pos = pos;
    state.ball.stop();
    field_ball(state, idx);
}

/// The designated fielder has the ball: decide how to make the play
fn field_ball(state: &mut GameState, idx: usize) {
    let fielder = &state.fielders[idx];
    let (role, pos, speed, play_type) = (fielder.role, fielder.pos, fielder.speed, fielder.play_type);
    log::debug!("{role} fields the ball");

    let Some(runner_id) = state.play.targeted_runner else {
        end_play(state, PlayOutcome::safe());
        return;
    };
    let Some(runner) = state.runner(runner_id).filter(|r| r.active) else {
        log::debug!("{runner_id} is no longer on the bases");
        end_play(state, PlayOutcome::safe());
        return;
    };
    let (runner_pos, runner_vel, next_base) = (runner.pos, runner.velocity(), runner.next_base());

    if play_type == Some(PlayType::Tag) {
        if let Some(point) = intercept_point(pos, speed, runner_pos, runner_vel) {
            log::debug!("{role} chases {runner_id} to ({:.0}, {:.0})", point.x, point.y);
            state.play.intercept_point = Some(point);
            state.play.phase = ThrowPhase::TagChase;
            return;
        }
        log::debug!("{role} cannot catch {runner_id}; throwing instead");
    }

    let Some(base) = next_base else {
        end_play(state, PlayOutcome::safe());
        return;
    };
    let cover = FielderRole::covering(base);
    state.play.throw_destination = Some(state.field.base_pos(base));
    state.play.covering_fielder = Some(cover);

    // The catcher always throws home rather than running the ball in
    if role == cover && role != FielderRole::Catcher {
        log::debug!("{role} carries the ball to {base}");
        state.play.phase = ThrowPhase::SelfCarry;
    } else {
        log::debug!("{role} throws to {cover} at {base}");
        state.play.phase = ThrowPhase::Relay;
    }
}

fn relay(state: &mut GameState) {
    let Some(dest) = state.play.throw_destination else {
        log::warn!("Relay phase without a destination");
        end_play(state, PlayOutcome::safe());
        return;
    };

    let cover = state
        .play
        .covering_fielder
        .and_then(|role| state.fielder_index(role));
    if let Some(idx) = cover {
        let fielder = &mut state.fielders[idx];
        if fielder.pos.distance(dest) > fielder.speed {
            fielder.pos = step_toward(fielder.pos, dest, fielder.speed);
        }
    }

    state.ball.aim(dest, state.settings.throw_speed);
    if state.ball.pos.distance(dest) < state.ball.speed {
        state.ball.pos = dest;
        state.ball.stop();
        resolve_at_base(state);
    }
}

fn self_carry(state: &mut GameState) {
    let (Some(idx), Some(dest)) = (holder_index(state), state.play.throw_destination) else {
        log::warn!("Carry phase without a fielder or a destination");
        end_play(state, PlayOutcome::safe());
        return;
    };

    let fielder = &mut state.fielders[idx];
    fielder.pos = step_toward(fielder.pos, dest, fielder.speed);
    let (pos, speed) = (fielder.pos, fielder.speed);
    state.ball.pos = pos;

    if pos.distance(dest) < speed {
        state.ball.stop();
        resolve_at_base(state);
    }
}

/// Ball beat the runner to the bag if the runner is still on the way
fn resolve_at_base(state: &mut GameState) {
    let target = state.play.targeted_runner;
    let runner = target
        .and_then(|id| state.runner_mut(id))
        .filter(|r| r.active && r.is_moving());

    match runner {
        Some(runner) => {
            runner.active = false;
            end_play(state, PlayOutcome::out("OUT!"));
        }
        None => end_play(state, PlayOutcome::safe()),
    }
}

fn tag_chase(state: &mut GameState) {
    let (Some(idx), Some(point)) = (holder_index(state), state.play.intercept_point) else {
        log::warn!("Tag phase without a fielder or an intercept point");
        end_play(state, PlayOutcome::safe());
        return;
    };

    let fielder = &mut state.fielders[idx];
    fielder.pos = step_toward(fielder.pos, point, fielder.speed);
    let (pos, radius) = (fielder.pos, fielder.radius);
    state.ball.pos = pos;

    if pos.distance(point) >= radius {
        return;
    }

    let target = state.play.targeted_runner;
    let tagged = target.and_then(|id| state.runner_mut(id)).filter(|r| {
        r.active && tag_reaches(pos, radius, r.pos, r.radius)
    });

    match tagged {
        Some(runner) => {
            runner.active = false;
            end_play(state, PlayOutcome::out("Tagged OUT!"));
        }
        None => end_play(state, PlayOutcome::safe()),
    }
}

fn tag_reaches(fielder: Vec2, fielder_radius: f32, runner: Vec2, runner_radius: f32) -> bool {
    fielder.distance(runner) < fielder_radius + runner_radius
}
