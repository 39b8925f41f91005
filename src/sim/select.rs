//! Play selection: which fielder goes for the ball, and what the fielder does with it
//!
//! Every (moving runner, eligible fielder) pair is scored for a tag play and a
//! throw play; the cheapest candidate overall wins. Costs are in steps.

use glam::Vec2;

use super::field::{BaseName, FieldGeometry};
use super::pursuit::intercept_time;
use super::state::{Fielder, FielderRole, GameState, PlayType, Runner, RunnerId, ThrowPhase};

/// Outcome of play selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayChoice {
    /// Nobody to play on: the closest fielder just picks the ball up
    Retrieve { fielder: FielderRole },
    /// Go after `runner`
    Play {
        fielder: FielderRole,
        runner: RunnerId,
        play_type: PlayType,
        /// Estimated steps until the out
        cost: f32,
    },
}

impl PlayChoice {
    pub fn fielder(&self) -> FielderRole {
        match self {
            PlayChoice::Retrieve { fielder } | PlayChoice::Play { fielder, .. } => *fielder,
        }
    }
}

/// The catcher only leaves home for plays at the plate
fn is_eligible(fielder: &Fielder, next_base: BaseName) -> bool {
    fielder.role != FielderRole::Catcher || next_base == BaseName::Home
}

/// Closest fielder to `point` (first in roster order on ties)
pub fn closest_fielder(fielders: &[Fielder], point: Vec2) -> Option<FielderRole> {
    let mut best: Option<(FielderRole, f32)> = None;
    for fielder in fielders {
        let dist = fielder.pos.distance(point);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((fielder.role, dist));
        }
    }
    best.map(|(role, _)| role)
}

/// Pick the fastest play against the runners on the move.
///
/// Returns `None` only for an empty roster.
pub fn select_play(
    runners: &[Runner],
    fielders: &[Fielder],
    landed: Vec2,
    field: &FieldGeometry,
    throw_speed: f32,
) -> Option<PlayChoice> {
    let retrieve = || closest_fielder(fielders, landed).map(|fielder| PlayChoice::Retrieve { fielder });

    let moving: Vec<&Runner> = runners.iter().filter(|r| r.active && r.is_moving()).collect();
    if moving.is_empty() {
        return retrieve();
    }

    let mut best: Option<(PlayChoice, f32)> = None;
    let mut consider = |choice: PlayChoice, cost: f32| {
        if best.is_none_or(|(_, c)| cost < c) {
            best = Some((choice, cost));
        }
    };

    for runner in moving {
        let Some(next_base) = runner.next_base() else {
            continue;
        };
        let base_pos = field.base_pos(next_base);
        let runner_time = runner.pos.distance(base_pos) / runner.speed;
        let throw_time = landed.distance(base_pos) / throw_speed;

        for fielder in fielders.iter().filter(|f| is_eligible(f, next_base)) {
            let to_ball = fielder.pos.distance(landed) / fielder.speed;

            // Tag: after fielding, can the fielder run the runner down before the bag?
            let chase = intercept_time(landed, fielder.speed, runner.pos, runner.velocity());
            if chase < runner_time {
                let cost = to_ball + chase;
                consider(
                    PlayChoice::Play {
                        fielder: fielder.role,
                        runner: runner.id,
                        play_type: PlayType::Tag,
                        cost,
                    },
                    cost,
                );
            }

            let cost = to_ball + throw_time;
            consider(
                PlayChoice::Play {
                    fielder: fielder.role,
                    runner: runner.id,
                    play_type: PlayType::Throw,
                    cost,
                },
                cost,
            );
        }
    }

    match best {
        Some((choice, _)) => Some(choice),
        None => {
            log::debug!("No play candidate; falling back to retrieval");
            retrieve()
        }
    }
}

/// Run selection for a ball that landed in play and start the retrieve phase
pub fn assign_play(state: &mut GameState, landed: Vec2) {
    let choice = select_play(
        &state.runners,
        &state.fielders,
        landed,
        &state.field,
        state.settings.throw_speed,
    );
    let Some(choice) = choice else {
        log::warn!("Empty roster; nobody can field the ball");
        return;
    };

    match choice {
        PlayChoice::Retrieve { fielder } => {
            log::debug!("{fielder} retrieves the ball, no play");
            state.play.targeted_runner = None;
        }
        PlayChoice::Play {
            fielder,
            runner,
            play_type,
            cost,
        } => {
            log::debug!("{fielder} plays {play_type:?} on {runner} (est. {cost:.2} steps)");
            state.play.targeted_runner = Some(runner);
            if let Some(f) = state.fielder_mut(fielder) {
                f.play_type = Some(play_type);
            }
        }
    }
    state.play.fielder_holding_ball = Some(choice.fielder());
    state.play.phase = ThrowPhase::Retrieve;
}
