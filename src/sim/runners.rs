//! Base-runner advancement
//!
//! Runners move a fixed distance per step toward their next base, snap onto it
//! when they would reach it this step, and score on returning home.

use super::state::{GameEvent, GameState, PlayOutcome};
use super::tick::end_play;

/// Advance every active runner by one step
pub fn advance_runners(state: &mut GameState) {
    if !state.play.active {
        return;
    }

    if state.play.is_home_run && state.active_runners().next().is_none() {
        end_play(state, PlayOutcome::new("HOME RUN!", 3000, false));
        return;
    }

    let home_run = state.play.is_home_run;
    let field = &state.field;
    let mut scored = Vec::new();

    for runner in state.runners.iter_mut().filter(|r| r.active) {
        // Runners standing on a base only keep going on a home run
        if !runner.is_moving() {
            if !home_run {
                continue;
            }
            runner.head_for_next_base(field);
            if !runner.is_moving() {
                continue;
            }
        }

        let Some(next) = runner.next_base() else {
            continue;
        };
        let target = field.base_pos(next);

        if runner.pos.distance(target) < runner.speed {
            runner.pos = target;
            runner.stop();
            runner.path_index += 1;
            log::debug!("{} reached {}", runner.id, next);

            if runner.next_base().is_none() {
                runner.active = false;
                scored.push(runner.id);
            }
        } else {
            runner.pos += runner.velocity();
        }
    }

    for id in scored {
        state.score.runs += 1;
        log::info!("{id} scores (runs: {})", state.score.runs);
        state.emit(GameEvent::RunScored { runner: id });
    }
}
