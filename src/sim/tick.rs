//! Fixed timestep simulation tick
//!
//! One call advances the game by one step in a fixed order: swing input, ball
//! motion and strike detection, landing, runners, fielders, then due timers.

use glam::Vec2;

use super::runners::advance_runners;
use super::select::assign_play;
use super::state::{FielderRole, GameEvent, GameState, PlayOutcome};
use super::swing::swing;
use super::throw::advance_fielders;
use super::timer::TimerEvent;
use super::zone::{ZoneLabel, classify};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Swing (click/tap/space); restarts the game once it is over
    pub swing: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if input.swing {
        if state.game_over {
            state.reset_game();
        } else if state.pitching {
            swing(state);
        }
    }

    state.ball.advance();
    if state.pitching {
        check_strike(state);
    } else if let Some(flight) = state.flight {
        if state.ball.pos.distance(flight.start) >= flight.distance {
            let at = state.ball.pos;
            land_ball(state, at);
        }
    }

    advance_runners(state);
    advance_fielders(state);
    fire_timers(state);
}

/// The pitch got past the catcher without a swing
fn check_strike(state: &mut GameState) {
    let catcher = state
        .fielder(FielderRole::Catcher)
        .map(|c| c.pos)
        .unwrap_or(state.field.home.pos);
    if (state.ball.pos - catcher).dot(state.ball.dir) <= 0.0 {
        return;
    }

    state.pitching = false;
    state.ball.stop();
    state.score.strikes += 1;
    state.score.last_result = "Strike!".to_string();
    let count = state.score.strikes;
    state.emit(GameEvent::Strike { count });

    let duration_ms = if count >= state.settings.strikes_per_out {
        state.score.outs += 1;
        state.score.strikes = 0;
        state.score.last_result = "Strikeout!".to_string();
        if state.score.outs >= state.settings.outs_per_game {
            game_over(state);
            return;
        }
        state.show_message("Strikeout! Out!", 2000);
        2000
    } else {
        state.show_message(&format!("Strike {count}!"), 1500);
        1500
    };

    let delay = state.settings.steps_for(duration_ms);
    state.timers.schedule(TimerEvent::ResetPitch, state.time_ticks, delay);
}

/// Batted ball comes down at `at`
pub fn land_ball(state: &mut GameState, at: Vec2) {
    state.ball.pos = at;
    state.ball.stop();
    state.flight = None;
    state.play.ball_landed_position = Some(at);

    let zone = classify(at, &state.field);
    state.last_zone = Some(zone);
    log::info!("Ball landed: {zone} at ({:.0}, {:.0})", at.x, at.y);
    state.emit(GameEvent::Landed { zone, at });

    match zone {
        ZoneLabel::HomeRun => {
            state.play.is_home_run = true;
        }
        ZoneLabel::Foul => {
            // A foul never strikes the batter out
            if state.score.strikes + 1 < state.settings.strikes_per_out {
                state.score.strikes += 1;
            }
            // The batter bats again; only runners already on base stay
            for runner in state.runners.iter_mut().filter(|r| r.is_batter_runner) {
                runner.active = false;
            }
            end_play(state, PlayOutcome::new("Foul Ball!", 2000, false));
        }
        _ => assign_play(state, at),
    }
}

/// Finish the play in progress and schedule its announcement
pub fn end_play(state: &mut GameState, outcome: PlayOutcome) {
    let holder = state.play.fielder_holding_ball;
    if let Some(fielder) = holder.and_then(|role| state.fielder_mut(role)) {
        fielder.play_type = None;
    }

    state.play.clear();

    if outcome.new_out {
        state.score.outs += 1;
        state.score.strikes = 0;
    }
    state.score.last_result = outcome.message.clone();
    state.snap_runners_to_bases();

    log::info!(
        "{} (runs {}, outs {})",
        outcome.message,
        state.score.runs,
        state.score.outs
    );
    state.emit(GameEvent::PlayEnded(outcome.clone()));

    let delay = state.settings.steps_for(state.settings.result_delay_ms);
    state
        .timers
        .schedule(TimerEvent::Announce(outcome), state.time_ticks, delay);
}

fn game_over(state: &mut GameState) {
    state.game_over = true;
    state.pitching = false;
    state.show_message("Game Over! Click to Restart.", 3000);
    state.emit(GameEvent::GameOver);
}

fn fire_timers(state: &mut GameState) {
    for event in state.timers.take_due(state.time_ticks) {
        match event {
            TimerEvent::Announce(outcome) => {
                if state.score.outs >= state.settings.outs_per_game {
                    game_over(state);
                } else {
                    state.show_message(&outcome.message, outcome.duration_ms);
                    let delay = state.settings.steps_for(outcome.duration_ms);
                    state
                        .timers
                        .schedule(TimerEvent::ResetPitch, state.time_ticks, delay);
                }
            }
            TimerEvent::ResetPitch => {
                if !state.game_over {
                    state.reset_pitch();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::field::{BaseName, FieldGeometry};
    use crate::sim::state::{BASE_PATH, Fielder, PlayType, Runner, RunnerId, ThrowPhase};
    use crate::sim::swing::HitTier;
    use crate::sim::timer::TimerCategory;

    fn viewport_game(seed: u64) -> GameState {
        let mut state = GameState::with_viewport(seed, 800.0, 600.0, Settings::default());
        state.drain_events();
        state
    }

    /// Small diamond with the right fielder shallow behind first and one
    /// runner `runner_offset` short of first
    fn play_game(runner_offset: f32, runner_speed: f32) -> (GameState, RunnerId) {
        let field = FieldGeometry::new(
            Vec2::new(200.0, 400.0),
            Vec2::new(300.0, 300.0),
            Vec2::new(200.0, 200.0),
            Vec2::new(100.0, 300.0),
            12.0,
        );
        let fielders = vec![
            Fielder::new(FielderRole::Pitcher, Vec2::new(200.0, 300.0), 4.0, 12.0),
            Fielder::new(FielderRole::FirstBaseman, Vec2::new(300.0, 300.0), 4.0, 12.0),
            Fielder::new(FielderRole::RightFielder, Vec2::new(300.0, 235.0), 4.0, 12.0),
        ];
        let mut state = GameState::new(11, field, fielders, Settings::default());
        state.pitching = false;
        state.ball.stop();
        state.play.active = true;

        let d = (state.field.first.pos - state.field.home.pos).normalize();
        let id = state.next_runner_id();
        let mut runner = Runner {
            id,
            pos: state.field.first.pos - d * runner_offset,
            dir: Vec2::ZERO,
            speed: runner_speed,
            radius: 12.0,
            path: BASE_PATH.to_vec(),
            path_index: 0,
            active: true,
            is_batter_runner: true,
        };
        runner.head_for_next_base(&state.field);
        state.runners.push(runner);
        state.drain_events();
        (state, id)
    }

    /// Tick until a play verdict comes out
    fn run_to_verdict(state: &mut GameState, max_ticks: usize) -> Option<PlayOutcome> {
        for _ in 0..max_ticks {
            tick(state, &TickInput::default());
            for event in state.drain_events() {
                if let GameEvent::PlayEnded(outcome) = event {
                    return Some(outcome);
                }
            }
        }
        None
    }

    fn messages(events: &[GameEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Message { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Tick until the pitch is over the plate, then swing
    fn swing_on_time(state: &mut GameState) {
        for _ in 0..300 {
            if state.ball.pos.distance(state.field.home.pos) < state.field.home.radius {
                tick(state, &TickInput { swing: true });
                return;
            }
            tick(state, &TickInput::default());
        }
        panic!("pitch never reached the plate");
    }

    #[test]
    fn test_throw_loses_race_to_first() {
        let (mut state, id) = play_game(40.0, 5.0);
        land_ball(&mut state, Vec2::new(300.0, 240.0));
        assert_eq!(state.last_zone, Some(ZoneLabel::RightField));
        assert_eq!(state.play.targeted_runner, Some(id));
        assert_eq!(
            state.play.fielder_holding_ball,
            Some(FielderRole::RightFielder)
        );

        let outcome = run_to_verdict(&mut state, 100).unwrap();
        assert_eq!(outcome.message, "Safe!");
        assert!(!outcome.new_out);
        assert_eq!(state.score.outs, 0);

        let runner = state.runner(id).unwrap();
        assert!(runner.active);
        assert_eq!(runner.pos, state.field.first.pos);
        assert_eq!(runner.current_base(), BaseName::First);
    }

    #[test]
    fn test_throw_beats_slow_runner() {
        let (mut state, id) = play_game(80.0, 3.0);
        state.score.strikes = 2;
        land_ball(&mut state, Vec2::new(300.0, 240.0));

        let outcome = run_to_verdict(&mut state, 100).unwrap();
        assert_eq!(outcome.message, "OUT!");
        assert!(outcome.new_out);
        assert_eq!(state.score.outs, 1);
        assert_eq!(state.score.strikes, 0);
        assert_eq!(state.score.last_result, "OUT!");
        assert!(!state.runner(id).unwrap().active);
        assert!(state.play.targeted_runner.is_none());
        assert!(state.fielders.iter().all(|f| f.play_type.is_none()));
    }

    #[test]
    fn test_verdict_announced_then_next_pitch() {
        let (mut state, _) = play_game(80.0, 3.0);
        land_ball(&mut state, Vec2::new(300.0, 240.0));
        run_to_verdict(&mut state, 100).unwrap();
        assert!(state.timers.is_pending(TimerCategory::Announce));

        let delay = state.settings.steps_for(state.settings.result_delay_ms);
        for _ in 0..delay {
            tick(&mut state, &TickInput::default());
        }
        let events = state.drain_events();
        assert_eq!(messages(&events), vec!["OUT!"]);
        assert!(state.timers.is_pending(TimerCategory::Resume));
        assert!(!state.pitching);

        for _ in 0..state.settings.steps_for(2000) {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.pitching);
        assert!(state.drain_events().contains(&GameEvent::PitchReady));
        // Retired runner is gone for the next pitch
        assert!(state.runners.is_empty());
    }

    #[test]
    fn test_third_out_ends_game() {
        let (mut state, _) = play_game(80.0, 3.0);
        state.score.outs = 2;
        land_ball(&mut state, Vec2::new(300.0, 240.0));
        run_to_verdict(&mut state, 100).unwrap();

        let mut events = Vec::new();
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
            events.extend(state.drain_events());
        }
        assert!(state.game_over);
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(messages(&events), vec!["Game Over! Click to Restart."]);

        // Nothing restarts the pitch on its own
        for _ in 0..500 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.pitching);

        tick(&mut state, &TickInput { swing: true });
        assert!(!state.game_over);
        assert!(state.pitching);
        assert_eq!(state.score.outs, 0);
    }

    #[test]
    fn test_foul_adds_strike_below_two() {
        let mut state = viewport_game(1);
        state.pitching = false;
        state.play.active = true;
        land_ball(&mut state, Vec2::new(0.0, 300.0));

        assert_eq!(state.last_zone, Some(ZoneLabel::Foul));
        assert_eq!(state.score.strikes, 1);
        assert!(!state.play.active);
        assert_eq!(state.score.last_result, "Foul Ball!");

        state.play.active = true;
        state.score.strikes = 2;
        land_ball(&mut state, Vec2::new(800.0, 300.0));
        assert_eq!(state.score.strikes, 2);
        assert_eq!(state.score.outs, 0);
    }

    #[test]
    fn test_foul_sends_batter_back_to_bat() {
        let mut state = viewport_game(8);
        swing_on_time(&mut state);
        assert_eq!(state.runners.len(), 1);
        land_ball(&mut state, Vec2::new(0.0, 300.0));
        assert_eq!(state.last_zone, Some(ZoneLabel::Foul));
        assert!(state.active_runners().next().is_none());

        for _ in 0..1000 {
            if state.pitching {
                break;
            }
            tick(&mut state, &TickInput::default());
        }
        assert!(state.pitching);
        assert!(state.runners.is_empty());

        swing_on_time(&mut state);
        let leaving_home = state
            .active_runners()
            .filter(|r| r.path_index == 0 && r.is_moving())
            .count();
        assert_eq!(leaving_home, 1);
    }

    #[test]
    fn test_end_play_clears_play_state() {
        let mut state = viewport_game(9);
        state.pitching = false;
        state.play.active = true;
        state.play.ball_landed_position = Some(Vec2::new(1.0, 1.0));
        state.play.fielder_holding_ball = Some(FielderRole::Pitcher);
        state.play.phase = ThrowPhase::Relay;
        state.fielder_mut(FielderRole::Pitcher).unwrap().play_type = Some(PlayType::Throw);

        end_play(&mut state, PlayOutcome::safe());
        assert!(state.play.is_clear());
        assert!(state.fielders.iter().all(|f| f.play_type.is_none()));
    }

    #[test]
    fn test_called_strike() {
        let mut state = viewport_game(2);
        let mut strike = None;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default());
            let events = state.drain_events();
            if events.contains(&GameEvent::Strike { count: 1 }) {
                strike = Some(events);
                break;
            }
        }
        let events = strike.unwrap();
        assert_eq!(messages(&events), vec!["Strike 1!"]);
        assert!(!state.pitching);
        assert_eq!(state.score.strikes, 1);
        assert_eq!(state.score.last_result, "Strike!");

        // Too late to swing
        tick(&mut state, &TickInput { swing: true });
        assert!(state.runners.is_empty());

        for _ in 0..state.settings.steps_for(1500) {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.pitching);
        assert!(state.ball.pos.distance(state.field.pitch) < 10.0);
    }

    #[test]
    fn test_strikeout_with_two_outs_ends_game() {
        let mut state = viewport_game(3);
        state.score.strikes = 2;
        state.score.outs = 2;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default());
            if state.game_over {
                break;
            }
        }
        assert!(state.game_over);
        assert_eq!(state.score.outs, 3);
        assert_eq!(state.score.strikes, 0);
        assert_eq!(state.score.last_result, "Strikeout!");
        assert!(state.drain_events().contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_perfect_swing_through_tick() {
        let mut state = viewport_game(4);
        swing_on_time(&mut state);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Hit {
            tier: HitTier::Perfect
        }));
        assert!(state.play.active);
        assert!(!state.pitching);
        assert_eq!(state.runners.len(), 1);
    }

    #[test]
    fn test_home_run_clears_the_bases() {
        let mut state = viewport_game(5);
        swing_on_time(&mut state);
        state.flight.as_mut().unwrap().distance = 1500.0;

        let outcome = run_to_verdict(&mut state, 2000).unwrap();
        assert_eq!(state.last_zone, Some(ZoneLabel::HomeRun));
        assert_eq!(outcome.message, "HOME RUN!");
        assert_eq!(outcome.duration_ms, 3000);
        assert_eq!(state.score.runs, 1);
        assert_eq!(state.score.outs, 0);
        assert!(!state.play.is_home_run);
        assert!(state.runners.iter().all(|r| !r.active));
    }

    #[test]
    fn test_end_play_replaces_pending_announcement() {
        let mut state = viewport_game(6);
        state.play.active = true;
        end_play(&mut state, PlayOutcome::safe());
        state.play.active = true;
        end_play(&mut state, PlayOutcome::out("OUT!"));

        let delay = state.settings.steps_for(state.settings.result_delay_ms);
        for _ in 0..delay {
            tick(&mut state, &TickInput::default());
        }
        let events = state.drain_events();
        assert_eq!(messages(&events), vec!["OUT!"]);
    }

    #[test]
    fn test_new_game_drops_pending_timers() {
        let mut state = viewport_game(7);
        state.play.active = true;
        end_play(&mut state, PlayOutcome::safe());
        state.reset_game();
        assert!(state.timers.is_empty());
        assert!(state.pitching);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed and inputs should produce identical results
        let mut a = viewport_game(99999);
        let mut b = viewport_game(99999);
        swing_on_time(&mut a);
        swing_on_time(&mut b);
        for _ in 0..400 {
            tick(&mut a, &TickInput::default());
            tick(&mut b, &TickInput::default());
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.last_zone, b.last_zone);
        let positions = |s: &GameState| s.runners.iter().map(|r| r.pos).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.drain_events(), b.drain_events());
    }
}
