//! Sandlot entry point
//!
//! Runs a headless autoplay game and logs the event stream.
//!
//! Usage: `sandlot [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use rand::{Rng, SeedableRng};
#[cfg(not(target_arch = "wasm32"))]
use rand_pcg::Pcg32;

#[cfg(not(target_arch = "wasm32"))]
use sandlot::Settings;
#[cfg(not(target_arch = "wasm32"))]
use sandlot::sim::{GameEvent, GameState, TickInput, tick};

/// Viewport the autoplay field is laid out for
#[cfg(not(target_arch = "wasm32"))]
const VIEW_WIDTH: f32 = 800.0;
#[cfg(not(target_arch = "wasm32"))]
const VIEW_HEIGHT: f32 = 600.0;

/// Give up after this many steps (about an hour of play at 60 steps/s)
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 216_000;

/// Simulated batter: picks a timing error for each pitch and swings when the
/// ball gets there
#[cfg(not(target_arch = "wasm32"))]
struct AutoBatter {
    rng: Pcg32,
    /// Signed offset from the plate to swing at for the current pitch
    swing_at: Option<f32>,
}

#[cfg(not(target_arch = "wasm32"))]
impl AutoBatter {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed_ba77),
            swing_at: None,
        }
    }

    /// Decide whether to swing this step
    fn input(&mut self, state: &GameState) -> TickInput {
        if state.game_over || !state.pitching {
            self.swing_at = None;
            return TickInput::default();
        }

        // A bit wider than the outermost ring, so some pitches are taken
        let reach = state.field.accuracy_rings[2] * 1.2;
        let target = *self
            .swing_at
            .get_or_insert_with(|| self.rng.random_range(-reach..reach));

        let up = state.field.up_field();
        let offset = -(state.ball.pos - state.field.home.pos).dot(up);
        if offset >= target {
            self.swing_at = None;
            TickInput { swing: true }
        } else {
            TickInput::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("Usage: sandlot [seed] [settings.json]");
                std::process::exit(2);
            }
        },
        None => seed_from_clock(),
    };
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    log::info!("Sandlot starting with seed: {seed}");
    let mut state = GameState::with_viewport(seed, VIEW_WIDTH, VIEW_HEIGHT, settings);
    state.reset_game();
    let mut batter = AutoBatter::new(seed);

    while !state.game_over && state.time_ticks < MAX_TICKS {
        let input = batter.input(&state);
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::Hit { tier } => log::debug!("Hit: {tier}"),
                GameEvent::Landed { zone, at } => {
                    log::debug!("Landed in {zone} at ({:.0}, {:.0})", at.x, at.y)
                }
                GameEvent::RunScored { runner } => log::debug!("{runner} crossed the plate"),
                GameEvent::PlayEnded(outcome) => log::debug!("Play over: {}", outcome.message),
                GameEvent::Strike { count } => log::debug!("Strike count: {count}"),
                GameEvent::PitchReady | GameEvent::Message { .. } | GameEvent::GameOver => {}
            }
        }
    }

    if !state.game_over {
        log::warn!("Stopped after {MAX_TICKS} steps without finishing the game");
    }
    println!(
        "Final score: {} runs, {} outs ({} steps, seed {})",
        state.score.runs, state.score.outs, state.time_ticks, state.seed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the product on wasm; there is no headless driver
}
