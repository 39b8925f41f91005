//! Game state and core simulation types
//!
//! Everything one game needs lives in [`GameState`]. Cross-references between
//! entities (the fielder holding the ball, the runner being played on) are
//! identifiers into the owning collections, never copies.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::{BaseName, FieldGeometry, default_roster};
use super::swing::HitTier;
use super::timer::TimerQueue;
use super::zone::ZoneLabel;
use crate::Settings;
use crate::direction_to;

/// Stable runner identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunnerId(pub u32);

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runner #{}", self.0)
    }
}

/// How the designated fielder tries to get the out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayType {
    /// Run the runner down and tag them
    Tag,
    /// Get the ball to the base ahead of the runner
    Throw,
}

/// Throw/tag protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThrowPhase {
    /// No play in progress
    #[default]
    Idle,
    /// Designated fielder running to the ball
    Retrieve,
    /// Ball thrown to the covering fielder
    Relay,
    /// Fielder carries the ball to their own base
    SelfCarry,
    /// Fielder chasing the runner to a fixed intercept point
    TagChase,
}

impl ThrowPhase {
    pub fn index(&self) -> u8 {
        match self {
            ThrowPhase::Idle => 0,
            ThrowPhase::Retrieve => 1,
            ThrowPhase::Relay => 2,
            ThrowPhase::SelfCarry => 3,
            ThrowPhase::TagChase => 4,
        }
    }
}

/// Defensive positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FielderRole {
    Pitcher,
    Catcher,
    FirstBaseman,
    SecondBaseman,
    ThirdBaseman,
    LeftFielder,
    CenterFielder,
    RightFielder,
}

impl FielderRole {
    pub const ALL: [FielderRole; 8] = [
        FielderRole::Pitcher,
        FielderRole::Catcher,
        FielderRole::FirstBaseman,
        FielderRole::SecondBaseman,
        FielderRole::ThirdBaseman,
        FielderRole::LeftFielder,
        FielderRole::CenterFielder,
        FielderRole::RightFielder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FielderRole::Pitcher => "Pitcher",
            FielderRole::Catcher => "Catcher",
            FielderRole::FirstBaseman => "1st Baseman",
            FielderRole::SecondBaseman => "2nd Baseman",
            FielderRole::ThirdBaseman => "3rd Baseman",
            FielderRole::LeftFielder => "Left Fielder",
            FielderRole::CenterFielder => "Center Fielder",
            FielderRole::RightFielder => "Right Fielder",
        }
    }

    /// Base an infielder returns to between plays
    pub fn assigned_base(&self) -> Option<BaseName> {
        match self {
            FielderRole::FirstBaseman => Some(BaseName::First),
            FielderRole::SecondBaseman => Some(BaseName::Second),
            FielderRole::ThirdBaseman => Some(BaseName::Third),
            _ => None,
        }
    }

    /// Whether this position takes throws at `base`
    pub fn covers(&self, base: BaseName) -> bool {
        match base {
            BaseName::Home => *self == FielderRole::Catcher,
            _ => self.assigned_base() == Some(base),
        }
    }

    /// Position that takes throws at `base`
    pub fn covering(base: BaseName) -> FielderRole {
        match base {
            BaseName::Home => FielderRole::Catcher,
            BaseName::First => FielderRole::FirstBaseman,
            BaseName::Second => FielderRole::SecondBaseman,
            BaseName::Third => FielderRole::ThirdBaseman,
        }
    }
}

impl fmt::Display for FielderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base path every runner follows
pub const BASE_PATH: [BaseName; 5] = [
    BaseName::Home,
    BaseName::First,
    BaseName::Second,
    BaseName::Third,
    BaseName::Home,
];

/// A base-runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    pub id: RunnerId,
    pub pos: Vec2,
    /// Unit vector, or zero while standing on a base
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub path: Vec<BaseName>,
    /// Index into `path` of the last base reached (only ever increases)
    pub path_index: usize,
    pub active: bool,
    pub is_batter_runner: bool,
}

impl Runner {
    /// New batter-runner standing at home
    pub fn batter(id: RunnerId, field: &FieldGeometry, settings: &Settings) -> Self {
        Self {
            id,
            pos: field.home.pos,
            dir: Vec2::ZERO,
            speed: settings.runner_speed,
            radius: settings.runner_radius,
            path: BASE_PATH.to_vec(),
            path_index: 0,
            active: true,
            is_batter_runner: true,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.dir != Vec2::ZERO
    }

    pub fn velocity(&self) -> Vec2 {
        self.dir * self.speed
    }

    /// Last base reached
    pub fn current_base(&self) -> BaseName {
        self.path[self.path_index]
    }

    /// Base the runner is heading for, if any remain
    pub fn next_base(&self) -> Option<BaseName> {
        self.path.get(self.path_index + 1).copied()
    }

    /// Point the runner at its next base (stays put if the path is done)
    pub fn head_for_next_base(&mut self, field: &FieldGeometry) {
        if let Some(next) = self.next_base() {
            self.dir = direction_to(self.pos, field.base_pos(next));
        }
    }

    pub fn stop(&mut self) {
        self.dir = Vec2::ZERO;
    }
}

/// A defender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fielder {
    pub role: FielderRole,
    pub pos: Vec2,
    /// Where the fielder stands when a pitch starts
    pub rest_pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Set only on the designated fielder during a play
    pub play_type: Option<PlayType>,
}

impl Fielder {
    pub fn new(role: FielderRole, pos: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            role,
            pos,
            rest_pos: pos,
            speed,
            radius,
            play_type: None,
        }
    }

    pub fn return_to_rest(&mut self) {
        self.pos = self.rest_pos;
        self.play_type = None;
    }
}

/// The baseball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub dir: Vec2,
    /// Zero while held or at rest
    pub speed: f32,
    pub radius: f32,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            dir: Vec2::ZERO,
            speed: 0.0,
            radius,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.speed > 0.0
    }

    /// Move one step along the current direction
    pub fn advance(&mut self) {
        if self.in_flight() {
            self.pos += self.dir * self.speed;
        }
    }

    /// Send the ball toward `target` at `speed`
    pub fn aim(&mut self, target: Vec2, speed: f32) {
        self.dir = direction_to(self.pos, target);
        self.speed = speed;
    }

    pub fn stop(&mut self) {
        self.speed = 0.0;
    }
}

/// Shared coordination state of the play in progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayState {
    pub active: bool,
    pub ball_landed_position: Option<Vec2>,
    pub is_home_run: bool,
    pub phase: ThrowPhase,
    pub fielder_holding_ball: Option<FielderRole>,
    pub targeted_runner: Option<RunnerId>,
    /// Fielder taking the throw at the destination base
    pub covering_fielder: Option<FielderRole>,
    pub throw_destination: Option<Vec2>,
    pub intercept_point: Option<Vec2>,
}

impl PlayState {
    /// Drop everything left over from the previous play
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// Runs, strikes and outs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub runs: u32,
    pub strikes: u32,
    pub outs: u32,
    /// Label of the most recent swing or play result
    pub last_result: String,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            runs: 0,
            strikes: 0,
            outs: 0,
            last_result: "N/A".to_string(),
        }
    }
}

/// Batted ball in the air
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallFlight {
    /// Where the ball was hit
    pub start: Vec2,
    /// Distance it will carry before landing
    pub distance: f32,
}

/// Verdict of a finished play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub message: String,
    pub duration_ms: u32,
    /// Whether the play recorded an out
    pub new_out: bool,
}

impl PlayOutcome {
    pub fn new(message: &str, duration_ms: u32, new_out: bool) -> Self {
        Self {
            message: message.to_string(),
            duration_ms,
            new_out,
        }
    }

    pub fn out(message: &str) -> Self {
        Self::new(message, 2000, true)
    }

    pub fn safe() -> Self {
        Self::new("Safe!", 2000, false)
    }
}

/// Events produced for the display layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new pitch is on its way
    PitchReady,
    Hit { tier: HitTier },
    Landed { zone: ZoneLabel, at: Vec2 },
    RunScored { runner: RunnerId },
    Strike { count: u32 },
    PlayEnded(PlayOutcome),
    /// Message to show for `duration_ms`
    Message { text: String, duration_ms: u32 },
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub field: FieldGeometry,
    /// Roster in a fixed order (also the play selector's tie-break order)
    pub fielders: Vec<Fielder>,
    pub runners: Vec<Runner>,
    pub ball: Ball,
    pub play: PlayState,
    pub score: Scoreboard,
    /// A pitch is live and the batter may swing
    pub pitching: bool,
    pub flight: Option<BallFlight>,
    pub game_over: bool,
    /// Zone of the last landed ball, for display
    pub last_zone: Option<ZoneLabel>,
    pub timers: TimerQueue,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation step counter
    pub time_ticks: u64,
    rng: Pcg32,
    events: Vec<GameEvent>,
    next_runner_id: u32,
}

impl GameState {
    /// Create a game on an explicit field and roster. The first pitch is
    /// already on its way.
    pub fn new(seed: u64, field: FieldGeometry, fielders: Vec<Fielder>, settings: Settings) -> Self {
        let ball = Ball::new(settings.ball_radius);
        let mut state = Self {
            settings,
            field,
            fielders,
            runners: Vec::new(),
            ball,
            play: PlayState::default(),
            score: Scoreboard::default(),
            pitching: false,
            flight: None,
            game_over: false,
            last_zone: None,
            timers: TimerQueue::new(),
            seed,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_runner_id: 1,
        };
        state.reset_pitch();
        state
    }

    /// Create a game laid out for a viewport with the default roster
    pub fn with_viewport(seed: u64, width: f32, height: f32, settings: Settings) -> Self {
        let field = FieldGeometry::from_viewport(width, height);
        let fielders = default_roster(&field, &settings);
        Self::new(seed, field, fielders, settings)
    }

    /// Viewport changed: lay the field out again. Between plays the pitch is
    /// restarted on the new layout.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field = FieldGeometry::from_viewport(width, height);
        self.fielders = default_roster(&self.field, &self.settings);
        if !self.pitching && !self.play.active && !self.game_over {
            self.reset_pitch();
        }
    }

    /// Allocate a new runner ID
    pub fn next_runner_id(&mut self) -> RunnerId {
        let id = RunnerId(self.next_runner_id);
        self.next_runner_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn fielder_index(&self, role: FielderRole) -> Option<usize> {
        self.fielders.iter().position(|f| f.role == role)
    }

    pub fn fielder(&self, role: FielderRole) -> Option<&Fielder> {
        self.fielders.iter().find(|f| f.role == role)
    }

    pub fn fielder_mut(&mut self, role: FielderRole) -> Option<&mut Fielder> {
        self.fielders.iter_mut().find(|f| f.role == role)
    }

    pub fn runner(&self, id: RunnerId) -> Option<&Runner> {
        self.runners.iter().find(|r| r.id == id)
    }

    pub fn runner_mut(&mut self, id: RunnerId) -> Option<&mut Runner> {
        self.runners.iter_mut().find(|r| r.id == id)
    }

    pub fn active_runners(&self) -> impl Iterator<Item = &Runner> {
        self.runners.iter().filter(|r| r.active)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue a message for the display layer
    pub fn show_message(&mut self, text: &str, duration_ms: u32) {
        log::info!("{text}");
        self.emit(GameEvent::Message {
            text: text.to_string(),
            duration_ms,
        });
    }

    /// Put every active runner back on the last base it reached
    pub fn snap_runners_to_bases(&mut self) {
        for runner in self.runners.iter_mut().filter(|r| r.active) {
            runner.pos = self.field.base_pos(runner.current_base());
            runner.stop();
        }
    }

    /// Set up the next pitch: ball on the mound aimed at the catcher, fielders
    /// back in position, play state cleared
    pub fn reset_pitch(&mut self) {
        self.ball.pos = self.field.pitch;
        self.ball.stop();
        if let Some(catcher) = self.fielder(FielderRole::Catcher) {
            let target = catcher.rest_pos;
            self.ball.aim(target, self.settings.pitch_speed);
        } else {
            log::warn!("No catcher on the roster; pitch thrown at home plate");
            self.ball.aim(self.field.home.pos, self.settings.pitch_speed);
        }

        for fielder in &mut self.fielders {
            fielder.return_to_rest();
        }
        self.runners.retain(|r| r.active);
        for runner in &mut self.runners {
            runner.is_batter_runner = false;
        }

        self.play.clear();
        self.pitching = true;
        self.flight = None;
        self.last_zone = None;
        self.emit(GameEvent::PitchReady);
    }

    /// Start over: empty bases, zero score
    pub fn reset_game(&mut self) {
        log::info!("New game (seed {})", self.seed);
        self.score = Scoreboard::default();
        self.game_over = false;
        self.runners.clear();
        self.timers.clear();
        self.reset_pitch();
        self.show_message("Game Started! Click to hit.", 2000);
    }
}
