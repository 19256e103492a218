//! ReAim - A music-synchronized target shooting game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (spawning, target physics, scoring, effects)
//! - `session`: Per-attempt play/pause/completion state machine
//! - `level`: Tap-event analysis for a level
//! - `tuning`: Data-driven game balance
//! - `assets`, `audio`: Collaborator interfaces for visuals and music playback
//! - `highscores`: Per-level leaderboard

pub mod assets;
pub mod audio;
pub mod highscores;
pub mod level;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, LocalScoreBoard};
pub use level::{Level, LevelAnalysis, LevelMeta, TapEvent};
pub use session::{Session, SessionExit, SessionInput, SessionPhase};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Gravity applied to targets (pixels/s², negative pulls down)
    pub const GRAVITY: f32 = -350.0;
    /// Targets launch from the bottom edge
    pub const TARGET_START_Y: f32 = 0.0;
    /// Target sprites are drawn (and hit-tested) at this scale
    pub const TARGET_SCALE: f32 = 0.3;
    /// Target side length when the target visual cannot be loaded
    pub const FALLBACK_TARGET_SIZE: f32 = 64.0;

    /// Horizontal position draws before spacing is given up on
    pub const SPAWN_ATTEMPTS: u32 = 10;

    /// Every flipbook in the game runs at 10 fps
    pub const FLIPBOOK_FRAME_SECS: f32 = 0.1;
    /// Gun, casing and destruction flipbooks all have four frames
    pub const FLIPBOOK_FRAMES: usize = 4;
}

/// Linear interpolation from `a` toward `b`; `t` is clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
