//! Data-driven game balance
//!
//! Loaded from JSON; any field left out keeps its default.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Shortest travel time accepted after sanitizing (keeps `v0 = H / t` finite)
const MIN_TRAVEL_FLOOR: f32 = 0.05;

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    /// Shortest randomized spawn-to-arrival time (seconds)
    pub min_travel_secs: f32,
    /// Longest randomized spawn-to-arrival time (seconds)
    pub max_travel_secs: f32,
    /// Minimum horizontal distance between consecutive targets' left edges
    pub min_spacing: f32,
    /// Launch velocity is `screen_height * height_multiplier / travel`
    pub height_multiplier: f32,

    // === Feedback ===
    /// Fade time of the floating score label (seconds)
    pub score_label_secs: f32,
    /// Every Nth shot also plays the ping cue (0 disables it)
    pub ping_every_shots: u32,

    // === Gun ===
    /// Follow lag; the gun closes `dt / gun_lag` of the gap each frame
    pub gun_lag: f32,
    /// Horizontal offset between the aim point and the gun anchor
    pub gun_offset_x: f32,
    /// Fixed vertical gun position
    pub gun_y: f32,
    /// Casing ejection point relative to the gun
    pub casing_offset: Vec2,

    // === Session ===
    /// Frame time to wait for a score submission before moving on
    pub submission_timeout_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_travel_secs: 1.0,
            max_travel_secs: 3.0,
            min_spacing: 120.0,
            height_multiplier: 1.8,

            score_label_secs: 0.75,
            ping_every_shots: 8,

            gun_lag: 0.1,
            gun_offset_x: 400.0,
            gun_y: -280.0,
            casing_offset: Vec2::new(-1250.0, 20.0),

            submission_timeout_secs: 10.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning.sanitized()
            }
            Err(err) => {
                log::warn!("Invalid tuning JSON ({err}), using defaults");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Repair values that would make the simulation divide by zero or run backwards
    pub fn sanitized(mut self) -> Self {
        if !self.min_travel_secs.is_finite() || !self.max_travel_secs.is_finite() {
            let defaults = Self::default();
            self.min_travel_secs = defaults.min_travel_secs;
            self.max_travel_secs = defaults.max_travel_secs;
        }
        if self.min_travel_secs > self.max_travel_secs {
            std::mem::swap(&mut self.min_travel_secs, &mut self.max_travel_secs);
        }
        self.min_travel_secs = self.min_travel_secs.max(MIN_TRAVEL_FLOOR);
        self.max_travel_secs = self.max_travel_secs.max(self.min_travel_secs);
        self.min_spacing = self.min_spacing.max(0.0);
        self.score_label_secs = self.score_label_secs.max(0.0);
        self.gun_lag = self.gun_lag.max(f32::EPSILON);
        self.submission_timeout_secs = self.submission_timeout_secs.max(0.0);
        self
    }

    /// Inclusive travel time range
    pub fn travel_range(&self) -> (f32, f32) {
        (self.min_travel_secs, self.max_travel_secs)
    }

    /// Whether the given 1-based shot count plays the ping cue
    pub fn pings_on_shot(&self, shot: u32) -> bool {
        self.ping_every_shots != 0 && shot % self.ping_every_shots == 0
    }
}
