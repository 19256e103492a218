//! Music-synchronized spawn scheduling
//!
//! Each tap event gets a random travel time `t`. The target for that event is
//! launched at `tap.time - t` with an upward velocity scaled by `1 / t`, so
//! quicker travel means a harder throw. Gravity is applied afterwards by the
//! target itself; the launch velocity does not solve the ballistic arc.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::context::SimContext;
use crate::consts::{SPAWN_ATTEMPTS, TARGET_START_Y};
use crate::level::LevelAnalysis;

/// Scheduler progress through the tap events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnCursor {
    /// Index of the next unconsumed tap event
    pub next_index: usize,
    /// Track time seen by the scheduler (seconds)
    pub elapsed: f32,
    /// Left edge of the most recent spawn
    pub last_x: Option<f32>,
}

/// A launch decided by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    /// Which tap event this target belongs to
    pub tap_index: usize,
    pub tap_time: f32,
    pub travel_secs: f32,
    /// Left edge
    pub x: f32,
    pub y: f32,
    pub vel_y: f32,
}

/// Converts tap events into timed launches
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    analysis: Option<LevelAnalysis>,
    cursor: SpawnCursor,
    /// Travel time drawn for the event at `cursor.next_index`
    pending_travel: Option<f32>,
}

impl SpawnScheduler {
    pub fn new(analysis: Option<LevelAnalysis>) -> Self {
        Self {
            analysis,
            cursor: SpawnCursor::default(),
            pending_travel: None,
        }
    }

    /// Rewind to the start of the level
    pub fn reset(&mut self) {
        self.cursor = SpawnCursor::default();
        self.pending_travel = None;
    }

    pub fn cursor(&self) -> &SpawnCursor {
        &self.cursor
    }

    /// Tap events not yet spawned
    pub fn remaining(&self) -> usize {
        self.analysis
            .as_ref()
            .map_or(0, |a| a.len().saturating_sub(self.cursor.next_index))
    }

    /// True once every tap event has spawned (or there were none)
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Advance by one frame, appending any launches that are due to `out`.
    ///
    /// Inert while the track is not playing or there is no analysis.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        audio_playing: bool,
        ctx: &SimContext,
        rng: &mut R,
        out: &mut Vec<Spawn>,
    ) {
        let Some(analysis) = self.analysis.as_ref() else {
            return;
        };
        if !audio_playing {
            return;
        }

        self.cursor.elapsed += dt;

        let (min_travel, max_travel) = ctx.tuning.travel_range();
        while let Some(tap) = analysis.tap_events().get(self.cursor.next_index) {
            let travel = *self
                .pending_travel
                .get_or_insert_with(|| rng.random_range(min_travel..=max_travel));

            // Events are time-ordered; nothing later can be due yet
            if self.cursor.elapsed < tap.time - travel {
                break;
            }

            let x = pick_spawn_x(ctx, self.cursor.last_x, rng);
            let vel_y = ctx.screen.y * ctx.tuning.height_multiplier / travel;

            log::debug!(
                "Spawned target for tap {:.3}s (elapsed: {:.3}, travel: {:.3}, vel_y: {:.1})",
                tap.time,
                self.cursor.elapsed,
                travel,
                vel_y
            );

            out.push(Spawn {
                tap_index: self.cursor.next_index,
                tap_time: tap.time,
                travel_secs: travel,
                x,
                y: TARGET_START_Y,
                vel_y,
            });

            self.cursor.last_x = Some(x);
            self.cursor.next_index += 1;
            self.pending_travel = None;
        }
    }
}

/// Draw a left edge, retrying to keep clear of the previous spawn.
///
/// Spacing is best-effort: after the attempt budget the last draw is kept.
fn pick_spawn_x<R: Rng + ?Sized>(ctx: &SimContext, last_x: Option<f32>, rng: &mut R) -> f32 {
    let max_x = ctx.max_spawn_x();
    let min_spacing = ctx.tuning.min_spacing;
    let mut x = 0.0;

    for _ in 0..SPAWN_ATTEMPTS {
        x = if max_x > 0.0 {
            rng.random_range(0.0..=max_x)
        } else {
            0.0
        };

        let spaced = match last_x {
            None => true,
            // Too narrow to ever satisfy spacing
            Some(_) if max_x < min_spacing => true,
            Some(last) => (x - last).abs() >= min_spacing,
        };
        if spaced {
            break;
        }
    }
    x
}
