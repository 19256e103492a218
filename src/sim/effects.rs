//! Short-lived visual entities: gun recoil, ejected casings, score labels
//!
//! Each instance owns its clock. Nothing here is shared between instances,
//! so a new shot never restarts another casing's animation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::flipbook::Flipbook;
use super::scoring::ScoreTier;
use crate::lerp;
use crate::tuning::Tuning;

/// Gun visual state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GunState {
    /// Static first frame
    Idle,
    /// Firing flipbook in progress
    Firing { elapsed: f32 },
}

/// The player's gun
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gun {
    pub pos: Vec2,
    pub state: GunState,
}

impl Gun {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            state: GunState::Idle,
        }
    }

    /// Enter (or restart) the firing flipbook
    pub fn fire(&mut self) {
        self.state = GunState::Firing { elapsed: 0.0 };
    }

    /// Advance the firing flipbook, dropping back to idle when it ends
    pub fn update(&mut self, dt: f32, book: &Flipbook) {
        if let GunState::Firing { elapsed } = &mut self.state {
            *elapsed += dt;
            if book.is_finished(*elapsed) {
                self.state = GunState::Idle;
            }
        }
    }

    /// Ease toward the aim point with the configured lag
    pub fn follow(&mut self, aim_x: f32, dt: f32, tuning: &Tuning) {
        let target_x = aim_x + tuning.gun_offset_x;
        self.pos.x = lerp(self.pos.x, target_x, dt / tuning.gun_lag);
        self.pos.y = tuning.gun_y;
    }

    #[inline]
    pub fn is_firing(&self) -> bool {
        matches!(self.state, GunState::Firing { .. })
    }

    pub fn frame(&self, book: &Flipbook) -> usize {
        match self.state {
            GunState::Idle => 0,
            GunState::Firing { elapsed } => book.frame_at(elapsed),
        }
    }
}

/// An ejected shell casing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Casing {
    pub pos: Vec2,
    pub elapsed: f32,
}

impl Casing {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, elapsed: 0.0 }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn is_finished(&self, book: &Flipbook) -> bool {
        book.is_finished(self.elapsed)
    }

    pub fn frame(&self, book: &Flipbook) -> usize {
        book.frame_at(self.elapsed)
    }
}

/// Floating score label fading out over its lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLabel {
    /// Center of the label
    pub pos: Vec2,
    pub tier: ScoreTier,
    pub elapsed: f32,
    pub lifetime: f32,
}

impl ScoreLabel {
    pub fn new(pos: Vec2, tier: ScoreTier, lifetime: f32) -> Self {
        Self {
            pos,
            tier,
            elapsed: 0.0,
            lifetime,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Linear fade from 1 to 0
    pub fn alpha(&self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        (1.0 - self.elapsed / self.lifetime).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.lifetime
    }
}
