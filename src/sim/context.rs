//! Explicit simulation context
//!
//! Everything the spawner, scoring and effects need that is not per-entity
//! state: balance values, flipbook definitions, target size and the screen.

use glam::Vec2;

use super::flipbook::Flipbook;
use crate::assets::{self, AssetSource, Visual};
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct SimContext {
    pub tuning: Tuning,
    /// Visible play area in pixels (origin bottom-left, y up)
    pub screen: Vec2,
    /// Pre-scaled target bounding size
    pub target_size: Vec2,
    pub gun: Flipbook,
    pub casing: Flipbook,
    pub destruction: Flipbook,
}

impl SimContext {
    /// Context with built-in visual sizes
    pub fn new(tuning: Tuning, screen: Vec2) -> Self {
        let screen = valid_screen(screen).unwrap_or_else(|| {
            log::warn!("Invalid screen size {screen}, using an empty play area");
            Vec2::ZERO
        });
        Self {
            tuning: tuning.sanitized(),
            screen,
            target_size: Vec2::splat(FALLBACK_TARGET_SIZE),
            gun: Flipbook::default(),
            casing: Flipbook::default(),
            destruction: Flipbook::default(),
        }
    }

    /// Context sized from loaded visuals; missing visuals keep the defaults
    pub fn from_assets(assets: &impl AssetSource, tuning: Tuning, screen: Vec2) -> Self {
        let mut ctx = Self::new(tuning, screen);

        match assets.load_asset(assets::TARGET) {
            Some(visual) if visual.size.x > 0.0 && visual.size.y > 0.0 => {
                ctx.target_size = visual.size * TARGET_SCALE;
            }
            _ => log::error!(
                "Target visual missing, using fallback size {}",
                FALLBACK_TARGET_SIZE
            ),
        }

        ctx.destruction = flipbook_for(assets, assets::TARGET_DESTRUCTION);
        ctx.gun = flipbook_for(assets, assets::GUN);
        ctx.casing = flipbook_for(assets, assets::CASING);
        ctx
    }

    /// Update the play area after a resize
    pub fn set_screen(&mut self, screen: Vec2) {
        match valid_screen(screen) {
            Some(screen) => self.screen = screen,
            None => log::warn!("Ignoring invalid screen size {screen}"),
        }
    }

    /// Rightmost x a target's left edge may spawn at
    pub fn max_spawn_x(&self) -> f32 {
        let max_x = self.screen.x - self.target_size.x;
        if max_x.is_finite() { max_x.max(0.0) } else { 0.0 }
    }
}

/// Finite screen sizes only; negative extents clamp to zero
fn valid_screen(screen: Vec2) -> Option<Vec2> {
    screen.is_finite().then(|| screen.max(Vec2::ZERO))
}

fn flipbook_for(assets: &impl AssetSource, id: &str) -> Flipbook {
    match assets.load_asset(id) {
        Some(Visual { frames, .. }) if frames > 0 => Flipbook::new(frames, FLIPBOOK_FRAME_SECS),
        _ => {
            log::error!("Flipbook '{id}' missing, using default");
            Flipbook::default()
        }
    }
}
