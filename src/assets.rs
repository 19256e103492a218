//! Asset collaborator interface
//!
//! Decoding and GPU upload live outside the core. The simulation only needs
//! the size of each visual and how many frames its flipbook has.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Target sprite (first frame of the destruction flipbook)
pub const TARGET: &str = "target";
/// Target destruction flipbook
pub const TARGET_DESTRUCTION: &str = "target_destruction";
/// Gun firing flipbook
pub const GUN: &str = "gun";
/// Ejected casing flipbook
pub const CASING: &str = "casing";

/// What the core needs to know about a loaded visual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    /// Unscaled pixel size of one frame
    pub size: Vec2,
    /// Number of flipbook frames (1 for a static image)
    pub frames: usize,
}

impl Visual {
    pub fn new(width: f32, height: f32, frames: usize) -> Self {
        Self {
            size: Vec2::new(width, height),
            frames,
        }
    }
}

/// Something that can resolve asset ids to visuals
pub trait AssetSource {
    fn load_asset(&self, id: &str) -> Option<Visual>;
}

/// Fixed table of visuals, handy for headless runs
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    entries: Vec<(String, Visual)>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, visual: Visual) -> Self {
        self.entries.retain(|(existing, _)| existing != id);
        self.entries.push((id.to_string(), visual));
        self
    }
}

impl AssetSource for StaticAssets {
    fn load_asset(&self, id: &str) -> Option<Visual> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, visual)| *visual)
    }
}
