//! Non-looping flipbook timing
//!
//! A flipbook is a shared definition; every entity that plays one keeps its
//! own elapsed time and asks the definition which frame to show.

use serde::{Deserialize, Serialize};

use crate::consts::{FLIPBOOK_FRAME_SECS, FLIPBOOK_FRAMES};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flipbook {
    pub frames: usize,
    pub frame_secs: f32,
}

impl Default for Flipbook {
    fn default() -> Self {
        Self::new(FLIPBOOK_FRAMES, FLIPBOOK_FRAME_SECS)
    }
}

impl Flipbook {
    pub const fn new(frames: usize, frame_secs: f32) -> Self {
        Self { frames, frame_secs }
    }

    /// Total play time
    #[inline]
    pub fn duration(&self) -> f32 {
        self.frames as f32 * self.frame_secs
    }

    /// Frame shown at `elapsed`; holds the last frame once finished
    pub fn frame_at(&self, elapsed: f32) -> usize {
        if self.frames == 0 {
            return 0;
        }
        let last = self.frames - 1;
        if self.frame_secs <= 0.0 {
            return last;
        }
        let index = (elapsed.max(0.0) / self.frame_secs) as usize;
        index.min(last)
    }

    #[inline]
    pub fn is_finished(&self, elapsed: f32) -> bool {
        elapsed >= self.duration()
    }
}
