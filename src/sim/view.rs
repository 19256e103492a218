//! Rendering read-model
//!
//! A plain-data copy of everything the renderer draws, taken once per frame.

use glam::Vec2;
use serde::Serialize;

use super::context::SimContext;
use super::scoring::ScoreTier;
use super::state::GameState;

#[derive(Debug, Clone, Serialize)]
pub struct GunView {
    pub pos: Vec2,
    pub firing: bool,
    pub frame: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CasingView {
    pub pos: Vec2,
    pub frame: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetView {
    pub id: u32,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub destroyed: bool,
    /// Destruction frame; intact targets draw their static sprite
    pub frame: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelView {
    /// Center of the label
    pub pos: Vec2,
    pub tier: ScoreTier,
    pub alpha: f32,
}

/// Everything drawn for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub accuracy: f32,
    pub aim: Vec2,
    /// Crosshair turns "ready" over a shootable target
    pub aim_on_target: bool,
    pub gun: GunView,
    pub casings: Vec<CasingView>,
    pub targets: Vec<TargetView>,
    pub labels: Vec<LabelView>,
}

impl Snapshot {
    pub fn capture(state: &GameState, ctx: &SimContext) -> Self {
        Self {
            score: state.score,
            accuracy: state.accuracy(),
            aim: state.aim,
            aim_on_target: state.aim_on_target(),
            gun: GunView {
                pos: state.gun.pos,
                firing: state.gun.is_firing(),
                frame: state.gun.frame(&ctx.gun),
            },
            casings: state
                .casings
                .iter()
                .map(|c| CasingView {
                    pos: c.pos,
                    frame: c.frame(&ctx.casing),
                })
                .collect(),
            targets: state
                .targets
                .iter()
                .map(|t| TargetView {
                    id: t.id,
                    pos: t.pos,
                    size: t.size,
                    destroyed: t.is_destroyed(),
                    frame: t.destruction_frame(&ctx.destruction),
                })
                .collect(),
            labels: state
                .labels
                .iter()
                .map(|l| LabelView {
                    pos: l.pos,
                    tier: l.tier,
                    alpha: l.alpha(),
                })
                .collect(),
        }
    }
}
