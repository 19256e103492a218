//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering, audio or network dependencies

pub mod context;
pub mod effects;
pub mod flipbook;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod target;
pub mod tick;
pub mod view;

pub use context::SimContext;
pub use effects::{Casing, Gun, GunState, ScoreLabel};
pub use flipbook::Flipbook;
pub use scoring::{Hit, ScoreTier, resolve_shot};
pub use spawner::{Spawn, SpawnCursor, SpawnScheduler};
pub use state::{GameEvent, GameState};
pub use target::{Bounds, Target, TargetState};
pub use tick::{TickInput, tick};
pub use view::Snapshot;
