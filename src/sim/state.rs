//! Per-attempt game world
//!
//! Owns every live entity of one play-through. All collections are kept in
//! creation order, which is also the order shots are resolved in.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::context::SimContext;
use super::effects::{Casing, Gun, ScoreLabel};
use super::scoring::ScoreTier;
use super::spawner::{Spawn, SpawnScheduler};
use super::target::Target;
use crate::audio::SoundCue;
use crate::level::LevelAnalysis;

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A shot was fired; `ping` marks every Nth shot
    ShotFired { aim: Vec2, ping: bool },
    TargetSpawned { id: u32, tap_index: usize },
    TargetHit { id: u32, tier: ScoreTier },
    /// Target left the play area (`destroyed` if it had been shot)
    TargetRemoved { id: u32, destroyed: bool },
}

impl GameEvent {
    /// Sound cues the playback layer should voice for this event
    pub fn sound_cues(&self) -> &'static [SoundCue] {
        match self {
            GameEvent::ShotFired { ping: true, .. } => &[SoundCue::Gunshot, SoundCue::Ping],
            GameEvent::ShotFired { ping: false, .. } => &[SoundCue::Gunshot],
            _ => &[],
        }
    }
}

/// Complete world state for one attempt
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub score: u64,
    pub shots_fired: u32,
    pub hits: u32,
    /// Latest aim point
    pub aim: Vec2,
    pub gun: Gun,
    /// Live targets (creation order)
    pub targets: Vec<Target>,
    /// Live casings (creation order)
    pub casings: Vec<Casing>,
    /// Live score labels (creation order)
    pub labels: Vec<ScoreLabel>,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    pub spawner: SpawnScheduler,
    pub(crate) rng: Pcg32,
    /// Scratch buffer reused across ticks
    pub(crate) spawn_buf: Vec<Spawn>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh world for a level
    pub fn new(analysis: Option<LevelAnalysis>, ctx: &SimContext, seed: u64) -> Self {
        Self::with_rng(analysis, ctx, seed, Pcg32::seed_from_u64(seed))
    }

    /// Create a fresh world drawing randomness from `rng`
    pub fn with_rng(analysis: Option<LevelAnalysis>, ctx: &SimContext, seed: u64, rng: Pcg32) -> Self {
        let gun_pos = Vec2::new(ctx.screen.x / 2.0, ctx.tuning.gun_y);
        Self {
            seed,
            score: 0,
            shots_fired: 0,
            hits: 0,
            aim: ctx.screen / 2.0,
            gun: Gun::new(gun_pos),
            targets: Vec::new(),
            casings: Vec::new(),
            labels: Vec::new(),
            events: Vec::new(),
            spawner: SpawnScheduler::new(analysis),
            rng,
            spawn_buf: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Instantiate a target for a scheduler launch
    pub fn spawn_target(&mut self, spawn: &Spawn, ctx: &SimContext) -> u32 {
        let id = self.next_entity_id();
        self.targets.push(Target::new(
            id,
            Vec2::new(spawn.x, spawn.y),
            spawn.vel_y,
            ctx.target_size,
            ScoreTier::Low,
        ));
        self.events.push(GameEvent::TargetSpawned {
            id,
            tap_index: spawn.tap_index,
        });
        id
    }

    /// Fraction of shots that hit (0 when nothing was fired)
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.hits as f32 / self.shots_fired as f32
        }
    }

    /// Whether the aim point currently rests on a shootable target
    pub fn aim_on_target(&self) -> bool {
        self.targets.iter().any(|t| t.is_hit(self.aim))
    }

    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn ctx() -> SimContext {
        SimContext::new(Tuning::default(), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_new_state_is_empty() {
        let ctx = ctx();
        let state = GameState::new(None, &ctx, 1);
        assert_eq!(state.score, 0);
        assert!(state.targets.is_empty());
        assert!(state.spawner.is_exhausted());
        assert_eq!(state.gun.pos, Vec2::new(400.0, ctx.tuning.gun_y));
        assert_eq!(state.accuracy(), 0.0);
    }

    #[test]
    fn test_spawn_target_assigns_increasing_ids() {
        let ctx = ctx();
        let mut state = GameState::new(None, &ctx, 1);
        let spawn = Spawn {
            tap_index: 0,
            tap_time: 1.0,
            travel_secs: 1.0,
            x: 10.0,
            y: 0.0,
            vel_y: 500.0,
        };
        let a = state.spawn_target(&spawn, &ctx);
        let b = state.spawn_target(&spawn, &ctx);
        assert!(b > a);
        assert_eq!(state.targets[0].size, ctx.target_size);
        assert_eq!(state.targets[0].tier, ScoreTier::Low);
        assert_eq!(state.events.len(), 2);
    }

    #[test]
    fn test_sound_cues() {
        let shot = GameEvent::ShotFired {
            aim: Vec2::ZERO,
            ping: false,
        };
        assert_eq!(shot.sound_cues(), &[SoundCue::Gunshot]);
        let pinged = GameEvent::ShotFired {
            aim: Vec2::ZERO,
            ping: true,
        };
        assert_eq!(pinged.sound_cues(), &[SoundCue::Gunshot, SoundCue::Ping]);
        let hit = GameEvent::TargetHit {
            id: 1,
            tier: ScoreTier::Perfect,
        };
        assert!(hit.sound_cues().is_empty());
    }
}
