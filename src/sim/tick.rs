//! Per-frame simulation step
//!
//! Fixed order: spawn → target physics → shot resolution → effects.

use glam::Vec2;

use super::context::SimContext;
use super::effects::{Casing, ScoreLabel};
use super::scoring::resolve_shot;
use super::state::{GameEvent, GameState};
use crate::consts::GRAVITY;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Current aim point (crosshair center), if it moved
    pub aim: Option<Vec2>,
    /// Fire button pressed this frame
    pub fire: bool,
}

impl TickInput {
    /// Fire at `aim` this frame
    pub fn shoot(aim: Vec2) -> Self {
        Self {
            aim: Some(aim),
            fire: true,
        }
    }
}

/// Advance the world by `dt` seconds.
///
/// `audio_playing` gates the spawner so targets stay in step with the track.
pub fn tick(state: &mut GameState, ctx: &SimContext, input: &TickInput, audio_playing: bool, dt: f32) {
    state.events.clear();

    if let Some(aim) = input.aim {
        state.aim = aim;
    }
    state.gun.follow(state.aim.x, dt, &ctx.tuning);

    // Spawn
    let mut spawns = std::mem::take(&mut state.spawn_buf);
    state
        .spawner
        .update(dt, audio_playing, ctx, &mut state.rng, &mut spawns);
    for spawn in spawns.drain(..) {
        state.spawn_target(&spawn, ctx);
    }
    state.spawn_buf = spawns;

    // Physics
    let screen_h = ctx.screen.y;
    let mut removed = Vec::new();
    state.targets.retain_mut(|target| {
        let remove = target.step(dt, GRAVITY, screen_h, &ctx.destruction);
        if remove {
            removed.push(GameEvent::TargetRemoved {
                id: target.id,
                destroyed: target.is_destroyed(),
            });
        }
        !remove
    });
    state.events.extend(removed);

    // Scoring
    if input.fire {
        fire(state, ctx);
    }

    // Effects
    state.gun.update(dt, &ctx.gun);
    for casing in &mut state.casings {
        casing.update(dt);
    }
    state.casings.retain(|c| !c.is_finished(&ctx.casing));
    for label in &mut state.labels {
        label.update(dt);
    }
    state.labels.retain(|l| !l.is_finished());
}

/// Handle one shot at the current aim point
fn fire(state: &mut GameState, ctx: &SimContext) {
    let aim = state.aim;
    state.shots_fired += 1;
    state.gun.fire();
    state
        .casings
        .push(Casing::new(state.gun.pos + ctx.tuning.casing_offset));
    state.events.push(GameEvent::ShotFired {
        aim,
        ping: ctx.tuning.pings_on_shot(state.shots_fired),
    });

    let Some(hit) = resolve_shot(&mut state.targets, aim) else {
        return;
    };

    state.hits += 1;
    state.score += hit.tier.points();
    state.labels.push(ScoreLabel::new(
        hit.center,
        hit.tier,
        ctx.tuning.score_label_secs,
    ));
    state.events.push(GameEvent::TargetHit {
        id: hit.target_id,
        tier: hit.tier,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelAnalysis;
    use crate::sim::scoring::ScoreTier;
    use crate::sim::spawner::Spawn;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn ctx() -> SimContext {
        SimContext::new(Tuning::default(), Vec2::new(800.0, 600.0))
    }

    /// Place a stationary target with its bottom-left corner at `pos`
    fn hover_target(state: &mut GameState, ctx: &SimContext, pos: Vec2) -> u32 {
        let spawn = Spawn {
            tap_index: 0,
            tap_time: 0.0,
            travel_secs: 1.0,
            x: pos.x,
            y: pos.y,
            vel_y: 0.0,
        };
        let id = state.spawn_target(&spawn, ctx);
        state.events.clear();
        id
    }

    #[test]
    fn test_tick_spawns_and_flies() {
        let tuning = Tuning {
            min_travel_secs: 1.0,
            max_travel_secs: 1.0,
            ..Default::default()
        };
        let ctx = SimContext::new(tuning, Vec2::new(800.0, 600.0));
        let mut state = GameState::new(Some(LevelAnalysis::new([1.0])), &ctx, 42);

        tick(&mut state, &ctx, &TickInput::default(), true, DT);
        assert_eq!(state.targets.len(), 1);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::TargetSpawned { tap_index: 0, .. })));
        // Physics ran on the spawn frame too
        assert!(state.targets[0].pos.y > 0.0);
    }

    #[test]
    fn test_fire_hits_and_scores() {
        let ctx = ctx();
        let mut state = GameState::new(None, &ctx, 1);
        let id = hover_target(&mut state, &ctx, Vec2::new(300.0, 300.0));
        let center = state.targets[0].center();

        tick(&mut state, &ctx, &TickInput::shoot(center), false, 0.0);
        assert_eq!(state.score, 1000);
        assert_eq!(state.hits, 1);
        assert_eq!(state.shots_fired, 1);
        assert!(state.targets[0].is_destroyed());
        assert!(state.gun.is_firing());
        assert_eq!(state.casings.len(), 1);
        assert_eq!(state.labels.len(), 1);
        assert_eq!(state.labels[0].tier, ScoreTier::Perfect);
        assert!(state.events.contains(&GameEvent::TargetHit {
            id,
            tier: ScoreTier::Perfect
        }));
    }

    #[test]
    fn test_miss_still_fires_gun() {
        let ctx = ctx();
        let mut state = GameState::new(None, &ctx, 1);
        hover_target(&mut state, &ctx, Vec2::new(300.0, 300.0));

        tick(&mut state, &ctx, &TickInput::shoot(Vec2::new(10.0, 10.0)), false, DT);
        assert_eq!(state.score, 0);
        assert_eq!(state.hits, 0);
        assert!(state.gun.is_firing());
        assert_eq!(state.casings.len(), 1);
        assert!(state.labels.is_empty());
        assert!(!state.targets[0].is_destroyed());
    }

    #[test]
    fn test_effects_expire() {
        let ctx = ctx();
        let mut state = GameState::new(None, &ctx, 1);
        hover_target(&mut state, &ctx, Vec2::new(300.0, 300.0));
        let center = state.targets[0].center();
        tick(&mut state, &ctx, &TickInput::shoot(center), false, DT);

        for _ in 0..60 {
            tick(&mut state, &ctx, &TickInput::default(), false, DT);
        }
        // Casing and gun flipbooks are 0.4 s, the label 0.75 s
        assert!(state.casings.is_empty());
        assert!(!state.gun.is_firing());
        assert!(state.labels.is_empty());
    }

    #[test]
    fn test_ping_every_eighth_shot() {
        let ctx = ctx();
        let mut state = GameState::new(None, &ctx, 1);
        let mut pings = 0;
        for _ in 0..16 {
            tick(&mut state, &ctx, &TickInput::shoot(Vec2::ZERO), false, DT);
            pings += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::ShotFired { ping: true, .. }))
                .count();
        }
        assert_eq!(pings, 2);
    }

    #[test]
    fn test_shot_removed_target_leaves_after_falling() {
        let ctx = ctx();
        let mut state = GameState::new(None, &ctx, 1);
        let id = hover_target(&mut state, &ctx, Vec2::new(300.0, 100.0));
        let center = state.targets[0].center();
        tick(&mut state, &ctx, &TickInput::shoot(center), false, DT);

        let mut removed = None;
        for _ in 0..600 {
            tick(&mut state, &ctx, &TickInput::default(), false, DT);
            if let Some(event) = state
                .events
                .iter()
                .find(|e| matches!(e, GameEvent::TargetRemoved { .. }))
            {
                removed = Some(*event);
                break;
            }
        }
        assert_eq!(
            removed,
            Some(GameEvent::TargetRemoved { id, destroyed: true })
        );
        assert!(state.targets.is_empty());
    }

    #[test]
    fn test_determinism() {
        let ctx = ctx();
        let taps: Vec<f32> = (0..20).map(|i| 1.0 + i as f32 * 0.3).collect();
        let mut state1 = GameState::new(Some(LevelAnalysis::new(taps.clone())), &ctx, 99999);
        let mut state2 = GameState::new(Some(LevelAnalysis::new(taps)), &ctx, 99999);

        for frame in 0..600 {
            let input = if frame % 20 == 0 {
                TickInput::shoot(Vec2::new(400.0, 300.0))
            } else {
                TickInput::default()
            };
            tick(&mut state1, &ctx, &input, true, DT);
            tick(&mut state2, &ctx, &input, true, DT);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.targets.len(), state2.targets.len());
        for (a, b) in state1.targets.iter().zip(&state2.targets) {
            assert_eq!(a.pos, b.pos);
        }
    }
}
