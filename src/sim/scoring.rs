//! Shot resolution and accuracy tiers
//!
//! One shot credits at most one target: the first intact target (in
//! creation order) whose bounds contain the aim point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::target::Target;

/// Inner radius for the top tier, as a fraction of the target's smaller side
pub const PERFECT_RADIUS: f32 = 0.15;
/// Radius for the second tier
pub const GREAT_RADIUS: f32 = 0.30;
/// Radius for the third tier; anything further out scores the lowest tier
pub const GOOD_RADIUS: f32 = 0.50;

/// Discrete score values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreTier {
    Low,
    Good,
    Great,
    Perfect,
}

impl ScoreTier {
    /// Points awarded for this tier
    pub const fn points(self) -> u64 {
        match self {
            ScoreTier::Low => 100,
            ScoreTier::Good => 300,
            ScoreTier::Great => 600,
            ScoreTier::Perfect => 1000,
        }
    }

    /// Tier for a hit `distance` away from the center of a target whose
    /// smaller side is `min_side`
    pub fn from_accuracy(distance: f32, min_side: f32) -> Self {
        if distance <= min_side * PERFECT_RADIUS {
            ScoreTier::Perfect
        } else if distance <= min_side * GREAT_RADIUS {
            ScoreTier::Great
        } else if distance <= min_side * GOOD_RADIUS {
            ScoreTier::Good
        } else {
            ScoreTier::Low
        }
    }

    /// Tier for a points value, if it is one of the four
    pub fn from_points(points: u64) -> Option<Self> {
        match points {
            100 => Some(ScoreTier::Low),
            300 => Some(ScoreTier::Good),
            600 => Some(ScoreTier::Great),
            1000 => Some(ScoreTier::Perfect),
            _ => None,
        }
    }
}

/// A credited hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub target_id: u32,
    pub tier: ScoreTier,
    /// Target center at the moment of the hit
    pub center: Vec2,
    /// Distance from the aim point to the center
    pub distance: f32,
}

/// Resolve one shot against the live targets.
///
/// Destroys at most one target and records the awarded tier on it.
pub fn resolve_shot(targets: &mut [Target], aim: Vec2) -> Option<Hit> {
    let target = targets.iter_mut().find(|t| t.is_hit(aim))?;
    if !target.destroy() {
        return None;
    }

    let bounds = target.bounds();
    let center = bounds.center();
    let distance = aim.distance(center);
    let tier = ScoreTier::from_accuracy(distance, bounds.min_side());
    target.tier = tier;

    Some(Hit {
        target_id: target.id,
        tier,
        center,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(id: u32, x: f32, y: f32, side: f32) -> Target {
        Target::new(id, Vec2::new(x, y), 0.0, Vec2::splat(side), ScoreTier::Low)
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(ScoreTier::from_accuracy(0.0, 100.0), ScoreTier::Perfect);
        assert_eq!(ScoreTier::from_accuracy(10.0, 100.0), ScoreTier::Perfect);
        assert_eq!(ScoreTier::from_accuracy(15.0, 100.0), ScoreTier::Perfect);
        assert_eq!(ScoreTier::from_accuracy(20.0, 100.0), ScoreTier::Great);
        assert_eq!(ScoreTier::from_accuracy(40.0, 100.0), ScoreTier::Good);
        assert_eq!(ScoreTier::from_accuracy(60.0, 100.0), ScoreTier::Low);
    }

    #[test]
    fn test_tier_uses_smaller_side() {
        // 200x50 target: thresholds derive from 50
        let mut targets = vec![Target::new(
            1,
            Vec2::ZERO,
            0.0,
            Vec2::new(200.0, 50.0),
            ScoreTier::Low,
        )];
        // 20 px right of center: 20 > 0.3 * 50, 20 <= 0.5 * 50
        let hit = resolve_shot(&mut targets, Vec2::new(120.0, 25.0)).expect("hit");
        assert_eq!(hit.tier, ScoreTier::Good);
    }

    #[test]
    fn test_points_roundtrip() {
        for tier in [ScoreTier::Low, ScoreTier::Good, ScoreTier::Great, ScoreTier::Perfect] {
            assert_eq!(ScoreTier::from_points(tier.points()), Some(tier));
        }
        assert_eq!(ScoreTier::from_points(42), None);
    }

    #[test]
    fn test_scenario_distance_tiers() {
        // 100x100 target centered at (150, 150)
        let mut targets = vec![square(1, 100.0, 100.0, 100.0)];
        let hit = resolve_shot(&mut targets, Vec2::new(160.0, 150.0)).expect("hit");
        assert_eq!(hit.tier.points(), 1000);
        assert!((hit.distance - 10.0).abs() < 1e-4);
        assert_eq!(targets[0].tier, ScoreTier::Perfect);

        let mut targets = vec![square(2, 100.0, 100.0, 100.0)];
        let hit = resolve_shot(&mut targets, Vec2::new(150.0, 190.0)).expect("hit");
        assert_eq!(hit.tier.points(), 300);
    }

    #[test]
    fn test_one_target_per_shot() {
        // Overlapping targets: only the first is credited
        let mut targets = vec![square(1, 0.0, 0.0, 100.0), square(2, 10.0, 10.0, 100.0)];
        let hit = resolve_shot(&mut targets, Vec2::new(50.0, 50.0)).expect("hit");
        assert_eq!(hit.target_id, 1);
        assert!(targets[0].is_destroyed());
        assert!(!targets[1].is_destroyed());

        // Next shot at the same spot skips the destroyed one
        let hit = resolve_shot(&mut targets, Vec2::new(50.0, 50.0)).expect("hit");
        assert_eq!(hit.target_id, 2);
    }

    #[test]
    fn test_miss() {
        let mut targets = vec![square(1, 0.0, 0.0, 50.0)];
        assert!(resolve_shot(&mut targets, Vec2::new(500.0, 500.0)).is_none());
        assert!(!targets[0].is_destroyed());
        assert!(resolve_shot(&mut [], Vec2::ZERO).is_none());
    }

    proptest! {
        #[test]
        fn prop_center_hit_is_perfect(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 1.0f32..400.0,
            h in 1.0f32..400.0,
        ) {
            let mut targets = vec![Target::new(1, Vec2::new(x, y), 0.0, Vec2::new(w, h), ScoreTier::Low)];
            let center = targets[0].center();
            let hit = resolve_shot(&mut targets, center).expect("center is inside");
            prop_assert_eq!(hit.tier, ScoreTier::Perfect);
        }

        #[test]
        fn prop_far_hit_is_lowest(side in 10.0f32..400.0, frac in 0.51f32..0.7) {
            // Along the diagonal; stays inside the box up to ~0.707 of the side
            let offset = side * frac / std::f32::consts::SQRT_2;
            let mut targets = vec![Target::new(1, Vec2::ZERO, 0.0, Vec2::splat(side), ScoreTier::Low)];
            let aim = targets[0].center() + Vec2::splat(offset);
            let hit = resolve_shot(&mut targets, aim).expect("inside");
            prop_assert_eq!(hit.tier, ScoreTier::Low);
        }

        #[test]
        fn prop_at_most_one_destroyed_per_shot(
            positions in proptest::collection::vec((0.0f32..300.0, 0.0f32..300.0), 0..12),
            aim in (0.0f32..400.0, 0.0f32..400.0),
        ) {
            let mut targets: Vec<Target> = positions
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| square(i as u32, x, y, 80.0))
                .collect();
            let before = targets.iter().filter(|t| t.is_destroyed()).count();
            let _ = resolve_shot(&mut targets, Vec2::new(aim.0, aim.1));
            let after = targets.iter().filter(|t| t.is_destroyed()).count();
            prop_assert!(after - before <= 1);
        }
    }
}
