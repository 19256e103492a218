//! Target entity: ballistic flight, hit testing and destruction
//!
//! A target launches upward from the bottom edge, decelerates under gravity
//! and falls back. Once shot it plays its destruction flipbook while still
//! falling, and is only removed after both the flipbook has finished and it
//! has dropped below the bottom edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::flipbook::Flipbook;
use super::scoring::ScoreTier;

/// Axis-aligned bounding box anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Smaller of width and height
    #[inline]
    pub fn min_side(&self) -> f32 {
        self.size.x.min(self.size.y)
    }

    /// Edges are inclusive
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

/// Target lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetState {
    /// In flight and shootable
    Alive,
    /// Shot; playing the destruction flipbook
    Destroying { elapsed: f32 },
}

/// A target entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    /// Bottom-left corner
    pub pos: Vec2,
    /// Vertical velocity (positive is up)
    pub vel_y: f32,
    /// Pre-scaled bounding size
    pub size: Vec2,
    /// Nominal tier at spawn, replaced by the awarded tier when shot
    pub tier: ScoreTier,
    pub state: TargetState,
}

impl Target {
    pub fn new(id: u32, pos: Vec2, vel_y: f32, size: Vec2, tier: ScoreTier) -> Self {
        Self {
            id,
            pos,
            vel_y,
            size,
            tier,
            state: TargetState::Alive,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, TargetState::Destroying { .. })
    }

    /// Semi-implicit Euler step
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;
    }

    /// Advance one frame. Returns true when the target should be removed.
    pub fn step(&mut self, dt: f32, gravity: f32, screen_height: f32, destruction: &Flipbook) -> bool {
        self.integrate(dt, gravity);

        let below_bottom = self.pos.y + self.size.y < 0.0;
        match &mut self.state {
            TargetState::Alive => self.pos.y > screen_height || below_bottom,
            TargetState::Destroying { elapsed } => {
                *elapsed += dt;
                destruction.is_finished(*elapsed) && below_bottom
            }
        }
    }

    /// Whether `point` hits this target; destroyed targets never register
    pub fn is_hit(&self, point: Vec2) -> bool {
        match self.state {
            TargetState::Alive => self.bounds().contains(point),
            TargetState::Destroying { .. } => false,
        }
    }

    /// Start destruction. Returns false if the target was already destroyed.
    pub fn destroy(&mut self) -> bool {
        match self.state {
            TargetState::Alive => {
                self.state = TargetState::Destroying { elapsed: 0.0 };
                true
            }
            TargetState::Destroying { .. } => false,
        }
    }

    /// Destruction frame to draw, `None` while intact
    pub fn destruction_frame(&self, destruction: &Flipbook) -> Option<usize> {
        match self.state {
            TargetState::Alive => None,
            TargetState::Destroying { elapsed } => Some(destruction.frame_at(elapsed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRAVITY;
    use proptest::prelude::*;

    const SCREEN_H: f32 = 600.0;

    fn target_at(y: f32, vel_y: f32) -> Target {
        Target::new(1, Vec2::new(100.0, y), vel_y, Vec2::splat(50.0), ScoreTier::Low)
    }

    #[test]
    fn test_integrate_applies_gravity_then_velocity() {
        let mut t = target_at(0.0, 100.0);
        t.integrate(0.1, GRAVITY);
        assert!((t.vel_y - 65.0).abs() < 1e-4);
        assert!((t.pos.y - 6.5).abs() < 1e-4);
        assert_eq!(t.bounds().min, t.pos);
    }

    #[test]
    fn test_alive_removed_off_either_edge() {
        let book = Flipbook::default();

        let mut rising = target_at(SCREEN_H - 1.0, 500.0);
        assert!(rising.step(0.1, GRAVITY, SCREEN_H, &book));

        let mut falling = target_at(-49.0, -100.0);
        assert!(falling.step(0.1, GRAVITY, SCREEN_H, &book));

        let mut on_screen = target_at(300.0, 0.0);
        assert!(!on_screen.step(0.016, GRAVITY, SCREEN_H, &book));
    }

    #[test]
    fn test_destroyed_needs_flipbook_and_bottom() {
        let book = Flipbook::new(4, 0.1);

        // Already below the bottom, but flipbook still running
        let mut t = target_at(-200.0, -10.0);
        assert!(t.destroy());
        assert!(!t.step(0.15, GRAVITY, SCREEN_H, &book));
        assert!(!t.step(0.15, GRAVITY, SCREEN_H, &book));
        assert!(t.step(0.15, GRAVITY, SCREEN_H, &book));

        // Flipbook done, but still on screen
        let mut t = target_at(300.0, 0.0);
        t.destroy();
        for _ in 0..5 {
            assert!(!t.step(0.1, GRAVITY, SCREEN_H, &book));
        }
        // Keeps falling until it clears the bottom
        let mut removed = false;
        for _ in 0..200 {
            if t.step(0.1, GRAVITY, SCREEN_H, &book) {
                removed = true;
                break;
            }
        }
        assert!(removed);
        assert!(t.pos.y + t.size.y < 0.0);
    }

    #[test]
    fn test_destroyed_above_top_is_kept() {
        let book = Flipbook::new(4, 0.1);
        let mut t = target_at(SCREEN_H + 10.0, 200.0);
        t.destroy();
        assert!(!t.step(0.5, GRAVITY, SCREEN_H, &book));
    }

    #[test]
    fn test_hit_test_and_destroy() {
        let mut t = target_at(100.0, 0.0);
        assert!(t.is_hit(Vec2::new(125.0, 125.0)));
        assert!(t.is_hit(Vec2::new(100.0, 100.0)));
        assert!(!t.is_hit(Vec2::new(99.0, 125.0)));

        assert!(t.destroy());
        assert!(!t.is_hit(Vec2::new(125.0, 125.0)));
        // Second destroy is a no-op and does not reset the timer
        if let TargetState::Destroying { elapsed } = &mut t.state {
            *elapsed = 0.2;
        }
        assert!(!t.destroy());
        assert_eq!(t.state, TargetState::Destroying { elapsed: 0.2 });
    }

    #[test]
    fn test_destruction_frame() {
        let book = Flipbook::new(4, 0.1);
        let mut t = target_at(300.0, 0.0);
        assert_eq!(t.destruction_frame(&book), None);
        t.destroy();
        assert_eq!(t.destruction_frame(&book), Some(0));
        t.step(0.25, 0.0, SCREEN_H, &book);
        assert_eq!(t.destruction_frame(&book), Some(2));
    }

    proptest! {
        #[test]
        fn prop_destroyed_is_monotonic(
            y in -100.0f32..700.0,
            vel in -500.0f32..1500.0,
            steps in proptest::collection::vec(0.001f32..0.1, 1..60),
        ) {
            let book = Flipbook::default();
            let mut t = target_at(y, vel);
            t.destroy();
            for dt in steps {
                t.step(dt, GRAVITY, SCREEN_H, &book);
                prop_assert!(t.is_destroyed());
                prop_assert!(!t.destroy());
            }
        }
    }
}
