//! Playfield geometry and collision tests.
//!
//! Simple 2D circle physics. Screen space, +y down, origin at the top-left
//! corner of the playfield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed bounds of the playfield.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayField {
    pub min: Vec2,
    pub max: Vec2,
}

impl PlayField {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    /// Clamp a circle centre so the circle stays fully on screen.
    pub fn clamp_with_radius(&self, point: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x + radius, self.max.x - radius),
            point.y.clamp(self.min.y + radius, self.max.y - radius),
        )
    }

    /// Clamp only the horizontal coordinate, leaving y free.
    /// Enemies weave while entering from above and leaving below.
    pub fn clamp_x_with_radius(&self, x: f32, radius: f32) -> f32 {
        x.clamp(self.min.x + radius, self.max.x - radius)
    }

    /// True once a circle has fully left through the top edge.
    pub fn past_top(&self, centre: Vec2, radius: f32) -> bool {
        centre.y + radius < self.min.y
    }

    /// True once a circle has fully left through the bottom edge.
    pub fn past_bottom(&self, centre: Vec2, radius: f32) -> bool {
        centre.y - radius > self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

impl Default for PlayField {
    fn default() -> Self {
        // Portrait arcade field
        Self::new(800.0, 800.0)
    }
}

/// Circle-circle collision detection.
#[inline]
pub fn circles_collide(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    let distance_sq = pos_a.distance_squared(pos_b);
    let combined_radius = radius_a + radius_b;
    distance_sq <= combined_radius * combined_radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_collision() {
        assert!(circles_collide(
            Vec2::ZERO,
            10.0,
            Vec2::new(15.0, 0.0),
            10.0
        ));
        assert!(!circles_collide(
            Vec2::ZERO,
            10.0,
            Vec2::new(25.0, 0.0),
            10.0
        ));
        // Exact touch counts as contact
        assert!(circles_collide(
            Vec2::ZERO,
            10.0,
            Vec2::new(20.0, 0.0),
            10.0
        ));
    }

    #[test]
    fn circle_collision_symmetric() {
        let pairs = [
            (Vec2::new(3.0, 4.0), 2.0, Vec2::new(7.0, 1.0), 3.5),
            (Vec2::ZERO, 1.0, Vec2::new(100.0, 100.0), 1.0),
            (Vec2::new(-5.0, 2.0), 8.0, Vec2::new(1.0, 2.0), 0.5),
        ];
        for (pa, ra, pb, rb) in pairs {
            assert_eq!(
                circles_collide(pa, ra, pb, rb),
                circles_collide(pb, rb, pa, ra)
            );
        }
    }

    #[test]
    fn clamping_insets_by_radius() {
        let field = PlayField::new(100.0, 100.0);
        assert_eq!(
            field.clamp_with_radius(Vec2::new(50.0, 50.0), 10.0),
            Vec2::new(50.0, 50.0)
        );
        assert_eq!(
            field.clamp_with_radius(Vec2::new(-5.0, 50.0), 10.0),
            Vec2::new(10.0, 50.0)
        );
        assert_eq!(
            field.clamp_with_radius(Vec2::new(120.0, 120.0), 10.0),
            Vec2::new(90.0, 90.0)
        );
    }

    #[test]
    fn edge_predicates() {
        let field = PlayField::new(100.0, 100.0);

        assert!(field.past_top(Vec2::new(50.0, -11.0), 10.0));
        assert!(!field.past_top(Vec2::new(50.0, -9.0), 10.0));

        assert!(field.past_bottom(Vec2::new(50.0, 111.0), 10.0));
        assert!(!field.past_bottom(Vec2::new(50.0, 109.0), 10.0));
    }
}
