//! Drum geometry derived from the available surface
//!
//! The drum is laid out on a square surface of side `size`. The centre sits
//! slightly below the midpoint so the exit tube fits above the rim.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::ArcSegment;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Drum dimensions in surface units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drum {
    /// Side length of the square surface
    pub size: f32,
    /// Drum centre
    pub center: Vec2,
    /// Circular boundary radius
    pub radius: f32,
    /// Radius of every ball
    pub ball_radius: f32,
}

impl Drum {
    /// Lay out a drum for a container of the given width.
    ///
    /// Returns `None` for a zero, negative or non-finite width; callers keep
    /// their previous geometry in that case.
    pub fn for_width(container_width: f32) -> Option<Self> {
        if !container_width.is_finite() || container_width <= 0.0 {
            return None;
        }
        Some(Self::with_size(container_width.min(MAX_DRUM_SIZE)))
    }

    /// Lay out a drum on a square surface of side `size` (no clamping)
    pub fn with_size(size: f32) -> Self {
        let radius = size * DRUM_RADIUS_RATIO;
        Self {
            size,
            center: Vec2::new(size / 2.0, size * DRUM_CENTER_Y_RATIO),
            radius,
            ball_radius: radius * BALL_RADIUS_RATIO,
        }
    }

    /// Largest distance from the centre a ball centre may reach
    #[inline]
    pub fn max_center_distance(&self, ball_radius: f32) -> f32 {
        (self.radius - ball_radius).max(0.0)
    }

    /// Unit vector pointing out of the exit hole
    #[inline]
    pub fn exit_direction(&self) -> Vec2 {
        polar_to_cartesian(1.0, EXIT_ANGLE)
    }

    /// Point every highlighted ball eases toward, just outside the rim
    pub fn exit_target(&self) -> Vec2 {
        self.center + self.exit_direction() * (self.radius + self.ball_radius * EXIT_TARGET_OFFSET)
    }

    /// Rim points on either side of the exit gap (counter-clockwise first)
    pub fn exit_gap_corners(&self) -> (Vec2, Vec2) {
        (
            self.center + polar_to_cartesian(self.radius, EXIT_ANGLE - EXIT_HALF_WIDTH),
            self.center + polar_to_cartesian(self.radius, EXIT_ANGLE + EXIT_HALF_WIDTH),
        )
    }

    /// Boundary ring with the exit gap cut out
    pub fn rim(&self, thickness: f32) -> ArcSegment {
        ArcSegment::with_gap(self.radius, thickness, EXIT_ANGLE, EXIT_HALF_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drum_ratios() {
        let drum = Drum::for_width(300.0).unwrap();
        assert_eq!(drum.size, 300.0);
        assert!((drum.radius - 120.0).abs() < 1e-4);
        assert!((drum.center.x - 150.0).abs() < 1e-4);
        assert!((drum.center.y - 162.0).abs() < 1e-4);
        assert!((drum.ball_radius - 120.0 * BALL_RADIUS_RATIO).abs() < 1e-4);
    }

    #[test]
    fn test_drum_clamps_to_max_size() {
        let drum = Drum::for_width(1200.0).unwrap();
        assert_eq!(drum.size, MAX_DRUM_SIZE);
        assert!((drum.radius - MAX_DRUM_SIZE * DRUM_RADIUS_RATIO).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_width_is_skipped() {
        assert!(Drum::for_width(0.0).is_none());
        assert!(Drum::for_width(-10.0).is_none());
        assert!(Drum::for_width(f32::NAN).is_none());
    }

    #[test]
    fn test_exit_target_above_rim() {
        let drum = Drum::for_width(360.0).unwrap();
        let target = drum.exit_target();
        // Straight up from the centre, outside the boundary
        assert!((target.x - drum.center.x).abs() < 1e-3);
        assert!(target.y < drum.center.y - drum.radius);
        let expected = drum.radius + 1.5 * drum.ball_radius;
        assert!(((drum.center - target).length() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_gap_corners_on_rim() {
        let drum = Drum::for_width(200.0).unwrap();
        let (a, b) = drum.exit_gap_corners();
        assert!(((a - drum.center).length() - drum.radius).abs() < 1e-3);
        assert!(((b - drum.center).length() - drum.radius).abs() < 1e-3);
        assert!(a.x < b.x);
        assert!(a.y < drum.center.y && b.y < drum.center.y);
    }
}
