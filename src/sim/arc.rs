//! Arc geometry for the drum rim
//!
//! In polar coordinates around the drum centre, an arc is defined by:
//! - radius: centreline distance from the drum centre
//! - thickness: radial extent (inner = radius - thickness/2, outer = radius + thickness/2)
//! - theta_start, span: counter-clockwise angular extent

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::normalize_angle;

/// A thickened arc in polar space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    /// Centreline radius from the drum centre
    pub radius: f32,
    /// Radial thickness (extends radius ± thickness/2)
    pub thickness: f32,
    /// Start angle (radians, normalized to [-π, π))
    pub theta_start: f32,
    /// Angular sweep in radians, clamped to [0, τ]
    pub span: f32,
}

impl ArcSegment {
    pub fn new(radius: f32, thickness: f32, theta_start: f32, span: f32) -> Self {
        Self {
            radius,
            thickness,
            theta_start: normalize_angle(theta_start),
            span: span.clamp(0.0, TAU),
        }
    }

    /// Closed ring
    pub fn full(radius: f32, thickness: f32) -> Self {
        Self::new(radius, thickness, 0.0, TAU)
    }

    /// Ring with a hole of `2 * half_width` radians centred on `gap_center`
    pub fn with_gap(radius: f32, thickness: f32, gap_center: f32, half_width: f32) -> Self {
        Self::new(
            radius,
            thickness,
            gap_center + half_width,
            TAU - 2.0 * half_width,
        )
    }

    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.radius - self.thickness / 2.0
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.thickness / 2.0
    }

    #[inline]
    pub fn theta_end(&self) -> f32 {
        self.theta_start + self.span
    }

    pub fn is_closed(&self) -> bool {
        self.span >= TAU
    }

    /// Check if an angle falls within the arc's sweep
    pub fn contains_angle(&self, theta: f32) -> bool {
        if self.is_closed() {
            return true;
        }
        let offset = (theta - self.theta_start).rem_euclid(TAU);
        offset <= self.span
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_gap_excludes_exit_angle() {
        let rim = ArcSegment::with_gap(100.0, 4.0, -FRAC_PI_2, 0.25);
        assert!(!rim.contains_angle(-FRAC_PI_2));
        assert!(!rim.contains_angle(-FRAC_PI_2 + 0.2));
        assert!(!rim.contains_angle(-FRAC_PI_2 - 0.2));
        assert!(rim.contains_angle(-FRAC_PI_2 + 0.3));
        assert!(rim.contains_angle(-FRAC_PI_2 - 0.3));
        assert!(rim.contains_angle(FRAC_PI_2));
        assert!(rim.contains_angle(PI - 0.01));
        assert!((rim.span - (TAU - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_full_ring_contains_everything() {
        let ring = ArcSegment::full(50.0, 2.0);
        assert!(ring.is_closed());
        for i in 0..16 {
            assert!(ring.contains_angle(i as f32 * 0.4 - PI));
        }
    }

    #[test]
    fn test_band_radii() {
        let arc = ArcSegment::new(100.0, 10.0, 0.0, 1.0);
        assert_eq!(arc.inner_radius(), 95.0);
        assert_eq!(arc.outer_radius(), 105.0);
        assert!((arc.theta_end() - 1.0).abs() < 1e-6);
    }
}
