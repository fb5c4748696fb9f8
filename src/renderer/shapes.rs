//! Triangle tessellation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::palette::Color;
use super::vertex::Vertex;
use crate::polar_to_cartesian;
use crate::sim::ArcSegment;

/// Filled disc shaded from `inner` at `focus` to `outer` on the rim.
///
/// Triangles fan out from the focus, which must lie inside the disc.
pub fn radial_disc(
    center: Vec2,
    radius: f32,
    focus: Vec2,
    inner: Color,
    outer: Color,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        vertices.push(Vertex::at(focus, inner));
        vertices.push(Vertex::at(center + polar_to_cartesian(radius, theta1), outer));
        vertices.push(Vertex::at(center + polar_to_cartesian(radius, theta2), outer));
    }

    vertices
}

/// Solid filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    radial_disc(center, radius, center, color, color, segments)
}

/// Solid convex polygon, fanned from the first point
pub fn convex_polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::at(points[0], color));
        vertices.push(Vertex::at(pair[0], color));
        vertices.push(Vertex::at(pair[1], color));
    }
    vertices
}

/// Thick arc band around `center`
pub fn arc_band(center: Vec2, arc: &ArcSegment, color: Color, segments_per_radian: f32) -> Vec<Vertex> {
    let num_segments = ((arc.span * segments_per_radian) as u32).max(4);
    let inner_r = arc.inner_radius();
    let outer_r = arc.outer_radius();

    let mut vertices = Vec::with_capacity((num_segments * 6) as usize);

    for i in 0..num_segments {
        let theta1 = arc.theta_start + (i as f32 / num_segments as f32) * arc.span;
        let theta2 = arc.theta_start + ((i + 1) as f32 / num_segments as f32) * arc.span;

        let inner1 = center + polar_to_cartesian(inner_r, theta1);
        let outer1 = center + polar_to_cartesian(outer_r, theta1);
        let inner2 = center + polar_to_cartesian(inner_r, theta2);
        let outer2 = center + polar_to_cartesian(outer_r, theta2);

        // Two triangles per segment
        vertices.push(Vertex::at(inner1, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(inner2, color));

        vertices.push(Vertex::at(inner2, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(outer2, color));
    }

    vertices
}

/// Line segment as a quad of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: Color) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let half = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let corners = [from + half, from - half, to - half, to + half];
    convex_polygon(&corners, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];
    const BLUE: Color = [0.0, 0.0, 1.0, 1.0];

    #[test]
    fn test_radial_disc_colors_and_bounds() {
        let center = Vec2::new(50.0, 50.0);
        let focus = Vec2::new(45.0, 45.0);
        let vertices = radial_disc(center, 10.0, focus, RED, BLUE, 16);
        assert_eq!(vertices.len(), 48);
        for tri in vertices.chunks(3) {
            assert_eq!(tri[0].point(), focus);
            assert_eq!(tri[0].color, RED);
            assert_eq!(tri[1].color, BLUE);
            assert!(((tri[1].point() - center).length() - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_convex_polygon_fan() {
        let square = [
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(convex_polygon(&square, RED).len(), 6);
        assert!(convex_polygon(&square[..2], RED).is_empty());
    }

    #[test]
    fn test_arc_band_stays_in_band() {
        let center = Vec2::new(100.0, 100.0);
        let arc = ArcSegment::with_gap(50.0, 4.0, -std::f32::consts::FRAC_PI_2, 0.25);
        let vertices = arc_band(center, &arc, RED, 12.0);
        assert_eq!(vertices.len() % 6, 0);
        for v in &vertices {
            let r = (v.point() - center).length();
            assert!(r >= 48.0 - 1e-3 && r <= 52.0 + 1e-3);
            // Nothing inside the gap
            let theta = (v.point() - center).to_angle();
            let from_exit = crate::normalize_angle(theta + std::f32::consts::FRAC_PI_2).abs();
            assert!(from_exit >= 0.25 - 1e-3);
        }
    }

    #[test]
    fn test_line_quad_width() {
        let vertices = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, BLUE);
        assert_eq!(vertices.len(), 6);
        assert!(vertices.iter().all(|v| v.position[1].abs() <= 1.0 + 1e-5));
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, BLUE).is_empty());
    }
}
