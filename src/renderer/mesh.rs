//! Tessellating surface
//!
//! Collects one frame as a triangle list for the GPU pipeline. Text cannot
//! be tessellated here, so labels are kept aside for the host's overlay.

use glam::Vec2;

use super::palette::Color;
use super::shapes;
use super::surface::{Fill, Label, Surface};
use super::vertex::Vertex;
use crate::sim::ArcSegment;

/// Segments per full circle
const CIRCLE_SEGMENTS: u32 = 32;
/// Arc tessellation density
const ARC_SEGMENTS_PER_RADIAN: f32 = 12.0;

/// Surface that accumulates triangles and labels
#[derive(Debug, Clone, Default)]
pub struct MeshSurface {
    size: Vec2,
    pub vertices: Vec<Vertex>,
    pub labels: Vec<Label>,
}

impl MeshSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            vertices: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Drop the previous frame, keeping allocations
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.labels.clear();
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }
}

impl Surface for MeshSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        let tris = match fill {
            Fill::Solid(color) => shapes::circle(center, radius, color, CIRCLE_SEGMENTS),
            Fill::Radial {
                focus,
                inner,
                outer,
            } => shapes::radial_disc(center, radius, focus, inner, outer, CIRCLE_SEGMENTS),
        };
        self.vertices.extend(tris);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.vertices.extend(shapes::convex_polygon(points, color));
    }

    fn stroke_arc(&mut self, center: Vec2, arc: &ArcSegment, color: Color) {
        self.vertices
            .extend(shapes::arc_band(center, arc, color, ARC_SEGMENTS_PER_RADIAN));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.vertices.extend(shapes::line(from, to, width, color));
    }

    fn draw_label(&mut self, label: Label) {
        self.labels.push(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render;
    use crate::sim::{Drum, DrumState};

    #[test]
    fn test_frame_tessellates_into_triangles() {
        let drum = Drum::for_width(300.0).unwrap();
        let state = DrumState::new(8, drum);
        let mut mesh = MeshSurface::new(Vec2::splat(drum.size));

        render(&mut mesh, &state.balls, &state.drum, true);
        assert!(!mesh.vertices.is_empty());
        assert_eq!(mesh.vertices.len() % 3, 0);
        assert_eq!(mesh.labels.len(), state.balls.len());

        mesh.clear();
        assert!(mesh.vertices.is_empty() && mesh.labels.is_empty());
    }

    #[test]
    fn test_zero_size_mesh_stays_empty() {
        let drum = Drum::for_width(300.0).unwrap();
        let state = DrumState::new(8, drum);
        let mut mesh = MeshSurface::default();
        render(&mut mesh, &state.balls, &state.drum, false);
        assert!(mesh.vertices.is_empty());
    }
}
