//! 2D drawing target
//!
//! The frame composer only talks to a `Surface`. `MeshSurface` turns the
//! calls into GPU triangles; `CommandList` records them as-is, which hosts
//! can replay onto any 2D API.

use glam::Vec2;

use super::palette::Color;
use crate::sim::ArcSegment;

/// How a filled shape is coloured
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Radial gradient from `inner` at `focus` to `outer` at the shape edge
    Radial {
        focus: Vec2,
        inner: Color,
        outer: Color,
    },
}

/// Centred text drawn over a ball
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub pos: Vec2,
    /// Font size in surface units
    pub size: f32,
    pub color: Color,
    pub shadow: Option<Color>,
}

/// Painter's-algorithm drawing target in surface units
pub trait Surface {
    /// Logical size; a zero dimension means there is nothing to draw on
    fn size(&self) -> Vec2;

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill);

    /// Fill a convex polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Stroke an arc band around `center`; width is the arc's thickness
    fn stroke_arc(&mut self, center: Vec2, arc: &ArcSegment, color: Color);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    fn draw_label(&mut self, label: Label);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        fill: Fill,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Color,
    },
    Arc {
        center: Vec2,
        arc: ArcSegment,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Label(Label),
}

/// Surface that records every call in order
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    pub size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Label texts in draw order
    pub fn labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label(label) => Some(label.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for CommandList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Fill) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_arc(&mut self, center: Vec2, arc: &ArcSegment, color: Color) {
        self.commands.push(DrawCommand::Arc {
            center,
            arc: *arc,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn draw_label(&mut self, label: Label) {
        self.commands.push(DrawCommand::Label(label));
    }
}
