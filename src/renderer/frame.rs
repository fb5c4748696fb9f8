//! Frame composition
//!
//! Stateless: every call draws the whole frame from the current balls and
//! geometry, back to front:
//! 1. exit tube backing
//! 2. drum backdrop and inner shadow ring
//! 3. balls still in the drum, lowest on screen last
//! 4. boundary ring, open at the exit hole
//! 5. tube walls and cap, over the balls leaving through it

use glam::Vec2;

use super::palette::{Palette, ball_color, shade, transparent};
use super::surface::{Fill, Label, Surface};
use crate::consts::*;
use crate::sim::{ArcSegment, Ball, Drum};

/// Rim stroke width as a fraction of the drum radius
const RIM_WIDTH_RATIO: f32 = 0.035;
/// Inner shadow ring width as a fraction of the drum radius
const INNER_SHADOW_RATIO: f32 = 0.08;
/// Tube wall stroke as a fraction of the ball radius
const TUBE_WALL_RATIO: f32 = 0.3;
/// Tube mouth narrows to this fraction of the gap chord
const TUBE_TAPER: f32 = 0.8;

/// Exit tube outline: a trapezoid from the rim gap outward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitTube {
    pub base_left: Vec2,
    pub base_right: Vec2,
    pub top_left: Vec2,
    pub top_right: Vec2,
}

impl ExitTube {
    pub fn new(drum: &Drum) -> Self {
        let (base_left, base_right) = drum.exit_gap_corners();
        let dir = drum.exit_direction();
        let across = Vec2::new(-dir.y, dir.x);
        let top = drum.center + dir * (drum.radius + drum.ball_radius * EXIT_TUBE_LENGTH);
        let half_width = (base_right - base_left).length() / 2.0 * TUBE_TAPER;
        Self {
            base_left,
            base_right,
            top_left: top - across * half_width,
            top_right: top + across * half_width,
        }
    }

    pub fn outline(&self) -> [Vec2; 4] {
        [self.base_left, self.top_left, self.top_right, self.base_right]
    }
}

/// Draw one frame. A zero-sized surface is left untouched.
pub fn render<S: Surface + ?Sized>(surface: &mut S, balls: &[Ball], drum: &Drum, dark: bool) {
    let size = surface.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let palette = Palette::for_theme(dark);
    let tube = ExitTube::new(drum);

    surface.fill_polygon(&tube.outline(), palette.tube_fill);

    surface.fill_circle(
        drum.center,
        drum.radius,
        Fill::Radial {
            focus: drum.center + Vec2::new(-0.35, -0.35) * drum.radius,
            inner: palette.drum_light,
            outer: palette.drum_dark,
        },
    );
    let shadow_width = drum.radius * INNER_SHADOW_RATIO;
    surface.stroke_arc(
        drum.center,
        &ArcSegment::full(drum.radius - shadow_width / 2.0, shadow_width),
        palette.drum_shadow,
    );

    let mut visible: Vec<&Ball> = balls.iter().filter(|b| !b.is_drawn()).collect();
    visible.sort_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
    for ball in visible {
        draw_ball(surface, ball, &palette);
    }

    surface.stroke_arc(
        drum.center,
        &drum.rim(drum.radius * RIM_WIDTH_RATIO),
        palette.rim,
    );

    let wall = drum.ball_radius * TUBE_WALL_RATIO;
    surface.stroke_line(tube.base_left, tube.top_left, wall, palette.tube_frame);
    surface.stroke_line(tube.base_right, tube.top_right, wall, palette.tube_frame);
    surface.stroke_line(tube.top_left, tube.top_right, wall * 1.5, palette.tube_frame);
}

fn draw_ball<S: Surface + ?Sized>(surface: &mut S, ball: &Ball, palette: &Palette) {
    let highlighted = ball.is_highlighted();
    let r = if highlighted {
        ball.radius * HIGHLIGHT_SCALE
    } else {
        ball.radius
    };

    if highlighted {
        surface.fill_circle(
            ball.pos,
            r * 1.6,
            Fill::Radial {
                focus: ball.pos,
                inner: palette.glow,
                outer: transparent(palette.glow),
            },
        );
    }

    let shadow_center = ball.pos + Vec2::new(0.12, 0.2) * r;
    surface.fill_circle(
        shadow_center,
        r * 1.08,
        Fill::Radial {
            focus: shadow_center,
            inner: palette.ball_shadow,
            outer: transparent(palette.ball_shadow),
        },
    );

    let base = ball_color(ball.num);
    surface.fill_circle(
        ball.pos,
        r,
        Fill::Radial {
            focus: ball.pos + Vec2::new(-0.35, -0.35) * r,
            inner: shade(base, 0.45),
            outer: shade(base, -0.3),
        },
    );

    surface.draw_label(Label {
        text: ball.num.to_string(),
        pos: ball.pos,
        size: r * 0.95,
        color: palette.label,
        shadow: Some(palette.label_shadow),
    });
}
