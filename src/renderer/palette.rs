//! Colours for the drum and balls

/// Linear RGBA
pub type Color = [f32; 4];

/// Theme-dependent colours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    /// Drum backdrop gradient, highlight to edge
    pub drum_light: Color,
    pub drum_dark: Color,
    /// Inner shadow ring near the boundary
    pub drum_shadow: Color,
    pub rim: Color,
    pub tube_fill: Color,
    pub tube_frame: Color,
    pub ball_shadow: Color,
    pub glow: Color,
    pub label: Color,
    pub label_shadow: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: [0.97, 0.97, 0.98, 1.0],
        drum_light: [0.96, 0.97, 1.0, 1.0],
        drum_dark: [0.78, 0.82, 0.90, 1.0],
        drum_shadow: [0.35, 0.40, 0.55, 0.18],
        rim: [0.55, 0.60, 0.72, 1.0],
        tube_fill: [0.86, 0.89, 0.95, 1.0],
        tube_frame: [0.55, 0.60, 0.72, 1.0],
        ball_shadow: [0.10, 0.12, 0.20, 0.35],
        glow: [1.0, 0.85, 0.30, 0.75],
        label: [1.0, 1.0, 1.0, 1.0],
        label_shadow: [0.0, 0.0, 0.0, 0.45],
    };

    pub const DARK: Palette = Palette {
        background: [0.06, 0.07, 0.10, 1.0],
        drum_light: [0.24, 0.27, 0.35, 1.0],
        drum_dark: [0.09, 0.10, 0.15, 1.0],
        drum_shadow: [0.0, 0.0, 0.0, 0.35],
        rim: [0.42, 0.46, 0.58, 1.0],
        tube_fill: [0.14, 0.16, 0.22, 1.0],
        tube_frame: [0.42, 0.46, 0.58, 1.0],
        ball_shadow: [0.0, 0.0, 0.0, 0.55],
        glow: [1.0, 0.80, 0.25, 0.85],
        label: [1.0, 1.0, 1.0, 1.0],
        label_shadow: [0.0, 0.0, 0.0, 0.6],
    };

    pub fn for_theme(dark: bool) -> Self {
        if dark { Self::DARK } else { Self::LIGHT }
    }
}

/// Ball colour by number band (1-10, 11-20, 21-30, 31-40, 41-45)
pub fn ball_color(num: u8) -> Color {
    match num {
        0..=10 => [0.98, 0.77, 0.0, 1.0],
        11..=20 => [0.41, 0.78, 0.95, 1.0],
        21..=30 => [1.0, 0.45, 0.45, 1.0],
        31..=40 => [0.67, 0.67, 0.67, 1.0],
        _ => [0.69, 0.85, 0.25, 1.0],
    }
}

/// Blend toward white (`amount > 0`) or black (`amount < 0`)
pub fn shade(color: Color, amount: f32) -> Color {
    let amount = amount.clamp(-1.0, 1.0);
    let target = if amount >= 0.0 { 1.0 } else { 0.0 };
    let t = amount.abs();
    [
        color[0] + (target - color[0]) * t,
        color[1] + (target - color[1]) * t,
        color[2] + (target - color[2]) * t,
        color[3],
    ]
}

/// Same colour, fully transparent (gradient fade-out end)
pub fn transparent(color: Color) -> Color {
    [color[0], color[1], color[2], 0.0]
}
