//! Lotto Drum - the ball-drum animation behind a 6/45 number draw
//!
//! Core modules:
//! - `sim`: Drum geometry, ball arena and per-tick physics
//! - `draw`: Draw sets and the virtual-clock draw scheduler
//! - `renderer`: Frame composition, tessellation and the WebGPU pipeline
//! - `machine`: Host-facing facade driving physics and scheduler from one clock
//! - `settings`: Persisted user preferences

pub mod draw;
pub mod machine;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use draw::{DrawError, DrawEvent, DrawSet, Progress, Scheduler};
pub use machine::DrumMachine;
pub use settings::{Settings, Theme};

use glam::Vec2;

/// Drum configuration constants
pub mod consts {
    /// One ball per number 1..=45
    pub const TOTAL_NUMBERS: u8 = 45;
    /// Numbers revealed per set
    pub const NUMBERS_PER_DRAW: usize = 6;
    /// Maximum sets chained in one session
    pub const MAX_SETS: usize = 5;

    /// Fixed simulation tick (60 Hz display refresh), milliseconds
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted before clamping, milliseconds
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Drum geometry (ratios of the square surface side)
    pub const MAX_DRUM_SIZE: f32 = 360.0;
    pub const DRUM_RADIUS_RATIO: f32 = 0.40;
    pub const DRUM_CENTER_Y_RATIO: f32 = 0.54;
    pub const BALL_RADIUS_RATIO: f32 = 0.082;

    /// Initial placement band (fraction of drum radius)
    pub const SPAWN_BAND_INNER: f32 = 0.2;
    pub const SPAWN_BAND_OUTER: f32 = 0.7;
    /// Angular jitter applied to evenly spaced spawn angles (radians)
    pub const SPAWN_ANGLE_JITTER: f32 = 0.3;
    /// Initial velocity magnitude per axis
    pub const SPAWN_SPEED: f32 = 1.0;

    /// Physics (units per tick)
    pub const GRAVITY: f32 = 0.12;
    pub const ACTIVE_JITTER: f32 = 1.0;
    pub const IDLE_JITTER: f32 = 0.05;
    pub const DAMPING: f32 = 0.997;
    pub const WALL_RESTITUTION: f32 = 0.6;
    /// Ball-ball contact passes per tick (first exchanges velocity, the
    /// rest only separate positions)
    pub const CONTACT_PASSES: u32 = 24;
    /// Fraction of the remaining distance a highlighted ball covers per tick
    pub const HIGHLIGHT_LERP: f32 = 0.12;
    /// Velocity kick per axis when a round starts
    pub const SHAKE_IMPULSE: f32 = 8.0;

    /// Exit hole points straight up in screen space
    pub const EXIT_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;
    /// Half-width of the rim gap around the exit angle (radians)
    pub const EXIT_HALF_WIDTH: f32 = 0.25;
    /// Exit target sits this many ball radii outside the rim
    pub const EXIT_TARGET_OFFSET: f32 = 1.5;
    /// Exit tube length in ball radii
    pub const EXIT_TUBE_LENGTH: f32 = 3.5;
    /// Highlighted balls render this much larger
    pub const HIGHLIGHT_SCALE: f32 = 1.3;

    /// Draw timeline, milliseconds
    pub const INITIAL_DRAW_DELAY_MS: u64 = 2000;
    pub const DRAW_CYCLE_MS: u64 = 800;
    pub const HIGHLIGHT_OFFSET_MS: u64 = 100;
    pub const PICK_OFFSET_MS: u64 = 500;
    pub const ROUND_SETTLE_MS: u64 = 100;
    pub const BETWEEN_SETS_DELAY_MS: u64 = 1000;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
