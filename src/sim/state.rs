//! Ball arena and drum state
//!
//! The arena owns one ball per number and is passed explicitly to both the
//! integrator and the draw scheduler.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Drum;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Where a ball is in its draw lifecycle
///
/// Transitions only move forward: Free -> Highlighted -> Drawn, or straight
/// Free -> Drawn. Only a full reseed returns a ball to Free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallPhase {
    /// Tumbling inside the drum
    #[default]
    Free,
    /// Released from physics, easing toward the exit
    Highlighted,
    /// Gone from simulation and rendering
    Drawn,
}

/// A numbered ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub num: u8,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub phase: BallPhase,
}

impl Ball {
    pub fn new(num: u8, radius: f32) -> Self {
        Self {
            num,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            phase: BallPhase::Free,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.phase == BallPhase::Free
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.phase == BallPhase::Highlighted
    }

    #[inline]
    pub fn is_drawn(&self) -> bool {
        self.phase == BallPhase::Drawn
    }

    /// Start easing toward the exit. Returns false if the ball was not free.
    pub fn highlight(&mut self) -> bool {
        if self.is_free() {
            self.phase = BallPhase::Highlighted;
            self.vel = Vec2::ZERO;
            true
        } else {
            false
        }
    }

    /// Remove the ball from the drum. Returns false if it was already drawn.
    pub fn mark_drawn(&mut self) -> bool {
        if self.is_drawn() {
            false
        } else {
            self.phase = BallPhase::Drawn;
            self.vel = Vec2::ZERO;
            true
        }
    }
}

/// The drum and its balls
#[derive(Debug, Clone)]
pub struct DrumState {
    pub drum: Drum,
    /// One ball per number, ordered by number
    pub balls: Vec<Ball>,
    rng: Pcg32,
}

impl DrumState {
    /// Create a drum with every ball seeded in the inner band
    pub fn new(seed: u64, drum: Drum) -> Self {
        let balls = (1..=TOTAL_NUMBERS)
            .map(|num| Ball::new(num, drum.ball_radius))
            .collect();
        let mut state = Self {
            drum,
            balls,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reseed();
        state
    }

    /// Place every ball back in the inner band and free it.
    ///
    /// Angles are spread evenly around the drum then jittered; radii fall
    /// between `SPAWN_BAND_INNER` and `SPAWN_BAND_OUTER` of the drum radius.
    pub fn reseed(&mut self) {
        let count = self.balls.len();
        for i in 0..count {
            self.respawn(i, count);
        }
    }

    /// Free every highlighted or drawn ball, respawning it in the inner band.
    /// Free balls keep their motion. Returns how many balls were released.
    pub fn release_all(&mut self) -> usize {
        let count = self.balls.len();
        let mut released = 0;
        for i in 0..count {
            if !self.balls[i].is_free() {
                self.respawn(i, count);
                released += 1;
            }
        }
        released
    }

    fn respawn(&mut self, index: usize, count: usize) {
        let base = index as f32 / count as f32 * TAU;
        let theta = base + self.rng.random_range(-SPAWN_ANGLE_JITTER..=SPAWN_ANGLE_JITTER);
        let r = self.drum.radius
            * self
                .rng
                .random_range(SPAWN_BAND_INNER..=SPAWN_BAND_OUTER);
        let vel = Vec2::new(
            self.rng.random_range(-SPAWN_SPEED..=SPAWN_SPEED),
            self.rng.random_range(-SPAWN_SPEED..=SPAWN_SPEED),
        );

        let ball = &mut self.balls[index];
        ball.pos = self.drum.center + polar_to_cartesian(r, theta);
        ball.vel = vel;
        ball.radius = self.drum.ball_radius;
        ball.phase = BallPhase::Free;
    }

    /// Adopt new geometry. Ball identities and phases are kept and every
    /// ball in the drum keeps its offset from the centre; only the radius
    /// is rescaled. Balls left outside a smaller boundary are pulled back by
    /// the next physics step.
    pub fn resize(&mut self, drum: Drum) {
        let shift = drum.center - self.drum.center;
        self.drum = drum;
        for ball in &mut self.balls {
            if !ball.is_drawn() {
                ball.pos += shift;
            }
            ball.radius = drum.ball_radius;
        }
    }

    /// Kick every ball still in the drum with a random velocity impulse
    pub fn shake(&mut self, impulse: f32) {
        for ball in self.balls.iter_mut().filter(|b| b.is_free()) {
            ball.vel += Vec2::new(
                self.rng.random_range(-impulse..=impulse),
                self.rng.random_range(-impulse..=impulse),
            );
        }
    }

    pub fn ball(&self, num: u8) -> Option<&Ball> {
        self.balls.iter().find(|b| b.num == num)
    }

    pub fn ball_mut(&mut self, num: u8) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.num == num)
    }

    /// Numbers currently in the Drawn phase, ascending
    pub fn drawn_numbers(&self) -> Vec<u8> {
        self.balls.iter().filter(|b| b.is_drawn()).map(|b| b.num).collect()
    }

    /// Split borrow for the integrator
    pub(crate) fn parts_mut(&mut self) -> (&Drum, &mut [Ball], &mut Pcg32) {
        (&self.drum, &mut self.balls, &mut self.rng)
    }
}
