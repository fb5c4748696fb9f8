//! Collision detection and response inside the drum
//!
//! Two cases: a ball against the circular wall (inelastic bounce) and a
//! ball against another ball (equal-mass elastic exchange).

use glam::Vec2;

use super::state::Ball;

/// Overlap below this is treated as touching, so exact separation in f32
/// does not keep registering as contact
const CONTACT_SLOP: f32 = 1e-3;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at the contact, pointing from the obstacle toward the ball
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball centre against the circular wall.
///
/// `limit` is the furthest the centre may sit from the drum centre
/// (drum radius minus ball radius).
pub fn ball_wall_collision(ball_pos: Vec2, center: Vec2, limit: f32) -> CollisionResult {
    let offset = ball_pos - center;
    let dist = offset.length();

    if dist > limit {
        let outward = offset.normalize_or(Vec2::Y);
        return CollisionResult {
            hit: true,
            normal: -outward,
            penetration: dist - limit,
        };
    }

    CollisionResult::miss()
}

/// Reflect the normal component of a velocity, keeping the tangential part.
///
/// `normal` points back into the play area. Only velocity heading into the
/// surface is reflected; the normal component comes out scaled by
/// `restitution`.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn < 0.0 {
        velocity - (1.0 + restitution) * vn * normal
    } else {
        velocity
    }
}

/// Clamp a ball to the wall and bounce it. Returns true on contact.
pub fn resolve_wall(ball: &mut Ball, center: Vec2, drum_radius: f32, restitution: f32) -> bool {
    let limit = (drum_radius - ball.radius).max(0.0);
    let result = ball_wall_collision(ball.pos, center, limit);
    if !result.hit {
        return false;
    }
    ball.pos += result.normal * result.penetration;
    ball.vel = reflect_velocity(ball.vel, result.normal, restitution);
    true
}

/// Push a ball back inside the wall without touching its velocity
pub fn clamp_to_wall(ball: &mut Ball, center: Vec2, drum_radius: f32) {
    let limit = (drum_radius - ball.radius).max(0.0);
    let result = ball_wall_collision(ball.pos, center, limit);
    if result.hit {
        ball.pos += result.normal * result.penetration;
    }
}

/// Push two overlapping balls apart by half the overlap each, along the
/// line joining their centres. Returns the contact normal (from `a` toward
/// `b`) when they overlapped.
pub fn separate_pair(a: &mut Ball, b: &mut Ball) -> Option<Vec2> {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist - CONTACT_SLOP {
        return None;
    }

    // Coincident centres: pick a fixed axis so separation is still defined
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::X
    };
    let half_overlap = (min_dist - dist) / 2.0;
    a.pos -= normal * half_overlap;
    b.pos += normal * half_overlap;
    Some(normal)
}

/// Separate two overlapping balls and exchange their normal velocity.
///
/// If they are approaching, the normal velocity component is swapped
/// (equal masses, no restitution loss). Returns true on contact.
pub fn resolve_pair(a: &mut Ball, b: &mut Ball) -> bool {
    let Some(normal) = separate_pair(a, b) else {
        return false;
    };

    let approach = (a.vel - b.vel).dot(normal);
    if approach > 0.0 {
        a.vel -= normal * approach;
        b.vel += normal * approach;
    }
    true
}
