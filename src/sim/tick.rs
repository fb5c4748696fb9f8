//! Per-frame physics step
//!
//! Runs once per display tick for the lifetime of the view, whether or not a
//! draw is in progress. Drawn balls are skipped entirely; highlighted balls
//! ease toward the exit instead of integrating forces.

use glam::Vec2;
use rand::Rng;

use super::collision::{clamp_to_wall, resolve_pair, resolve_wall, separate_pair};
use super::geometry::Drum;
use super::state::{Ball, DrumState};
use crate::consts::*;

/// Advance every ball in the drum by one tick.
///
/// `active` selects the chaotic jitter used while a draw runs; otherwise
/// balls only jiggle gently.
pub fn physics_step<R: Rng>(balls: &mut [Ball], drum: &Drum, active: bool, rng: &mut R) {
    let jitter = if active { ACTIVE_JITTER } else { IDLE_JITTER };
    let exit = drum.exit_target();

    for ball in balls.iter_mut() {
        if ball.is_drawn() {
            continue;
        }

        if ball.is_highlighted() {
            ball.pos += (exit - ball.pos) * HIGHLIGHT_LERP;
            ball.vel = Vec2::ZERO;
            continue;
        }

        ball.vel.y += GRAVITY;
        ball.vel += Vec2::new(
            rng.random_range(-jitter..=jitter),
            rng.random_range(-jitter..=jitter),
        );
        ball.vel *= DAMPING;
        ball.pos += ball.vel;

        resolve_wall(ball, drum.center, drum.radius, WALL_RESTITUTION);
    }

    resolve_contacts(balls);
    clamp_free(balls, drum);
    relax_contacts(balls, drum, CONTACT_PASSES - 1);
}

/// Resolve every overlapping pair of free balls (O(n²), n <= TOTAL_NUMBERS)
pub fn resolve_contacts(balls: &mut [Ball]) -> usize {
    for_each_free_pair(balls, resolve_pair)
}

/// Position-only separation passes over the free balls, each followed by a
/// wall clamp. Stops early once a pass finds no contact. Returns how many
/// passes moved a ball.
pub fn relax_contacts(balls: &mut [Ball], drum: &Drum, max_passes: u32) -> u32 {
    for pass in 0..max_passes {
        let contacts = for_each_free_pair(balls, |a, b| separate_pair(a, b).is_some());
        if contacts == 0 {
            return pass;
        }
        clamp_free(balls, drum);
    }
    max_passes
}

/// Pull free balls back inside the wall without a second bounce
fn clamp_free(balls: &mut [Ball], drum: &Drum) {
    for ball in balls.iter_mut().filter(|b| b.is_free()) {
        clamp_to_wall(ball, drum.center, drum.radius);
    }
}

fn for_each_free_pair(balls: &mut [Ball], mut f: impl FnMut(&mut Ball, &mut Ball) -> bool) -> usize {
    let mut contacts = 0;
    for i in 0..balls.len() {
        if !balls[i].is_free() {
            continue;
        }
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut().filter(|b| b.is_free()) {
            if f(a, b) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Advance the drum state by one tick
pub fn tick(state: &mut DrumState, active: bool) {
    let (drum, balls, rng) = state.parts_mut();
    physics_step(balls, drum, active, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn drum() -> Drum {
        Drum::for_width(360.0).unwrap()
    }

    fn assert_contained(state: &DrumState) {
        for ball in state.balls.iter().filter(|b| b.is_free()) {
            let d = (ball.pos - state.drum.center).length();
            assert!(
                d <= state.drum.radius - ball.radius + 1e-3,
                "ball {} escaped: {} > {}",
                ball.num,
                d,
                state.drum.radius - ball.radius
            );
        }
    }

    /// Deepest overlap between any two free balls
    fn worst_overlap(state: &DrumState) -> f32 {
        let free: Vec<&Ball> = state.balls.iter().filter(|b| b.is_free()).collect();
        let mut worst = 0.0f32;
        for (i, a) in free.iter().enumerate() {
            for b in &free[i + 1..] {
                worst = worst.max(a.radius + b.radius - (b.pos - a.pos).length());
            }
        }
        worst
    }

    #[test]
    fn test_no_overlap_after_every_tick() {
        for (seed, active) in [(21, false), (77, true), (5, false)] {
            let mut state = DrumState::new(seed, drum());
            let tolerance = state.drum.ball_radius * 0.05;
            for t in 0..600 {
                tick(&mut state, active);
                let overlap = worst_overlap(&state);
                assert!(
                    overlap <= tolerance,
                    "seed {} tick {}: overlap {} > {}",
                    seed,
                    t,
                    overlap,
                    tolerance
                );
            }
        }
    }

    #[test]
    fn test_relax_separates_a_packed_row() {
        let drum = drum();
        let r = drum.ball_radius;
        // Four balls squeezed to 1.6 radii apart across the centre
        let mut balls: Vec<Ball> = (0..4)
            .map(|i| {
                let mut ball = Ball::new(i + 1, r);
                ball.pos = drum.center + Vec2::new((i as f32 - 1.5) * r * 1.6, 0.0);
                ball
            })
            .collect();
        let passes = relax_contacts(&mut balls, &drum, CONTACT_PASSES);
        assert!(passes > 1);
        for pair in balls.windows(2) {
            let gap = (pair[1].pos - pair[0].pos).length();
            assert!(gap >= 2.0 * r - 0.01 * r, "gap {} < {}", gap, 2.0 * r);
        }

        // Already apart: nothing to do
        assert_eq!(relax_contacts(&mut balls, &drum, CONTACT_PASSES), 0);
    }

    #[test]
    fn test_highlighted_ball_eases_toward_exit() {
        let drum = drum();
        let mut state = DrumState::new(3, drum);
        let ball = state.ball_mut(17).unwrap();
        ball.vel = Vec2::new(4.0, 4.0);
        ball.highlight();
        let start = state.ball(17).unwrap().pos;

        tick(&mut state, true);

        let ball = state.ball(17).unwrap();
        let expected = start + (drum.exit_target() - start) * HIGHLIGHT_LERP;
        assert!((ball.pos - expected).length() < 1e-3);
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_highlighted_ball_reaches_exit() {
        let drum = drum();
        let mut state = DrumState::new(3, drum);
        state.ball_mut(1).unwrap().highlight();
        for _ in 0..200 {
            tick(&mut state, true);
        }
        assert!((state.ball(1).unwrap().pos - drum.exit_target()).length() < 0.01);
    }

    #[test]
    fn test_drawn_ball_is_frozen() {
        let mut state = DrumState::new(4, drum());
        state.ball_mut(8).unwrap().mark_drawn();
        let pos = state.ball(8).unwrap().pos;
        for _ in 0..50 {
            tick(&mut state, true);
        }
        assert_eq!(state.ball(8).unwrap().pos, pos);
    }

    #[test]
    fn test_taken_balls_are_not_obstacles() {
        let drum = drum();
        let mut balls = vec![Ball::new(1, 10.0), Ball::new(2, 10.0)];
        balls[0].pos = drum.center;
        balls[1].pos = drum.center + Vec2::new(5.0, 0.0);
        balls[1].phase = crate::sim::BallPhase::Drawn;
        assert_eq!(resolve_contacts(&mut balls), 0);
        assert_eq!(balls[0].pos, drum.center);
    }

    #[test]
    fn test_gravity_and_damping_when_idle() {
        let drum = drum();
        let mut ball = Ball::new(1, drum.ball_radius);
        ball.pos = drum.center;
        let mut balls = vec![ball];
        let mut rng = Pcg32::seed_from_u64(9);
        physics_step(&mut balls, &drum, false, &mut rng);

        // vy = (0 + g + jitter) * damping, jitter bounded by IDLE_JITTER
        let vy = balls[0].vel.y;
        assert!(vy >= (GRAVITY - IDLE_JITTER) * DAMPING - 1e-5);
        assert!(vy <= (GRAVITY + IDLE_JITTER) * DAMPING + 1e-5);
        assert!(balls[0].vel.x.abs() <= IDLE_JITTER);
        assert_eq!(balls[0].pos, drum.center + balls[0].vel);
    }

    #[test]
    fn test_balls_settle_under_gravity() {
        let mut state = DrumState::new(21, drum());
        let center_y = state.drum.center.y;
        for _ in 0..600 {
            tick(&mut state, false);
        }
        let mean_y: f32 =
            state.balls.iter().map(|b| b.pos.y).sum::<f32>() / state.balls.len() as f32;
        assert!(mean_y > center_y);
        assert_contained(&state);
    }

    #[test]
    fn test_active_run_stays_finite_and_contained() {
        let mut state = DrumState::new(77, drum());
        state.shake(SHAKE_IMPULSE);
        for _ in 0..3000 {
            tick(&mut state, true);
            assert_contained(&state);
        }
        assert!(
            state
                .balls
                .iter()
                .all(|b| b.pos.is_finite() && b.vel.is_finite())
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_containment_holds(seed in any::<u64>(), width in 120.0f32..600.0, active in any::<bool>()) {
            let mut state = DrumState::new(seed, Drum::for_width(width).unwrap());
            state.shake(SHAKE_IMPULSE);
            for _ in 0..300 {
                tick(&mut state, active);
            }
            for ball in &state.balls {
                let d = (ball.pos - state.drum.center).length();
                prop_assert!(d <= state.drum.radius - ball.radius + 1e-3);
            }
        }
    }
}
