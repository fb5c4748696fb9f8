//! Host-facing drum
//!
//! Owns the ball arena and the scheduler and drives both from one
//! fixed-step clock: each tick first fires due scheduler timers, then runs
//! physics. Wall time only enters through `update`.

use crate::consts::*;
use crate::draw::{DrawError, DrawEvent, DrawSet, Progress, Scheduler};
use crate::renderer::{Surface, render};
use crate::sim::{Drum, DrumState, tick};

/// Fallback layout before the host reports a real container width
const DEFAULT_WIDTH: f32 = MAX_DRUM_SIZE;

pub struct DrumMachine {
    state: DrumState,
    scheduler: Scheduler,
    /// Virtual clock, milliseconds
    clock_ms: f64,
    accumulator: f64,
    ticks: u64,
}

impl DrumMachine {
    /// Seed a drum laid out for `container_width`
    pub fn new(seed: u64, container_width: f32) -> Self {
        let drum = Drum::for_width(container_width).unwrap_or_else(|| Drum::with_size(DEFAULT_WIDTH));
        log::info!("Drum seeded ({}) at size {}", seed, drum.size);
        Self {
            state: DrumState::new(seed, drum),
            scheduler: Scheduler::new(),
            clock_ms: 0.0,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &DrumState {
        &self.state
    }

    pub fn drum(&self) -> &Drum {
        &self.state.drum
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn is_drawing(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.scheduler.progress()
    }

    /// Current virtual time in whole milliseconds
    pub fn now_ms(&self) -> u64 {
        self.clock_ms.round() as u64
    }

    /// Milliseconds until the scheduler's next action, if one is pending
    pub fn next_action_in(&self) -> Option<u64> {
        let next = self.scheduler.session()?.next_fire_at()?;
        Some(next.saturating_sub(self.now_ms()))
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Relayout for a new container width. Balls keep their identity and
    /// phase; a degenerate width is ignored.
    pub fn resize(&mut self, container_width: f32) {
        match Drum::for_width(container_width) {
            Some(drum) if drum != self.state.drum => {
                log::debug!("Drum resized to {}", drum.size);
                self.state.resize(drum);
            }
            Some(_) => {}
            None => log::debug!("Ignoring resize to width {}", container_width),
        }
    }

    /// Begin a draw session at the current virtual time
    pub fn start(&mut self, sets: Vec<DrawSet>, quick_mode: bool) -> Result<Vec<DrawEvent>, DrawError> {
        let now = self.now_ms();
        self.scheduler.start(sets, quick_mode, now, &mut self.state)
    }

    /// Cancel any session and reseed every ball
    pub fn reset(&mut self) {
        self.scheduler.cancel(&mut self.state);
        self.state.reseed();
    }

    /// Advance by a wall-clock frame delta, running fixed ticks.
    ///
    /// Frames longer than `MAX_FRAME_MS` are clamped and at most
    /// `MAX_SUBSTEPS` ticks run per call.
    pub fn update(&mut self, dt_ms: f64) -> Vec<DrawEvent> {
        let dt = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= TICK_MS && substeps < MAX_SUBSTEPS {
            events.extend(self.step());
            self.accumulator -= TICK_MS;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(TICK_MS);
        }
        events
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self) -> Vec<DrawEvent> {
        self.clock_ms += TICK_MS;
        self.ticks += 1;
        let events = self.scheduler.advance(self.now_ms(), &mut self.state);
        tick(&mut self.state, self.scheduler.is_running());
        events
    }

    /// Draw the current frame
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, dark: bool) {
        render(surface, &self.state.balls, &self.state.drum, dark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::CommandList;
    use glam::Vec2;

    fn set(numbers: &[u8]) -> DrawSet {
        DrawSet::new(numbers).unwrap()
    }

    fn run_for(machine: &mut DrumMachine, ms: f64) -> Vec<DrawEvent> {
        let mut events = Vec::new();
        let frames = (ms / TICK_MS).ceil() as usize;
        for _ in 0..frames {
            events.extend(machine.update(TICK_MS));
        }
        events
    }

    #[test]
    fn test_session_runs_on_tick_clock() {
        let mut machine = DrumMachine::new(1, 360.0);
        machine.start(vec![set(&[3, 17, 29, 8, 45, 12])], false).unwrap();
        assert!(machine.is_drawing());

        let events = run_for(&mut machine, 7000.0);
        let revealed: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                DrawEvent::Revealed { number, .. } => Some(*number),
                _ => None,
            })
            .collect();
        assert_eq!(revealed, vec![3, 17, 29, 8, 45, 12]);
        assert!(events.contains(&DrawEvent::SessionComplete { set_count: 1 }));
        assert!(!machine.is_drawing());
        assert_eq!(machine.state().drawn_numbers(), vec![3, 8, 12, 17, 29, 45]);
    }

    #[test]
    fn test_next_action_counts_down() {
        let mut machine = DrumMachine::new(7, 360.0);
        assert_eq!(machine.next_action_in(), None);

        machine.start(vec![set(&[1, 2, 3, 4, 5, 6])], false).unwrap();
        // First highlight fires after the initial delay plus its offset
        assert_eq!(
            machine.next_action_in(),
            Some(INITIAL_DRAW_DELAY_MS + HIGHLIGHT_OFFSET_MS)
        );
        run_for(&mut machine, 1000.0);
        let left = machine.next_action_in().unwrap();
        assert!(left <= INITIAL_DRAW_DELAY_MS + HIGHLIGHT_OFFSET_MS - 999);

        run_for(&mut machine, 7000.0);
        assert_eq!(machine.next_action_in(), None);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut machine = DrumMachine::new(2, 360.0);
        machine.update(10_000.0);
        assert!(machine.ticks() <= (MAX_FRAME_MS / TICK_MS).ceil() as u64);
        assert!(machine.now_ms() <= MAX_FRAME_MS as u64);

        let ticks = machine.ticks();
        machine.update(f64::NAN);
        machine.update(-50.0);
        assert_eq!(machine.ticks(), ticks);
    }

    #[test]
    fn test_reset_cancels_and_reseeds() {
        let mut machine = DrumMachine::new(3, 360.0);
        machine.start(vec![set(&[1, 2, 3, 4, 5, 6])], false).unwrap();
        run_for(&mut machine, 3000.0);
        assert!(machine.state().ball(1).unwrap().is_drawn());

        machine.reset();
        assert!(!machine.is_drawing());
        assert!(machine.state().balls.iter().all(|b| b.is_free()));

        let events = run_for(&mut machine, 10_000.0);
        assert!(events.is_empty());
        assert!(machine.state().drawn_numbers().is_empty());
    }

    #[test]
    fn test_resize_mid_draw_keeps_balls() {
        let mut machine = DrumMachine::new(4, 360.0);
        machine.start(vec![set(&[1, 2, 3, 4, 5, 6])], false).unwrap();
        run_for(&mut machine, 2600.0);
        assert!(machine.state().ball(1).unwrap().is_drawn());

        machine.resize(240.0);
        assert_eq!(machine.drum().size, 240.0);
        assert_eq!(machine.state().balls.len(), TOTAL_NUMBERS as usize);
        assert!(machine.state().ball(1).unwrap().is_drawn());
        assert!(
            machine
                .state()
                .balls
                .iter()
                .all(|b| b.radius == machine.drum().ball_radius)
        );

        machine.resize(0.0);
        assert_eq!(machine.drum().size, 240.0);

        let events = run_for(&mut machine, 5000.0);
        assert!(events.contains(&DrawEvent::SessionComplete { set_count: 1 }));
    }

    #[test]
    fn test_quick_start_and_render() {
        let mut machine = DrumMachine::new(5, 360.0);
        let events = machine.start(vec![set(&[10, 20, 30, 40, 41, 42])], true).unwrap();
        assert_eq!(events.last(), Some(&DrawEvent::SessionComplete { set_count: 1 }));
        assert_eq!(machine.progress().unwrap().revealed_count, 6);

        let mut list = CommandList::new(Vec2::splat(360.0));
        machine.render(&mut list, false);
        assert_eq!(list.labels().len(), TOTAL_NUMBERS as usize - 6);
    }

    #[test]
    fn test_degenerate_initial_width_falls_back() {
        let machine = DrumMachine::new(6, 0.0);
        assert_eq!(machine.drum().size, MAX_DRUM_SIZE);
    }
}
