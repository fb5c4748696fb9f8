//! Draw scheduler
//!
//! Drives ball phases on a fixed timeline for each set in a session. All
//! timing runs off a virtual millisecond clock supplied by the caller, so a
//! session is cancelled by clearing one queue and tests can step time
//! deterministically.
//!
//! Per set, for the number at ordinal `i`:
//! - highlight at `start + INITIAL_DRAW_DELAY + i * DRAW_CYCLE + HIGHLIGHT_OFFSET`
//! - pick at `start + INITIAL_DRAW_DELAY + i * DRAW_CYCLE + PICK_OFFSET`
//!
//! The round completes `ROUND_SETTLE` after the last pick; the next set
//! starts `BETWEEN_SETS_DELAY` after that.

use serde::{Deserialize, Serialize};

use super::DrawError;
use super::set::DrawSet;
use super::timeline::{Timer, TimerQueue};
use crate::consts::*;
use crate::sim::DrumState;

/// Signals reported back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawEvent {
    /// A set began: the drum was shaken and its timeline scheduled
    RoundStarted { set_index: usize },
    /// A ball left physics and is heading for the exit
    Highlighted { set_index: usize, number: u8 },
    /// A number was revealed
    Revealed {
        set_index: usize,
        number: u8,
        revealed_count: usize,
    },
    /// All six numbers of a set are out
    RoundComplete { set_index: usize },
    /// Every set has finished
    SessionComplete { set_count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    BeginRound { set_index: usize },
    Highlight { set_index: usize, number: u8 },
    Pick { set_index: usize, number: u8 },
    RoundComplete { set_index: usize },
}

/// Snapshot of session progress for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub set_index: usize,
    pub set_count: usize,
    pub revealed_count: usize,
    /// Numbers revealed so far in the current set, in reveal order
    pub revealed: Vec<u8>,
    pub complete: bool,
}

/// Orchestration state for one scheduler invocation
#[derive(Debug, Clone)]
pub struct AnimationSession {
    sets: Vec<DrawSet>,
    current_set_index: usize,
    revealed: Vec<u8>,
    complete: bool,
    timers: TimerQueue<Action>,
}

impl AnimationSession {
    fn new(sets: Vec<DrawSet>) -> Self {
        Self {
            sets,
            current_set_index: 0,
            revealed: Vec::with_capacity(NUMBERS_PER_DRAW),
            complete: false,
            timers: TimerQueue::new(),
        }
    }

    pub fn sets(&self) -> &[DrawSet] {
        &self.sets
    }

    pub fn current_set_index(&self) -> usize {
        self.current_set_index
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn revealed(&self) -> &[u8] {
        &self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Virtual time of the next scheduled action
    pub fn next_fire_at(&self) -> Option<u64> {
        self.timers.next_fire_at()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            set_index: self.current_set_index,
            set_count: self.sets.len(),
            revealed_count: self.revealed.len(),
            revealed: self.revealed.clone(),
            complete: self.complete,
        }
    }

    /// Shake the drum and lay out one set's timeline from `start`
    fn begin_round(&mut self, set_index: usize, start: u64, drum: &mut DrumState, events: &mut Vec<DrawEvent>) {
        self.current_set_index = set_index;
        self.revealed.clear();
        drum.shake(SHAKE_IMPULSE);

        let set = self.sets[set_index];
        let mut last_pick = start;
        for (i, &number) in set.numbers().iter().enumerate() {
            let slot = start + INITIAL_DRAW_DELAY_MS + i as u64 * DRAW_CYCLE_MS;
            self.timers.schedule(
                slot + HIGHLIGHT_OFFSET_MS,
                Action::Highlight { set_index, number },
            );
            last_pick = slot + PICK_OFFSET_MS;
            self.timers
                .schedule(last_pick, Action::Pick { set_index, number });
        }
        self.timers.schedule(
            last_pick + ROUND_SETTLE_MS,
            Action::RoundComplete { set_index },
        );

        log::debug!("Round {} started at {}ms: {}", set_index + 1, start, set);
        events.push(DrawEvent::RoundStarted { set_index });
    }

    fn fire(&mut self, timer: Timer<Action>, drum: &mut DrumState, events: &mut Vec<DrawEvent>) {
        match timer.action {
            Action::BeginRound { set_index } => {
                self.begin_round(set_index, timer.fire_at, drum, events);
            }
            Action::Highlight { set_index, number } => {
                // A number repeated from an earlier round is already drawn
                if drum.ball_mut(number).is_some_and(|b| b.highlight()) {
                    events.push(DrawEvent::Highlighted { set_index, number });
                }
            }
            Action::Pick { set_index, number } => {
                if let Some(ball) = drum.ball_mut(number) {
                    ball.mark_drawn();
                }
                self.revealed.push(number);
                log::debug!(
                    "Revealed {} ({}/{}) in round {}",
                    number,
                    self.revealed.len(),
                    NUMBERS_PER_DRAW,
                    set_index + 1
                );
                events.push(DrawEvent::Revealed {
                    set_index,
                    number,
                    revealed_count: self.revealed.len(),
                });
            }
            Action::RoundComplete { set_index } => {
                events.push(DrawEvent::RoundComplete { set_index });
                let next = set_index + 1;
                if next < self.sets.len() {
                    self.timers.schedule(
                        timer.fire_at + BETWEEN_SETS_DELAY_MS,
                        Action::BeginRound { set_index: next },
                    );
                } else {
                    self.finish(events);
                }
            }
        }
    }

    /// Reveal every set at once, with no highlight phase
    fn reveal_instantly(&mut self, drum: &mut DrumState, events: &mut Vec<DrawEvent>) {
        for set_index in 0..self.sets.len() {
            self.current_set_index = set_index;
            self.revealed.clear();
            for &number in self.sets[set_index].numbers() {
                if let Some(ball) = drum.ball_mut(number) {
                    ball.mark_drawn();
                }
                self.revealed.push(number);
                events.push(DrawEvent::Revealed {
                    set_index,
                    number,
                    revealed_count: self.revealed.len(),
                });
            }
            events.push(DrawEvent::RoundComplete { set_index });
        }
        self.finish(events);
    }

    fn finish(&mut self, events: &mut Vec<DrawEvent>) {
        self.complete = true;
        log::info!("Draw session complete ({} sets)", self.sets.len());
        events.push(DrawEvent::SessionComplete {
            set_count: self.sets.len(),
        });
    }
}

/// Runs at most one draw session at a time
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    session: Option<AnimationSession>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }

    /// True while a session has timers left to fire
    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.complete)
    }

    pub fn progress(&self) -> Option<Progress> {
        self.session.as_ref().map(AnimationSession::progress)
    }

    /// Start a session at virtual time `now`.
    ///
    /// Rejected without touching the drum if a session is still running or
    /// the set count is outside 1..=MAX_SETS. Balls left taken by a finished
    /// session are released first. In quick mode every set is revealed
    /// before this returns.
    pub fn start(
        &mut self,
        sets: Vec<DrawSet>,
        quick_mode: bool,
        now: u64,
        drum: &mut DrumState,
    ) -> Result<Vec<DrawEvent>, DrawError> {
        if self.is_running() {
            return Err(DrawError::SessionActive);
        }
        if sets.is_empty() || sets.len() > MAX_SETS {
            return Err(DrawError::InvalidSetCount(sets.len()));
        }

        let released = drum.release_all();
        if released > 0 {
            log::debug!("Released {} balls from the previous session", released);
        }

        log::info!(
            "Draw session started: {} sets, quick mode {}",
            sets.len(),
            quick_mode
        );

        let mut events = Vec::new();
        let session = self
            .session
            .insert(AnimationSession::new(sets));
        if quick_mode {
            session.reveal_instantly(drum, &mut events);
        } else {
            session.begin_round(0, now, drum, &mut events);
        }
        Ok(events)
    }

    /// Fire every timer due at or before `now`, in order
    pub fn advance(&mut self, now: u64, drum: &mut DrumState) -> Vec<DrawEvent> {
        let mut events = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return events;
        };
        while let Some(timer) = session.timers.pop_due(now) {
            session.fire(timer, drum, &mut events);
        }
        events
    }

    /// Cancel the session: drop every pending timer and free every ball.
    /// Returns how many timers were cancelled.
    pub fn cancel(&mut self, drum: &mut DrumState) -> usize {
        let cancelled = self
            .session
            .take()
            .map_or(0, |mut session| session.timers.clear());
        drum.release_all();
        if cancelled > 0 {
            log::info!("Draw session cancelled ({} timers dropped)", cancelled);
        }
        cancelled
    }
}
