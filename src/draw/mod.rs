//! Draw sets and the draw scheduler
//!
//! Numbers arrive already chosen; this module only decides when each ball
//! is highlighted and drawn.

pub mod scheduler;
pub mod set;
pub mod timeline;

pub use scheduler::{AnimationSession, DrawEvent, Progress, Scheduler};
pub use set::DrawSet;
pub use timeline::{Timer, TimerQueue};

/// Scheduling misuse, reported before any ball is touched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawError {
    #[error("a draw set needs exactly 6 numbers, got {0}")]
    WrongLength(usize),
    #[error("number {0} is outside 1..=45")]
    OutOfRange(u8),
    #[error("number {0} appears more than once")]
    Duplicate(u8),
    #[error("a session needs 1..=5 sets, got {0}")]
    InvalidSetCount(usize),
    #[error("a draw session is already running")]
    SessionActive,
}
