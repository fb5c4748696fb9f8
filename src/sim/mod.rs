//! Drum simulation module
//!
//! Geometry, ball arena and physics. Deterministic given a seed:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (by ball number)
//! - No rendering or platform dependencies

pub mod arc;
pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use arc::ArcSegment;
pub use collision::{
    CollisionResult, ball_wall_collision, resolve_pair, resolve_wall, separate_pair,
};
pub use geometry::Drum;
pub use state::{Ball, BallPhase, DrumState};
pub use tick::{physics_step, relax_contacts, resolve_contacts, tick};
