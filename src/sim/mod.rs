//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-tick motion only
//! - Seeded RNG only
//! - Stable queue order (oldest pipe first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use collision::{
    apply_impulse, check_bounds_collision, check_obstacle_collision, hits_pair, integrate,
    overlaps_horizontally,
};
pub use obstacle::{advance_obstacles, create_obstacle};
pub use state::{
    Avatar, Collision, GameEvent, GameMode, GameSession, ObstaclePair, Rect, Viewport,
};
pub use tick::{TickInput, advance, tick};
