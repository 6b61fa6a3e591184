//! Gate Flap - A single-screen gravity arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle stream, collisions, session state)
//! - `renderer`: WebGPU rendering of a session snapshot
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `ui`: Score display formatting

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{Error, Result};
pub use settings::{NumeralSystem, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation units applied per frame callback (motion is per tick, not per second)
    pub const TICK_UNITS: f32 = 1.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.4;
    /// Velocity set by an impulse (negative = upward)
    pub const FLAP_STRENGTH: f32 = -8.0;

    /// Obstacle defaults
    pub const PIPE_WIDTH: f32 = 70.0;
    pub const GATE_SIZE: f32 = 200.0;
    /// Leftward pipe movement per tick (not scaled by dt)
    pub const PIPE_VELOCITY: f32 = 4.0;
    /// Horizontal distance from the right edge the newest pipe must travel before the next spawns
    pub const SPAWN_SPACING: f32 = 300.0;

    /// Avatar defaults
    pub const AVATAR_X: f32 = 50.0;
    /// Avatar width as a fraction of the viewport width
    pub const AVATAR_WIDTH_SCALE: f32 = 0.07;
    /// Avatar height / width (sprite is 60x50)
    pub const AVATAR_ASPECT: f32 = 50.0 / 60.0;

    /// Viewport as a fraction of the browser window
    pub const VIEWPORT_WIDTH_FRACTION: f64 = 0.8;
    pub const VIEWPORT_HEIGHT_FRACTION: f64 = 0.7;
}
