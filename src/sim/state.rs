//! Game session state and core simulation types
//!
//! The session is the single owner of everything that changes during a run.
//! Physics, obstacle and collision code receive its fields by reference.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision;
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// Current mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Active gameplay
    Playing,
    /// Run ended, frozen until reset
    Ended,
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Avatar left the top or bottom of the viewport
    Bounds,
    /// Avatar touched a pipe segment
    Obstacle,
}

/// Things that happened during a tick, for the driver's HUD and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Flapped,
    Scored { score: u64 },
    Ended { score: u64, cause: Collision },
    Restarted,
}

/// Current drawable area in simulation units (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Validated viewport; dimensions must be finite and positive
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Viewport must be valid and leave room for a gate of the given size.
    ///
    /// Re-checks the `new` invariant since a deserialized value skips it.
    pub(crate) fn check_fits_gate(&self, gate_size: f32) -> Result<()> {
        let Self { width, height } = *self;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidViewport { width, height });
        }
        if self.height <= gate_size {
            return Err(Error::ViewportTooShort {
                height: self.height,
                gate_size,
            });
        }
        Ok(())
    }
}

/// Axis-aligned rectangle, origin at top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// The player-controlled falling/rising entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Top-left corner; x never changes during a run
    pub pos: Vec2,
    /// Vertical velocity per tick (positive = down)
    pub vel: f32,
    /// Fixed at session start from the first viewport read
    pub size: Vec2,
}

impl Avatar {
    /// Avatar sized from the viewport width, centered vertically, at rest
    pub fn new(viewport: Viewport, tuning: &Tuning) -> Self {
        let width = viewport.width() * tuning.avatar_width_scale;
        let size = Vec2::new(width, width * tuning.avatar_aspect);
        Self::with_size(size, viewport, tuning)
    }

    /// Start-of-game avatar keeping an already chosen size
    pub(crate) fn with_size(size: Vec2, viewport: Viewport, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.avatar_x, viewport.height() / 2.0),
            vel: 0.0,
            size,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Two pipe segments sharing one horizontal position with a gate between them
///
/// Shape is fixed at creation; only `x` moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    x: f32,
    width: f32,
    gate_top: f32,
    gate_bottom: f32,
    floor: f32,
}

impl ObstaclePair {
    /// Build a pair whose gate spans `[gate_top, gate_top + gate_size]`.
    ///
    /// `gate_top` is clamped to `[0, viewport_height - gate_size]` so neither
    /// segment can have negative height.
    pub fn new(x: f32, gate_top: f32, gate_size: f32, width: f32, viewport_height: f32) -> Self {
        let max_top = (viewport_height - gate_size).max(0.0);
        let gate_top = gate_top.clamp(0.0, max_top);
        Self {
            x,
            width,
            gate_top,
            gate_bottom: gate_top + gate_size,
            floor: viewport_height,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Bottom edge of the top segment
    #[inline]
    pub fn gate_top(&self) -> f32 {
        self.gate_top
    }

    /// Top edge of the bottom segment
    #[inline]
    pub fn gate_bottom(&self) -> f32 {
        self.gate_bottom
    }

    pub fn top_segment(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.gate_top)
    }

    pub fn bottom_segment(&self) -> Rect {
        Rect::new(
            self.x,
            self.gate_bottom,
            self.width,
            (self.floor - self.gate_bottom).max(0.0),
        )
    }

    pub(crate) fn shift_left(&mut self, dx: f32) {
        self.x -= dx;
    }
}

/// One game run: avatar, obstacle queue, score and mode
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Seed the obstacle RNG was created from
    pub(crate) seed: u64,
    pub(crate) tuning: Tuning,
    /// Latest viewport reported by the driver
    pub(crate) viewport: Viewport,
    pub(crate) avatar: Avatar,
    /// Oldest (leftmost) pair first
    pub(crate) obstacles: VecDeque<ObstaclePair>,
    pub(crate) score: u64,
    pub(crate) mode: GameMode,
    /// Ticks simulated since the last reset
    pub(crate) ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// New session with default tuning
    pub fn new(seed: u64, viewport: Viewport) -> Result<Self> {
        Self::with_tuning(seed, viewport, Tuning::default())
    }

    /// New session with explicit tuning
    pub fn with_tuning(seed: u64, viewport: Viewport, tuning: Tuning) -> Result<Self> {
        tuning.validate()?;
        viewport.check_fits_gate(tuning.gate_size)?;

        log::info!(
            "Session created: seed={} viewport={}x{}",
            seed,
            viewport.width(),
            viewport.height()
        );

        Ok(Self {
            seed,
            tuning,
            viewport,
            avatar: Avatar::new(viewport, &tuning),
            obstacles: VecDeque::new(),
            score: 0,
            mode: GameMode::Playing,
            ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn obstacles(&self) -> &VecDeque<ObstaclePair> {
        &self.obstacles
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_playing(&self) -> bool {
        self.mode == GameMode::Playing
    }

    /// Set avatar velocity to the flap strength. Ignored once ended.
    ///
    /// Returns whether the impulse was applied.
    pub fn apply_impulse(&mut self) -> bool {
        if self.mode != GameMode::Playing {
            return false;
        }
        collision::apply_impulse(&mut self.avatar, self.tuning.flap_strength);
        true
    }

    /// Restart an ended run. Ignored while playing.
    ///
    /// Avatar size is kept; everything else returns to start-of-game values
    /// against the current viewport.
    pub fn reset(&mut self) -> bool {
        if self.mode != GameMode::Ended {
            return false;
        }

        log::info!("Session reset after {} ticks (score {})", self.ticks, self.score);

        self.avatar = Avatar::with_size(self.avatar.size, self.viewport, &self.tuning);
        self.obstacles.clear();
        self.score = 0;
        self.ticks = 0;
        self.mode = GameMode::Playing;
        true
    }

    /// Pointer/touch press: flap while playing, restart once ended
    pub fn press(&mut self) -> Option<GameEvent> {
        match self.mode {
            GameMode::Playing => self.apply_impulse().then_some(GameEvent::Flapped),
            GameMode::Ended => self.reset().then_some(GameEvent::Restarted),
        }
    }

    /// Adopt a new viewport from the driver.
    ///
    /// Rejected dimensions leave the previous viewport in place. Avatar size
    /// is not recomputed.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        if let Err(e) = viewport.check_fits_gate(self.tuning.gate_size) {
            log::warn!("Resize rejected: {}", e);
            return Err(e);
        }
        self.viewport = viewport;
        Ok(())
    }
}
