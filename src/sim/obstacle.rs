//! Obstacle generation and the scrolling obstacle stream
//!
//! Pairs enter at the right edge, scroll left a fixed distance per tick and
//! are retired from the front once fully off-screen. Spawning is gated by
//! spacing, not time.

use std::collections::VecDeque;

use rand::Rng;

use super::state::{ObstaclePair, Viewport};
use crate::tuning::Tuning;

/// Create a pair at the right edge with a random gate.
///
/// The gate top is drawn from `[0, height - gate_size)` and floored to whole
/// units, so the gate always lies inside the viewport.
pub fn create_obstacle<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    tuning: &Tuning,
) -> ObstaclePair {
    let span = viewport.height() - tuning.gate_size;
    let gate_top = if span > 0.0 {
        rng.random_range(0.0..span).floor()
    } else {
        0.0
    };

    ObstaclePair::new(
        viewport.width(),
        gate_top,
        tuning.gate_size,
        tuning.pipe_width,
        viewport.height(),
    )
}

/// Advance the stream by one tick and return the score earned (0 or 1).
///
/// Order: spawn check, shift, retire. At most one pair is added and at most
/// one removed per call.
pub fn advance_obstacles<R: Rng + ?Sized>(
    queue: &mut VecDeque<ObstaclePair>,
    viewport: Viewport,
    tuning: &Tuning,
    rng: &mut R,
) -> u64 {
    let spawn = queue
        .back()
        .is_none_or(|last| last.x() < viewport.width() - tuning.spawn_spacing);
    if spawn {
        let pair = create_obstacle(rng, viewport, tuning);
        log::debug!("Spawned pipe with gate at {}", pair.gate_top());
        queue.push_back(pair);
    }

    for pair in queue.iter_mut() {
        pair.shift_left(tuning.pipe_velocity);
    }

    match queue.front() {
        Some(front) if front.x() < -front.width() => {
            queue.pop_front();
            log::debug!("Retired pipe, {} still active", queue.len());
            1
        }
        _ => 0,
    }
}
