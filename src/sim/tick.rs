//! Per-frame simulation tick
//!
//! The driver calls `tick` once per display frame. Motion constants are
//! applied per call rather than per elapsed second, so `dt_units` is normally
//! `TICK_UNITS`.

use super::collision::{check_bounds_collision, check_obstacle_collision, integrate};
use super::obstacle::advance_obstacles;
use super::state::{Collision, GameEvent, GameMode, GameSession};

/// Input collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (key/pointer/touch press while playing)
    pub impulse: bool,
    /// Restart (press while ended)
    pub reset: bool,
}

impl TickInput {
    /// Clear one-shot inputs after they were processed
    pub fn clear(&mut self) {
        self.impulse = false;
        self.reset = false;
    }
}

/// Apply queued input, then advance one tick.
///
/// Input is applied before physics so an impulse and a tick arriving
/// together never interleave.
pub fn tick(session: &mut GameSession, input: &TickInput, dt_units: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.reset && session.reset() {
        events.push(GameEvent::Restarted);
    }
    if input.impulse && session.apply_impulse() {
        events.push(GameEvent::Flapped);
    }

    events.extend(advance(session, dt_units));
    events
}

/// Advance a playing session by one tick. No-op once ended.
///
/// Physics, then the obstacle stream, then collisions against the updated
/// queue. The tick that ends the run keeps its mutations.
pub fn advance(session: &mut GameSession, dt_units: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.mode == GameMode::Ended {
        return events;
    }

    session.ticks += 1;

    integrate(&mut session.avatar, session.tuning.gravity, dt_units);

    let earned = advance_obstacles(
        &mut session.obstacles,
        session.viewport,
        &session.tuning,
        &mut session.rng,
    );
    if earned > 0 {
        session.score += earned;
        events.push(GameEvent::Scored {
            score: session.score,
        });
    }

    let cause = if check_bounds_collision(&session.avatar, session.viewport.height()) {
        Some(Collision::Bounds)
    } else if check_obstacle_collision(&session.avatar, &session.obstacles) {
        Some(Collision::Obstacle)
    } else {
        None
    };

    if let Some(cause) = cause {
        session.mode = GameMode::Ended;
        log::info!(
            "Game over ({:?}) at tick {} with score {}",
            cause,
            session.ticks,
            session.score
        );
        events.push(GameEvent::Ended {
            score: session.score,
            cause,
        });
    }

    events
}

impl GameSession {
    /// Advance one tick; see [`advance`]
    pub fn advance(&mut self, dt_units: f32) -> Vec<GameEvent> {
        advance(self, dt_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{ObstaclePair, Viewport};

    fn session() -> GameSession {
        GameSession::new(12345, Viewport::new(800.0, 600.0).unwrap()).unwrap()
    }

    #[test]
    fn test_first_tick_no_impulse() {
        let mut state = session();
        let events = advance(&mut state, TICK_UNITS);
        assert!(events.is_empty());
        assert!((state.avatar().vel - 0.4).abs() < 1e-6);
        assert!((state.avatar().pos.y - 300.4).abs() < 1e-4);
        assert_eq!(state.mode(), GameMode::Playing);
        assert_eq!(state.obstacles().len(), 1);
        assert_eq!(state.ticks(), 1);
    }

    #[test]
    fn test_forced_out_of_bounds_ends() {
        let mut state = session();
        state.avatar.pos.y = -1.0;
        state.avatar.vel = FLAP_STRENGTH;
        let events = advance(&mut state, TICK_UNITS);
        assert_eq!(state.mode(), GameMode::Ended);
        assert_eq!(
            events,
            vec![GameEvent::Ended {
                score: 0,
                cause: Collision::Bounds
            }]
        );
    }

    #[test]
    fn test_terminal_frame_keeps_mutations() {
        let mut state = session();
        state.avatar.pos.y = 1.0;
        state.avatar.vel = -5.0;
        advance(&mut state, TICK_UNITS);
        assert_eq!(state.mode(), GameMode::Ended);
        assert!((state.avatar().pos.y - (1.0 - 4.6)).abs() < 1e-4);
        assert_eq!(state.obstacles()[0].x(), 800.0 - PIPE_VELOCITY);
    }

    #[test]
    fn test_obstacle_hit_ends() {
        let mut state = session();
        // Gate far below the avatar, pipe right on top of it
        state
            .obstacles
            .push_back(ObstaclePair::new(60.0, 400.0, GATE_SIZE, PIPE_WIDTH, 600.0));
        let events = advance(&mut state, TICK_UNITS);
        assert_eq!(state.mode(), GameMode::Ended);
        assert!(matches!(
            events.last(),
            Some(GameEvent::Ended {
                cause: Collision::Obstacle,
                ..
            })
        ));
    }

    #[test]
    fn test_ended_session_is_frozen() {
        let mut state = session();
        for _ in 0..10 {
            advance(&mut state, TICK_UNITS);
        }
        state.mode = GameMode::Ended;
        let avatar = *state.avatar();
        let obstacles = state.obstacles().clone();
        let score = state.score();
        let ticks = state.ticks();

        let input = TickInput {
            impulse: true,
            reset: false,
        };
        for _ in 0..50 {
            assert!(tick(&mut state, &input, TICK_UNITS).is_empty());
        }
        assert_eq!(*state.avatar(), avatar);
        assert_eq!(*state.obstacles(), obstacles);
        assert_eq!(state.score(), score);
        assert_eq!(state.ticks(), ticks);
    }

    #[test]
    fn test_advance_uses_resized_viewport() {
        let mut stale = session();
        stale.avatar.pos.y = 650.0;
        advance(&mut stale, TICK_UNITS);
        assert_eq!(stale.mode(), GameMode::Ended);

        let mut state = session();
        state.resize(Viewport::new(1200.0, 900.0).unwrap()).unwrap();
        state.avatar.pos.y = 650.0;
        let events = advance(&mut state, TICK_UNITS);
        assert!(events.is_empty());
        assert_eq!(state.mode(), GameMode::Playing);
        assert_eq!(state.obstacles().len(), 1);
        assert_eq!(state.obstacles()[0].x(), 1200.0 - PIPE_VELOCITY);
        assert_eq!(state.obstacles()[0].bottom_segment().bottom(), 900.0);
    }

    #[test]
    fn test_impulse_applied_before_physics() {
        let mut state = session();
        let input = TickInput {
            impulse: true,
            reset: false,
        };
        let events = tick(&mut state, &input, TICK_UNITS);
        assert_eq!(events, vec![GameEvent::Flapped]);
        assert!((state.avatar().vel - (FLAP_STRENGTH + GRAVITY)).abs() < 1e-6);
        assert!((state.avatar().pos.y - (300.0 - 7.6)).abs() < 1e-4);
    }

    #[test]
    fn test_reset_input_restarts_and_ticks() {
        let mut state = session();
        state.avatar.pos.y = -10.0;
        advance(&mut state, TICK_UNITS);
        assert_eq!(state.mode(), GameMode::Ended);

        let input = TickInput {
            impulse: false,
            reset: true,
        };
        let events = tick(&mut state, &input, TICK_UNITS);
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(state.mode(), GameMode::Playing);
        assert_eq!(state.ticks(), 1);
        assert_eq!(state.obstacles().len(), 1);
    }

    #[test]
    fn test_scoring_through_gates() {
        let mut state = session();
        let mut scored = 0;
        for _ in 0..800 {
            // Park the avatar inside the gate of the next pipe it will meet
            let avatar_x = state.avatar().pos.x;
            let next_gate = state
                .obstacles()
                .iter()
                .find(|p| p.x() + p.width() > avatar_x)
                .map(|p| p.gate_top() + 40.0);
            if let Some(y) = next_gate {
                state.avatar.pos.y = y;
            }
            state.avatar.vel = -GRAVITY;

            for event in advance(&mut state, TICK_UNITS) {
                if let GameEvent::Scored { score } = event {
                    scored += 1;
                    assert_eq!(score, scored);
                }
            }
            assert_eq!(state.mode(), GameMode::Playing);
        }
        assert_eq!(state.score(), scored);
        assert!(scored >= 5);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = session();
        let mut state2 = session();

        let inputs = [
            TickInput::default(),
            TickInput {
                impulse: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput::default(),
        ];

        for _ in 0..40 {
            for input in &inputs {
                tick(&mut state1, input, TICK_UNITS);
                tick(&mut state2, input, TICK_UNITS);
            }
        }

        assert_eq!(state1.ticks(), state2.ticks());
        assert_eq!(state1.score(), state2.score());
        assert_eq!(state1.obstacles(), state2.obstacles());
        assert_eq!(state1.avatar(), state2.avatar());
    }
}
