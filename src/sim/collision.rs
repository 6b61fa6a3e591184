//! Avatar physics and collision detection
//!
//! Everything here works on plain references so the session stays the only
//! owner of mutable state. Motion is per tick: `dt_units` is 1.0 for one
//! frame callback.

use super::state::{Avatar, ObstaclePair};

/// Apply gravity, then move by the new velocity. No clamping.
#[inline]
pub fn integrate(avatar: &mut Avatar, gravity: f32, dt_units: f32) {
    avatar.vel += gravity * dt_units;
    avatar.pos.y += avatar.vel * dt_units;
}

/// Overwrite velocity with the flap strength (impulses never stack)
#[inline]
pub fn apply_impulse(avatar: &mut Avatar, flap_strength: f32) {
    avatar.vel = flap_strength;
}

/// True if the avatar is above the top edge or below the bottom edge
pub fn check_bounds_collision(avatar: &Avatar, viewport_height: f32) -> bool {
    let bounds = avatar.bounds();
    bounds.top() < 0.0 || bounds.bottom() > viewport_height
}

/// True if the avatar's horizontal span strictly overlaps the pair's
#[inline]
pub fn overlaps_horizontally(avatar: &Avatar, pair: &ObstaclePair) -> bool {
    let bounds = avatar.bounds();
    bounds.right() > pair.x() && bounds.left() < pair.x() + pair.width()
}

/// True if the avatar is outside the gate of a pair it overlaps
pub fn hits_pair(avatar: &Avatar, pair: &ObstaclePair) -> bool {
    if !overlaps_horizontally(avatar, pair) {
        return false;
    }
    let bounds = avatar.bounds();
    bounds.top() < pair.top_segment().bottom() || bounds.bottom() > pair.bottom_segment().top()
}

/// Check every pair; more than one can be in range while pipes hand over
pub fn check_obstacle_collision<'a, I>(avatar: &Avatar, obstacles: I) -> bool
where
    I: IntoIterator<Item = &'a ObstaclePair>,
{
    obstacles.into_iter().any(|pair| hits_pair(avatar, pair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use glam::Vec2;

    fn avatar_at(x: f32, y: f32) -> Avatar {
        Avatar {
            pos: Vec2::new(x, y),
            vel: 0.0,
            size: Vec2::new(56.0, 40.0),
        }
    }

    fn pair_at(x: f32, gate_top: f32) -> ObstaclePair {
        ObstaclePair::new(x, gate_top, GATE_SIZE, PIPE_WIDTH, 600.0)
    }

    #[test]
    fn test_integrate_one_tick() {
        let mut avatar = avatar_at(50.0, 300.0);
        integrate(&mut avatar, GRAVITY, TICK_UNITS);
        assert!((avatar.vel - 0.4).abs() < 1e-6);
        assert!((avatar.pos.y - 300.4).abs() < 1e-4);
    }

    #[test]
    fn test_integrate_scales_with_dt() {
        let mut avatar = avatar_at(50.0, 100.0);
        avatar.vel = 2.0;
        integrate(&mut avatar, 1.0, 0.5);
        assert_eq!(avatar.vel, 2.5);
        assert_eq!(avatar.pos.y, 101.25);
    }

    #[test]
    fn test_integrate_does_not_clamp() {
        let mut avatar = avatar_at(50.0, 5.0);
        avatar.vel = -50.0;
        integrate(&mut avatar, GRAVITY, TICK_UNITS);
        assert!(avatar.pos.y < 0.0);
    }

    #[test]
    fn test_apply_impulse_overwrites() {
        let mut avatar = avatar_at(50.0, 300.0);
        avatar.vel = 25.0;
        apply_impulse(&mut avatar, FLAP_STRENGTH);
        assert_eq!(avatar.vel, FLAP_STRENGTH);
        apply_impulse(&mut avatar, FLAP_STRENGTH);
        assert_eq!(avatar.vel, FLAP_STRENGTH);
    }

    #[test]
    fn test_bounds_collision() {
        assert!(!check_bounds_collision(&avatar_at(50.0, 300.0), 600.0));
        assert!(check_bounds_collision(&avatar_at(50.0, -1.0), 600.0));
        // Bottom edge exactly on the floor is not a hit
        assert!(!check_bounds_collision(&avatar_at(50.0, 560.0), 600.0));
        assert!(check_bounds_collision(&avatar_at(50.0, 560.5), 600.0));
    }

    #[test]
    fn test_obstacle_edges_are_exclusive() {
        let avatar = avatar_at(50.0, 10.0);
        // Pipe starts exactly at the avatar's right edge
        assert!(!hits_pair(&avatar, &pair_at(106.0, 200.0)));
        // Pipe ends exactly at the avatar's left edge
        assert!(!hits_pair(&avatar, &pair_at(50.0 - PIPE_WIDTH, 200.0)));
        // One unit of overlap
        assert!(hits_pair(&avatar, &pair_at(105.0, 200.0)));
    }

    #[test]
    fn test_inside_gate_is_safe() {
        let avatar = avatar_at(50.0, 250.0);
        let pair = pair_at(60.0, 200.0);
        assert!(overlaps_horizontally(&avatar, &pair));
        assert!(!hits_pair(&avatar, &pair));
    }

    #[test]
    fn test_top_and_bottom_segment_hits() {
        let pair = pair_at(60.0, 200.0);
        assert!(hits_pair(&avatar_at(50.0, 199.0), &pair));
        assert!(hits_pair(&avatar_at(50.0, 361.0), &pair));
        assert!(!hits_pair(&avatar_at(50.0, 360.0), &pair));
    }

    #[test]
    fn test_checks_every_pair() {
        let avatar = avatar_at(50.0, 100.0);
        let safe = pair_at(0.0, 50.0);
        let deadly = pair_at(90.0, 300.0);
        assert!(!check_obstacle_collision(&avatar, [&safe]));
        assert!(check_obstacle_collision(&avatar, [&safe, &deadly]));
    }
}
