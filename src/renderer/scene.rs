//! Build a frame's vertex list from a session snapshot
//!
//! Read-only over the session. Coordinates stay in viewport units; the
//! pipeline maps them to NDC.

use glam::Vec2;
use rand::Rng;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::{Avatar, GameMode, GameSession, Rect};

/// Random opaque colour, one draw per channel
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> [f32; 4] {
    let mut channel = || rng.random_range(0..256u32) as f32 / 255.0;
    [channel(), channel(), channel(), 1.0]
}

/// Colour shared by every pipe in one frame
pub fn pipe_color<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> [f32; 4] {
    if settings.effective_pipe_flicker() {
        random_color(rng)
    } else {
        colors::PIPE
    }
}

/// Vertices for the current frame: sky, pipes, avatar, game-over shade
pub fn build_scene(session: &GameSession, pipe_color: [f32; 4]) -> Vec<Vertex> {
    let viewport = session.viewport();
    let obstacles = session.obstacles();
    let mut vertices = Vec::with_capacity(6 + obstacles.len() * 12 + 120);

    let screen = Rect::new(0.0, 0.0, viewport.width(), viewport.height());
    vertices.extend(shapes::rect(&screen, colors::SKY));

    for pair in obstacles {
        vertices.extend(shapes::rect(&pair.top_segment(), pipe_color));
        vertices.extend(shapes::rect(&pair.bottom_segment(), pipe_color));
    }

    avatar_vertices(session.avatar(), &mut vertices);

    if session.mode() == GameMode::Ended {
        vertices.extend(shapes::rect(&screen, colors::GAME_OVER_SHADE));
    }

    vertices
}

fn avatar_vertices(avatar: &Avatar, out: &mut Vec<Vertex>) {
    let body = avatar.bounds();
    out.extend(shapes::rect(&body, colors::AVATAR));

    let size = avatar.size;
    let eye = body.pos + Vec2::new(size.x * 0.68, size.y * 0.32);
    let eye_radius = size.y * 0.16;
    out.extend(shapes::circle(eye, eye_radius, colors::AVATAR_EYE, 12));
    out.extend(shapes::circle(
        eye + Vec2::new(eye_radius * 0.35, 0.0),
        eye_radius * 0.5,
        colors::AVATAR_PUPIL,
        8,
    ));

    let beak_top = body.pos + Vec2::new(size.x, size.y * 0.45);
    out.extend(shapes::triangle(
        beak_top,
        beak_top + Vec2::new(0.0, size.y * 0.25),
        beak_top + Vec2::new(size.x * 0.25, size.y * 0.125),
        colors::AVATAR_BEAK,
    ));
}
