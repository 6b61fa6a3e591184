//! Error types for gate-flap

use thiserror::Error;

/// Crate error type
#[derive(Debug, Error)]
pub enum Error {
    /// Viewport dimensions must be finite and positive
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// Viewport too short to fit a gate
    #[error("Viewport height {height} must exceed gate size {gate_size}")]
    ViewportTooShort { height: f32, gate_size: f32 },

    /// Tuning value out of range
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// Settings or tuning JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for gate-flap operations
pub type Result<T> = std::result::Result<T, Error>;
