//! Data-driven game balance
//!
//! Every motion constant the simulation uses lives here so a build can ship a
//! JSON override without touching code. Defaults match `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Simulation tuning values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration per tick (must be positive)
    pub gravity: f32,
    /// Velocity set on impulse (must be negative)
    pub flap_strength: f32,
    pub pipe_width: f32,
    /// Vertical gap between top and bottom segments
    pub gate_size: f32,
    /// Leftward pipe movement per tick
    pub pipe_velocity: f32,
    pub spawn_spacing: f32,
    pub avatar_x: f32,
    pub avatar_width_scale: f32,
    pub avatar_aspect: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_strength: FLAP_STRENGTH,
            pipe_width: PIPE_WIDTH,
            gate_size: GATE_SIZE,
            pipe_velocity: PIPE_VELOCITY,
            spawn_spacing: SPAWN_SPACING,
            avatar_x: AVATAR_X,
            avatar_width_scale: AVATAR_WIDTH_SCALE,
            avatar_aspect: AVATAR_ASPECT,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<()> {
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(Error::InvalidTuning(format!(
                "gravity must be positive, got {}",
                self.gravity
            )));
        }
        if !(self.flap_strength.is_finite() && self.flap_strength < 0.0) {
            return Err(Error::InvalidTuning(format!(
                "flap_strength must be negative, got {}",
                self.flap_strength
            )));
        }

        let positive = [
            ("pipe_width", self.pipe_width),
            ("gate_size", self.gate_size),
            ("pipe_velocity", self.pipe_velocity),
            ("spawn_spacing", self.spawn_spacing),
            ("avatar_width_scale", self.avatar_width_scale),
            ("avatar_aspect", self.avatar_aspect),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidTuning(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if !(self.avatar_x.is_finite() && self.avatar_x >= 0.0) {
            return Err(Error::InvalidTuning(format!(
                "avatar_x must be non-negative, got {}",
                self.avatar_x
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.gate_size, GATE_SIZE);
        assert_eq!(tuning.flap_strength, FLAP_STRENGTH);
    }

    #[test]
    fn test_rejects_upward_gravity() {
        let err = Tuning::from_json(r#"{ "gravity": -1.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_downward_flap() {
        let tuning = Tuning {
            flap_strength: 3.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_gate() {
        let tuning = Tuning {
            gate_size: 0.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ gravity").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
