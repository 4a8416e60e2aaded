//! Locomotion tuning (Resource)
//!
//! Источник значений по умолчанию для spawn'а акторов и input translation.
//! Уже заспавненные акторы держат свою копию профилей в LocomotionIntegrator.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locomotion::{MotionProfile, MotionProfiles, ProfileError};
use crate::physics::BodyShape;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocomotionConfig {
    /// Частота FixedUpdate (Hz)
    pub fixed_hz: f64,
    /// Impulse прыжка (m/s, мгновенно)
    pub jump_force: f32,
    pub ground: MotionProfile,
    pub air: MotionProfile,
    pub body: BodyShape,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            jump_force: 10.0,
            ground: MotionProfile::grounded(),
            air: MotionProfile::airborne(),
            body: BodyShape::default(),
        }
    }
}

impl LocomotionConfig {
    pub fn profiles(&self) -> MotionProfiles {
        MotionProfiles {
            ground: self.ground,
            air: self.air,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_hz.is_finite() && self.fixed_hz > 0.0) {
            return Err(ConfigError::FixedRate(self.fixed_hz));
        }
        if !(self.jump_force.is_finite() && self.jump_force >= 0.0) {
            return Err(ConfigError::JumpForce(self.jump_force));
        }
        self.ground.validate().map_err(ConfigError::Ground)?;
        self.air.validate().map_err(ConfigError::Air)?;
        self.body.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("fixed_hz must be a positive finite rate (got {0})")]
    FixedRate(f64),
    #[error("jump_force must be >= 0 (got {0})")]
    JumpForce(f32),
    #[error("ground profile: {0}")]
    Ground(#[source] ProfileError),
    #[error("air profile: {0}")]
    Air(#[source] ProfileError),
    #[error("body shape: half_height and radius must be >= 0, radius > 0 (got {half_height}, {radius})")]
    Body { half_height: f32, radius: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LocomotionConfig::default();
        assert_eq!(config.fixed_hz, 60.0);
        assert_eq!(config.jump_force, 10.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_air_profile_reported() {
        let config = LocomotionConfig {
            air: MotionProfile {
                movement_max_speed: -1.0,
                ..MotionProfile::airborne()
            },
            ..default()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Air(ProfileError::Negative { field: "movement_max_speed", .. })));
        assert!(err.to_string().starts_with("air profile:"));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let config = LocomotionConfig {
            fixed_hz: 0.0,
            ..default()
        };

        assert_eq!(config.validate(), Err(ConfigError::FixedRate(0.0)));
    }
}
