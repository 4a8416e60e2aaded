//! MotionProfile — тюнинг одного режима движения (ground / air)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Константы одного locomotion режима
///
/// Два набора:
/// - movement: player-driven канал (acceleration, max speed, drag)
/// - force: externally-driven канал (max speed, drag, constant acceleration = gravity)
///
/// Инвариант: все скаляры ≥ 0. Интегратор НЕ проверяет и НЕ клампит —
/// `validate()` для вызова на этапе конфигурации.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct MotionProfile {
    /// units/sec²
    pub movement_acceleration: f32,
    /// units/sec
    pub movement_max_speed: f32,
    /// 1/sec
    pub movement_drag: f32,

    pub force_max_speed: f32,
    pub force_drag: f32,
    /// Применяется каждый step × dt (gravity)
    pub constant_acceleration: Vec3,
}

impl MotionProfile {
    /// Наземный тюнинг: резкий разгон, сильное трение
    pub fn grounded() -> Self {
        Self {
            movement_acceleration: 200.0,
            movement_max_speed: 10.0,
            movement_drag: 10.0,
            force_max_speed: 1000.0,
            force_drag: 0.5,
            constant_acceleration: Vec3::new(0.0, -9.8, 0.0),
        }
    }

    /// Воздушный тюнинг: слабый air control, почти без трения
    pub fn airborne() -> Self {
        Self {
            movement_acceleration: 50.0,
            movement_max_speed: 10.0,
            movement_drag: 1.0,
            force_max_speed: 1000.0,
            force_drag: 0.5,
            constant_acceleration: Vec3::new(0.0, -9.8, 0.0),
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        let scalars = [
            ("movement_acceleration", self.movement_acceleration),
            ("movement_max_speed", self.movement_max_speed),
            ("movement_drag", self.movement_drag),
            ("force_max_speed", self.force_max_speed),
            ("force_drag", self.force_drag),
        ];

        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ProfileError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(ProfileError::Negative { field, value });
            }
        }

        if !self.constant_acceleration.is_finite() {
            return Err(ProfileError::NonFinite {
                field: "constant_acceleration",
            });
        }

        Ok(())
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::grounded()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("motion profile field `{field}` must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("motion profile field `{field}` must be finite")]
    NonFinite { field: &'static str },
}

/// Множитель drag за step: clamp01(1 - drag × dt)
///
/// drag × dt ≥ 1 → канал гасится полностью за один step (не меняет знак).
pub fn drag_factor(drag: f32, delta_time: f32) -> f32 {
    (1.0 - drag * delta_time).clamp(0.0, 1.0)
}
