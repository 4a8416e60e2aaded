//! Player input → locomotion intent
//!
//! Polling клавиатуры/мыши — на стороне host'а: он пишет PlayerInput каждый frame.
//! Здесь только перевод осей в direction на плоскости земли (camera-relative)
//! и jump flag → JumpIntent.

use bevy::prelude::*;

use crate::config::LocomotionConfig;
use crate::locomotion::{JumpIntent, LocomotionIntegrator, LocomotionSet};

/// Marker component для player-controlled entity
///
/// - AI drivers пропускают `With<Player>`
/// - translate_player_input обрабатывает только `With<Player>`
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Состояние input'а игрока (пишется host'ом)
///
/// # Coordinate System
/// - `move_axes.x`: -1.0 (left) → +1.0 (right)
/// - `move_axes.y`: -1.0 (back) → +1.0 (forward)
///
/// W+D = `Vec2(1, 1)` — нормализуется в queue_movement (диагональ не быстрее).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub move_axes: Vec2,
    /// Space held — прыжок пробуется каждый tick пока зажат (bunny hop)
    pub jump: bool,
}

/// Ориентация камеры/тела для camera-relative движения
///
/// yaw вокруг Y (радианы). yaw = 0 → forward = -Z (Bevy convention).
/// Без компонента — оси мира.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementBasis {
    pub yaw: f32,
}

impl MovementBasis {
    pub fn forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::X
    }
}

/// Оси input'а → direction на плоскости земли (не нормализован)
pub fn ground_plane_intent(axes: Vec2, basis: &MovementBasis) -> Vec3 {
    let forward = flatten(basis.forward());
    let right = flatten(basis.right());
    forward * axes.y + right * axes.x
}

/// Проекция на XZ + normalize (pitch камеры не должен влиять)
fn flatten(direction: Vec3) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero()
}

/// Система: PlayerInput → queue_movement / JumpIntent
pub fn translate_player_input(
    config: Res<LocomotionConfig>,
    mut players: Query<
        (Entity, &PlayerInput, Option<&MovementBasis>, &mut LocomotionIntegrator),
        With<Player>,
    >,
    mut jump_events: EventWriter<JumpIntent>,
) {
    for (entity, input, basis, mut integrator) in players.iter_mut() {
        if !input.move_axes.is_nan() && input.move_axes != Vec2::ZERO {
            let basis = basis.copied().unwrap_or_default();
            integrator.queue_movement(ground_plane_intent(input.move_axes, &basis), 1.0);
        }

        if input.jump {
            jump_events.write(JumpIntent {
                entity,
                force: config.jump_force,
            });
        }
    }
}

/// Input Plugin — translation в LocomotionSet::PlayerIntent
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            translate_player_input.in_set(LocomotionSet::PlayerIntent),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(actual: Vec3, expected: Vec3) {
        assert!((actual - expected).length() < 1e-5, "expected {:?}, got {:?}", expected, actual);
    }

    #[test]
    fn test_world_axes_without_rotation() {
        let basis = MovementBasis::default();

        assert_vec_eq(ground_plane_intent(Vec2::Y, &basis), Vec3::NEG_Z);
        assert_vec_eq(ground_plane_intent(Vec2::X, &basis), Vec3::X);
        assert_vec_eq(ground_plane_intent(Vec2::new(1.0, 1.0), &basis), Vec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn test_yaw_rotates_forward() {
        // Поворот на 90° влево: forward смотрит в -X
        let basis = MovementBasis {
            yaw: std::f32::consts::FRAC_PI_2,
        };

        assert_vec_eq(ground_plane_intent(Vec2::Y, &basis), Vec3::NEG_X);
        assert_vec_eq(ground_plane_intent(Vec2::X, &basis), Vec3::NEG_Z);
    }

    #[test]
    fn test_diagonal_not_faster_after_queue() {
        let mut straight = LocomotionIntegrator::default();
        let mut diagonal = LocomotionIntegrator::default();
        let basis = MovementBasis::default();

        straight.queue_movement(ground_plane_intent(Vec2::Y, &basis), 1.0);
        diagonal.queue_movement(ground_plane_intent(Vec2::new(1.0, 1.0), &basis), 1.0);

        assert!((straight.pending_movement().length() - 1.0).abs() < 1e-5);
        assert!((diagonal.pending_movement().length() - 1.0).abs() < 1e-5);
    }
}
