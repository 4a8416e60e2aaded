//! Контракт collision primitive (предоставляется host'ом)
//!
//! Интегратор не владеет средой: коллайдер одалживается на каждый вызов.
//! Headless реализация — `physics::PlaneCollider`.

use bevy::prelude::*;

/// Результат одного sweep'а
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveResult {
    /// Движение было ограничено геометрией (контакт, скольжение, упор)
    pub obstructed: bool,
    /// Фактическое смещение после constraint solve (не бинарное accept/reject)
    pub actual_displacement: Vec3,
}

impl MoveResult {
    pub fn unobstructed(displacement: Vec3) -> Self {
        Self {
            obstructed: false,
            actual_displacement: displacement,
        }
    }

    pub fn blocked(actual_displacement: Vec3) -> Self {
        Self {
            obstructed: true,
            actual_displacement,
        }
    }
}

/// Ground contact query (независимо от attempt_move)
pub trait GroundProbe {
    fn is_ground_contact(&self) -> bool;
}

/// Collision-aware move primitive (capsule sweep host'а)
pub trait CharacterCollider: GroundProbe {
    fn attempt_move(&mut self, displacement: Vec3) -> MoveResult;
}

impl<T: GroundProbe + ?Sized> GroundProbe for &T {
    fn is_ground_contact(&self) -> bool {
        (**self).is_ground_contact()
    }
}

impl<T: GroundProbe + ?Sized> GroundProbe for &mut T {
    fn is_ground_contact(&self) -> bool {
        (**self).is_ground_contact()
    }
}

impl<T: CharacterCollider + ?Sized> CharacterCollider for &mut T {
    fn attempt_move(&mut self, displacement: Vec3) -> MoveResult {
        (**self).attempt_move(displacement)
    }
}

/// Velocity канала после коллизии
///
/// - не заблокирован → velocity без изменений (остаётся "истинной" скоростью)
/// - заблокирован → velocity = реально пройденное смещение / dt
///
/// Постоянно заблокированный канал сходится к скорости скольжения, а не осциллирует.
/// Вызывающий гарантирует `delta_time > 0`.
pub fn resolve_velocity(attempted: Vec3, result: &MoveResult, delta_time: f32) -> Vec3 {
    if result.obstructed {
        result.actual_displacement / delta_time
    } else {
        attempted
    }
}

/// Один sweep канала через коллайдер + resolve
pub fn resolve_channel<C: CharacterCollider + ?Sized>(
    collider: &mut C,
    velocity: Vec3,
    delta_time: f32,
) -> Vec3 {
    let result = collider.attempt_move(velocity * delta_time);
    resolve_velocity(velocity, &result, delta_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unobstructed_keeps_velocity() {
        let velocity = Vec3::new(3.0, -1.0, 0.5);
        // actual может отличаться (float) — не важно, velocity не трогаем
        let result = MoveResult::unobstructed(velocity * 0.1 + Vec3::splat(1e-4));

        assert_eq!(resolve_velocity(velocity, &result, 0.1), velocity);
    }

    #[test]
    fn test_full_stall_against_wall() {
        let velocity = Vec3::new(5.0, 0.0, 0.0);
        let result = MoveResult::blocked(Vec3::ZERO);

        assert_eq!(resolve_velocity(velocity, &result, 0.016), Vec3::ZERO);
    }

    #[test]
    fn test_sliding_becomes_realized_velocity() {
        // Диагональ в стену X: остаётся только Z компонента
        let velocity = Vec3::new(4.0, 0.0, 4.0);
        let result = MoveResult::blocked(Vec3::new(0.0, 0.0, 0.4));

        let resolved = resolve_velocity(velocity, &result, 0.1);
        assert!((resolved - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
    }
}
