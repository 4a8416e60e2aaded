//! LocomotionIntegrator — per-actor velocity integration
//!
//! Два независимых канала:
//! - movement: player intent (WASD, AI направление)
//! - force: внешние силы (gravity, jump/knockback impulses)
//!
//! Порядок step'а: profile по airborne → интеграция каналов → collision resolve
//! → drag → latch grounded → очистка intent очереди.

use bevy::prelude::*;

use super::collider::{resolve_channel, CharacterCollider, GroundProbe};
use super::profile::{drag_factor, MotionProfile};

/// Пара профилей (ground / air), выбор по `is_airborne()`
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct MotionProfiles {
    pub ground: MotionProfile,
    pub air: MotionProfile,
}

impl Default for MotionProfiles {
    fn default() -> Self {
        Self {
            ground: MotionProfile::grounded(),
            air: MotionProfile::airborne(),
        }
    }
}

/// Locomotion state актора
///
/// Владеется одним актором, мутируется раз в tick. Коллайдер среды
/// одалживается на вызов (`GroundProbe` / `CharacterCollider`), не хранится.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct LocomotionIntegrator {
    profiles: MotionProfiles,
    movement_velocity: Vec3,
    force_velocity: Vec3,
    pending_movement: Vec3,
    pending_impulse: Vec3,
    /// Grounded на конец прошлого step'а (false при spawn)
    was_grounded: bool,
}

impl LocomotionIntegrator {
    pub fn new(profiles: MotionProfiles) -> Self {
        Self {
            profiles,
            ..default()
        }
    }

    pub fn with_profiles(ground: MotionProfile, air: MotionProfile) -> Self {
        Self::new(MotionProfiles { ground, air })
    }

    pub fn profiles(&self) -> &MotionProfiles {
        &self.profiles
    }

    pub fn movement_velocity(&self) -> Vec3 {
        self.movement_velocity
    }

    pub fn force_velocity(&self) -> Vec3 {
        self.force_velocity
    }

    /// Суммарная скорость (для анимации/камеры)
    pub fn velocity(&self) -> Vec3 {
        self.movement_velocity + self.force_velocity
    }

    pub fn pending_movement(&self) -> Vec3 {
        self.pending_movement
    }

    pub fn pending_impulse(&self) -> Vec3 {
        self.pending_impulse
    }

    pub fn was_grounded(&self) -> bool {
        self.was_grounded
    }

    /// Добавить movement intent: normalize(direction) × magnitude
    ///
    /// Можно вызывать несколько раз за tick (разные источники) — суммируется.
    /// Нулевое/невалидное направление ничего не добавляет.
    pub fn queue_movement(&mut self, direction: Vec3, magnitude: f32) {
        self.pending_movement += direction.normalize_or_zero() * magnitude;
    }

    /// 2D intent на плоскости земли: (x, y) → (x, 0, y)
    pub fn queue_movement_2d(&mut self, direction: Vec2, magnitude: f32) {
        let input = direction.normalize_or_zero() * magnitude;
        self.pending_movement += Vec3::new(input.x, 0.0, input.y);
    }

    /// Мгновенная дельта скорости force канала (НЕ умножается на dt)
    pub fn queue_impulse(&mut self, direction: Vec3, magnitude: f32) {
        self.pending_impulse += direction.normalize_or_zero() * magnitude;
    }

    pub fn is_grounded<G: GroundProbe + ?Sized>(&self, probe: &G) -> bool {
        probe.is_ground_contact()
    }

    /// !grounded ИЛИ не был grounded на конце прошлого step'а
    ///
    /// Ровно один step после приземления оба предиката true:
    /// air профиль держится, пока контакт не простоит целый step.
    pub fn is_airborne<G: GroundProbe + ?Sized>(&self, probe: &G) -> bool {
        !probe.is_ground_contact() || !self.was_grounded
    }

    pub fn active_profile<G: GroundProbe + ?Sized>(&self, probe: &G) -> &MotionProfile {
        if self.is_airborne(probe) {
            &self.profiles.air
        } else {
            &self.profiles.ground
        }
    }

    /// Прыжок: grounded сейчас ИЛИ был grounded на конце прошлого step'а
    ///
    /// Успех: force канал обнуляется (накопленная скорость падения не переносится),
    /// затем ставится impulse вверх = `force`. Отказ — состояние не тронуто.
    pub fn try_jump<G: GroundProbe + ?Sized>(&mut self, probe: &G, force: f32) -> bool {
        if !(self.is_grounded(probe) || self.was_grounded) {
            return false;
        }

        self.force_velocity = Vec3::ZERO;
        self.queue_impulse(Vec3::Y, force);
        true
    }

    /// Один simulation step
    ///
    /// `delta_time <= 0` или не конечный (NaN, inf) — no-op: velocity и очередь intent'ов не трогаем,
    /// коллайдер не вызываем (resolve делит на dt).
    /// Возвращает false если step был пропущен.
    pub fn step<C: CharacterCollider + ?Sized>(&mut self, collider: &mut C, delta_time: f32) -> bool {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return false;
        }

        let profile = *self.active_profile(&*collider);

        // Movement канал: intent × accel, ограниченный accel, затем max speed
        let frame_input = (self.pending_movement * profile.movement_acceleration)
            .clamp_length_max(profile.movement_acceleration)
            * delta_time;
        self.movement_velocity =
            (self.movement_velocity + frame_input).clamp_length_max(profile.movement_max_speed);

        // Force канал: gravity × dt + impulse (impulse уже дельта скорости)
        let force_input = profile.constant_acceleration * delta_time + self.pending_impulse;
        self.force_velocity =
            (self.force_velocity + force_input).clamp_length_max(profile.force_max_speed);

        // Collision resolve — каналы независимо, два sweep'а
        self.movement_velocity = resolve_channel(collider, self.movement_velocity, delta_time);
        self.force_velocity = resolve_channel(collider, self.force_velocity, delta_time);

        self.movement_velocity *= drag_factor(profile.movement_drag, delta_time);
        self.force_velocity *= drag_factor(profile.force_drag, delta_time);

        self.was_grounded = collider.is_ground_contact();
        self.pending_movement = Vec3::ZERO;
        self.pending_impulse = Vec3::ZERO;

        true
    }
}
