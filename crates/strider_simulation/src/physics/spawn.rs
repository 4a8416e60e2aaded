//! Spawn helper для locomotion актора
//!
//! Кроме наших компонентов вешает Rapier kinematic капсулу той же формы:
//! её Collider + CollisionGroups использует RapierCollider для sweep'ов,
//! host с RapierPhysicsPlugin видит того же актора.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::plane_world::{BodyShape, GroundContact};
use crate::config::LocomotionConfig;
use crate::locomotion::LocomotionIntegrator;

/// Collision group акторов
pub const ACTOR_GROUP: Group = Group::GROUP_2;
/// Collision group статической геометрии (стены, пол, препятствия)
pub const ENVIRONMENT_GROUP: Group = Group::GROUP_3;

/// Акторы коллайдят только со средой (актор-актор коллизий нет)
pub fn actor_collision_groups() -> CollisionGroups {
    CollisionGroups::new(ACTOR_GROUP, ENVIRONMENT_GROUP)
}

/// Полный набор компонентов locomotion актора
///
/// - Transform (центр капсулы)
/// - LocomotionIntegrator (профили из config)
/// - GroundContact + BodyShape (headless collider state)
/// - Rapier: RigidBody::KinematicPositionBased + Collider::capsule_y + CollisionGroups
pub fn locomotion_actor_bundle(position: Vec3, config: &LocomotionConfig) -> impl Bundle {
    let body = config.body;

    (
        Transform::from_translation(position),
        LocomotionIntegrator::new(config.profiles()),
        GroundContact::default(),
        body,
        RigidBody::KinematicPositionBased,
        Collider::capsule_y(body.half_height, body.radius),
        actor_collision_groups(),
    )
}

/// Spawn актора, стоящего ногами на `feet` (центр капсулы выше на center_height)
pub fn spawn_locomotion_actor(
    commands: &mut Commands,
    feet: Vec3,
    config: &LocomotionConfig,
) -> Entity {
    let position = feet + Vec3::Y * config.body.center_height();
    commands.spawn(locomotion_actor_bundle(position, config)).id()
}
