//! Physics module
//!
//! Collision среды для locomotion:
//! - PlaneWorld: лёгкие half-space плоскости (тесты, простые арены)
//! - RapierEnvironment: rapier character controller по статическим коллайдерам
//!
//! Spawn актора вешает rapier капсулу, её форму и groups читает RapierCollider.
//! Host physics подключается через `locomotion::CharacterCollider`.

pub mod plane_world;
pub mod rapier_world;
pub mod spawn;

pub use plane_world::{BodyShape, CollisionPlane, GroundContact, PlaneCollider, PlaneWorld};
pub use rapier_world::{RapierCollider, RapierEnvironment, Sweep, CONTROLLER_OFFSET};
pub use spawn::{
    actor_collision_groups, locomotion_actor_bundle, spawn_locomotion_actor, ACTOR_GROUP,
    ENVIRONMENT_GROUP,
};
