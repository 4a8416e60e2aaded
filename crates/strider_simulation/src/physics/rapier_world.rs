//! Rapier-backed collision среда
//!
//! Статическая геометрия (пол, стены, блоки) живёт в собственном rapier
//! ColliderSet + BVH broad-phase. Sweep капсулы — rapier
//! KinematicCharacterController::move_shape, синхронно, без RapierPhysicsPlugin
//! и без шага симуляции (нужны только scene queries).
//!
//! Форма и collision groups актора берутся из его bevy_rapier компонентов
//! (`Collider`, `CollisionGroups`), которые вешает `locomotion_actor_bundle`.

use bevy::prelude::*;
use bevy_rapier3d::parry::query::DefaultQueryDispatcher;
use bevy_rapier3d::prelude::{Collider, CollisionGroups};
use bevy_rapier3d::rapier::control::{CharacterLength, KinematicCharacterController};
use bevy_rapier3d::rapier::prelude::{
    nalgebra, vector, BroadPhase, BroadPhaseBvh, ColliderBuilder, ColliderHandle, ColliderSet,
    IntegrationParameters, InteractionGroups, Isometry, QueryFilter, RigidBodySet,
};

use super::plane_world::GroundContact;
use super::spawn::{ACTOR_GROUP, ENVIRONMENT_GROUP};
use crate::locomotion::{CharacterCollider, GroundProbe, MoveResult};

/// Зазор между капсулой и геометрией (совпадает со skin width PlaneWorld)
pub const CONTROLLER_OFFSET: f32 = 0.02;

/// Разница desired/effective больше этого — sweep упёрся
const OBSTRUCTION_EPSILON: f32 = 1.0e-5;

/// Результат одного rapier sweep'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub translation: Vec3,
    pub grounded: bool,
}

/// Статическая геометрия для rapier character controller'а
///
/// Когда resource вставлен, `step_locomotion` двигает акторов с rapier
/// `Collider` через него вместо PlaneWorld.
#[derive(Resource)]
pub struct RapierEnvironment {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    controller: KinematicCharacterController,
}

impl Default for RapierEnvironment {
    fn default() -> Self {
        Self::empty()
    }
}

impl RapierEnvironment {
    pub fn empty() -> Self {
        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(CONTROLLER_OFFSET),
            // Прилипание к полу сломало бы прыжок: force канал решает сам
            snap_to_ground: None,
            ..default()
        };

        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            broad_phase: BroadPhaseBvh::new(),
            controller,
        }
    }

    /// Пол (верхняя грань на `floor_y`) размером 2·half_extent
    pub fn with_floor(floor_y: f32, half_extent: f32) -> Self {
        let mut environment = Self::empty();
        environment.add_floor(floor_y, half_extent);
        environment
    }

    /// Пол + 4 стены (внутренние грани на ±half_extent по X и Z)
    pub fn arena(floor_y: f32, half_extent: f32) -> Self {
        const WALL_THICKNESS: f32 = 0.5;
        const WALL_HEIGHT: f32 = 10.0;

        let mut environment = Self::with_floor(floor_y, half_extent + WALL_THICKNESS * 2.0);
        let center = half_extent + WALL_THICKNESS;
        let span = half_extent + WALL_THICKNESS * 2.0;
        let y = floor_y + WALL_HEIGHT * 0.5;

        for sign in [-1.0, 1.0] {
            environment.add_block(
                Vec3::new(sign * center, y, 0.0),
                Vec3::new(WALL_THICKNESS, WALL_HEIGHT * 0.5, span),
            );
            environment.add_block(
                Vec3::new(0.0, y, sign * center),
                Vec3::new(span, WALL_HEIGHT * 0.5, WALL_THICKNESS),
            );
        }

        environment
    }

    pub fn add_floor(&mut self, floor_y: f32, half_extent: f32) -> ColliderHandle {
        self.add_block(
            Vec3::new(0.0, floor_y - 0.5, 0.0),
            Vec3::new(half_extent, 0.5, half_extent),
        )
    }

    /// Статический box (cuboid) в группе ENVIRONMENT
    pub fn add_block(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let groups: InteractionGroups = CollisionGroups::new(ENVIRONMENT_GROUP, ACTOR_GROUP).into();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .collision_groups(groups)
            .build();

        let handle = self.colliders.insert(collider);
        self.broad_phase.update(
            &IntegrationParameters::default(),
            &self.colliders,
            &self.bodies,
            &[handle],
            &[],
            &mut Vec::new(),
        );
        handle
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Sweep формы `shape` из `center` на `displacement`
    ///
    /// Rapier скользит вдоль препятствий и сам определяет grounded
    /// (пол под капсулой в пределах offset, уклон ≤ 45°).
    pub fn sweep(
        &self,
        shape: &Collider,
        groups: CollisionGroups,
        center: Vec3,
        displacement: Vec3,
        delta_time: f32,
    ) -> Sweep {
        let dispatcher = DefaultQueryDispatcher;
        let filter = QueryFilter {
            groups: Some(groups.into()),
            ..default()
        };
        let queries =
            self.broad_phase
                .as_query_pipeline(&dispatcher, &self.bodies, &self.colliders, filter);

        let movement = self.controller.move_shape(
            delta_time,
            &queries,
            &*shape.raw,
            &Isometry::translation(center.x, center.y, center.z),
            vector![displacement.x, displacement.y, displacement.z],
            |_| {},
        );

        Sweep {
            translation: Vec3::new(
                movement.translation.x,
                movement.translation.y,
                movement.translation.z,
            ),
            grounded: movement.grounded,
        }
    }
}

/// Адаптер одного актора к CharacterCollider поверх RapierEnvironment
pub struct RapierCollider<'a> {
    environment: &'a RapierEnvironment,
    shape: &'a Collider,
    groups: CollisionGroups,
    transform: &'a mut Transform,
    contact: &'a mut GroundContact,
    delta_time: f32,
}

impl<'a> RapierCollider<'a> {
    pub fn new(
        environment: &'a RapierEnvironment,
        shape: &'a Collider,
        groups: CollisionGroups,
        transform: &'a mut Transform,
        contact: &'a mut GroundContact,
        delta_time: f32,
    ) -> Self {
        Self {
            environment,
            shape,
            groups,
            transform,
            contact,
            delta_time,
        }
    }
}

impl GroundProbe for RapierCollider<'_> {
    fn is_ground_contact(&self) -> bool {
        self.contact.grounded
    }
}

impl CharacterCollider for RapierCollider<'_> {
    fn attempt_move(&mut self, displacement: Vec3) -> MoveResult {
        let sweep = self.environment.sweep(
            self.shape,
            self.groups,
            self.transform.translation,
            displacement,
            self.delta_time,
        );

        self.transform.translation += sweep.translation;
        self.contact.grounded = sweep.grounded;

        if (sweep.translation - displacement).length() > OBSTRUCTION_EPSILON {
            MoveResult::blocked(sweep.translation)
        } else {
            MoveResult::unobstructed(displacement)
        }
    }
}
