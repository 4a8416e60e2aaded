//! Locomotion ECS systems (FixedUpdate)

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups};

use super::events::{JumpIntent, Jumped, Landed};
use super::integrator::LocomotionIntegrator;
use crate::config::LocomotionConfig;
use crate::logger::{log, log_warning};
use crate::physics::{
    BodyShape, GroundContact, PlaneCollider, PlaneWorld, RapierCollider, RapierEnvironment,
};

/// Система: JumpIntent → try_jump
///
/// Один прыжок на актора за tick: повторный try_jump того же tick'а
/// снова обнулил бы force канал и удвоил impulse.
pub fn apply_jump_intents(
    mut intents: EventReader<JumpIntent>,
    mut actors: Query<(&mut LocomotionIntegrator, &GroundContact)>,
    mut jumped: EventWriter<Jumped>,
) {
    let mut handled = HashSet::new();

    for intent in intents.read() {
        if !handled.insert(intent.entity) {
            continue;
        }

        let Ok((mut integrator, contact)) = actors.get_mut(intent.entity) else {
            continue;
        };

        if integrator.try_jump(contact, intent.force) {
            log(&format!("Entity {:?} jumped (force {:.1})", intent.entity, intent.force));
            jumped.write(Jumped {
                entity: intent.entity,
                force: intent.force,
            });
        }
    }
}

/// Система: один locomotion step на актора
///
/// Среда: RapierEnvironment (если вставлен и у актора есть rapier Collider),
/// иначе PlaneWorld. Каждый актор — свой collider адаптер.
/// Landed отправляется на переходе was_grounded false → true.
pub fn step_locomotion(
    world: Res<PlaneWorld>,
    rapier: Option<Res<RapierEnvironment>>,
    time: Res<Time<Fixed>>,
    mut actors: Query<(
        Entity,
        &mut LocomotionIntegrator,
        &mut Transform,
        &mut GroundContact,
        &BodyShape,
        Option<(&Collider, &CollisionGroups)>,
    )>,
    mut landed: EventWriter<Landed>,
) {
    let delta = time.delta_secs();
    let rapier = rapier.as_deref();

    for (entity, mut integrator, mut transform, mut contact, body, shape) in actors.iter_mut() {
        let was_grounded = integrator.was_grounded();
        let fall_speed = (-integrator.force_velocity().y).max(0.0);

        let stepped = match (rapier, shape) {
            (Some(environment), Some((collider, groups))) => {
                let mut collider = RapierCollider::new(
                    environment,
                    collider,
                    *groups,
                    &mut transform,
                    &mut contact,
                    delta,
                );
                integrator.step(&mut collider, delta)
            }
            _ => {
                let mut collider = PlaneCollider::new(&world, body, &mut transform, &mut contact);
                integrator.step(&mut collider, delta)
            }
        };

        if !stepped {
            log_warning(&format!(
                "Locomotion step skipped for {:?}: invalid delta {}",
                entity, delta
            ));
            continue;
        }

        if !was_grounded && integrator.was_grounded() {
            log(&format!("Entity {:?} landed ({:.2} m/s)", entity, fall_speed));
            landed.write(Landed {
                entity,
                impact_speed: fall_speed,
            });
        }
    }
}

/// Startup: предупредить о невалидном тюнинге (интегратор сам не клампит)
pub fn report_invalid_config(config: Res<LocomotionConfig>) {
    if let Err(err) = config.validate() {
        log_warning(&format!("Invalid locomotion config: {}", err));
    }
}
