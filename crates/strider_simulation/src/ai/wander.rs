//! Wander driver: NPC бродит в случайных направлениях

use bevy::prelude::*;
use rand::Rng;

use crate::config::LocomotionConfig;
use crate::input::Player;
use crate::locomotion::{JumpIntent, LocomotionIntegrator};
use crate::DeterministicRng;

/// Wander состояние NPC
///
/// Каждые `interval` секунд — новое направление на плоскости земли,
/// с вероятностью `jump_chance` заодно прыжок.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Wanderer {
    pub interval: f32,
    /// 0.0..=1.0 на каждую смену направления
    pub jump_chance: f32,
    pub direction: Vec3,
    /// До следующей смены направления (0 → сменить на ближайшем tick'е)
    pub timer: f32,
}

impl Default for Wanderer {
    fn default() -> Self {
        Self {
            interval: 2.0,
            jump_chance: 0.25,
            direction: Vec3::ZERO,
            timer: 0.0,
        }
    }
}

/// Система: Wanderer → queue_movement / JumpIntent
///
/// Обход в порядке Entity — RNG тратится детерминированно.
pub fn drive_wanderers(
    time: Res<Time<Fixed>>,
    config: Res<LocomotionConfig>,
    mut rng: ResMut<DeterministicRng>,
    mut wanderers: Query<(Entity, &mut Wanderer, &mut LocomotionIntegrator), Without<Player>>,
    mut jump_events: EventWriter<JumpIntent>,
) {
    let delta = time.delta_secs();

    let mut rows: Vec<_> = wanderers.iter_mut().collect();
    rows.sort_by_key(|(entity, _, _)| *entity);

    for (entity, mut wanderer, mut integrator) in rows {
        wanderer.timer -= delta;

        if wanderer.timer <= 0.0 {
            let angle = rng.rng.gen::<f32>() * std::f32::consts::TAU;
            wanderer.direction = Vec3::new(angle.cos(), 0.0, angle.sin());
            wanderer.timer = wanderer.interval;

            if rng.rng.gen_bool(wanderer.jump_chance.max(0.0).min(1.0) as f64) {
                jump_events.write(JumpIntent {
                    entity,
                    force: config.jump_force,
                });
            }
        }

        integrator.queue_movement(wanderer.direction, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn wander_world() -> World {
        let mut world = World::new();
        world.insert_resource(DeterministicRng::new(3));
        world.insert_resource(LocomotionConfig::default());
        world.init_resource::<Events<JumpIntent>>();

        let mut time = Time::<Fixed>::from_hz(60.0);
        let timestep = time.timestep();
        time.advance_by(timestep);
        world.insert_resource(time);
        world
    }

    #[test]
    fn test_wanderer_picks_ground_direction() {
        let mut world = wander_world();
        let npc = world
            .spawn((
                Wanderer {
                    jump_chance: 1.0,
                    ..default()
                },
                LocomotionIntegrator::default(),
            ))
            .id();
        let player = world
            .spawn((Wanderer::default(), LocomotionIntegrator::default(), Player))
            .id();

        world.run_system_once(drive_wanderers).unwrap();

        let wanderer = world.get::<Wanderer>(npc).unwrap();
        assert_eq!(wanderer.timer, wanderer.interval);
        assert_eq!(wanderer.direction.y, 0.0);
        assert!((wanderer.direction.length() - 1.0).abs() < 1e-5);

        let pending = world.get::<LocomotionIntegrator>(npc).unwrap().pending_movement();
        assert!((pending - wanderer.direction).length() < 1e-5);

        // Player управляется input'ом, не AI
        let player_pending = world.get::<LocomotionIntegrator>(player).unwrap().pending_movement();
        assert_eq!(player_pending, Vec3::ZERO);

        let jumps = world.resource::<Events<JumpIntent>>();
        assert_eq!(jumps.len(), 1);
    }

    #[test]
    fn test_wanderer_keeps_direction_until_timer() {
        let mut world = wander_world();
        let npc = world
            .spawn((
                Wanderer {
                    direction: Vec3::X,
                    timer: 1.0,
                    jump_chance: 1.0,
                    ..default()
                },
                LocomotionIntegrator::default(),
            ))
            .id();

        world.run_system_once(drive_wanderers).unwrap();

        let wanderer = world.get::<Wanderer>(npc).unwrap();
        assert_eq!(wanderer.direction, Vec3::X);
        assert!(wanderer.timer < 1.0);
        assert!(world.resource::<Events<JumpIntent>>().is_empty());
    }
}
