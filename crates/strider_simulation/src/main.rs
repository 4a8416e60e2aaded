//! Headless симуляция STRIDER
//!
//! Rapier арена с полом и стенами, игрок со скриптованным input'ом + wander NPC.

use bevy::prelude::*;
use strider_simulation::physics::spawn_locomotion_actor;
use strider_simulation::{
    create_headless_app, log_info, run_fixed_ticks, GroundContact, LocomotionConfig,
    LocomotionIntegrator, MovementBasis, Player, PlayerInput, RapierEnvironment,
    SimulationPlugin, Wanderer,
};

const TICKS: usize = 600;
const WANDERERS: usize = 4;
const DROP_HEIGHT: Vec3 = Vec3::new(0.0, 0.5, 0.0);

/// Startup: игрок в центре + NPC по кругу радиусом 8m
///
/// Спавн чуть над полом: первые тики акторы приземляются.
fn spawn_actors(mut commands: Commands, config: Res<LocomotionConfig>) {
    let player = spawn_locomotion_actor(&mut commands, DROP_HEIGHT, &config);
    commands.entity(player).insert((
        Player,
        PlayerInput {
            move_axes: Vec2::Y,
            jump: false,
        },
        MovementBasis { yaw: 0.3 },
    ));

    for i in 0..WANDERERS {
        let angle = i as f32 / WANDERERS as f32 * std::f32::consts::TAU;
        let feet = Vec3::new(angle.cos(), 0.0, angle.sin()) * 8.0 + DROP_HEIGHT;
        let npc = spawn_locomotion_actor(&mut commands, feet, &config);
        commands.entity(npc).insert(Wanderer::default());
    }
}

fn main() {
    let seed = 42;
    println!("Starting STRIDER headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::default())
        .insert_resource(RapierEnvironment::arena(0.0, 20.0))
        .add_systems(Startup, spawn_actors);

    // Startup: spawn + проверка config
    app.update();

    let player = {
        let world = app.world_mut();
        let mut players = world.query_filtered::<Entity, With<Player>>();
        players.iter(world).next()
    };
    let Some(player) = player else {
        println!("No player spawned, nothing to simulate");
        return;
    };

    for tick in 0..TICKS {
        // Прыжок раз в секунду, держим 5 тиков
        if let Some(mut input) = app.world_mut().get_mut::<PlayerInput>(player) {
            input.jump = tick % 60 < 5;
        }

        run_fixed_ticks(&mut app, 1);

        if tick % 100 == 0 {
            let world = app.world();
            if let (Some(transform), Some(integrator), Some(contact)) = (
                world.get::<Transform>(player),
                world.get::<LocomotionIntegrator>(player),
                world.get::<GroundContact>(player),
            ) {
                log_info(&format!(
                    "Tick {}: player at {:.2?}, speed {:.2} m/s, grounded {}",
                    tick,
                    transform.translation,
                    integrator.velocity().length(),
                    contact.grounded
                ));
            }
        }
    }

    println!("Simulation complete!");
}
