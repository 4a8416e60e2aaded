//! STRIDER Simulation Core
//!
//! Character locomotion на Bevy 0.16 ECS (headless).
//!
//! - locomotion: интегратор скорости (movement + force каналы), grounded/airborne, jump
//! - physics: headless collision среда (PlaneWorld) + Rapier капсула актора
//! - input / ai: источники intent'ов (player axes, wander driver)
//!
//! Host engine подключает свою физику через `locomotion::CharacterCollider`.

use std::fmt::Debug;

use bevy::ecs::event::event_update_system;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod config;
pub mod input;
pub mod locomotion;
pub mod logger;
pub mod physics;

pub use ai::{AIPlugin, Wanderer};
pub use config::{ConfigError, LocomotionConfig};
pub use input::{InputPlugin, MovementBasis, Player, PlayerInput};
pub use locomotion::{
    CharacterCollider, GroundProbe, JumpIntent, Jumped, Landed, LocomotionIntegrator,
    LocomotionPlugin, LocomotionSet, MotionProfile, MoveResult,
};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter, LOGGER_LEVEL,
};
pub use physics::{spawn_locomotion_actor, BodyShape, GroundContact, PlaneWorld, RapierEnvironment};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Config вставляется как Resource; fixed timestep берётся из `config.fixed_hz`.
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: LocomotionConfig,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // RNG мог быть уже вставлен create_headless_app(seed) — не перетираем seed
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.insert_resource(Time::<Fixed>::from_hz(self.config.fixed_hz))
            .insert_resource(self.config.clone())
            .add_plugins((LocomotionPlugin, InputPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Прогоняет `ticks` FixedUpdate шагов ровно по timestep, без wall clock
///
/// `app.update()` запускает FixedUpdate по реальному времени (0..N раз за frame),
/// для headless прогонов и тестов нужен точный счёт тиков.
/// После каждого tick'а свапаем event буферы (обычно это делает `First`),
/// иначе Events<_> растут без ограничения.
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        let world = app.world_mut();
        let timestep = world.resource::<Time<Fixed>>().timestep();
        world.resource_mut::<Time<Fixed>>().advance_by(timestep);

        if let Err(err) = world.try_run_schedule(FixedUpdate) {
            log_warning(&format!("Fixed tick aborted: {}", err));
            return;
        }

        if let Err(err) = world.run_system_once(event_update_system) {
            log_warning(&format!("Event buffers not updated: {}", err));
            return;
        }
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component + Debug>(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
