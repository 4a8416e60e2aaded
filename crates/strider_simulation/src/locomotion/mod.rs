//! Locomotion domain — интеграция скорости персонажа
//!
//! Содержит:
//! - MotionProfile (тюнинг ground / air режима)
//! - LocomotionIntegrator (movement + force каналы, grounded/airborne, jump)
//! - CharacterCollider / GroundProbe (контракт collision primitive host'а)
//! - JumpIntent / Jumped / Landed (events)
//!
//! Порядок в FixedUpdate (LocomotionSet, chain):
//! 1. PlayerIntent — input translation (InputPlugin)
//! 2. AiIntent — AI drivers (AIPlugin)
//! 3. Integrate — apply_jump_intents → step_locomotion

use bevy::prelude::*;

pub mod collider;
pub mod events;
pub mod integrator;
pub mod profile;
pub mod systems;


pub use collider::{resolve_channel, resolve_velocity, CharacterCollider, GroundProbe, MoveResult};
pub use events::{JumpIntent, Jumped, Landed};
pub use integrator::{LocomotionIntegrator, MotionProfiles};
pub use profile::{drag_factor, MotionProfile, ProfileError};
pub use systems::{apply_jump_intents, report_invalid_config, step_locomotion};

use crate::config::LocomotionConfig;
use crate::physics::PlaneWorld;

/// Фазы locomotion tick'а: все intent'ы пишутся до step'а
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    PlayerIntent,
    AiIntent,
    Integrate,
}

/// Locomotion Plugin
///
/// Регистрирует events, дефолтные ресурсы (если host не вставил свои)
/// и integrate системы в FixedUpdate.
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocomotionConfig>()
            .init_resource::<PlaneWorld>()
            .add_event::<JumpIntent>()
            .add_event::<Jumped>()
            .add_event::<Landed>();

        app.configure_sets(
            FixedUpdate,
            (
                LocomotionSet::PlayerIntent,
                LocomotionSet::AiIntent,
                LocomotionSet::Integrate,
            )
                .chain(),
        );

        app.add_systems(Startup, report_invalid_config);
        app.add_systems(
            FixedUpdate,
            (apply_jump_intents, step_locomotion)
                .chain()
                .in_set(LocomotionSet::Integrate),
        );
    }
}
