//! AI module — второй источник locomotion intent'ов
//!
//! Сейчас только wander driver (случайное направление + редкие прыжки).

use bevy::prelude::*;

pub mod wander;

pub use wander::{drive_wanderers, Wanderer};

use crate::locomotion::LocomotionSet;

/// AI Plugin — drivers в LocomotionSet::AiIntent (после player input, до step'а)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, drive_wanderers.in_set(LocomotionSet::AiIntent));
    }
}
