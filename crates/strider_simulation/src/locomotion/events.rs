//! Locomotion events

use bevy::prelude::*;

/// Event: намерение прыгнуть
///
/// Генерируется:
/// - translate_player_input (PlayerInput.jump)
/// - drive_wanderers (AI)
///
/// Обрабатывается apply_jump_intents: `try_jump` с grace window.
/// Несколько intent'ов на одного актора за tick = один прыжок.
#[derive(Event, Debug, Clone, Copy)]
pub struct JumpIntent {
    pub entity: Entity,
    pub force: f32,
}

/// Event: прыжок принят (для звука/анимации на стороне host'а)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Jumped {
    pub entity: Entity,
    pub force: f32,
}

/// Event: актор стал grounded по итогам step'а (переход airborne → grounded)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Landed {
    pub entity: Entity,
    /// Скорость падения force канала перед step'ом (≥ 0)
    pub impact_speed: f32,
}
