//! AI decision-making module
//!
//! Enemy state machine: Idle → Pursue → Attack → Dead.
//! Переходы — чистая функция дистанции до цели, атаки — в combat.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::*;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. acquire_targets — выбор/валидация цели
/// 2. ai_fsm_transitions — обновление FSM state
/// 3. ai_movement_from_state — конвертация state → MovementCommand
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (acquire_targets, ai_fsm_transitions, ai_movement_from_state)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Ai),
        );
    }
}
