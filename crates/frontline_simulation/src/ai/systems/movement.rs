//! AI movement systems.

use bevy::prelude::*;

use crate::ai::{AIConfig, AIState};
use crate::movement::MovementCommand;

/// Система: AI movement from state
///
/// Конвертирует AIState → MovementCommand для navigation agent движка.
/// Неподвижные (турели) никогда не получают MoveToPosition.
pub fn ai_movement_from_state(
    mut ai_query: Query<(Entity, &AIState, &AIConfig, &mut MovementCommand)>,
    targets: Query<&Transform>,
) {
    for (entity, state, config, mut command) in ai_query.iter_mut() {
        let desired = match state {
            AIState::Idle => MovementCommand::Idle,
            AIState::Attack { .. } | AIState::Dead => MovementCommand::Stop,
            AIState::Pursue { target } => match targets.get(*target) {
                Ok(target_transform) if config.mobile => MovementCommand::MoveToPosition {
                    target: target_transform.translation,
                },
                // Турель или цель пропала (FSM переведёт в Idle на следующем тике)
                _ => MovementCommand::Stop,
            },
        };

        // Проверяем что команда изменилась — иначе Changed<MovementCommand> спамит
        let was_moving = matches!(*command, MovementCommand::MoveToPosition { .. });
        if command.set_if_changed(desired) && !was_moving {
            crate::log(&format!("🏃 AI movement: {:?} → {:?}", entity, desired));
        }
    }
}
