//! FSM AI components (state, sense config, tracked target) + чистая функция переходов.

use bevy::prelude::*;

use crate::config::SenseConfig;

/// Состояние врага: Idle → Pursue → Attack → Dead
///
/// Dead терминален. Ровно одно состояние на врага.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Цель не обнаружена (или потеряна)
    #[default]
    Idle,

    /// Сближение с целью
    Pursue { target: Entity },

    /// Цель в радиусе атаки, бьём по cooldown
    Attack { target: Entity },

    /// Мёртв, AI отключен навсегда
    Dead,
}

impl AIState {
    pub fn target(&self) -> Option<Entity> {
        match self {
            AIState::Pursue { target } | AIState::Attack { target } => Some(*target),
            AIState::Idle | AIState::Dead => None,
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, AIState::Dead)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AIState::Idle => "Idle",
            AIState::Pursue { .. } => "Pursue",
            AIState::Attack { .. } => "Attack",
            AIState::Dead => "Dead",
        }
    }
}

/// Радиусы восприятия
///
/// Инвариант: detection_loss_range ≥ detection_range (hysteresis).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AIConfig {
    pub detection_range: f32,
    pub detection_loss_range: f32,
    /// false = турель (не получает команд движения)
    pub mobile: bool,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            detection_range: 10.0,
            detection_loss_range: 10.0,
            mobile: true,
        }
    }
}

impl From<&SenseConfig> for AIConfig {
    fn from(sense: &SenseConfig) -> Self {
        Self {
            detection_range: sense.detection_range,
            detection_loss_range: sense.detection_loss_range.max(sense.detection_range),
            mobile: sense.mobile,
        }
    }
}

/// Отслеживаемая цель (typed handle, резолвится при спавне или acquire_targets)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AITarget(pub Option<Entity>);

/// Что враг знает о цели на этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub target: Entity,
    pub distance: f32,
}

/// Чистая функция переходов FSM
///
/// - `perception` None = цели нет / мертва / despawned → Idle
/// - `attack_range` None = враг без атаки (только преследует)
/// - `mid_attack` = идёт замах, из Attack не выходим
///
/// При одновременном выполнении условий Attack и Pursue побеждает Attack.
pub fn next_state(
    state: AIState,
    perception: Option<Perception>,
    config: &AIConfig,
    attack_range: Option<f32>,
    mid_attack: bool,
) -> AIState {
    if state.is_dead() {
        return AIState::Dead;
    }

    let Some(Perception { target, distance }) = perception else {
        return AIState::Idle;
    };

    let in_attack_range = attack_range.is_some_and(|range| distance <= range);

    match state {
        AIState::Dead => AIState::Dead,

        AIState::Idle => {
            if distance > config.detection_range {
                AIState::Idle
            } else if in_attack_range {
                AIState::Attack { target }
            } else {
                AIState::Pursue { target }
            }
        }

        AIState::Pursue { .. } => {
            if in_attack_range {
                AIState::Attack { target }
            } else if distance > config.detection_loss_range {
                AIState::Idle
            } else {
                AIState::Pursue { target }
            }
        }

        AIState::Attack { .. } => {
            if in_attack_range || mid_attack {
                AIState::Attack { target }
            } else {
                AIState::Pursue { target }
            }
        }
    }
}
