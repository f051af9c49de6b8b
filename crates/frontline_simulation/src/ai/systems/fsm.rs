//! FSM AI systems (target acquisition, state transitions).

use bevy::prelude::*;

use crate::actor::{Actor, Health};
use crate::ai::{next_state, AIConfig, AIState, AITarget, Perception};
use crate::combat::{AttackProfile, Dead};

/// Система: выбор цели
///
/// Текущая цель сохраняется, пока существует и не помечена `Dead`. Иначе —
/// ближайший живой актор другой фракции в пределах detection_range (или None).
pub fn acquire_targets(
    mut seekers: Query<(Entity, &Actor, &Transform, &AIConfig, &AIState, &mut AITarget)>,
    candidates: Query<(Entity, &Actor, &Transform), Without<Dead>>,
) {
    for (entity, actor, transform, config, state, mut target) in seekers.iter_mut() {
        if state.is_dead() {
            continue;
        }

        let current_valid = target.0.is_some_and(|current| candidates.contains(current));
        if current_valid {
            continue;
        }

        let nearest = find_nearest_hostile(
            entity,
            actor,
            transform,
            &candidates,
            config.detection_range,
        );

        if target.0 != nearest {
            match nearest {
                Some(new_target) => crate::log(&format!(
                    "👁️ AI: {:?} acquired target {:?}",
                    entity, new_target
                )),
                None => crate::log(&format!("👻 AI: {:?} lost target {:?}", entity, target.0)),
            }
            target.0 = nearest;
        }
    }
}

/// Helper: ближайший живой враждебный актор в радиусе
fn find_nearest_hostile(
    self_entity: Entity,
    self_actor: &Actor,
    self_transform: &Transform,
    candidates: &Query<(Entity, &Actor, &Transform), Without<Dead>>,
    max_range: f32,
) -> Option<Entity> {
    let mut nearest: Option<(Entity, f32)> = None;

    for (candidate, candidate_actor, candidate_transform) in candidates.iter() {
        if candidate == self_entity || !self_actor.is_hostile_to(candidate_actor) {
            continue;
        }

        let distance = self_transform
            .translation
            .distance(candidate_transform.translation);
        if distance > max_range {
            continue;
        }

        if nearest.map_or(true, |(_, best)| distance < best) {
            nearest = Some((candidate, distance));
        }
    }

    nearest.map(|(entity, _)| entity)
}

/// Система: AI FSM transitions
///
/// Idle → Pursue → Attack по дистанции до цели (чистая функция `next_state`).
/// Цель пропала или мертва → Idle. Dead терминален.
pub fn ai_fsm_transitions(
    mut enemies: Query<(
        Entity,
        &mut AIState,
        &AIConfig,
        &AITarget,
        &Transform,
        &Health,
        Option<&AttackProfile>,
    )>,
    targets: Query<(&Transform, &Health)>,
) {
    for (entity, mut state, config, target, transform, health, attack) in enemies.iter_mut() {
        if state.is_dead() {
            continue;
        }

        if health.is_dead() {
            crate::log(&format!("AI: {:?} {} → Dead", entity, state.name()));
            *state = AIState::Dead;
            continue;
        }

        let perception = target.0.and_then(|target_entity| {
            let (target_transform, target_health) = targets.get(target_entity).ok()?;
            target_health.is_alive().then(|| Perception {
                target: target_entity,
                distance: transform.translation.distance(target_transform.translation),
            })
        });

        let next = next_state(
            *state,
            perception,
            config,
            attack.map(|profile| profile.range),
            attack.is_some_and(|profile| profile.swinging),
        );

        if next != *state {
            crate::log(&format!(
                "AI: {:?} {} → {} (distance {:?})",
                entity,
                state.name(),
                next.name(),
                perception.map(|p| p.distance)
            ));
            *state = next;
        }
    }
}
