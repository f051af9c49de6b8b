//! Damage systems: DamageRequest → Health ledger, смерть, деспавн.

use bevy::prelude::*;

use crate::actor::Health;
use crate::ai::AIState;
use crate::combat::{
    resolve_hit, AttackProfile, DamageDealt, DamageRequest, Dead, DeathSettle, DespawnAfter,
    EntityDied,
};
use crate::movement::MovementCommand;
use crate::presentation::{AnimationTrigger, Cue, PresentationCue, SoundClip};
use crate::schedule::ScheduledActions;

/// Система: применение DamageRequest событий
///
/// 1. Self-hit и несуществующие цели пропускаются (с логом)
/// 2. Ledger применяет урон (мёртвые игнорируют)
/// 3. DamageDealt при изменении ledger, EntityDied при смерти
pub fn resolve_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<&mut Health>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for request in requests.read() {
        if request.attacker == Some(request.target) {
            crate::log(&format!("Damage: self-hit by {:?} ignored", request.target));
            continue;
        }

        let Ok(mut health) = targets.get_mut(request.target) else {
            crate::log_warning(&format!(
                "⚠️ DamageRequest: target {:?} has no Health component",
                request.target
            ));
            continue;
        };

        let outcome = resolve_hit(request.attacker, request.target, &mut health, request.amount);

        if outcome.damaged {
            damage_dealt_events.write(DamageDealt {
                attacker: request.attacker,
                target: request.target,
                damage: outcome.lost,
                target_died: outcome.killed,
            });
        }

        if outcome.killed {
            entity_died_events.write(EntityDied {
                entity: request.target,
                killer: request.attacker,
            });
        }
    }
}

/// Система: переход в Dead
///
/// AIState → Dead, отложенные удары отменяются, движение останавливается,
/// ставится маркер Dead и (если есть DeathSettle) таймер деспавна.
pub fn handle_deaths(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    mut dying: Query<(
        Option<&mut AIState>,
        Option<&mut ScheduledActions>,
        Option<&mut AttackProfile>,
        Option<&mut MovementCommand>,
        Option<&DeathSettle>,
    )>,
    mut cues: EventWriter<PresentationCue>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for event in death_events.read() {
        let Ok((state, schedule, profile, command, settle)) = dying.get_mut(event.entity) else {
            continue;
        };

        if let Some(mut state) = state {
            if !state.is_dead() {
                crate::log(&format!("AI: {:?} {} → Dead", event.entity, state.name()));
                *state = AIState::Dead;
            }
        }

        if let Some(mut schedule) = schedule {
            let cancelled = schedule.cancel_all();
            if cancelled > 0 {
                crate::log(&format!(
                    "AI: {:?} died, {} scheduled actions cancelled",
                    event.entity, cancelled
                ));
            }
        }

        if let Some(mut profile) = profile {
            profile.end_swing();
        }

        if let Some(mut command) = command {
            command.set_if_changed(MovementCommand::Stop);
        }

        cues.write(PresentationCue::new(event.entity, Cue::Animation(AnimationTrigger::Die)));
        cues.write(PresentationCue::new(event.entity, Cue::Sound(SoundClip::Death)));

        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
            if let Some(DeathSettle(delay)) = settle {
                entity_commands.insert(DespawnAfter {
                    despawn_time: now + delay,
                });
            }
        }
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
