//! Attack systems: старт атак в Attack state и отложенные удары.

use bevy::prelude::*;

use crate::actor::Health;
use crate::ai::AIState;
use crate::combat::{AttackProfile, DamageRequest};
use crate::presentation::{AnimationTrigger, Cue, PresentationCue, SoundClip};
use crate::schedule::{DeferredAction, ScheduledActions};

/// Система: AI attack execution
///
/// Для врагов в `AIState::Attack`: цель жива, в радиусе, cooldown прошёл,
/// (опционально) враг смотрит на цель → атака.
/// Провал facing check не тратит cooldown.
pub fn ai_attack_execution(
    mut attackers: Query<(
        Entity,
        &AIState,
        &Transform,
        &Health,
        &mut AttackProfile,
        &mut ScheduledActions,
    )>,
    targets: Query<(&Transform, &Health)>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut cues: EventWriter<PresentationCue>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, state, transform, health, mut profile, mut schedule) in attackers.iter_mut() {
        let AIState::Attack { target } = *state else {
            continue;
        };

        if health.is_dead() || !profile.can_attack(now) {
            continue;
        }

        let Ok((target_transform, target_health)) = targets.get(target) else {
            crate::log(&format!("AI: {:?} attack target {:?} missing, skip", entity, target));
            continue;
        };

        if target_health.is_dead() {
            continue;
        }

        let to_target = target_transform.translation - transform.translation;
        if to_target.length() > profile.range {
            continue;
        }

        let forward: Vec3 = *transform.forward();
        if !profile.facing_allows(forward, to_target) {
            continue;
        }

        profile.start_attack(now);

        cues.write(PresentationCue::new(entity, Cue::Animation(AnimationTrigger::Attack)));
        cues.write(PresentationCue::new(entity, Cue::Sound(SoundClip::Attack)));

        if profile.strike_delay > 0.0 {
            schedule.schedule(
                now + profile.strike_delay,
                DeferredAction::Strike {
                    target,
                    damage: profile.damage,
                    range: profile.range,
                },
            );
            crate::log(&format!(
                "⚔️ {:?} swings at {:?} (strike in {:.2}s)",
                entity, target, profile.strike_delay
            ));
        } else {
            damage_requests.write(DamageRequest::new(Some(entity), target, profile.damage));
            crate::log(&format!(
                "⚔️ {:?} attacks {:?} ({} damage)",
                entity, target, profile.damage
            ));
        }

        if profile.swinging {
            schedule.schedule(now + profile.swing_duration, DeferredAction::EndSwing);
        }
    }
}

/// Система: выполнение отложенных действий
///
/// Strike перепроверяет цель на момент удара: мертва, despawned или вышла
/// из радиуса → промах.
pub fn run_scheduled_actions(
    mut owners: Query<(
        Entity,
        &Transform,
        &Health,
        &mut ScheduledActions,
        Option<&mut AttackProfile>,
    )>,
    targets: Query<(&Transform, &Health)>,
    mut damage_requests: EventWriter<DamageRequest>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, health, mut schedule, mut profile) in owners.iter_mut() {
        if schedule.is_empty() {
            continue;
        }

        // Смерть чистит очередь в handle_deaths; здесь — на случай гонки в одном тике
        if health.is_dead() {
            schedule.cancel_all();
            continue;
        }

        for action in schedule.take_due(now) {
            match action {
                DeferredAction::Strike {
                    target,
                    damage,
                    range,
                } => {
                    let in_reach = targets.get(target).is_ok_and(|(target_transform, target_health)| {
                        target_health.is_alive()
                            && transform.translation.distance(target_transform.translation) <= range
                    });

                    if in_reach {
                        damage_requests.write(DamageRequest::new(Some(entity), target, damage));
                    } else {
                        crate::log(&format!("AI: {:?} strike at {:?} missed", entity, target));
                    }
                }
                DeferredAction::EndSwing => {
                    if let Some(profile) = profile.as_mut() {
                        profile.end_swing();
                    }
                }
            }
        }
    }
}
