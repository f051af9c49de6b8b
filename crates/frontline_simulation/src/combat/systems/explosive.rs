//! Explosion system: мёртвые explosives детонируют, цепная реакция в том же тике.

use std::collections::{HashSet, VecDeque};

use bevy::prelude::*;

use crate::actor::Health;
use crate::combat::{explosion_damage, DamageDealt, EntityDied, Explosive};
use crate::presentation::{Cue, PresentationCue, SoundClip};

/// Система: детонация explosives
///
/// Источник — любой мёртвый explosive с `detonated == false` (убит DamageRequest
/// в этом тике). Урон с falloff применяется к каждому entity с Health в радиусе.
/// Explosive, убитый взрывом, встаёт в очередь и детонирует следом.
/// `detonated` + visited set гарантируют один взрыв на entity.
pub fn detonate_explosives(
    mut bodies: Query<(Entity, &Transform, &mut Health, Option<&mut Explosive>)>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    mut cues: EventWriter<PresentationCue>,
) {
    let mut queue: VecDeque<Entity> = bodies
        .iter()
        .filter(|(_, _, health, explosive)| {
            health.is_dead() && explosive.as_ref().is_some_and(|e| !e.detonated)
        })
        .map(|(entity, ..)| entity)
        .collect();

    if queue.is_empty() {
        return;
    }

    let mut visited: HashSet<Entity> = HashSet::new();

    while let Some(source) = queue.pop_front() {
        if !visited.insert(source) {
            continue;
        }

        let (origin, radius, base_damage) = {
            let Ok((_, transform, _, Some(mut explosive))) = bodies.get_mut(source) else {
                continue;
            };
            if explosive.detonated {
                continue;
            }
            explosive.detonated = true;
            (transform.translation, explosive.radius, explosive.damage)
        };

        crate::log_info(&format!(
            "💥 Explosive {:?} detonated (radius {}, damage {})",
            source, radius, base_damage
        ));
        cues.write(PresentationCue::new(source, Cue::Explosion));
        cues.write(PresentationCue::new(source, Cue::Sound(SoundClip::Explosion)));

        let victims: Vec<(Entity, f32)> = bodies
            .iter()
            .filter(|(entity, ..)| *entity != source)
            .map(|(entity, transform, ..)| (entity, origin.distance(transform.translation)))
            .filter(|(_, distance)| *distance <= radius)
            .collect();

        for (victim, distance) in victims {
            let damage = explosion_damage(base_damage, distance, radius);
            if damage == 0 {
                continue;
            }

            let Ok((_, _, mut health, explosive)) = bodies.get_mut(victim) else {
                continue;
            };

            let outcome = health.apply_damage(damage);

            if outcome.damaged {
                damage_dealt_events.write(DamageDealt {
                    attacker: Some(source),
                    target: victim,
                    damage: outcome.lost,
                    target_died: outcome.killed,
                });
            }

            if outcome.killed {
                crate::log_info(&format!("💀 Entity {:?} killed by explosion of {:?}", victim, source));
                entity_died_events.write(EntityDied {
                    entity: victim,
                    killer: Some(source),
                });

                if explosive.is_some_and(|e| !e.detonated) {
                    queue.push_back(victim);
                }
            }
        }
    }
}
