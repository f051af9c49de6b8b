//! Спавн combat entities из профилей

use bevy::prelude::*;

use crate::actor::{Actor, Enemy, Health, Player, ScoreReward, HOSTILE_FACTION, PLAYER_FACTION};
use crate::ai::{AIConfig, AIState, AITarget};
use crate::combat::{AttackProfile, DeathSettle, Explosive};
use crate::config::EnemyProfile;
use crate::movement::MovementCommand;

/// Спавн врага по профилю
///
/// `target` — typed handle цели (обычно игрок), резолвится один раз здесь.
/// Профиль без `sense` (бочка) не получает ни Actor, ни AI.
pub fn spawn_enemy(
    commands: &mut Commands,
    profile: &EnemyProfile,
    transform: Transform,
    target: Option<Entity>,
) -> Entity {
    let mut entity = commands.spawn((
        Name::new(profile.name.clone()),
        transform,
        Health::with_policy(profile.max_health, profile.death_policy),
        ScoreReward(profile.score_reward),
        DeathSettle(profile.despawn_delay),
    ));

    if profile.counts_as_enemy {
        entity.insert(Enemy);
    }

    if let Some(sense) = &profile.sense {
        entity.insert((
            Actor::new(HOSTILE_FACTION),
            AIState::Idle,
            AIConfig::from(sense),
            AITarget(target),
            MovementCommand::Idle,
        ));
    }

    if let Some(attack) = &profile.attack {
        entity.insert(AttackProfile::from(attack));
    }

    if let Some(explosive) = &profile.explosive {
        entity.insert(Explosive::from(explosive));
    }

    let id = entity.id();
    crate::log(&format!(
        "Spawned {} {:?} at {:?}",
        profile.name, id, transform.translation
    ));
    id
}

/// Спавн игрока (позицию дальше пишет движок)
pub fn spawn_player(commands: &mut Commands, position: Vec3, max_health: u32) -> Entity {
    commands
        .spawn((
            Name::new("player"),
            Transform::from_translation(position),
            Actor::new(PLAYER_FACTION),
            Player,
            Health::new(max_health),
        ))
        .id()
}
