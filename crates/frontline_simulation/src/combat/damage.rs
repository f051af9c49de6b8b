//! Damage events и resolve_hit
//!
//! Единственный вход урона в core — `DamageRequest` (или прямой вызов `resolve_hit`).
//! Ledger сам гарантирует idempotent death, поэтому `EntityDied` приходит ровно раз.

use bevy::prelude::*;

use crate::actor::{Health, HitOutcome};

/// Event: запрос урона (оружие игрока, удар врага, внешний код)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    /// None = окружение / неизвестный источник
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: u32,
}

impl DamageRequest {
    pub fn new(attacker: Option<Entity>, target: Entity, amount: u32) -> Self {
        Self {
            attacker,
            target,
            amount,
        }
    }
}

/// Событие: урон нанесен (ledger изменился)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    /// Фактически снято (`HitOutcome::lost`), не запрошенный amount
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: entity умер (ровно один раз за жизнь entity)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Задержка деспавна после смерти (секунды). Без компонента труп остаётся.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DeathSettle(pub f32);

/// Компонент: деспавн после указанного времени
///
/// Система `despawn_after_timeout` сравнивает с `Time<Fixed>::elapsed_secs`.
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Время деспавна (elapsed seconds)
    pub despawn_time: f32,
}

/// Применить попадание к ledger цели
///
/// No-op для мёртвой цели. Kill credit (score, kill counter) начисляет session
/// tracker по `EntityDied`, который пишется только когда `killed == true`.
pub fn resolve_hit(
    attacker: Option<Entity>,
    target: Entity,
    health: &mut Health,
    damage: u32,
) -> HitOutcome {
    let outcome = health.apply_damage(damage);

    if outcome.killed {
        crate::log_info(&format!("💀 Entity {:?} killed by {:?}", target, attacker));
    } else if outcome.damaged {
        crate::log(&format!(
            "🩸 {:?} → {:?}: {} damage (health {}/{})",
            attacker,
            target,
            outcome.lost,
            health.current(),
            health.max()
        ));
    }

    outcome
}
