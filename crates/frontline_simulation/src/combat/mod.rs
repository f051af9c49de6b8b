//! Combat system module
//!
//! ECS ответственность:
//! - Health ledger через DamageRequest → DamageDealt / EntityDied
//! - Атаки врагов: cooldown, facing, отложенный удар
//! - Взрывы с falloff и цепной реакцией
//! - Переход в Dead и деспавн трупов
//!
//! Движок: анимации/звук по PresentationCue, hit detection оружия игрока → DamageRequest.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod attacker;
pub mod damage;
pub mod explosive;
pub mod systems;

pub use attacker::AttackProfile;
pub use damage::{
    resolve_hit, DamageDealt, DamageRequest, Dead, DeathSettle, DespawnAfter, EntityDied,
};
pub use explosive::{explosion_damage, Explosive};
pub use systems::*;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. ai_attack_execution — старт атак (мгновенный урон или Strike в очередь)
/// 2. run_scheduled_actions — отложенные удары, конец замаха
/// 3. resolve_damage_requests — ledger
/// 4. detonate_explosives — взрывы и каскады
/// 5. handle_deaths — Dead state, отмена очереди
/// 6. despawn_after_timeout — уборка трупов
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<crate::presentation::PresentationCue>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: атаки
                (ai_attack_execution, run_scheduled_actions)
                    .chain()
                    .in_set(SimulationSet::Attack),
                // Фаза 2: урон
                (resolve_damage_requests, detonate_explosives)
                    .chain()
                    .in_set(SimulationSet::Resolve),
                // Фаза 3: смерть
                handle_deaths.in_set(SimulationSet::Death),
                despawn_after_timeout.in_set(SimulationSet::Cleanup),
            ),
        );
    }
}
