//! Базовые компоненты combat entity: Actor, Health ledger, маркеры

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Фракция игрока
pub const PLAYER_FACTION: u64 = 0;
/// Фракция врагов
pub const HOSTILE_FACTION: u64 = 1;

/// Актор (игрок, враг) — участник боя, которого можно выбрать целью
///
/// Бочки и прочие разрушаемые объекты — не акторы: у них есть Health, но AI их не преследует.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(Health)]
pub struct Actor {
    /// Stable ID фракции; враждебны все, у кого faction_id отличается
    pub faction_id: u64,
}

impl Actor {
    pub fn new(faction_id: u64) -> Self {
        Self { faction_id }
    }

    pub fn is_hostile_to(&self, other: &Actor) -> bool {
        self.faction_id != other.faction_id
    }
}

/// Маркер игрока (смерть → Game Over)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Маркер врага, который учитывается в KillCounter
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// Очки за убийство (начисляются один раз, при смерти)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ScoreReward(pub u32);

/// Как entity умирает
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum DeathPolicy {
    /// Числовой пул: урон вычитается, смерть при 0
    #[default]
    DamagePool,
    /// Счётчик попаданий: каждый хит = 1, величина урона не важна
    HitCount { hits_to_die: u32 },
}

/// Результат одного попадания
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitOutcome {
    /// Ledger изменился
    pub damaged: bool,
    /// Именно этот хит убил (true не более одного раза за жизнь entity)
    pub killed: bool,
    /// Сколько реально снято с ledger (overkill не считается, HitCount = 1)
    pub lost: u32,
}

impl HitOutcome {
    pub const IGNORED: HitOutcome = HitOutcome {
        damaged: false,
        killed: false,
        lost: 0,
    };
}

/// Health ledger
///
/// Инварианты:
/// - 0 ≤ current ≤ max
/// - dead монотонен (false → true, никогда обратно)
/// - после смерти любой урон/лечение — no-op
///
/// Для `HitCount` max = hits_to_die, current = оставшиеся хиты,
/// поэтому инвариант диапазона общий для обеих политик.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: u32,
    max: u32,
    dead: bool,
    policy: DeathPolicy,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    /// Damage-pool health
    pub fn new(max: u32) -> Self {
        Self::with_policy(max, DeathPolicy::DamagePool)
    }

    /// Hit-count health (умирает после `hits_to_die` попаданий)
    pub fn hit_count(hits_to_die: u32) -> Self {
        Self::with_policy(hits_to_die, DeathPolicy::HitCount { hits_to_die })
    }

    pub fn with_policy(max: u32, policy: DeathPolicy) -> Self {
        let max = match policy {
            DeathPolicy::DamagePool => max,
            DeathPolicy::HitCount { hits_to_die } => hits_to_die,
        };

        Self {
            current: max,
            max,
            // max == 0 → мёртв с рождения (конфиг такое отвергает)
            dead: max == 0,
            policy,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn policy(&self) -> DeathPolicy {
        self.policy
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Сколько попаданий уже принято (для HitCount)
    pub fn hits_taken(&self) -> u32 {
        self.max - self.current
    }

    /// Применить урон
    ///
    /// DamagePool: current -= amount (saturating).
    /// HitCount: засчитывается один хит, amount игнорируется.
    pub fn apply_damage(&mut self, amount: u32) -> HitOutcome {
        if self.dead {
            return HitOutcome::IGNORED;
        }

        let loss = match self.policy {
            DeathPolicy::DamagePool => amount.min(self.current),
            DeathPolicy::HitCount { .. } => 1.min(self.current),
        };

        if loss == 0 {
            return HitOutcome::IGNORED;
        }

        self.current -= loss;

        let killed = self.current == 0;
        if killed {
            self.dead = true;
        }

        HitOutcome {
            damaged: true,
            killed,
            lost: loss,
        }
    }

    /// Попадание без величины (оружие hit-count врагов)
    ///
    /// Для DamagePool это no-op: пул считает только урон.
    pub fn take_hit(&mut self) -> HitOutcome {
        self.apply_damage(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_then_overkill() {
        let mut health = Health::new(100);

        let first = health.apply_damage(30);
        assert_eq!(
            first,
            HitOutcome {
                damaged: true,
                killed: false,
                lost: 30,
            }
        );
        assert_eq!(health.current(), 70);
        assert!(health.is_alive());

        let second = health.apply_damage(80);
        assert!(second.killed);
        // overkill: снято только то, что было
        assert_eq!(second.lost, 70);
        assert_eq!(health.current(), 0);
        assert!(health.is_dead());

        // Урон после смерти — no-op, повторной смерти нет
        let third = health.apply_damage(10);
        assert_eq!(third, HitOutcome::IGNORED);
        assert_eq!(health.current(), 0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_hit_count_ignores_magnitude() {
        let mut health = Health::hit_count(5);
        assert_eq!(health.max(), 5);

        for hit in 1..=4 {
            let outcome = health.apply_damage(1000);
            assert!(outcome.damaged);
            assert!(!outcome.killed, "died early on hit {}", hit);
            assert_eq!(outcome.lost, 1);
            assert_eq!(health.hits_taken(), hit);
        }

        let fifth = health.take_hit();
        assert!(fifth.killed);
        assert!(health.is_dead());
        assert_eq!(health.current(), 0);

        assert_eq!(health.take_hit(), HitOutcome::IGNORED);
        assert_eq!(health.hits_taken(), 5);
    }

    #[test]
    fn test_zero_damage_on_pool_changes_nothing() {
        let mut health = Health::new(50);
        assert_eq!(health.apply_damage(0), HitOutcome::IGNORED);
        assert_eq!(health.take_hit(), HitOutcome::IGNORED);
        assert_eq!(health.current(), 50);
    }

    #[test]
    fn test_range_invariant_over_mixed_sequence() {
        let amounts = [7u32, 0, 13, 250, 1, 99, 3];

        for policy in [DeathPolicy::DamagePool, DeathPolicy::HitCount { hits_to_die: 4 }] {
            let mut health = Health::with_policy(120, policy);
            let mut deaths = 0;

            for amount in amounts.iter().cycle().take(40) {
                if health.apply_damage(*amount).killed {
                    deaths += 1;
                }
                assert!(health.current() <= health.max());
                assert_eq!(health.is_dead(), health.current() == 0);
            }

            assert_eq!(deaths, 1, "{:?} died {} times", policy, deaths);
        }
    }

    #[test]
    fn test_hostility() {
        let player = Actor::new(PLAYER_FACTION);
        let enemy = Actor::new(HOSTILE_FACTION);
        assert!(player.is_hostile_to(&enemy));
        assert!(!enemy.is_hostile_to(&Actor::new(HOSTILE_FACTION)));
    }
}
