//! AttackProfile — параметры и cooldown атакующего врага
//!
//! Время — simulation seconds (`Time<Fixed>::elapsed_secs`), не таймер-декремент:
//! cooldown считается от момента последней атаки.

use bevy::prelude::*;

use crate::config::AttackConfig;
use crate::schedule::ScheduledActions;

/// Допуск сравнения времени: fixed step 1/60 s хранится в целых наносекундах,
/// 120 тиков = 1.99999992 s. Атака может сработать не раньше чем на 0.1 ms.
const TIME_EPSILON: f32 = 1e-4;

/// Атака врага (ближний удар или выстрел)
///
/// Инвариант: между двумя атаками проходит ≥ cooldown − `TIME_EPSILON`.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
#[require(ScheduledActions)]
pub struct AttackProfile {
    pub damage: u32,
    pub range: f32,
    pub cooldown: f32,
    /// Задержка урона от начала замаха (0 = мгновенно)
    pub strike_delay: f32,
    /// Длительность замаха
    pub swing_duration: f32,
    /// Минимальный dot(forward, dir_to_target)
    pub facing_tolerance: Option<f32>,
    /// Время последней атаки (None = ещё не атаковал)
    pub last_attack_time: Option<f32>,
    /// Идёт замах (сбрасывается `DeferredAction::EndSwing` или смертью)
    pub swinging: bool,
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self::from(&AttackConfig::default())
    }
}

impl From<&AttackConfig> for AttackProfile {
    fn from(config: &AttackConfig) -> Self {
        Self {
            damage: config.damage,
            range: config.range,
            cooldown: config.cooldown,
            strike_delay: config.strike_delay,
            swing_duration: config.swing_duration,
            facing_tolerance: config.facing_tolerance,
            last_attack_time: None,
            swinging: false,
        }
    }
}

impl AttackProfile {
    /// Прошёл ли cooldown к моменту `now`
    pub fn is_ready(&self, now: f32) -> bool {
        match self.last_attack_time {
            None => true,
            Some(last) => now - last + TIME_EPSILON >= self.cooldown,
        }
    }

    /// Может ли атаковать прямо сейчас (cooldown + не в замахе)
    pub fn can_attack(&self, now: f32) -> bool {
        !self.swinging && self.is_ready(now)
    }

    /// Повёрнут ли атакующий к цели
    ///
    /// Совпадающие позиции считаются "смотрит на цель".
    pub fn facing_allows(&self, forward: Vec3, to_target: Vec3) -> bool {
        let Some(tolerance) = self.facing_tolerance else {
            return true;
        };

        let direction = to_target.normalize_or_zero();
        if direction == Vec3::ZERO {
            return true;
        }

        forward.normalize_or_zero().dot(direction) >= tolerance
    }

    /// Начать атаку: зафиксировать время, войти в замах (если он есть)
    pub fn start_attack(&mut self, now: f32) {
        self.last_attack_time = Some(now);
        self.swinging = self.swing_duration > 0.0;
    }

    pub fn end_swing(&mut self) {
        self.swinging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_cooldown() {
        let mut profile = AttackProfile::default();
        assert!(profile.can_attack(0.0));

        profile.start_attack(1.0);
        assert!(!profile.can_attack(1.0));
        assert!(!profile.can_attack(2.9));
        assert!(profile.can_attack(3.0));
    }

    #[test]
    fn test_cooldown_tolerance_is_sub_tick() {
        let mut profile = AttackProfile::default();
        profile.start_attack(0.0);

        // 2s cooldown на 60 Hz: готов ровно на 120-м тике, не на 119-м
        let tick = std::time::Duration::from_secs_f64(1.0 / 60.0);
        assert!(!profile.is_ready((tick * 119).as_secs_f32()));
        assert!(profile.is_ready((tick * 120).as_secs_f32()));

        assert!(profile.is_ready(2.0 - 0.00005));
        assert!(!profile.is_ready(2.0 - 0.001));
    }

    #[test]
    fn test_swing_blocks_until_end() {
        let mut profile = AttackProfile {
            swing_duration: 1.5,
            cooldown: 1.0,
            ..Default::default()
        };

        profile.start_attack(0.0);
        assert!(profile.swinging);
        // cooldown уже прошёл, но замах не закончен
        assert!(profile.is_ready(1.2));
        assert!(!profile.can_attack(1.2));

        profile.end_swing();
        assert!(profile.can_attack(1.2));
    }

    #[test]
    fn test_instant_attack_has_no_swing() {
        let mut profile = AttackProfile::default();
        profile.start_attack(0.0);
        assert!(!profile.swinging);
    }

    #[test]
    fn test_facing_tolerance() {
        let profile = AttackProfile {
            facing_tolerance: Some(0.3),
            ..Default::default()
        };

        let forward = Vec3::NEG_Z;
        assert!(profile.facing_allows(forward, Vec3::new(0.0, 0.0, -5.0)));
        // ~72° в сторону: dot ≈ 0.31
        assert!(profile.facing_allows(forward, Vec3::new(3.0, 0.0, -1.0)));
        // сбоку
        assert!(!profile.facing_allows(forward, Vec3::new(5.0, 0.0, 0.0)));
        // сзади
        assert!(!profile.facing_allows(forward, Vec3::new(0.0, 0.0, 5.0)));
        assert!(profile.facing_allows(forward, Vec3::ZERO));

        let no_check = AttackProfile::default();
        assert!(no_check.facing_allows(forward, Vec3::new(0.0, 0.0, 5.0)));
    }
}
