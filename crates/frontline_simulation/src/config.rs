//! Конфигурация симуляции: профили врагов, сегменты кампании, задержки
//!
//! Один параметризованный `EnemyProfile` вместо отдельного типа на каждый вид
//! врага. Загружается из JSON (`SimulationConfig::load`), валидируется один раз
//! на входе — дальше core верит значениям.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actor::DeathPolicy;
use crate::error::{ConfigError, SimulationError};
use crate::logger;

/// Параметры атаки (ближний удар или выстрел — core не различает)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    pub damage: u32,
    pub range: f32,
    /// Секунды между атаками
    pub cooldown: f32,
    /// Задержка между началом замаха и уроном (0 = мгновенно)
    pub strike_delay: f32,
    /// Сколько длится замах (враг "mid-attack" и не уходит в Pursue)
    pub swing_duration: f32,
    /// Минимальный dot(forward, dir_to_target); None = без проверки
    pub facing_tolerance: Option<f32>,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            damage: 10,
            range: 2.0,
            cooldown: 2.0,
            strike_delay: 0.0,
            swing_duration: 0.0,
            facing_tolerance: None,
        }
    }
}

/// Восприятие цели (без него — неподвижный объект вроде бочки)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenseConfig {
    pub detection_range: f32,
    /// Hysteresis: цель теряется только дальше этого радиуса
    pub detection_loss_range: f32,
    /// false = турель, команды движения не выдаются
    pub mobile: bool,
}

impl Default for SenseConfig {
    fn default() -> Self {
        Self {
            detection_range: 10.0,
            detection_loss_range: 10.0,
            mobile: true,
        }
    }
}

/// Area damage при смерти entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosiveConfig {
    pub radius: f32,
    pub damage: u32,
}

/// Профиль врага (или любого combat entity кроме игрока)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    pub name: String,
    pub max_health: u32,
    pub death_policy: DeathPolicy,
    pub score_reward: u32,
    pub sense: Option<SenseConfig>,
    pub attack: Option<AttackConfig>,
    pub explosive: Option<ExplosiveConfig>,
    /// Через сколько секунд после смерти труп деспавнится
    pub despawn_delay: f32,
    /// Учитывается ли в KillCounter (бочки — нет)
    pub counts_as_enemy: bool,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self::brute()
    }
}

impl EnemyProfile {
    /// Тяжёлый melee враг: маленький радиус обнаружения, удар сразу
    pub fn brute() -> Self {
        Self {
            name: "brute".into(),
            max_health: 100,
            death_policy: DeathPolicy::DamagePool,
            score_reward: 50,
            sense: Some(SenseConfig {
                detection_range: 10.0,
                detection_loss_range: 10.0,
                mobile: true,
            }),
            attack: Some(AttackConfig {
                damage: 10,
                range: 2.0,
                cooldown: 2.0,
                ..Default::default()
            }),
            explosive: None,
            despawn_delay: 3.0,
            counts_as_enemy: true,
        }
    }

    /// Мутант: видит далеко, замах 1.5s, урон на 0.5s
    pub fn mutant() -> Self {
        Self {
            name: "mutant".into(),
            sense: Some(SenseConfig {
                detection_range: 30.0,
                detection_loss_range: 40.0,
                mobile: true,
            }),
            attack: Some(AttackConfig {
                damage: 10,
                range: 2.0,
                cooldown: 2.0,
                strike_delay: 0.5,
                swing_duration: 1.5,
                facing_tolerance: None,
            }),
            despawn_delay: 0.1,
            ..Self::brute()
        }
    }

    /// Скелет: быстрый cooldown, бьёт только если смотрит на цель
    pub fn skeleton() -> Self {
        Self {
            name: "skeleton".into(),
            score_reward: 0,
            sense: Some(SenseConfig {
                detection_range: 15.0,
                detection_loss_range: 15.0,
                mobile: true,
            }),
            attack: Some(AttackConfig {
                damage: 10,
                range: 2.0,
                cooldown: 1.5,
                facing_tolerance: Some(0.3),
                ..Default::default()
            }),
            despawn_delay: 0.0,
            ..Self::brute()
        }
    }

    /// Турель: неподвижна, стреляет 1.5 раза в секунду, умирает от 5 попаданий
    pub fn turret() -> Self {
        Self {
            name: "turret".into(),
            max_health: 5,
            death_policy: DeathPolicy::HitCount { hits_to_die: 5 },
            score_reward: 20,
            sense: Some(SenseConfig {
                detection_range: 25.0,
                detection_loss_range: 25.0,
                mobile: false,
            }),
            attack: Some(AttackConfig {
                damage: 10,
                range: 25.0,
                cooldown: 1.0 / 1.5,
                ..Default::default()
            }),
            explosive: None,
            despawn_delay: 0.0,
            counts_as_enemy: true,
        }
    }

    /// Взрывная бочка: один хит, 80 урона в радиусе 8
    pub fn barrel() -> Self {
        Self {
            name: "barrel".into(),
            max_health: 1,
            death_policy: DeathPolicy::HitCount { hits_to_die: 1 },
            score_reward: 0,
            sense: None,
            attack: None,
            explosive: Some(ExplosiveConfig {
                radius: 8.0,
                damage: 80,
            }),
            despawn_delay: 0.0,
            counts_as_enemy: false,
        }
    }

    /// Effective max health (для hit-count это hits_to_die)
    pub fn effective_max_health(&self) -> u32 {
        match self.death_policy {
            DeathPolicy::DamagePool => self.max_health,
            DeathPolicy::HitCount { hits_to_die } => hits_to_die,
        }
    }

    /// Проверка профиля. Невалидные значения отвергаются,
    /// detection_loss_range < detection_range поднимается до detection_range.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let profile = self.name.clone();

        match self.death_policy {
            DeathPolicy::DamagePool if self.max_health == 0 => {
                return Err(ConfigError::ZeroHealth { profile });
            }
            DeathPolicy::HitCount { hits_to_die: 0 } => {
                return Err(ConfigError::ZeroHitsToDie { profile });
            }
            _ => {}
        }

        if let Some(sense) = self.sense.as_mut() {
            require_positive(&profile, "detection_range", sense.detection_range)?;

            // NaN тоже сюда: сравнение с NaN всегда false
            if !(sense.detection_loss_range >= sense.detection_range) {
                logger::log_warning(&format!(
                    "⚠️ profile '{}': detection_loss_range {} < detection_range {}, clamped",
                    profile, sense.detection_loss_range, sense.detection_range
                ));
                sense.detection_loss_range = sense.detection_range;
            }
        }

        if let Some(attack) = &self.attack {
            require_positive(&profile, "attack.range", attack.range)?;
            require_positive(&profile, "attack.cooldown", attack.cooldown)?;

            if !(attack.strike_delay >= 0.0) {
                return Err(ConfigError::NonPositive {
                    profile,
                    field: "attack.strike_delay",
                    value: attack.strike_delay,
                });
            }
            if !(attack.swing_duration >= 0.0) {
                return Err(ConfigError::NonPositive {
                    profile,
                    field: "attack.swing_duration",
                    value: attack.swing_duration,
                });
            }

            if let Some(tolerance) = attack.facing_tolerance {
                if !(-1.0..=1.0).contains(&tolerance) {
                    return Err(ConfigError::FacingTolerance {
                        profile,
                        value: tolerance,
                    });
                }
            }

            if let Some(sense) = &self.sense {
                if attack.range > sense.detection_loss_range {
                    return Err(ConfigError::AttackBeyondSight {
                        profile,
                        attack_range: attack.range,
                        loss_range: sense.detection_loss_range,
                    });
                }
            }
        }

        if let Some(explosive) = &self.explosive {
            require_positive(&profile, "explosive.radius", explosive.radius)?;
        }

        if self.despawn_delay < 0.0 {
            return Err(ConfigError::NonPositive {
                profile,
                field: "despawn_delay",
                value: self.despawn_delay,
            });
        }

        Ok(self)
    }
}

fn require_positive(profile: &str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    // NaN тоже отвергается
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            profile: profile.to_string(),
            field,
            value,
        })
    }
}

/// Условие завершения сегмента
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WinCondition {
    /// Убить всех врагов сегмента (включая всё, что выдадут спавнеры)
    KillAll,
    /// Набрать очки до конца таймера
    ScoreBeforeTimeout {
        required_score: u32,
        time_limit: f32,
        /// Победа сразу при достижении порога, не дожидаясь таймера
        finish_early: bool,
    },
    /// Игрок дошёл до выхода
    ReachExit,
}

/// Один сегмент (уровень) кампании
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub name: String,
    pub win_condition: WinCondition,
}

impl SegmentConfig {
    pub fn new(name: impl Into<String>, win_condition: WinCondition) -> Self {
        Self {
            name: name.into(),
            win_condition,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let WinCondition::ScoreBeforeTimeout { time_limit, .. } = self.win_condition {
            if time_limit.is_nan() || time_limit <= 0.0 {
                return Err(ConfigError::InvalidSegment {
                    segment: self.name.clone(),
                    reason: format!("time_limit must be positive (got {})", time_limit),
                });
            }
        }
        Ok(())
    }
}

/// Корневой конфиг (resource)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub fixed_hz: f64,
    /// Пауза между Victory и загрузкой следующего сегмента (simulation time)
    pub victory_display_delay: f32,
    /// Wall-clock отсчёт до рестарта после Game Over
    pub game_over_countdown: f32,
    pub player_max_health: u32,
    pub segments: Vec<SegmentConfig>,
    pub profiles: Vec<EnemyProfile>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fixed_hz: 60.0,
            victory_display_delay: 2.0,
            game_over_countdown: 10.0,
            player_max_health: 100,
            segments: vec![
                SegmentConfig::new(
                    "airfield",
                    WinCondition::ScoreBeforeTimeout {
                        required_score: 100,
                        time_limit: 60.0,
                        finish_early: true,
                    },
                ),
                SegmentConfig::new("desert", WinCondition::KillAll),
                SegmentConfig::new("crypt", WinCondition::KillAll),
            ],
            profiles: vec![
                EnemyProfile::brute(),
                EnemyProfile::mutant(),
                EnemyProfile::skeleton(),
                EnemyProfile::turret(),
                EnemyProfile::barrel(),
            ],
        }
    }
}

impl SimulationConfig {
    /// Загрузка и валидация JSON конфига
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SimulationError> {
        let config: SimulationConfig = serde_json::from_str(raw)?;
        Ok(config.validate()?)
    }

    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.fixed_hz.is_nan() || self.fixed_hz <= 0.0 {
            return Err(ConfigError::InvalidTickRate(self.fixed_hz));
        }
        if self.segments.is_empty() {
            return Err(ConfigError::NoSegments);
        }
        for segment in &self.segments {
            segment.validate()?;
        }

        require_positive("<session>", "game_over_countdown", self.game_over_countdown)?;
        if self.victory_display_delay < 0.0 {
            return Err(ConfigError::NonPositive {
                profile: "<session>".into(),
                field: "victory_display_delay",
                value: self.victory_display_delay,
            });
        }
        if self.player_max_health == 0 {
            return Err(ConfigError::ZeroHealth {
                profile: "player".into(),
            });
        }

        self.profiles = self
            .profiles
            .into_iter()
            .map(EnemyProfile::validate)
            .collect::<Result<_, _>>()?;

        Ok(self)
    }

    /// Профиль по имени (имена — только для конфигов, в runtime ходят Entity)
    pub fn profile(&self, name: &str) -> Option<&EnemyProfile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    pub fn segment(&self, index: usize) -> Option<&SegmentConfig> {
        self.segments.get(index)
    }
}
