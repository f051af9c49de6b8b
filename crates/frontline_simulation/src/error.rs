//! Ошибки загрузки конфигурации
//!
//! Runtime core ошибок не возвращает (битые ссылки и повторные смерти —
//! лог + no-op). Ошибки существуют только там, где данные приходят извне.

use std::path::PathBuf;
use thiserror::Error;

/// Невалидный профиль/сегмент (отвергается при загрузке)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("profile '{profile}': {field} must be positive (got {value})")]
    NonPositive {
        profile: String,
        field: &'static str,
        value: f32,
    },

    #[error("profile '{profile}': max_health must be at least 1")]
    ZeroHealth { profile: String },

    #[error("profile '{profile}': hit-count policy needs hits_to_die >= 1")]
    ZeroHitsToDie { profile: String },

    #[error("profile '{profile}': facing tolerance {value} is outside [-1, 1]")]
    FacingTolerance { profile: String, value: f32 },

    #[error("profile '{profile}': attack range {attack_range} exceeds detection loss range {loss_range}")]
    AttackBeyondSight {
        profile: String,
        attack_range: f32,
        loss_range: f32,
    },

    #[error("segment '{segment}': {reason}")]
    InvalidSegment { segment: String, reason: String },

    #[error("campaign has no segments")]
    NoSegments,

    #[error("fixed_hz must be positive (got {0})")]
    InvalidTickRate(f64),
}

/// Ошибка загрузки `SimulationConfig` из файла
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}
