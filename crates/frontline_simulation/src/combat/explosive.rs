//! Explosive — area damage при смерти entity (бочки)

use bevy::prelude::*;

use crate::config::ExplosiveConfig;

/// Взрывается при смерти
///
/// `detonated` ставится при взрыве и больше не снимается: повторный взрыв невозможен.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Explosive {
    pub radius: f32,
    pub damage: u32,
    pub detonated: bool,
}

impl Explosive {
    pub fn new(radius: f32, damage: u32) -> Self {
        Self {
            radius,
            damage,
            detonated: false,
        }
    }
}

impl From<&ExplosiveConfig> for Explosive {
    fn from(config: &ExplosiveConfig) -> Self {
        Self::new(config.radius, config.damage)
    }
}

/// Linear falloff: round(base × max(0, 1 − distance/radius))
pub fn explosion_damage(base_damage: u32, distance: f32, radius: f32) -> u32 {
    if radius <= 0.0 {
        return 0;
    }

    let falloff = (1.0 - distance / radius).clamp(0.0, 1.0);
    (base_damage as f32 * falloff).round() as u32
}
