//! EnemySpawner — один живой враг за раз, респавн с задержкой

use bevy::prelude::*;
use rand::Rng;

use crate::actor::{Health, Player};
use crate::config::EnemyProfile;
use crate::session::{KillCounter, LevelProgress};
use crate::spawn::spawn_enemy;
use crate::DeterministicRng;

/// Спавнер врагов
///
/// Держит не больше одного живого врага. После его смерти ждёт `respawn_delay`
/// и спавнит следующего в случайной (seeded RNG) точке.
#[derive(Component, Debug, Clone)]
pub struct EnemySpawner {
    pub spawn_points: Vec<Vec3>,
    pub profile: EnemyProfile,
    pub respawn_delay: f32,
    /// Сколько ещё врагов выдаст (None = бесконечно)
    pub remaining: Option<u32>,
    /// Текущий живой враг
    pub current: Option<Entity>,
    /// Не раньше этого времени (None = при первой возможности)
    pub next_spawn_time: Option<f32>,
}

impl EnemySpawner {
    pub fn new(
        profile: EnemyProfile,
        spawn_points: Vec<Vec3>,
        respawn_delay: f32,
        remaining: Option<u32>,
    ) -> Self {
        Self {
            spawn_points,
            profile,
            respawn_delay,
            remaining,
            current: None,
            next_spawn_time: None,
        }
    }

    /// Больше никого не выдаст
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    fn pick_spawn_point(&self, fallback: Vec3, rng: &mut DeterministicRng) -> Vec3 {
        if self.spawn_points.is_empty() {
            return fallback;
        }
        let index = rng.rng.gen_range(0..self.spawn_points.len());
        self.spawn_points[index]
    }
}

/// Система: спавнеры (только во время Playing)
///
/// Каждый спавн регистрируется в KillCounter.
pub fn run_spawners(
    mut commands: Commands,
    mut spawners: Query<(Entity, &Transform, &mut EnemySpawner)>,
    lives: Query<&Health>,
    players: Query<Entity, With<Player>>,
    progress: Res<LevelProgress>,
    mut kills: ResMut<KillCounter>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    if !progress.is_playing() {
        return;
    }

    let now = time.elapsed_secs();
    let player = players.iter().next();

    for (spawner_entity, transform, mut spawner) in spawners.iter_mut() {
        if let Some(current) = spawner.current {
            if lives.get(current).is_ok_and(|health| health.is_alive()) {
                continue;
            }

            spawner.current = None;
            if !spawner.is_exhausted() {
                spawner.next_spawn_time = Some(now + spawner.respawn_delay);
                crate::log(&format!(
                    "Spawner {:?}: respawn in {}s",
                    spawner_entity, spawner.respawn_delay
                ));
            }
            continue;
        }

        if spawner.is_exhausted() || spawner.next_spawn_time.is_some_and(|at| now < at) {
            continue;
        }

        let position = spawner.pick_spawn_point(transform.translation, &mut rng);
        let enemy = spawn_enemy(
            &mut commands,
            &spawner.profile,
            Transform::from_translation(position),
            player,
        );

        spawner.current = Some(enemy);
        spawner.next_spawn_time = None;
        if let Some(remaining) = spawner.remaining.as_mut() {
            *remaining -= 1;
        }

        if spawner.profile.counts_as_enemy {
            kills.register_enemy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustion() {
        let finite = EnemySpawner::new(EnemyProfile::brute(), vec![], 3.0, Some(0));
        assert!(finite.is_exhausted());

        let endless = EnemySpawner::new(EnemyProfile::brute(), vec![], 3.0, None);
        assert!(!endless.is_exhausted());
    }

    #[test]
    fn test_spawn_point_is_seeded() {
        let spawner = EnemySpawner::new(
            EnemyProfile::brute(),
            vec![Vec3::X, Vec3::Y, Vec3::Z, Vec3::NEG_X],
            3.0,
            None,
        );

        let picks = |seed| {
            let mut rng = DeterministicRng::new(seed);
            (0..8)
                .map(|_| spawner.pick_spawn_point(Vec3::ZERO, &mut rng))
                .collect::<Vec<_>>()
        };

        assert_eq!(picks(42), picks(42));
        assert!(picks(42).iter().all(|p| spawner.spawn_points.contains(p)));

        let empty = EnemySpawner::new(EnemyProfile::brute(), vec![], 3.0, None);
        let mut rng = DeterministicRng::new(1);
        assert_eq!(empty.pick_spawn_point(Vec3::ONE, &mut rng), Vec3::ONE);
    }
}
