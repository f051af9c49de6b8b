//! FRONTLINE Simulation Core
//!
//! ECS-симуляция боя на Bevy 0.16 (decision layer шутера):
//! - ai: Idle → Pursue → Attack → Dead для каждого врага
//! - combat: атаки, damage ledger, взрывы с каскадами
//! - session: score, kill counter, победа/поражение, прогрессия сегментов
//!
//! Движок (рендер, физика, навигация, сцены) — внешний collaborator:
//! он пишет `Transform`, читает `MovementCommand` и события
//! (`PresentationCue`, `LoadSegment`), отвечает `SegmentStarted`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod actor;
pub mod ai;
pub mod combat;
pub mod config;
pub mod error;
pub mod logger;
pub mod movement;
pub mod presentation;
pub mod schedule;
pub mod session;
pub mod spawn;
pub mod spawner;

pub use actor::{Actor, DeathPolicy, Enemy, Health, HitOutcome, Player, ScoreReward};
pub use ai::{AIConfig, AIPlugin, AIState, AITarget};
pub use combat::{
    AttackProfile, CombatPlugin, DamageDealt, DamageRequest, Dead, DeathSettle, DespawnAfter,
    EntityDied, Explosive,
};
pub use config::{EnemyProfile, SegmentConfig, SimulationConfig, WinCondition};
pub use error::{ConfigError, SimulationError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use movement::MovementCommand;
pub use presentation::{Cue, PresentationCue};
pub use schedule::{DeferredAction, ScheduledActions};
pub use session::{
    CampaignCompleted, ExitReached, GameOverCountdown, KillCounter, LevelEnded, LevelOutcome,
    LevelPhase, LevelProgress, LoadSegment, ScoreBoard, SegmentStarted, SessionPlugin,
};
pub use spawn::{spawn_enemy, spawn_player};
pub use spawner::EnemySpawner;

/// Порядок фаз одного simulation tick (FixedUpdate)
///
/// Сегмент → AI решения → атаки → урон → смерти → session → уборка.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// SegmentStarted → подсчёт врагов, сброс таймеров
    Segment,
    /// Target acquisition + FSM transitions + movement directives
    Ai,
    /// Старт атак и отложенные удары
    Attack,
    /// DamageRequest → Health ledger, взрывы
    Resolve,
    /// EntityDied → Dead state, отмена отложенных действий
    Death,
    /// Score, kill counter, win/lose, прогрессия, спавнеры
    Session,
    /// Деспавн трупов
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();

        app.insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
            .insert_resource(DeterministicRng::new(config.seed))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Segment,
                    SimulationSet::Ai,
                    SimulationSet::Attack,
                    SimulationSet::Resolve,
                    SimulationSet::Death,
                    SimulationSet::Session,
                    SimulationSet::Cleanup,
                )
                    .chain(),
            )
            .insert_resource(config)
            .add_plugins((CombatPlugin, AIPlugin, SessionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Plugins подсистем не добавляются — вызывающий сам добавляет `SimulationPlugin`
/// (или отдельные plugins в тестах).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Snapshot компонента по всем entity (для сравнения детерминизма)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
