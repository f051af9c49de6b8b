//! Session/Progress tracker
//!
//! Score по сегментам, kill counter, победа/поражение, прогрессия кампании.
//! Движок загружает сцены по LoadSegment и подтверждает SegmentStarted.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod events;
pub mod progress;
pub mod score;
pub mod systems;

pub use events::*;
pub use progress::{GameOverCountdown, LevelPhase, LevelProgress, PendingProgression};
pub use score::{KillCounter, ScoreBoard};
pub use systems::*;

/// Session Plugin
///
/// FixedUpdate (simulation time):
/// 1. start_segments — SegmentStarted → подсчёт врагов
/// 2. credit_kills — очки и kill count
/// 3. detect_player_death — Game Over
/// 4. evaluate_win_conditions — KillAll / ScoreBeforeTimeout / ReachExit
/// 5. advance_pending_progression — переход после Victory
/// 6. run_spawners — респавн врагов
///
/// Update (wall-clock): tick_game_over_countdown — FixedUpdate на паузе после Game Over.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<crate::config::SimulationConfig>();
        let segment_count = app
            .world()
            .resource::<crate::config::SimulationConfig>()
            .segments
            .len();

        app.insert_resource(ScoreBoard::new(segment_count))
            .init_resource::<KillCounter>()
            .init_resource::<LevelProgress>()
            .init_resource::<GameOverCountdown>()
            .add_event::<LoadSegment>()
            .add_event::<SegmentStarted>()
            .add_event::<CampaignCompleted>()
            .add_event::<ExitReached>()
            .add_event::<LevelEnded>();

        app.add_systems(
            FixedUpdate,
            (
                start_segments.in_set(SimulationSet::Segment),
                (
                    credit_kills,
                    detect_player_death,
                    evaluate_win_conditions,
                    advance_pending_progression,
                    crate::spawner::run_spawners,
                )
                    .chain()
                    .in_set(SimulationSet::Session),
            ),
        )
        .add_systems(Update, tick_game_over_countdown);
    }
}
