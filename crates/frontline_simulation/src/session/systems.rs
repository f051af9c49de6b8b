//! Session systems: kill credit, win/lose, прогрессия, рестарт.

use bevy::prelude::*;

use crate::actor::{Enemy, Health, Player, ScoreReward};
use crate::combat::EntityDied;
use crate::config::{SimulationConfig, WinCondition};
use crate::session::{
    CampaignCompleted, ExitReached, GameOverCountdown, KillCounter, LevelEnded, LevelOutcome,
    LevelProgress, LoadSegment, ScoreBoard, SegmentStarted,
};
use crate::spawner::EnemySpawner;

/// Система: SegmentStarted → начать сегмент
///
/// KillCounter = число живых врагов в сцене (спавнеры добавят своих позже).
pub fn start_segments(
    mut started: EventReader<SegmentStarted>,
    config: Res<SimulationConfig>,
    mut progress: ResMut<LevelProgress>,
    mut scores: ResMut<ScoreBoard>,
    mut kills: ResMut<KillCounter>,
    enemies: Query<&Health, With<Enemy>>,
) {
    for event in started.read() {
        let Some(segment) = config.segment(event.index) else {
            crate::log_warning(&format!(
                "⚠️ SegmentStarted: unknown segment {} ({} configured)",
                event.index,
                config.segments.len()
            ));
            continue;
        };

        let total = enemies.iter().filter(|health| health.is_alive()).count() as u32;
        *kills = KillCounter::new(total);
        scores.set_segment(event.index);
        progress.begin_segment(event.index, &segment.win_condition);

        crate::log_info(&format!(
            "🗺️ Segment {} '{}' started: {} enemies, condition {:?}",
            event.index, segment.name, total, segment.win_condition
        ));
    }
}

/// Система: kill credit
///
/// EntityDied приходит ровно раз на смерть, поэтому очки и kill count
/// начисляются ровно один раз.
pub fn credit_kills(
    mut deaths: EventReader<EntityDied>,
    victims: Query<(Option<&ScoreReward>, Has<Enemy>)>,
    mut scores: ResMut<ScoreBoard>,
    mut kills: ResMut<KillCounter>,
) {
    for event in deaths.read() {
        let Ok((reward, is_enemy)) = victims.get(event.entity) else {
            continue;
        };

        if let Some(ScoreReward(points)) = reward {
            if *points > 0 {
                scores.add_score(*points);
            }
        }

        if is_enemy {
            kills.enemy_killed();
        }
    }
}

/// Система: смерть игрока → Game Over (при любом win condition)
pub fn detect_player_death(
    mut deaths: EventReader<EntityDied>,
    players: Query<(), With<Player>>,
    config: Res<SimulationConfig>,
    mut progress: ResMut<LevelProgress>,
    mut countdown: ResMut<GameOverCountdown>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut ended: EventWriter<LevelEnded>,
) {
    for event in deaths.read() {
        if players.get(event.entity).is_err() {
            continue;
        }

        crate::log_info(&format!("💀 Player {:?} died", event.entity));
        finish_segment(
            LevelOutcome::GameOver,
            &config,
            &mut progress,
            &mut countdown,
            &mut virtual_time,
            &mut ended,
        );
    }
}

/// Система: проверка win condition текущего сегмента
pub fn evaluate_win_conditions(
    config: Res<SimulationConfig>,
    scores: Res<ScoreBoard>,
    kills: Res<KillCounter>,
    spawners: Query<&EnemySpawner>,
    mut exits: EventReader<ExitReached>,
    mut progress: ResMut<LevelProgress>,
    mut countdown: ResMut<GameOverCountdown>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut ended: EventWriter<LevelEnded>,
    time: Res<Time<Fixed>>,
) {
    let exit_reached = exits.read().count() > 0;

    if !progress.is_playing() {
        return;
    }

    let Some(segment) = config.segment(progress.segment()) else {
        return;
    };

    let outcome = match segment.win_condition {
        WinCondition::KillAll => {
            let spawners_done = spawners.iter().all(EnemySpawner::is_exhausted);
            (kills.is_cleared() && spawners_done).then_some(LevelOutcome::Victory)
        }
        WinCondition::ScoreBeforeTimeout {
            required_score,
            finish_early,
            ..
        } => progress.tick_timer(
            time.delta_secs(),
            scores.total_score(),
            required_score,
            finish_early,
        ),
        WinCondition::ReachExit => exit_reached.then_some(LevelOutcome::Victory),
    };

    if let Some(outcome) = outcome {
        finish_segment(
            outcome,
            &config,
            &mut progress,
            &mut countdown,
            &mut virtual_time,
            &mut ended,
        );
    }
}

/// Helper: применить терминальный исход (one-shot)
///
/// GameOver ставит виртуальное время на паузу и запускает wall-clock отсчёт.
fn finish_segment(
    outcome: LevelOutcome,
    config: &SimulationConfig,
    progress: &mut LevelProgress,
    countdown: &mut GameOverCountdown,
    virtual_time: &mut Time<Virtual>,
    ended: &mut EventWriter<LevelEnded>,
) {
    let segment = progress.segment();
    if !progress.finish(outcome, config.victory_display_delay) {
        crate::log(&format!(
            "Session: {:?} for segment {} ignored (already {:?})",
            outcome,
            segment,
            progress.phase()
        ));
        return;
    }

    ended.write(LevelEnded { segment, outcome });

    match outcome {
        LevelOutcome::Victory => {
            crate::log_info(&format!("🎉 Segment {} cleared", segment));
        }
        LevelOutcome::GameOver => {
            countdown.start(config.game_over_countdown);
            virtual_time.pause();
            crate::log_info(&format!(
                "☠️ GAME OVER in segment {}, restart in {}s",
                segment, config.game_over_countdown
            ));
        }
    }
}

/// Система: отложенный переход после Victory
pub fn advance_pending_progression(
    config: Res<SimulationConfig>,
    scores: Res<ScoreBoard>,
    mut progress: ResMut<LevelProgress>,
    mut loads: EventWriter<LoadSegment>,
    mut completed: EventWriter<CampaignCompleted>,
    time: Res<Time<Fixed>>,
) {
    let Some(next) = progress.tick_pending(time.delta_secs()) else {
        return;
    };

    if next < config.segments.len() {
        crate::log_info(&format!("➡️ Loading segment {}", next));
        loads.write(LoadSegment { index: next });
    } else {
        crate::log_info(&format!(
            "🏁 Campaign completed, total score {}",
            scores.total_score()
        ));
        completed.write(CampaignCompleted {
            total_score: scores.total_score(),
        });
    }
}

/// Система: отсчёт Game Over (Update, wall-clock)
///
/// При нуле: сброс очков, снятие паузы, загрузка сегмента 0.
pub fn tick_game_over_countdown(
    real_time: Res<Time<Real>>,
    mut countdown: ResMut<GameOverCountdown>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut scores: ResMut<ScoreBoard>,
    mut kills: ResMut<KillCounter>,
    mut progress: ResMut<LevelProgress>,
    mut loads: EventWriter<LoadSegment>,
) {
    if !countdown.is_running() {
        return;
    }

    let shown_before = countdown.display_seconds();
    let finished = countdown.tick(real_time.delta_secs());

    if !finished {
        let shown_after = countdown.display_seconds();
        if shown_after != shown_before {
            if let Some(seconds) = shown_after {
                crate::log(&format!("⏳ Restart in {}", seconds));
            }
        }
        return;
    }

    scores.reset_scores();
    *kills = KillCounter::default();
    progress.restart();
    virtual_time.unpause();

    crate::log_info("🔄 Restarting campaign from segment 0");
    loads.write(LoadSegment { index: 0 });
}
