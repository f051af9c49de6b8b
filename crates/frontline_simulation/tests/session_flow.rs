//! Session flow integration test
//!
//! Победа/поражение сегмента, прогрессия кампании, рестарт после Game Over.
//! Движок эмулируется вручную: SegmentStarted / ExitReached шлёт сам тест.

mod support;

use bevy::prelude::*;
use frontline_simulation::*;
use support::*;

fn timed(required_score: u32, time_limit: f32, finish_early: bool) -> WinCondition {
    WinCondition::ScoreBeforeTimeout {
        required_score,
        time_limit,
        finish_early,
    }
}

fn far_brute(app: &mut App, x: f32) -> Entity {
    spawn_test_enemy(app, &EnemyProfile::brute(), Vec3::new(x, 0.0, 200.0), None)
}

fn current_spawn(app: &mut App) -> Option<Entity> {
    let world = app.world_mut();
    let mut spawners = world.query::<&EnemySpawner>();
    spawners.iter(world).next().and_then(|spawner| spawner.current)
}

#[test]
fn test_timeout_below_required_is_game_over_then_restart() {
    let mut app = simulation_app(config_with(vec![
        SegmentConfig::new("timed", timed(100, 3.0, false)),
        SegmentConfig::new("next", WinCondition::KillAll),
    ]));

    start_segment(&mut app, 0);
    app.world_mut().resource_mut::<ScoreBoard>().add_score(60);

    run_for(&mut app, 3.5);

    assert_eq!(
        recorded(&app).ended,
        vec![LevelEnded {
            segment: 0,
            outcome: LevelOutcome::GameOver
        }]
    );
    assert!(app.world().resource::<Time<Virtual>>().is_paused());
    assert!(app.world().resource::<GameOverCountdown>().is_running());
    assert_eq!(
        app.world().resource::<LevelProgress>().phase(),
        LevelPhase::GameOver
    );

    // Симуляция стоит: fixed time не двигается
    let frozen = app.world().resource::<Time<Fixed>>().elapsed();
    run_for(&mut app, 0.2);
    assert_eq!(app.world().resource::<Time<Fixed>>().elapsed(), frozen);
    assert!(recorded(&app).loads.is_empty());

    // Wall-clock отсчёт 2s → рестарт с сегмента 0
    run_for(&mut app, 2.0);

    assert_eq!(recorded(&app).loads, vec![LoadSegment { index: 0 }]);
    assert_eq!(app.world().resource::<ScoreBoard>().total_score(), 0);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    assert_eq!(
        app.world().resource::<LevelProgress>().phase(),
        LevelPhase::Loading
    );
    assert_eq!(recorded(&app).ended.len(), 1);
}

#[test]
fn test_timeout_above_required_advances_once() {
    let mut app = simulation_app(config_with(vec![
        SegmentConfig::new("timed", timed(100, 2.0, false)),
        SegmentConfig::new("next", WinCondition::KillAll),
    ]));

    start_segment(&mut app, 0);
    app.world_mut().resource_mut::<ScoreBoard>().add_score(120);

    // До таймаута — ничего, даже с лишними очками
    run_for(&mut app, 1.0);
    assert!(recorded(&app).ended.is_empty());

    run_for(&mut app, 2.0);

    assert_eq!(
        recorded(&app).ended,
        vec![LevelEnded {
            segment: 0,
            outcome: LevelOutcome::Victory
        }]
    );
    assert_eq!(recorded(&app).loads, vec![LoadSegment { index: 1 }]);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
}

#[test]
fn test_finish_early_on_kill_score() {
    let mut app = simulation_app(config_with(vec![
        SegmentConfig::new("timed", timed(100, 60.0, true)),
        SegmentConfig::new("next", WinCondition::KillAll),
    ]));
    let first = far_brute(&mut app, 0.0);
    let second = far_brute(&mut app, 40.0);

    start_segment(&mut app, 0);

    damage(&mut app, first, 100);
    app.update();
    assert!(recorded(&app).ended.is_empty());
    assert_eq!(app.world().resource::<ScoreBoard>().total_score(), 50);

    damage(&mut app, second, 100);
    app.update();
    assert_eq!(
        recorded(&app).ended,
        vec![LevelEnded {
            segment: 0,
            outcome: LevelOutcome::Victory
        }]
    );
}

#[test]
fn test_kill_all_victory_once_then_campaign_completes() {
    let mut app = simulation_app(kill_all_config());
    let _player = spawn_test_player(&mut app, Vec3::new(0.0, 0.0, -200.0));
    let first = far_brute(&mut app, 0.0);
    let second = far_brute(&mut app, 40.0);

    start_segment(&mut app, 0);
    assert_eq!(app.world().resource::<KillCounter>().total_enemies(), 2);

    damage(&mut app, first, 100);
    app.update();
    assert!(recorded(&app).ended.is_empty());

    damage(&mut app, second, 100);
    // Повторный урон по уже мёртвому — не вторая победа
    damage(&mut app, first, 100);
    app.update();

    let kills = *app.world().resource::<KillCounter>();
    assert_eq!(kills.enemies_killed(), 2);
    assert!(kills.is_cleared());
    assert_eq!(recorded(&app).ended.len(), 1);

    run_for(&mut app, 1.0);
    assert_eq!(recorded(&app).loads, vec![LoadSegment { index: 1 }]);
    assert_eq!(recorded(&app).ended.len(), 1);

    // Движок загрузил последний сегмент без врагов → сразу победа и конец кампании
    start_segment(&mut app, 1);
    run_for(&mut app, 1.0);

    assert_eq!(recorded(&app).ended.len(), 2);
    assert_eq!(recorded(&app).loads.len(), 1);
    assert_eq!(
        recorded(&app).completed,
        vec![CampaignCompleted { total_score: 100 }]
    );
    assert_eq!(app.world().resource::<ScoreBoard>().segment_score(0), 100);
}

#[test]
fn test_player_death_wins_over_simultaneous_clear() {
    let mut app = simulation_app(kill_all_config());
    let player = spawn_test_player(&mut app, Vec3::new(0.0, 0.0, -200.0));
    let brute = far_brute(&mut app, 0.0);

    start_segment(&mut app, 0);

    damage(&mut app, brute, 100);
    damage(&mut app, player, 100);
    app.update();

    assert_eq!(
        recorded(&app).ended,
        vec![LevelEnded {
            segment: 0,
            outcome: LevelOutcome::GameOver
        }]
    );
    assert!(app.world().resource::<Time<Virtual>>().is_paused());
}

#[test]
fn test_reach_exit_advances() {
    let mut app = simulation_app(config_with(vec![SegmentConfig::new(
        "exit",
        WinCondition::ReachExit,
    )]));

    start_segment(&mut app, 0);
    run_for(&mut app, 0.5);
    assert!(recorded(&app).ended.is_empty());

    app.world_mut().send_event(ExitReached);
    app.world_mut().send_event(ExitReached);
    app.update();
    assert_eq!(recorded(&app).ended.len(), 1);

    run_for(&mut app, 1.0);
    assert_eq!(
        recorded(&app).completed,
        vec![CampaignCompleted { total_score: 0 }]
    );
}

#[test]
fn test_spawner_must_be_exhausted_for_kill_all() {
    let mut app = simulation_app(kill_all_config());
    app.world_mut().spawn((
        Transform::default(),
        EnemySpawner::new(
            EnemyProfile::brute(),
            vec![Vec3::new(50.0, 0.0, 50.0)],
            1.0,
            Some(2),
        ),
    ));

    // Врагов в сцене нет, но спавнер ещё не отработал — победы нет
    start_segment(&mut app, 0);
    app.update();
    assert!(recorded(&app).ended.is_empty());

    let first = current_spawn(&mut app).expect("first enemy spawned");
    assert_eq!(app.world().resource::<KillCounter>().total_enemies(), 1);

    damage(&mut app, first, 100);
    app.update();
    assert!(recorded(&app).ended.is_empty());
    assert_eq!(current_spawn(&mut app), None);

    run_for(&mut app, 1.2);
    let second = current_spawn(&mut app).expect("respawned after delay");
    assert_ne!(second, first);
    assert_eq!(app.world().resource::<KillCounter>().total_enemies(), 2);

    damage(&mut app, second, 100);
    app.update();

    assert_eq!(
        recorded(&app).ended,
        vec![LevelEnded {
            segment: 0,
            outcome: LevelOutcome::Victory
        }]
    );
    assert_eq!(app.world().resource::<ScoreBoard>().total_score(), 100);
}
